//! Errors raised by the bundled views.
//!
//! Views report failures as `HandlerError`s so the dispatcher can route them
//! through exception resolution; these are the concrete types inside.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Redirect URL '{url}' references '{{{variable}}}' but no model attribute or path variable has that name")]
    MissingRedirectVariable { url: String, variable: String },

    #[error("Could not serialize model to JSON: {0}")]
    Json(#[from] serde_json::Error),
}

//! Application layer errors.
//!
//! These are the failures that abort a dispatch outright. Routing misses and
//! interceptor short-circuits are normal outcomes recorded on the result,
//! never errors.

use thiserror::Error;

use crate::domain::HandlerError;
use crate::error::ErrorCategory;

/// Errors that escape a dispatch.
#[derive(Debug, Error, Clone)]
pub enum DispatchError {
    /// A router selected a handler but no adapter accepts it.
    #[error("No handler adapter for handler '{handler}'")]
    NoHandlerAdapter { handler: String },

    /// A logical view name that no view resolver recognizes.
    #[error("Could not resolve view with name '{view_name}'")]
    UnresolvableView { view_name: String },

    /// A model-and-view reached rendering with neither a view nor a name.
    #[error("Model-and-view [{model_and_view}] neither contains a view name nor a view")]
    MissingView { model_and_view: String },

    /// The handler failed and no exception resolver claimed the error.
    #[error("Unhandled error from handler: {0}")]
    Unhandled(#[source] HandlerError),
}

impl DispatchError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NoHandlerAdapter { handler } => vec![
                format!("Register a handler adapter that supports '{handler}'"),
                "Adapters are consulted in order; the first whose supports() accepts wins".into(),
            ],
            Self::UnresolvableView { view_name } => vec![
                format!("No view resolver returned a view for '{view_name}'"),
                "Register a view resolver, or return a view instance from the handler".into(),
            ],
            Self::MissingView { .. } => vec![
                "Configure a view name translator so default view names can be derived".into(),
                "Or set a view name on the model-and-view".into(),
            ],
            Self::Unhandled(error) => vec![
                format!("The handler raised {}", error.short_type_name()),
                "Register an exception resolver for this error type to recover it".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoHandlerAdapter { .. }
            | Self::UnresolvableView { .. }
            | Self::MissingView { .. } => ErrorCategory::Configuration,
            Self::Unhandled(_) => ErrorCategory::Handler,
        }
    }

    /// The unrecovered handler error, if that is what aborted the dispatch.
    pub fn handler_error(&self) -> Option<&HandlerError> {
        match self {
            Self::Unhandled(error) => Some(error),
            _ => None,
        }
    }
}

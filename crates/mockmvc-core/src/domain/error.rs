// ============================================================================
// domain/error.rs - REQUEST CONSTRUCTION ERRORS
// ============================================================================

use thiserror::Error;

/// Errors raised while turning a [`MockRequestBuilder`] into a request.
///
/// These are configuration errors in the test itself, never routing
/// outcomes: a builder that fails here never reaches the dispatcher.
///
/// [`MockRequestBuilder`]: crate::domain::MockRequestBuilder
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RequestBuildError {
    // ========================================================================
    // URI Errors
    // ========================================================================
    #[error("URI template '{template}' needs a value for '{{{variable}}}' but only {supplied} were supplied")]
    MissingUriVariable {
        template: String,
        variable: String,
        supplied: usize,
    },

    #[error("Invalid request URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    // ========================================================================
    // Header / Locale Errors
    // ========================================================================
    #[error("Invalid header '{name}: {value}'")]
    InvalidHeader { name: String, value: String },

    #[error("Invalid locale '{value}'")]
    InvalidLocale { value: String },

    // ========================================================================
    // Path Decomposition Errors
    // ========================================================================
    #[error("{kind} '{path}' must start with '/' and must not end with '/'")]
    InvalidContextPath { kind: &'static str, path: String },

    #[error("Request URI '{uri}' does not start with context path '{context_path}'")]
    ContextPathMismatch { uri: String, context_path: String },

    #[error("Request URI '{uri}' does not start with servlet path '{servlet_path}'")]
    ServletPathMismatch { uri: String, servlet_path: String },
}

impl RequestBuildError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingUriVariable { variable, .. } => vec![
                format!("Pass a value for '{{{variable}}}' with uri_vars(..)"),
                "Variables are substituted left to right by position".into(),
            ],
            Self::InvalidHeader { name, .. } => vec![
                format!("Header '{name}' is not a valid HTTP header name or value"),
                "Header values must be visible ASCII".into(),
            ],
            Self::InvalidContextPath { kind, .. } => vec![
                format!("Use a {kind} like \"/app\" or leave it empty"),
            ],
            Self::ContextPathMismatch { context_path, .. } => vec![
                format!("Prefix the request URI with '{context_path}'"),
                "Or remove the context path from the request builder".into(),
            ],
            Self::ServletPathMismatch { servlet_path, .. } => vec![
                format!("Prefix the request URI (after the context path) with '{servlet_path}'"),
            ],
            _ => vec!["Check the request builder configuration".into()],
        }
    }
}

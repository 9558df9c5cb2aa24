//! Unified error handling for mockmvc-core.
//!
//! This module provides a unified error type that wraps request-building and
//! dispatch errors, with categories and user-actionable suggestions.

use thiserror::Error;

use crate::application::DispatchError;
use crate::domain::{HandlerError, RequestBuildError};

/// Root error type for `perform`.
///
/// Either the request could not be built or the dispatch was aborted.
/// Everything else (404s, rejected requests, recovered handler errors) is
/// reported through the result, not here.
#[derive(Debug, Error, Clone)]
pub enum MockMvcError {
    /// The request builder was misconfigured.
    #[error("Request build error: {0}")]
    Build(#[from] RequestBuildError),

    /// The dispatch pipeline aborted.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}

impl MockMvcError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Build(e) => e.suggestions(),
            Self::Dispatch(e) => e.suggestions(),
        }
    }

    /// Get error category for display purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Build(_) => ErrorCategory::Build,
            Self::Dispatch(e) => e.category(),
        }
    }

    /// The unrecovered handler error, if one aborted the dispatch.
    pub fn handler_error(&self) -> Option<&HandlerError> {
        match self {
            Self::Dispatch(e) => e.handler_error(),
            Self::Build(_) => None,
        }
    }
}

/// Error categories for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request description itself is invalid.
    Build,
    /// The pipeline's collaborators are misconfigured.
    Configuration,
    /// Application code failed and nothing recovered it.
    Handler,
}

/// Convenient result type alias.
pub type MockMvcResult<T> = Result<T, MockMvcError>;

//! Errors for the test-facing layer.

use std::io;

use mockmvc_core::error::MockMvcError;
use thiserror::Error;

/// Result type alias for test DSL operations.
pub type TestResult<T> = Result<T, TestError>;

/// A result matcher's verdict.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssertionError {
    #[error("{what} expected:<{expected}> but was:<{actual}>")]
    Mismatch {
        what: String,
        expected: String,
        actual: String,
    },

    #[error("{what}: {message}")]
    Failed { what: String, message: String },
}

impl AssertionError {
    pub fn mismatch(
        what: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::Mismatch {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn failed(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Check `expected == actual`, describing a mismatch with `what`.
    pub fn check_eq<T>(what: &str, expected: T, actual: T) -> Result<(), Self>
    where
        T: PartialEq + std::fmt::Debug,
    {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::mismatch(
                what,
                format!("{expected:?}"),
                format!("{actual:?}"),
            ))
        }
    }
}

/// Errors surfaced by the test DSL.
#[derive(Debug, Error)]
pub enum TestError {
    /// Building or dispatching the request failed.
    #[error(transparent)]
    MockMvc(#[from] MockMvcError),

    /// An expectation did not hold.
    #[error("Assertion failed: {0}")]
    Assertion(#[from] AssertionError),

    /// A result handler could not write its output.
    #[error("Result handler failed: {0}")]
    Io(#[from] io::Error),
}

//! Handlers and the errors they raise.
//!
//! A handler is any application object a router selects for a request. The
//! core never calls a handler directly: a handler adapter decides whether it
//! can invoke it by downcasting through [`dyn Handler::downcast_ref`].

use std::any::{Any, type_name};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use thiserror::Error;

/// Upcast helper so `dyn Handler` can be downcast to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The unit of application logic selected to process a request.
pub trait Handler: AsAny + Send + Sync + fmt::Debug {
    /// Human-readable handler name, used by printers and matchers.
    fn name(&self) -> String {
        short_name(type_name::<Self>()).to_string()
    }
}

impl dyn Handler {
    pub fn is<T: Handler>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Handler>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Shared handle to a handler; routers hand these out on every match.
pub type HandlerRef = Arc<dyn Handler>;

/// A failure raised by a handler, an interceptor, or a view.
///
/// Wraps any error type and remembers its concrete type name so exception
/// resolvers can match on it. Cloning is cheap: the source is shared.
#[derive(Clone)]
pub struct HandlerError {
    source: Arc<dyn StdError + Send + Sync + 'static>,
    type_name: &'static str,
}

impl HandlerError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(error),
            type_name: type_name::<E>(),
        }
    }

    /// Shorthand for an ad-hoc failure with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(HandlerFailure(message.into()))
    }

    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.source.is::<E>()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.source.downcast_ref::<E>()
    }

    /// Fully-qualified type name of the wrapped error.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path, e.g. `IllegalStateError`.
    pub fn short_type_name(&self) -> &'static str {
        short_name(self.type_name)
    }

    pub fn inner(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.source.as_ref()
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerError")
            .field("type", &self.type_name)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.short_type_name(), self.source)
    }
}

impl StdError for HandlerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Result type returned by handler code.
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Plain message failure produced by [`HandlerError::message`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerFailure(pub String);

/// An error that maps directly onto an HTTP status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{status}{}", .reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default())]
pub struct ResponseStatusError {
    pub status: StatusCode,
    pub reason: Option<String>,
}

impl ResponseStatusError {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            reason: None,
        }
    }

    pub fn with_reason(status: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: Some(reason.into()),
        }
    }
}

fn short_name(full: &'static str) -> &'static str {
    // Generic arguments may contain `::` as well; cut before them first.
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Greeter;
    impl Handler for Greeter {}

    #[derive(Debug)]
    struct Other;
    impl Handler for Other {}

    #[derive(Debug, Error)]
    #[error("illegal state: {0}")]
    struct IllegalStateError(String);

    #[test]
    fn handler_downcasts_to_its_own_type_only() {
        let handler: HandlerRef = Arc::new(Greeter);
        assert!(handler.is::<Greeter>());
        assert!(handler.downcast_ref::<Other>().is_none());
        assert_eq!(handler.name(), "Greeter");
    }

    #[test]
    fn handler_error_keeps_concrete_type() {
        let err = HandlerError::new(IllegalStateError("boom".into()));
        assert!(err.is::<IllegalStateError>());
        assert!(!err.is::<HandlerFailure>());
        assert_eq!(err.short_type_name(), "IllegalStateError");
        assert_eq!(err.to_string(), "IllegalStateError: illegal state: boom");
        assert_eq!(err.downcast_ref::<IllegalStateError>().unwrap().0, "boom");
    }

    #[test]
    fn response_status_error_display() {
        let plain = ResponseStatusError::new(StatusCode::CONFLICT);
        assert_eq!(plain.to_string(), "409 Conflict");
        let with_reason = ResponseStatusError::with_reason(StatusCode::GONE, "moved on");
        assert_eq!(with_reason.to_string(), "410 Gone (moved on)");
    }
}

//! Handler and resolved-error matchers.

use std::error::Error as StdError;

use mockmvc_core::application::MvcResult;
use mockmvc_core::domain::{Handler, HandlerRef};

use super::ResultMatcher;
use crate::error::AssertionError;

fn handler(result: &MvcResult) -> Result<&HandlerRef, AssertionError> {
    result
        .handler()
        .ok_or_else(|| AssertionError::failed("Handler", "no handler was selected"))
}

/// The selected handler reports `expected` as its name.
pub fn name(expected: impl Into<String>) -> impl ResultMatcher {
    let expected = expected.into();
    move |result: &MvcResult| {
        AssertionError::check_eq("Handler name", expected.clone(), handler(result)?.name())
    }
}

/// The selected handler is a `T`.
pub fn is<T: Handler>() -> impl ResultMatcher {
    |result: &MvcResult| {
        let handler = handler(result)?;
        if handler.as_ref().is::<T>() {
            Ok(())
        } else {
            Err(AssertionError::mismatch(
                "Handler type",
                std::any::type_name::<T>(),
                format!("{handler:?}"),
            ))
        }
    }
}

/// No handler was selected.
pub fn none() -> impl ResultMatcher {
    |result: &MvcResult| match result.handler() {
        None => Ok(()),
        Some(handler) => Err(AssertionError::failed(
            "Handler",
            format!("expected none but was '{}'", handler.name()),
        )),
    }
}

/// An exception resolver recovered an error of type `E`.
pub fn resolved_error_is<E: StdError + 'static>() -> impl ResultMatcher {
    |result: &MvcResult| match result.resolved_error() {
        Some(error) if error.is::<E>() => Ok(()),
        Some(error) => Err(AssertionError::mismatch(
            "Resolved error type",
            std::any::type_name::<E>(),
            error.type_name(),
        )),
        None => Err(AssertionError::failed(
            "Resolved error",
            "no error was resolved",
        )),
    }
}

pub fn resolved_error_message(expected: impl Into<String>) -> impl ResultMatcher {
    let expected = expected.into();
    move |result: &MvcResult| {
        let error = result.resolved_error().ok_or_else(|| {
            AssertionError::failed("Resolved error", "no error was resolved")
        })?;
        AssertionError::check_eq(
            "Resolved error message",
            expected.clone(),
            error.inner().to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::tests::perform;
    use mockmvc_adapters::FnController;
    use mockmvc_core::domain::HandlerFailure;

    #[test]
    fn test_handler_name_and_type() {
        let result = perform("/ok");
        assert!(name("listHotels").matches(&result).is_ok());
        assert!(is::<FnController>().matches(&result).is_ok());
        assert!(none().matches(&result).is_err());

        let missing = perform("/missing");
        assert!(none().matches(&missing).is_ok());
        assert!(name("listHotels").matches(&missing).is_err());
    }

    #[test]
    fn test_resolved_error() {
        let result = perform("/fail");
        assert!(resolved_error_is::<HandlerFailure>().matches(&result).is_ok());
        assert!(resolved_error_message("kaput").matches(&result).is_ok());
        assert!(resolved_error_is::<HandlerFailure>().matches(&perform("/ok")).is_err());
    }
}

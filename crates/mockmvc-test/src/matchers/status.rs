//! Response status matchers.

use http::StatusCode;
use mockmvc_core::application::MvcResult;
use predicates::Predicate;

use super::ResultMatcher;
use crate::error::AssertionError;

pub fn is(expected: StatusCode) -> impl ResultMatcher {
    move |result: &MvcResult| AssertionError::check_eq("Status", expected, result.status())
}

pub fn is_ok() -> impl ResultMatcher {
    is(StatusCode::OK)
}

pub fn is_created() -> impl ResultMatcher {
    is(StatusCode::CREATED)
}

pub fn is_no_content() -> impl ResultMatcher {
    is(StatusCode::NO_CONTENT)
}

pub fn is_found() -> impl ResultMatcher {
    is(StatusCode::FOUND)
}

pub fn is_bad_request() -> impl ResultMatcher {
    is(StatusCode::BAD_REQUEST)
}

pub fn is_forbidden() -> impl ResultMatcher {
    is(StatusCode::FORBIDDEN)
}

pub fn is_not_found() -> impl ResultMatcher {
    is(StatusCode::NOT_FOUND)
}

pub fn is_internal_server_error() -> impl ResultMatcher {
    is(StatusCode::INTERNAL_SERVER_ERROR)
}

fn in_class(class: &'static str, check: fn(&StatusCode) -> bool) -> impl ResultMatcher {
    move |result: &MvcResult| {
        let status = result.status();
        if check(&status) {
            Ok(())
        } else {
            Err(AssertionError::mismatch("Range for response status", class, status))
        }
    }
}

pub fn is_success() -> impl ResultMatcher {
    in_class("SUCCESSFUL", StatusCode::is_success)
}

pub fn is_redirection() -> impl ResultMatcher {
    in_class("REDIRECTION", StatusCode::is_redirection)
}

pub fn is_client_error() -> impl ResultMatcher {
    in_class("CLIENT_ERROR", StatusCode::is_client_error)
}

pub fn is_server_error() -> impl ResultMatcher {
    in_class("SERVER_ERROR", StatusCode::is_server_error)
}

/// The status code satisfies `predicate`.
pub fn matches<P>(predicate: P) -> impl ResultMatcher
where
    P: Predicate<u16>,
{
    move |result: &MvcResult| {
        let code = result.status().as_u16();
        if predicate.eval(&code) {
            Ok(())
        } else {
            Err(AssertionError::failed(
                "Status",
                format!("{code} does not satisfy {predicate}"),
            ))
        }
    }
}

/// The message passed to `send_error`.
pub fn reason(expected: impl Into<String>) -> impl ResultMatcher {
    let expected = expected.into();
    move |result: &MvcResult| {
        AssertionError::check_eq(
            "Response status reason",
            Some(expected.as_str()),
            result.response().error_message(),
        )
    }
}

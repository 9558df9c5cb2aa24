//! Response body matchers.

use mockmvc_core::application::MvcResult;
use predicates::Predicate;
use serde_json::Value;

use super::ResultMatcher;
use crate::error::AssertionError;

pub fn string(expected: impl Into<String>) -> impl ResultMatcher {
    let expected = expected.into();
    move |result: &MvcResult| {
        AssertionError::check_eq(
            "Response content",
            expected.as_str(),
            result.response().content_as_string().as_str(),
        )
    }
}

/// The body, as text, satisfies `predicate`.
pub fn string_matches<P>(predicate: P) -> impl ResultMatcher
where
    P: Predicate<str>,
{
    move |result: &MvcResult| {
        let body = result.response().content_as_string();
        if predicate.eval(&body) {
            Ok(())
        } else {
            Err(AssertionError::failed(
                "Response content",
                format!("'{body}' does not satisfy {predicate}"),
            ))
        }
    }
}

pub fn bytes(expected: impl Into<Vec<u8>>) -> impl ResultMatcher {
    let expected = expected.into();
    move |result: &MvcResult| {
        AssertionError::check_eq("Response content", expected.as_slice(), result.response().body())
    }
}

/// The body parses as JSON equal to `expected`; key order does not matter.
pub fn json(expected: Value) -> impl ResultMatcher {
    move |result: &MvcResult| {
        let actual: Value = serde_json::from_slice(result.response().body()).map_err(|e| {
            AssertionError::failed("Response content", format!("not valid JSON: {e}"))
        })?;
        if actual == expected {
            Ok(())
        } else {
            Err(AssertionError::mismatch("JSON content", &expected, &actual))
        }
    }
}

/// Value at a JSON pointer such as `/hotels/0/name`.
pub fn json_path(pointer: impl Into<String>, expected: impl Into<Value>) -> impl ResultMatcher {
    let pointer = pointer.into();
    let expected = expected.into();
    move |result: &MvcResult| {
        let actual: Value = serde_json::from_slice(result.response().body()).map_err(|e| {
            AssertionError::failed("Response content", format!("not valid JSON: {e}"))
        })?;
        AssertionError::check_eq(
            &format!("JSON path '{pointer}'"),
            Some(&expected),
            actual.pointer(&pointer),
        )
    }
}

/// Media type of the response, ignoring parameters such as `charset`.
pub fn content_type(expected: impl Into<String>) -> impl ResultMatcher {
    let expected = expected.into();
    move |result: &MvcResult| {
        let actual = result
            .response()
            .content_type()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim());
        AssertionError::check_eq("Content type", Some(expected.as_str()), actual)
    }
}

pub fn encoding(expected: impl Into<String>) -> impl ResultMatcher {
    let expected = expected.into();
    move |result: &MvcResult| {
        AssertionError::check_eq(
            "Character encoding",
            Some(expected.as_str()),
            result.response().character_encoding(),
        )
    }
}

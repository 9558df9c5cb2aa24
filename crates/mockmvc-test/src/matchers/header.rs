//! Response header matchers.

use mockmvc_core::application::MvcResult;
use predicates::Predicate;

use super::ResultMatcher;
use crate::error::AssertionError;

/// First value of `name` equals `expected`.
pub fn string(name: impl Into<String>, expected: impl Into<String>) -> impl ResultMatcher {
    let name = name.into();
    let expected = expected.into();
    move |result: &MvcResult| {
        AssertionError::check_eq(
            &format!("Response header '{name}'"),
            Some(expected.as_str()),
            result.response().header(&name),
        )
    }
}

pub fn string_matches<P>(name: impl Into<String>, predicate: P) -> impl ResultMatcher
where
    P: Predicate<str>,
{
    let name = name.into();
    move |result: &MvcResult| {
        let what = format!("Response header '{name}'");
        match result.response().header(&name) {
            Some(value) if predicate.eval(value) => Ok(()),
            Some(value) => Err(AssertionError::failed(
                what,
                format!("'{value}' does not satisfy {predicate}"),
            )),
            None => Err(AssertionError::failed(what, "does not exist")),
        }
    }
}

pub fn exists(name: impl Into<String>) -> impl ResultMatcher {
    let name = name.into();
    move |result: &MvcResult| match result.response().header(&name) {
        Some(_) => Ok(()),
        None => Err(AssertionError::failed(
            format!("Response header '{name}'"),
            "does not exist",
        )),
    }
}

pub fn does_not_exist(name: impl Into<String>) -> impl ResultMatcher {
    let name = name.into();
    move |result: &MvcResult| match result.response().header(&name) {
        None => Ok(()),
        Some(value) => Err(AssertionError::failed(
            format!("Response header '{name}'"),
            format!("expected absent but was '{value}'"),
        )),
    }
}

/// All values of `name`, in order.
pub fn values(name: impl Into<String>, expected: &[&str]) -> impl ResultMatcher {
    let name = name.into();
    let expected: Vec<String> = expected.iter().map(|v| v.to_string()).collect();
    move |result: &MvcResult| {
        let actual: Vec<String> = result
            .response()
            .header_values(&name)
            .into_iter()
            .map(str::to_string)
            .collect();
        AssertionError::check_eq(&format!("Response header '{name}'"), &expected, &actual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::tests::perform;
    use predicates::prelude::*;

    #[test]
    fn test_header_matchers() {
        let result = perform("/text");
        assert!(string("X-Trace", "abc").matches(&result).is_ok());
        assert!(string("x-trace", "abc").matches(&result).is_ok());
        assert!(exists("x-trace").matches(&result).is_ok());
        assert!(does_not_exist("x-missing").matches(&result).is_ok());
        assert!(values("x-multi", &["1", "2"]).matches(&result).is_ok());
        assert!(
            string_matches("x-trace", predicate::str::is_match("^[a-z]+$").unwrap())
                .matches(&result)
                .is_ok()
        );
    }
}

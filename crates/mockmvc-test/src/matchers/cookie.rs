//! Response cookie matchers.

use mockmvc_core::application::MvcResult;

use super::ResultMatcher;
use crate::error::AssertionError;

pub fn value(name: impl Into<String>, expected: impl Into<String>) -> impl ResultMatcher {
    let name = name.into();
    let expected = expected.into();
    move |result: &MvcResult| {
        AssertionError::check_eq(
            &format!("Response cookie '{name}'"),
            Some(expected.as_str()),
            result.response().cookie(&name).map(|c| c.value()),
        )
    }
}

pub fn exists(name: impl Into<String>) -> impl ResultMatcher {
    let name = name.into();
    move |result: &MvcResult| match result.response().cookie(&name) {
        Some(_) => Ok(()),
        None => Err(AssertionError::failed(
            format!("Response cookie '{name}'"),
            "does not exist",
        )),
    }
}

pub fn max_age(name: impl Into<String>, expected: i64) -> impl ResultMatcher {
    let name = name.into();
    move |result: &MvcResult| {
        let cookie = result.response().cookie(&name).ok_or_else(|| {
            AssertionError::failed(format!("Response cookie '{name}'"), "does not exist")
        })?;
        AssertionError::check_eq(
            &format!("Response cookie '{name}' max-age"),
            Some(expected),
            cookie.max_age(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::tests::perform;

    #[test]
    fn test_cookie_matchers() {
        let result = perform("/text");
        assert!(value("theme", "dark").matches(&result).is_ok());
        assert!(max_age("theme", 3600).matches(&result).is_ok());
        assert!(exists("theme").matches(&result).is_ok());
        assert!(exists("nope").matches(&result).is_err());
    }
}

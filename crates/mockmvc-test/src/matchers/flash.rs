//! Output flash map matchers.

use mockmvc_core::application::MvcResult;
use serde_json::Value;

use super::ResultMatcher;
use crate::error::AssertionError;

pub fn attribute(name: impl Into<String>, expected: impl Into<Value>) -> impl ResultMatcher {
    let name = name.into();
    let expected = expected.into();
    move |result: &MvcResult| {
        AssertionError::check_eq(
            &format!("Flash attribute '{name}'"),
            Some(&expected),
            result.flash_map().get(&name),
        )
    }
}

pub fn attribute_exists(name: impl Into<String>) -> impl ResultMatcher {
    let name = name.into();
    move |result: &MvcResult| {
        if result.flash_map().contains(&name) {
            Ok(())
        } else {
            Err(AssertionError::failed(
                format!("Flash attribute '{name}'"),
                "does not exist",
            ))
        }
    }
}

pub fn attribute_count(expected: usize) -> impl ResultMatcher {
    move |result: &MvcResult| {
        AssertionError::check_eq("Flash map size", expected, result.flash_map().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::tests::perform;

    #[test]
    fn test_flash_attributes() {
        let result = perform("/redirect");
        assert!(attribute("notice", "saved").matches(&result).is_ok());
        assert!(attribute_exists("notice").matches(&result).is_ok());
        assert!(attribute_count(1).matches(&result).is_ok());
        assert!(attribute_exists("other").matches(&result).is_err());
    }
}

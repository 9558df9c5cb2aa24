//! View name matchers.

use mockmvc_core::application::MvcResult;
use predicates::Predicate;

use super::ResultMatcher;
use crate::error::AssertionError;

pub fn name(expected: impl Into<String>) -> impl ResultMatcher {
    let expected = expected.into();
    move |result: &MvcResult| {
        let mav = result
            .model_and_view()
            .ok_or_else(|| AssertionError::failed("View name", "no model-and-view was rendered"))?;
        AssertionError::check_eq("View name", Some(expected.as_str()), mav.view_name())
    }
}

pub fn name_matches<P>(predicate: P) -> impl ResultMatcher
where
    P: Predicate<str>,
{
    move |result: &MvcResult| match result.view_name() {
        Some(name) if predicate.eval(name) => Ok(()),
        Some(name) => Err(AssertionError::failed(
            "View name",
            format!("'{name}' does not satisfy {predicate}"),
        )),
        None => Err(AssertionError::failed("View name", "no view name")),
    }
}

/// Nothing was rendered.
pub fn none() -> impl ResultMatcher {
    |result: &MvcResult| match result.model_and_view() {
        None => Ok(()),
        Some(mav) => Err(AssertionError::failed(
            "Model-and-view",
            format!("expected none but was {mav}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::tests::perform;
    use predicates::prelude::*;

    #[test]
    fn test_view_name() {
        let result = perform("/ok");
        assert!(name("hotels").matches(&result).is_ok());
        assert!(name("other").matches(&result).is_err());
        assert!(
            name_matches(predicate::str::starts_with("hot"))
                .matches(&result)
                .is_ok()
        );
        assert!(none().matches(&result).is_err());
    }

    #[test]
    fn test_no_view_for_404() {
        let result = perform("/missing");
        assert!(none().matches(&result).is_ok());
        assert!(name("hotels").matches(&result).is_err());
    }
}

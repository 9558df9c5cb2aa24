//! Model attribute matchers.

use mockmvc_core::application::MvcResult;
use mockmvc_core::domain::Model;
use predicates::Predicate;
use serde_json::Value;

use super::ResultMatcher;
use crate::error::AssertionError;

fn model(result: &MvcResult) -> Result<&Model, AssertionError> {
    result
        .model()
        .ok_or_else(|| AssertionError::failed("Model", "no model-and-view was rendered"))
}

pub fn attribute(name: impl Into<String>, expected: impl Into<Value>) -> impl ResultMatcher {
    let name = name.into();
    let expected = expected.into();
    move |result: &MvcResult| {
        let actual = model(result)?.get(&name);
        AssertionError::check_eq(
            &format!("Model attribute '{name}'"),
            Some(&expected),
            actual,
        )
    }
}

pub fn attribute_matches<P>(name: impl Into<String>, predicate: P) -> impl ResultMatcher
where
    P: Predicate<Value>,
{
    let name = name.into();
    move |result: &MvcResult| {
        let what = format!("Model attribute '{name}'");
        match model(result)?.get(&name) {
            Some(value) if predicate.eval(value) => Ok(()),
            Some(value) => Err(AssertionError::failed(
                what,
                format!("{value} does not satisfy {predicate}"),
            )),
            None => Err(AssertionError::failed(what, "does not exist")),
        }
    }
}

pub fn attribute_exists(names: &[&str]) -> impl ResultMatcher {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    move |result: &MvcResult| {
        let model = model(result)?;
        match names.iter().find(|n| !model.contains_key(n.as_str())) {
            Some(missing) => Err(AssertionError::failed(
                format!("Model attribute '{missing}'"),
                "does not exist",
            )),
            None => Ok(()),
        }
    }
}

pub fn attribute_does_not_exist(names: &[&str]) -> impl ResultMatcher {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    move |result: &MvcResult| {
        let Some(model) = result.model() else {
            return Ok(());
        };
        match names.iter().find(|n| model.contains_key(n.as_str())) {
            Some(present) => Err(AssertionError::failed(
                format!("Model attribute '{present}'"),
                "exists",
            )),
            None => Ok(()),
        }
    }
}

pub fn size(expected: usize) -> impl ResultMatcher {
    move |result: &MvcResult| AssertionError::check_eq("Model size", expected, model(result)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::tests::perform;
    use predicates::prelude::*;
    use serde_json::json;

    #[test]
    fn test_attribute_value_and_presence() {
        let result = perform("/ok");
        assert!(attribute("count", 2).matches(&result).is_ok());
        assert!(attribute("count", 3).matches(&result).is_err());
        assert!(attribute_exists(&["count", "names"]).matches(&result).is_ok());
        assert!(attribute_exists(&["nope"]).matches(&result).is_err());
        assert!(attribute_does_not_exist(&["nope"]).matches(&result).is_ok());
        assert!(size(2).matches(&result).is_ok());
    }

    #[test]
    fn test_attribute_predicate() {
        let result = perform("/ok");
        let matcher = attribute_matches("names", predicate::function(|v: &Value| {
            v.as_array().is_some_and(|a| a.contains(&json!("Grand")))
        }));
        assert!(matcher.matches(&result).is_ok());
    }
}

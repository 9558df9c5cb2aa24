//! Matchers on the request as it was after dispatch.

use mockmvc_core::application::MvcResult;
use serde_json::Value;

use super::ResultMatcher;
use crate::error::AssertionError;

pub fn attribute(name: impl Into<String>, expected: impl Into<Value>) -> impl ResultMatcher {
    let name = name.into();
    let expected = expected.into();
    move |result: &MvcResult| {
        AssertionError::check_eq(
            &format!("Request attribute '{name}'"),
            Some(&expected),
            result.request().attribute(&name),
        )
    }
}

pub fn session_attribute(name: impl Into<String>, expected: impl Into<Value>) -> impl ResultMatcher {
    let name = name.into();
    let expected = expected.into();
    move |result: &MvcResult| {
        let session = result
            .request()
            .session()
            .ok_or_else(|| AssertionError::failed("Session", "no session was created"))?;
        AssertionError::check_eq(
            &format!("Session attribute '{name}'"),
            Some(expected.clone()),
            session.attribute(&name),
        )
    }
}

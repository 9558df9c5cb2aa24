//! Result matchers.
//!
//! Each submodule is a namespace of matcher factories, used as
//! `status::is_ok()`, `view::name("hotels")`, `model::attribute("id", 42)`.
//! Matchers that take a predicate accept anything from the `predicates`
//! crate.

use mockmvc_core::application::MvcResult;

use crate::error::AssertionError;

pub mod content;
pub mod cookie;
pub mod flash;
pub mod handler;
pub mod header;
pub mod model;
pub mod request;
pub mod status;
pub mod view;

/// An expectation about a performed request.
pub trait ResultMatcher {
    fn matches(&self, result: &MvcResult) -> Result<(), AssertionError>;
}

impl<F> ResultMatcher for F
where
    F: Fn(&MvcResult) -> Result<(), AssertionError>,
{
    fn matches(&self, result: &MvcResult) -> Result<(), AssertionError> {
        self(result)
    }
}

/// Every matcher must hold; stops at the first failure.
pub fn all(matchers: Vec<Box<dyn ResultMatcher>>) -> impl ResultMatcher {
    move |result: &MvcResult| {
        matchers
            .iter()
            .try_for_each(|matcher| matcher.matches(result))
    }
}

/// The response was forwarded to exactly `url`.
pub fn forwarded_url(url: impl Into<String>) -> impl ResultMatcher {
    let url = url.into();
    move |result: &MvcResult| {
        AssertionError::check_eq(
            "Forwarded URL",
            Some(url.as_str()),
            result.response().forwarded_url(),
        )
    }
}

/// The response redirected to exactly `url`.
pub fn redirected_url(url: impl Into<String>) -> impl ResultMatcher {
    let url = url.into();
    move |result: &MvcResult| {
        AssertionError::check_eq(
            "Redirected URL",
            Some(url.as_str()),
            result.response().redirected_url(),
        )
    }
}

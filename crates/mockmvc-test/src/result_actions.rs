//! Fluent expectations on a performed request.

use mockmvc_core::application::MvcResult;

use crate::error::{AssertionError, TestResult};
use crate::matchers::ResultMatcher;

/// A generic action on a performed request, such as printing it.
pub trait ResultHandler {
    fn handle(&self, result: &MvcResult) -> TestResult<()>;
}

impl<F> ResultHandler for F
where
    F: Fn(&MvcResult) -> TestResult<()>,
{
    fn handle(&self, result: &MvcResult) -> TestResult<()> {
        self(result)
    }
}

/// What `perform` returns: the result plus chained expectations.
///
/// ```ignore
/// tester
///     .perform(get("/hotels/{id}").uri_vars(["42"]))?
///     .and_expect(status::is_ok())
///     .and_expect(model::attribute("id", "42"))
///     .and_do(print())?;
/// ```
#[derive(Debug)]
pub struct ResultActions {
    result: MvcResult,
}

impl ResultActions {
    pub fn new(result: MvcResult) -> Self {
        Self { result }
    }

    /// Assert `matcher` holds.
    ///
    /// # Panics
    ///
    /// Panics with the matcher's message when the expectation fails.
    #[track_caller]
    pub fn and_expect(self, matcher: impl ResultMatcher) -> Self {
        if let Err(e) = matcher.matches(&self.result) {
            panic!("{e}");
        }
        self
    }

    /// Like [`and_expect`](Self::and_expect), returning the failure instead
    /// of panicking.
    pub fn try_expect(self, matcher: impl ResultMatcher) -> Result<Self, AssertionError> {
        matcher.matches(&self.result)?;
        Ok(self)
    }

    /// Run `handler` against the result.
    pub fn and_do(self, handler: impl ResultHandler) -> TestResult<Self> {
        handler.handle(&self.result)?;
        Ok(self)
    }

    pub fn result(&self) -> &MvcResult {
        &self.result
    }

    /// Finish the chain and take the result for direct inspection.
    pub fn and_return(self) -> MvcResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::tests::perform;
    use crate::matchers::{status, view};
    use std::cell::Cell;

    #[test]
    fn test_chained_expectations() {
        let result = ResultActions::new(perform("/ok"))
            .and_expect(status::is_ok())
            .and_expect(view::name("hotels"))
            .and_return();
        assert_eq!(result.handler().unwrap().name(), "listHotels");
    }

    #[test]
    #[should_panic(expected = "Status expected:<404> but was:<200>")]
    fn test_failed_expectation_panics() {
        ResultActions::new(perform("/ok")).and_expect(status::is_not_found());
    }

    #[test]
    fn test_try_expect_returns_failure() {
        let err = ResultActions::new(perform("/ok"))
            .try_expect(view::name("other"))
            .unwrap_err();
        assert!(matches!(err, AssertionError::Mismatch { .. }));
    }

    #[test]
    fn test_and_do_runs_handler() {
        let calls = Cell::new(0);
        ResultActions::new(perform("/ok"))
            .and_do(|_: &MvcResult| {
                calls.set(calls.get() + 1);
                Ok(())
            })
            .unwrap();
        assert_eq!(calls.get(), 1);
    }
}

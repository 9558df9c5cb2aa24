use mockmvc_core::application::ports::ExceptionResolver;
use mockmvc_core::domain::{
    Handler, HandlerError, MockRequest, MockResponse, ModelAndView, ResponseStatusError,
};
use tracing::debug;

/// Turns a [`ResponseStatusError`] into an error response.
///
/// Claims the error with an empty model-and-view; any other error type is
/// declined.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseStatusExceptionResolver;

impl ResponseStatusExceptionResolver {
    pub fn new() -> Self {
        Self
    }
}

impl ExceptionResolver for ResponseStatusExceptionResolver {
    fn resolve(
        &self,
        _request: &mut MockRequest,
        response: &mut MockResponse,
        _handler: Option<&dyn Handler>,
        error: &HandlerError,
    ) -> Option<ModelAndView> {
        let status_error = error.downcast_ref::<ResponseStatusError>()?;
        debug!(status = %status_error.status, "Resolved error to status");
        response.send_error(status_error.status, status_error.reason.as_deref());
        Some(ModelAndView::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use mockmvc_core::domain::MockRequestBuilder;

    #[test]
    fn test_status_error_sent_as_error() {
        let mut request = MockRequestBuilder::get("/").build_request().unwrap();
        let mut response = MockResponse::new();
        let error = HandlerError::new(ResponseStatusError::with_reason(
            StatusCode::NOT_FOUND,
            "no such hotel",
        ));

        let mav = ResponseStatusExceptionResolver
            .resolve(&mut request, &mut response, None, &error)
            .unwrap();
        assert!(mav.is_empty());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.error_message(), Some("no such hotel"));
    }

    #[test]
    fn test_other_errors_declined() {
        let mut request = MockRequestBuilder::get("/").build_request().unwrap();
        let mut response = MockResponse::new();
        let error = HandlerError::message("other");

        assert!(
            ResponseStatusExceptionResolver
                .resolve(&mut request, &mut response, None, &error)
                .is_none()
        );
        assert_eq!(response.status(), StatusCode::OK);
    }
}

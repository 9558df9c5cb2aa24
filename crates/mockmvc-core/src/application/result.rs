//! The immutable record of one completed dispatch.

use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;

use crate::application::ports::Interceptor;
use crate::domain::{
    FlashMap, HandlerError, HandlerRef, MockRequest, MockResponse, Model, ModelAndView,
};

/// Everything a test may want to assert on after `perform`.
///
/// Captured once at the end of a dispatch and never mutated afterwards.
pub struct MvcResult {
    request: MockRequest,
    response: MockResponse,
    handler: Option<HandlerRef>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    model_and_view: Option<ModelAndView>,
    resolved_error: Option<HandlerError>,
}

impl MvcResult {
    pub(crate) fn new(
        request: MockRequest,
        response: MockResponse,
        handler: Option<HandlerRef>,
        interceptors: Vec<Arc<dyn Interceptor>>,
        model_and_view: Option<ModelAndView>,
        resolved_error: Option<HandlerError>,
    ) -> Self {
        Self {
            request,
            response,
            handler,
            interceptors,
            model_and_view,
            resolved_error,
        }
    }

    pub fn request(&self) -> &MockRequest {
        &self.request
    }

    pub fn response(&self) -> &MockResponse {
        &self.response
    }

    /// The selected handler; `None` when routing found nothing.
    pub fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }

    /// The interceptors whose pre-handle ran, in chain order.
    ///
    /// When a pre-handle returns `false` the list ends with that interceptor.
    pub fn interceptors(&self) -> &[Arc<dyn Interceptor>] {
        &self.interceptors
    }

    /// The rendered model-and-view; `None` when nothing was rendered.
    pub fn model_and_view(&self) -> Option<&ModelAndView> {
        self.model_and_view.as_ref()
    }

    /// The handler error that an exception resolver recovered.
    pub fn resolved_error(&self) -> Option<&HandlerError> {
        self.resolved_error.as_ref()
    }

    /// Flash attributes the handler stored for the next request.
    ///
    /// Read from the request's output flash map at call time.
    pub fn flash_map(&self) -> &FlashMap {
        self.request.output_flash_map()
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn view_name(&self) -> Option<&str> {
        self.model_and_view.as_ref().and_then(ModelAndView::view_name)
    }

    pub fn model(&self) -> Option<&Model> {
        self.model_and_view.as_ref().map(ModelAndView::model)
    }

    pub fn model_attribute(&self, name: &str) -> Option<&Value> {
        self.model().and_then(|model| model.get(name))
    }
}

impl fmt::Debug for MvcResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MvcResult")
            .field("request", &self.request)
            .field("response", &self.response)
            .field("handler", &self.handler)
            .field("interceptors", &self.interceptors.len())
            .field("model_and_view", &self.model_and_view)
            .field("resolved_error", &self.resolved_error)
            .finish()
    }
}

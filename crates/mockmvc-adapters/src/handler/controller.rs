use std::fmt;
use std::sync::Arc;

use mockmvc_core::application::ports::HandlerAdapter;
use mockmvc_core::domain::{
    Handler, HandlerError, HandlerRef, HandlerResult, MockRequest, MockResponse, ModelAndView,
};
use tracing::debug;

type ControllerFn = dyn Fn(&mut MockRequest, &mut MockResponse) -> HandlerResult<Option<ModelAndView>>
    + Send
    + Sync;

/// A named controller backed by a closure.
pub struct FnController {
    name: String,
    f: Box<ControllerFn>,
}

impl FnController {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut MockRequest, &mut MockResponse) -> HandlerResult<Option<ModelAndView>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }

    /// Same as [`FnController::new`], already shared for a router.
    pub fn shared<F>(name: impl Into<String>, f: F) -> HandlerRef
    where
        F: Fn(&mut MockRequest, &mut MockResponse) -> HandlerResult<Option<ModelAndView>>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self::new(name, f))
    }

    pub fn invoke(
        &self,
        request: &mut MockRequest,
        response: &mut MockResponse,
    ) -> HandlerResult<Option<ModelAndView>> {
        (self.f)(request, response)
    }
}

impl fmt::Debug for FnController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnController").field("name", &self.name).finish()
    }
}

impl Handler for FnController {
    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Invokes [`FnController`] handlers.
#[derive(Debug, Default, Clone, Copy)]
pub struct ControllerAdapter;

impl ControllerAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl HandlerAdapter for ControllerAdapter {
    fn supports(&self, handler: &dyn Handler) -> bool {
        handler.is::<FnController>()
    }

    fn handle(
        &self,
        request: &mut MockRequest,
        response: &mut MockResponse,
        handler: &dyn Handler,
    ) -> HandlerResult<Option<ModelAndView>> {
        let controller = handler.downcast_ref::<FnController>().ok_or_else(|| {
            HandlerError::message(format!("{} is not a controller", handler.name()))
        })?;
        debug!(controller = %controller.name, "Invoking controller");
        controller.invoke(request, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FnRequestHandler;
    use mockmvc_core::domain::MockRequestBuilder;

    #[test]
    fn test_adapter_supports_only_controllers() {
        let adapter = ControllerAdapter::new();
        let controller = FnController::shared("list", |_, _| Ok(None));
        let plain = FnRequestHandler::shared("raw", |_, _| Ok(()));

        assert!(adapter.supports(controller.as_ref()));
        assert!(!adapter.supports(plain.as_ref()));
    }

    #[test]
    fn test_adapter_returns_controller_model_and_view() {
        let controller = FnController::shared("show", |request, _| {
            let id = request.parameter("id").unwrap_or("?").to_string();
            Ok(Some(ModelAndView::with_view_name("hotel").attribute("id", id)))
        });
        let mut request = MockRequestBuilder::get("/hotel?id=3").build_request().unwrap();
        let mut response = MockResponse::new();

        let mav = ControllerAdapter
            .handle(&mut request, &mut response, controller.as_ref())
            .unwrap()
            .unwrap();
        assert_eq!(mav.view_name(), Some("hotel"));
        assert_eq!(mav.model()["id"], "3");
        assert_eq!(controller.name(), "show");
    }

    #[test]
    fn test_adapter_rejects_foreign_handler() {
        let plain = FnRequestHandler::shared("raw", |_, _| Ok(()));
        let mut request = MockRequestBuilder::get("/").build_request().unwrap();
        let err = ControllerAdapter
            .handle(&mut request, &mut MockResponse::new(), plain.as_ref())
            .unwrap_err();
        assert!(err.to_string().contains("raw is not a controller"));
    }
}

use std::fmt;
use std::sync::Arc;

use mockmvc_core::application::ports::HandlerAdapter;
use mockmvc_core::domain::{
    Handler, HandlerError, HandlerRef, HandlerResult, MockRequest, MockResponse, ModelAndView,
};

type RequestHandlerFn =
    dyn Fn(&mut MockRequest, &mut MockResponse) -> HandlerResult<()> + Send + Sync;

/// A handler that completes the response itself; nothing is ever rendered.
pub struct FnRequestHandler {
    name: String,
    f: Box<RequestHandlerFn>,
}

impl FnRequestHandler {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut MockRequest, &mut MockResponse) -> HandlerResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }

    pub fn shared<F>(name: impl Into<String>, f: F) -> HandlerRef
    where
        F: Fn(&mut MockRequest, &mut MockResponse) -> HandlerResult<()> + Send + Sync + 'static,
    {
        Arc::new(Self::new(name, f))
    }
}

impl fmt::Debug for FnRequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRequestHandler")
            .field("name", &self.name)
            .finish()
    }
}

impl Handler for FnRequestHandler {
    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Invokes [`FnRequestHandler`] handlers.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestHandlerAdapter;

impl RequestHandlerAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl HandlerAdapter for RequestHandlerAdapter {
    fn supports(&self, handler: &dyn Handler) -> bool {
        handler.is::<FnRequestHandler>()
    }

    fn handle(
        &self,
        request: &mut MockRequest,
        response: &mut MockResponse,
        handler: &dyn Handler,
    ) -> HandlerResult<Option<ModelAndView>> {
        let handler = handler.downcast_ref::<FnRequestHandler>().ok_or_else(|| {
            HandlerError::message(format!("{} is not a request handler", handler.name()))
        })?;
        (handler.f)(request, response)?;
        Ok(None)
    }
}

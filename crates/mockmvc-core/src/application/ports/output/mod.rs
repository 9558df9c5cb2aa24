//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits are the pluggable collaborators the dispatcher consults.
//! Every list of them is ordered, and for every kind the first one that
//! answers wins. The `mockmvc-adapters` crate provides implementations.

use std::fmt;
use std::sync::Arc;

use crate::domain::{
    Handler, HandlerError, HandlerRef, HandlerResult, Locale, MockRequest, MockResponse,
    ModelAndView,
};

pub use crate::domain::View;

/// Port for mapping a request to a handler.
///
/// Implemented by:
/// - `mockmvc_adapters::routing::PathRouter` (method + path patterns)
///
/// Routers may record facts about the match (path variables, best pattern)
/// as request attributes, hence the mutable borrow.
pub trait Router: Send + Sync {
    /// The handler and its interceptors, or `None` if this router does not
    /// recognize the request.
    fn route(&self, request: &mut MockRequest) -> Option<HandlerExecutionChain>;
}

/// Port for code that runs around handler invocation.
///
/// Both hooks default to no-ops so implementors override only what they
/// need.
pub trait Interceptor: Send + Sync {
    /// Runs before the handler. Returning `Ok(false)` stops the dispatch;
    /// the interceptor is then responsible for the response.
    fn pre_handle(
        &self,
        _request: &mut MockRequest,
        _response: &mut MockResponse,
        _handler: &dyn Handler,
    ) -> HandlerResult<bool> {
        Ok(true)
    }

    /// Runs after the handler, in reverse registration order. `None` when the
    /// handler completed the response itself.
    fn post_handle(
        &self,
        _request: &mut MockRequest,
        _response: &mut MockResponse,
        _handler: &dyn Handler,
        _model_and_view: Option<&mut ModelAndView>,
    ) -> HandlerResult<()> {
        Ok(())
    }
}

/// Port for invoking a kind of handler.
///
/// Implemented by:
/// - `mockmvc_adapters::handler::ControllerAdapter`
/// - `mockmvc_adapters::handler::RequestHandlerAdapter`
pub trait HandlerAdapter: Send + Sync {
    /// Whether this adapter knows how to invoke `handler`.
    fn supports(&self, handler: &dyn Handler) -> bool;

    /// Invoke the handler. `Ok(None)` means the response is complete.
    fn handle(
        &self,
        request: &mut MockRequest,
        response: &mut MockResponse,
        handler: &dyn Handler,
    ) -> HandlerResult<Option<ModelAndView>>;
}

/// Port for turning a handler error into an error view.
///
/// Implemented by:
/// - `mockmvc_adapters::exception::SimpleMappingExceptionResolver`
/// - `mockmvc_adapters::exception::ResponseStatusExceptionResolver`
pub trait ExceptionResolver: Send + Sync {
    /// `None` to decline; an empty [`ModelAndView`] to claim the error with
    /// nothing to render.
    fn resolve(
        &self,
        request: &mut MockRequest,
        response: &mut MockResponse,
        handler: Option<&dyn Handler>,
        error: &HandlerError,
    ) -> Option<ModelAndView>;
}

/// Port for mapping logical view names to views.
pub trait ViewResolver: Send + Sync {
    fn resolve_view_name(&self, view_name: &str, locale: &Locale) -> Option<Arc<dyn View>>;
}

/// Port for deciding the locale used while rendering.
pub trait LocaleResolver: Send + Sync {
    fn resolve_locale(&self, request: &MockRequest) -> Locale;
}

/// Port for carrying flash attributes across a redirect.
///
/// Implemented by:
/// - `mockmvc_adapters::flash::SessionFlashMapManager`
pub trait FlashMapManager: Send + Sync {
    /// Called before routing: expose the incoming flash map, if one was
    /// saved for this request.
    fn on_dispatch_start(&self, request: &mut MockRequest);

    /// Called once the dispatch is over, whatever its outcome: persist the
    /// request's output flash map for the next request.
    fn on_dispatch_end(&self, request: &mut MockRequest);
}

/// Port for deriving a view name when a handler did not pick one.
pub trait ViewNameTranslator: Send + Sync {
    fn view_name(&self, request: &MockRequest) -> Option<String>;
}

/// A handler plus the interceptors that apply to it, in registration order.
#[derive(Clone)]
pub struct HandlerExecutionChain {
    handler: HandlerRef,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl HandlerExecutionChain {
    pub fn new(handler: HandlerRef) -> Self {
        Self {
            handler,
            interceptors: Vec::new(),
        }
    }

    pub fn with_interceptors(handler: HandlerRef, interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        Self {
            handler,
            interceptors,
        }
    }

    pub fn add_interceptor(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    pub fn interceptors(&self) -> &[Arc<dyn Interceptor>] {
        &self.interceptors
    }

    pub fn into_parts(self) -> (HandlerRef, Vec<Arc<dyn Interceptor>>) {
        (self.handler, self.interceptors)
    }
}

impl fmt::Debug for HandlerExecutionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerExecutionChain")
            .field("handler", &self.handler)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

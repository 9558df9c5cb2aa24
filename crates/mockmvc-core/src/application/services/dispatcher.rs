//! Dispatch engine - runs one request through the front-controller pipeline.
//!
//! ## Pipeline
//!
//! 1. Flash bracket opens (`FlashMapManager::on_dispatch_start`); a panic
//!    from here on still closes it
//! 2. Routing: first router with a chain wins, otherwise 404
//! 3. Pre-handle interceptors in order; `false` stops the dispatch
//! 4. Handler invocation through the first supporting adapter
//! 5. Default view name, then post-handle interceptors in reverse
//! 6. Errors from 3-5 go to the exception resolvers
//! 7. Rendering; a render failure gets one pass through the resolvers
//! 8. Flash bracket closes, whatever happened above

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::error::DispatchError;
use crate::application::ports::{
    ExceptionResolver, FlashMapManager, HandlerAdapter, HandlerExecutionChain, Interceptor,
    LocaleResolver, Router, View, ViewNameTranslator, ViewResolver,
};
use crate::application::result::MvcResult;
use crate::domain::{
    Handler, HandlerError, HandlerRef, Locale, MockRequest, MockResponse, ModelAndView,
    RequestContext, RequestContextGuard, ViewRef,
};

/// The collaborators a dispatch consults, in priority order.
///
/// Built once and shared by every dispatch as `Arc<DispatcherConfig>`.
#[derive(Default)]
pub struct DispatcherConfig {
    routers: Vec<Arc<dyn Router>>,
    adapters: Vec<Arc<dyn HandlerAdapter>>,
    exception_resolvers: Vec<Arc<dyn ExceptionResolver>>,
    view_resolvers: Vec<Arc<dyn ViewResolver>>,
    locale_resolver: Option<Arc<dyn LocaleResolver>>,
    flash_map_manager: Option<Arc<dyn FlashMapManager>>,
    view_name_translator: Option<Arc<dyn ViewNameTranslator>>,
}

impl DispatcherConfig {
    pub fn builder() -> DispatcherConfigBuilder {
        DispatcherConfigBuilder::default()
    }

    pub fn routers(&self) -> &[Arc<dyn Router>] {
        &self.routers
    }

    pub fn adapters(&self) -> &[Arc<dyn HandlerAdapter>] {
        &self.adapters
    }

    pub fn exception_resolvers(&self) -> &[Arc<dyn ExceptionResolver>] {
        &self.exception_resolvers
    }

    pub fn view_resolvers(&self) -> &[Arc<dyn ViewResolver>] {
        &self.view_resolvers
    }

    pub fn locale_resolver(&self) -> Option<&Arc<dyn LocaleResolver>> {
        self.locale_resolver.as_ref()
    }

    pub fn flash_map_manager(&self) -> Option<&Arc<dyn FlashMapManager>> {
        self.flash_map_manager.as_ref()
    }

    pub fn view_name_translator(&self) -> Option<&Arc<dyn ViewNameTranslator>> {
        self.view_name_translator.as_ref()
    }
}

impl std::fmt::Debug for DispatcherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherConfig")
            .field("routers", &self.routers.len())
            .field("adapters", &self.adapters.len())
            .field("exception_resolvers", &self.exception_resolvers.len())
            .field("view_resolvers", &self.view_resolvers.len())
            .field("locale_resolver", &self.locale_resolver.is_some())
            .field("flash_map_manager", &self.flash_map_manager.is_some())
            .field("view_name_translator", &self.view_name_translator.is_some())
            .finish()
    }
}

/// Builder for [`DispatcherConfig`]. Each call appends; order is priority.
#[derive(Default)]
pub struct DispatcherConfigBuilder {
    config: DispatcherConfig,
}

impl DispatcherConfigBuilder {
    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.config.routers.push(router);
        self
    }

    pub fn adapter(mut self, adapter: Arc<dyn HandlerAdapter>) -> Self {
        self.config.adapters.push(adapter);
        self
    }

    pub fn exception_resolver(mut self, resolver: Arc<dyn ExceptionResolver>) -> Self {
        self.config.exception_resolvers.push(resolver);
        self
    }

    pub fn view_resolver(mut self, resolver: Arc<dyn ViewResolver>) -> Self {
        self.config.view_resolvers.push(resolver);
        self
    }

    /// Without one, rendering uses the request's preferred locale.
    pub fn locale_resolver(mut self, resolver: Arc<dyn LocaleResolver>) -> Self {
        self.config.locale_resolver = Some(resolver);
        self
    }

    pub fn flash_map_manager(mut self, manager: Arc<dyn FlashMapManager>) -> Self {
        self.config.flash_map_manager = Some(manager);
        self
    }

    pub fn view_name_translator(mut self, translator: Arc<dyn ViewNameTranslator>) -> Self {
        self.config.view_name_translator = Some(translator);
        self
    }

    pub fn build(self) -> DispatcherConfig {
        self.config
    }
}

/// How far the pipeline got before rendering.
#[derive(Debug)]
enum Outcome {
    NotFound,
    Rejected,
    NoContent,
    Render(ModelAndView),
}

/// Why a pipeline step stopped.
enum Failure {
    /// Application code failed; exception resolvers get a say.
    Handler(HandlerError),
    /// Misconfiguration; aborts the dispatch untouched.
    Fatal(DispatchError),
}

impl From<HandlerError> for Failure {
    fn from(error: HandlerError) -> Self {
        Self::Handler(error)
    }
}

impl From<DispatchError> for Failure {
    fn from(error: DispatchError) -> Self {
        Self::Fatal(error)
    }
}

impl Failure {
    fn into_dispatch_error(self) -> DispatchError {
        match self {
            Self::Handler(error) => DispatchError::Unhandled(error),
            Self::Fatal(error) => error,
        }
    }
}

/// What one dispatch learned, collected for the result record.
#[derive(Default)]
struct DispatchContext {
    handler: Option<HandlerRef>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    model_and_view: Option<ModelAndView>,
    resolved_error: Option<HandlerError>,
}

/// Runs exactly one request through the pipeline.
///
/// `dispatch` consumes the dispatcher, so per-dispatch state never leaks into
/// another request. Create a fresh one per request; the shared configuration
/// is cheap to clone.
pub struct Dispatcher {
    config: Arc<DispatcherConfig>,
}

impl Dispatcher {
    pub fn new(config: Arc<DispatcherConfig>) -> Self {
        Self { config }
    }

    /// Dispatch `request`, writing into `response`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the configuration cannot serve the
    /// request or a handler error goes unresolved. The flash bracket is
    /// closed before the error is returned.
    #[instrument(skip_all, fields(method = %request.method(), uri = %request.request_uri()))]
    pub fn dispatch(
        self,
        mut request: MockRequest,
        mut response: MockResponse,
    ) -> Result<MvcResult, DispatchError> {
        let _context = RequestContextGuard::install(RequestContext::for_request(&request));

        let processed = panic::catch_unwind(AssertUnwindSafe(|| {
            if let Some(manager) = &self.config.flash_map_manager {
                manager.on_dispatch_start(&mut request);
            }
            self.process(&mut request, &mut response)
        }));

        if let Some(manager) = &self.config.flash_map_manager {
            manager.on_dispatch_end(&mut request);
        }

        let context = match processed {
            Ok(result) => result?,
            Err(payload) => panic::resume_unwind(payload),
        };

        let handler_name = context
            .handler
            .as_ref()
            .map_or_else(|| "-".to_string(), |h| h.name());
        info!(
            status = response.status().as_u16(),
            handler = %handler_name,
            "Dispatch complete"
        );

        Ok(MvcResult::new(
            request,
            response,
            context.handler,
            context.interceptors,
            context.model_and_view,
            context.resolved_error,
        ))
    }

    fn process(
        &self,
        request: &mut MockRequest,
        response: &mut MockResponse,
    ) -> Result<DispatchContext, DispatchError> {
        let mut context = DispatchContext::default();

        let Some(chain) = self.route(request) else {
            debug!(lookup_path = %request.lookup_path(), "No handler found");
            response.send_error(http::StatusCode::NOT_FOUND, None);
            self.log_outcome(&Outcome::NotFound);
            return Ok(context);
        };

        let (handler, interceptors) = chain.into_parts();
        context.handler = Some(Arc::clone(&handler));

        let outcome = match self.invoke(
            handler.as_ref(),
            &interceptors,
            &mut context.interceptors,
            request,
            response,
        ) {
            Ok(outcome) => outcome,
            Err(Failure::Fatal(error)) => return Err(error),
            Err(Failure::Handler(error)) => {
                let recovered =
                    self.process_handler_error(request, response, Some(handler.as_ref()), &error)?;
                context.resolved_error = Some(error);
                recovered.map_or(Outcome::NoContent, Outcome::Render)
            }
        };
        self.log_outcome(&outcome);

        if let Outcome::Render(model_and_view) = outcome {
            match self.render(&model_and_view, request, response) {
                Ok(()) => context.model_and_view = Some(model_and_view),
                Err(Failure::Fatal(error)) => return Err(error),
                Err(Failure::Handler(error)) => {
                    warn!(error = %error, "View rendering failed");
                    let recovered = self.process_handler_error(
                        request,
                        response,
                        Some(handler.as_ref()),
                        &error,
                    )?;
                    context.resolved_error = Some(error);
                    if let Some(error_view) = &recovered {
                        self.render(error_view, request, response)
                            .map_err(Failure::into_dispatch_error)?;
                    }
                    context.model_and_view = recovered;
                }
            }
        }

        Ok(context)
    }

    /// First router that returns a chain wins.
    fn route(&self, request: &mut MockRequest) -> Option<HandlerExecutionChain> {
        self.config
            .routers
            .iter()
            .find_map(|router| router.route(request))
    }

    /// Pre-handle, invoke, default view name, post-handle.
    ///
    /// Every interceptor whose pre-handle runs is appended to `invoked`.
    fn invoke(
        &self,
        handler: &dyn Handler,
        interceptors: &[Arc<dyn Interceptor>],
        invoked: &mut Vec<Arc<dyn Interceptor>>,
        request: &mut MockRequest,
        response: &mut MockResponse,
    ) -> Result<Outcome, Failure> {
        for (index, interceptor) in interceptors.iter().enumerate() {
            invoked.push(Arc::clone(interceptor));
            if !interceptor.pre_handle(request, response, handler)? {
                debug!(interceptor = index, "Pre-handle stopped the dispatch");
                return Ok(Outcome::Rejected);
            }
        }

        let adapter = self
            .config
            .adapters
            .iter()
            .find(|adapter| adapter.supports(handler))
            .ok_or_else(|| DispatchError::NoHandlerAdapter {
                handler: handler.name(),
            })?;

        let mut model_and_view = adapter.handle(request, response, handler)?;
        if let Some(mav) = model_and_view.as_mut() {
            self.apply_default_view_name(request, mav);
        }

        for interceptor in interceptors.iter().rev() {
            interceptor.post_handle(request, response, handler, model_and_view.as_mut())?;
        }

        Ok(match model_and_view {
            Some(mav) => Outcome::Render(mav),
            None => Outcome::NoContent,
        })
    }

    /// Offer `error` to each resolver in order.
    ///
    /// `Ok(None)` means a resolver claimed it with nothing to render.
    fn process_handler_error(
        &self,
        request: &mut MockRequest,
        response: &mut MockResponse,
        handler: Option<&dyn Handler>,
        error: &HandlerError,
    ) -> Result<Option<ModelAndView>, DispatchError> {
        debug!(error = %error, "Resolving handler error");
        for resolver in &self.config.exception_resolvers {
            let Some(mut mav) = resolver.resolve(request, response, handler, error) else {
                continue;
            };
            if mav.is_empty() {
                debug!("Handler error resolved with nothing to render");
                return Ok(None);
            }
            self.apply_default_view_name(request, &mut mav);
            debug!(model_and_view = %mav, "Handler error resolved to error view");
            return Ok(Some(mav));
        }
        warn!(error = %error, "No exception resolver handled the error");
        Err(DispatchError::Unhandled(error.clone()))
    }

    fn apply_default_view_name(&self, request: &MockRequest, mav: &mut ModelAndView) {
        if mav.has_view() {
            return;
        }
        if let Some(name) = self
            .config
            .view_name_translator
            .as_ref()
            .and_then(|translator| translator.view_name(request))
        {
            debug!(view_name = %name, "Applied default view name");
            mav.set_view_name(name);
        }
    }

    fn render(
        &self,
        mav: &ModelAndView,
        request: &mut MockRequest,
        response: &mut MockResponse,
    ) -> Result<(), Failure> {
        let locale = match &self.config.locale_resolver {
            Some(resolver) => resolver.resolve_locale(request),
            None => request.locale(),
        };
        response.set_locale(locale.clone());

        let view = match mav.view() {
            Some(ViewRef::Instance(view)) => Arc::clone(view),
            Some(ViewRef::Name(name)) => self.resolve_view(name, &locale)?,
            None => {
                return Err(DispatchError::MissingView {
                    model_and_view: mav.to_string(),
                }
                .into());
            }
        };

        if let Some(status) = mav.response_status() {
            response.set_status(status);
        }

        debug!(view = ?view, "Rendering view");
        view.render(mav.model(), request, response)?;
        Ok(())
    }

    fn resolve_view(&self, view_name: &str, locale: &Locale) -> Result<Arc<dyn View>, Failure> {
        self.config
            .view_resolvers
            .iter()
            .find_map(|resolver| resolver.resolve_view_name(view_name, locale))
            .ok_or_else(|| {
                DispatchError::UnresolvableView {
                    view_name: view_name.to_string(),
                }
                .into()
            })
    }

    fn log_outcome(&self, outcome: &Outcome) {
        match outcome {
            Outcome::NotFound => debug!("Outcome: not found"),
            Outcome::Rejected => debug!("Outcome: rejected by interceptor"),
            Outcome::NoContent => debug!("Outcome: response completed without a view"),
            Outcome::Render(mav) => debug!(model_and_view = %mav, "Outcome: render"),
        }
    }
}

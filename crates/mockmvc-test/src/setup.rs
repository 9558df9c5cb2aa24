//! Standalone setup: assemble a dispatcher from handlers and defaults.
//!
//! [`StandaloneSetup`] registers handlers on an internal path router and
//! fills in every collaborator a test does not supply:
//!
//! | Concern            | Default                                          |
//! |--------------------|--------------------------------------------------|
//! | Handler adapters   | `ControllerAdapter`, `RequestHandlerAdapter`     |
//! | Exception handling | `ResponseStatusExceptionResolver`                |
//! | View resolution    | `UrlBasedViewResolver` (config prefix / suffix)  |
//! | Locale             | `AcceptHeaderLocaleResolver` (config default)    |
//! | Flash attributes   | `SessionFlashMapManager` (config timeout)        |
//! | Default view names | `DefaultViewNameTranslator`                      |
//!
//! Adapters and resolvers a test adds are consulted after the bundled
//! adapters and exception resolvers, and before the URL-based view
//! resolver, which accepts every name.

use std::fmt;
use std::sync::Arc;

use http::Method;
use mockmvc_adapters::{
    AcceptHeaderLocaleResolver, ControllerAdapter, DefaultViewNameTranslator, PathRouter,
    RequestHandlerAdapter, ResponseStatusExceptionResolver, SessionFlashMapManager,
    UrlBasedViewResolver,
};
use mockmvc_core::application::ports::{
    ExceptionResolver, FlashMapManager, HandlerAdapter, Interceptor, LocaleResolver, Router,
    ViewNameTranslator, ViewResolver,
};
use mockmvc_core::application::{DispatcherConfig, MockMvc};
use mockmvc_core::domain::{HandlerRef, MockRequestBuilder};
use tracing::{debug, instrument, warn};

use crate::config::MockMvcConfig;
use crate::error::TestResult;
use crate::logging::init_logging;
use crate::print::print;
use crate::result_actions::{ResultActions, ResultHandler};

/// Builder for a [`MockMvcTester`].
pub struct StandaloneSetup {
    config: MockMvcConfig,
    routes: PathRouter,
    routers: Vec<Arc<dyn Router>>,
    adapters: Vec<Arc<dyn HandlerAdapter>>,
    exception_resolvers: Vec<Arc<dyn ExceptionResolver>>,
    view_resolvers: Vec<Arc<dyn ViewResolver>>,
    locale_resolver: Option<Arc<dyn LocaleResolver>>,
    flash_map_manager: Option<Arc<dyn FlashMapManager>>,
    view_name_translator: Option<Arc<dyn ViewNameTranslator>>,
    default_request: Option<MockRequestBuilder>,
}

impl fmt::Debug for StandaloneSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandaloneSetup")
            .field("config", &self.config)
            .field("routes", &self.routes.len())
            .field("routers", &self.routers.len())
            .field("adapters", &self.adapters.len())
            .field("exception_resolvers", &self.exception_resolvers.len())
            .field("view_resolvers", &self.view_resolvers.len())
            .field("default_request", &self.default_request)
            .finish_non_exhaustive()
    }
}

impl Default for StandaloneSetup {
    fn default() -> Self {
        Self::new()
    }
}

impl StandaloneSetup {
    /// Setup with built-in defaults.
    pub fn new() -> Self {
        Self::with_config(MockMvcConfig::default())
    }

    /// Setup whose defaults come from `config`.
    pub fn with_config(config: MockMvcConfig) -> Self {
        Self {
            config,
            routes: PathRouter::new(),
            routers: Vec::new(),
            adapters: Vec::new(),
            exception_resolvers: Vec::new(),
            view_resolvers: Vec::new(),
            locale_resolver: None,
            flash_map_manager: None,
            view_name_translator: None,
            default_request: None,
        }
    }

    // ── Routes ────────────────────────────────────────────────────────────

    pub fn route(mut self, method: Method, pattern: &str, handler: HandlerRef) -> Self {
        self.routes = self.routes.handle(method, pattern, handler);
        self
    }

    pub fn get(self, pattern: &str, handler: HandlerRef) -> Self {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: HandlerRef) -> Self {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put(self, pattern: &str, handler: HandlerRef) -> Self {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn delete(self, pattern: &str, handler: HandlerRef) -> Self {
        self.route(Method::DELETE, pattern, handler)
    }

    /// Route `pattern` for every method.
    pub fn any(mut self, pattern: &str, handler: HandlerRef) -> Self {
        self.routes = self.routes.any(pattern, handler);
        self
    }

    /// Interceptor applied to every registered route.
    pub fn interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.routes = self.routes.interceptor(interceptor);
        self
    }

    /// Extra router, consulted after the registered routes.
    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.routers.push(router);
        self
    }

    // ── Collaborators ─────────────────────────────────────────────────────

    pub fn adapter(mut self, adapter: Arc<dyn HandlerAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn exception_resolver(mut self, resolver: Arc<dyn ExceptionResolver>) -> Self {
        self.exception_resolvers.push(resolver);
        self
    }

    pub fn view_resolver(mut self, resolver: Arc<dyn ViewResolver>) -> Self {
        self.view_resolvers.push(resolver);
        self
    }

    /// Replaces the default `AcceptHeaderLocaleResolver`.
    pub fn locale_resolver(mut self, resolver: Arc<dyn LocaleResolver>) -> Self {
        self.locale_resolver = Some(resolver);
        self
    }

    /// Replaces the default `SessionFlashMapManager`.
    pub fn flash_map_manager(mut self, manager: Arc<dyn FlashMapManager>) -> Self {
        self.flash_map_manager = Some(manager);
        self
    }

    /// Replaces the default `DefaultViewNameTranslator`.
    pub fn view_name_translator(mut self, translator: Arc<dyn ViewNameTranslator>) -> Self {
        self.view_name_translator = Some(translator);
        self
    }

    /// Request settings every performed request inherits.
    pub fn default_request(mut self, defaults: MockRequestBuilder) -> Self {
        self.default_request = Some(defaults);
        self
    }

    /// Assemble the dispatcher configuration.
    #[instrument(skip_all, fields(routes = self.routes.len()))]
    pub fn build(self) -> MockMvcTester {
        if let Some(level) = &self.config.log_level {
            if let Err(e) = init_logging(level) {
                debug!(error = %e, "Keeping existing tracing subscriber");
            }
        }

        let locale_resolver = self
            .locale_resolver
            .unwrap_or_else(|| -> Arc<dyn LocaleResolver> {
                let mut resolver = AcceptHeaderLocaleResolver::new();
                match self.config.locale() {
                    Ok(Some(locale)) => resolver = resolver.default_locale(locale),
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Ignoring configured default locale"),
                }
                Arc::new(resolver)
            });
        let flash_map_manager = self
            .flash_map_manager
            .unwrap_or_else(|| -> Arc<dyn FlashMapManager> {
                Arc::new(
                    SessionFlashMapManager::new()
                        .timeout_seconds(self.config.flash_timeout_seconds),
                )
            });
        let view_name_translator = self
            .view_name_translator
            .unwrap_or_else(|| -> Arc<dyn ViewNameTranslator> {
                Arc::new(DefaultViewNameTranslator::new())
            });

        let mut builder = DispatcherConfig::builder();
        if !self.routes.is_empty() {
            builder = builder.router(Arc::new(self.routes));
        }
        for router in self.routers {
            builder = builder.router(router);
        }

        builder = builder
            .adapter(Arc::new(ControllerAdapter::new()))
            .adapter(Arc::new(RequestHandlerAdapter::new()));
        for adapter in self.adapters {
            builder = builder.adapter(adapter);
        }

        builder = builder.exception_resolver(Arc::new(ResponseStatusExceptionResolver::new()));
        for resolver in self.exception_resolvers {
            builder = builder.exception_resolver(resolver);
        }

        for resolver in self.view_resolvers {
            builder = builder.view_resolver(resolver);
        }
        builder = builder.view_resolver(Arc::new(
            UrlBasedViewResolver::new()
                .prefix(self.config.views.prefix.as_str())
                .suffix(self.config.views.suffix.as_str()),
        ));

        let config = builder
            .locale_resolver(locale_resolver)
            .flash_map_manager(flash_map_manager)
            .view_name_translator(view_name_translator)
            .build();

        let mut mock_mvc = MockMvc::new(Arc::new(config));
        let defaults = match (self.config.character_encoding.as_deref(), self.default_request) {
            (Some(encoding), Some(defaults)) => Some(
                defaults.merged_with(&MockRequestBuilder::get("/").character_encoding(encoding)),
            ),
            (Some(encoding), None) => {
                Some(MockRequestBuilder::get("/").character_encoding(encoding))
            }
            (None, defaults) => defaults,
        };
        if let Some(defaults) = defaults {
            mock_mvc = mock_mvc.with_default_request(defaults);
        }

        debug!(print_results = self.config.print_results, "Standalone setup built");
        MockMvcTester {
            mock_mvc,
            print_results: self.config.print_results,
        }
    }
}

/// A built [`MockMvc`] with the test DSL on top.
#[derive(Debug, Clone)]
pub struct MockMvcTester {
    mock_mvc: MockMvc,
    print_results: bool,
}

impl MockMvcTester {
    pub fn new(mock_mvc: MockMvc) -> Self {
        Self {
            mock_mvc,
            print_results: false,
        }
    }

    /// Perform `builder` and wrap the result for chained expectations.
    ///
    /// # Errors
    ///
    /// Fails when the request cannot be built or the dispatch aborted.
    pub fn perform(&self, builder: MockRequestBuilder) -> TestResult<ResultActions> {
        let result = self.mock_mvc.perform(builder)?;
        if self.print_results {
            print().handle(&result)?;
        }
        Ok(ResultActions::new(result))
    }

    pub fn mock_mvc(&self) -> &MockMvc {
        &self.mock_mvc
    }
}

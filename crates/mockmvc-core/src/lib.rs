//! mockmvc Core - Hexagonal Architecture Implementation
//!
//! This crate simulates a front-controller web dispatch in memory: a request
//! builder produces a request, the dispatcher runs it through routing,
//! interceptors, handler invocation, exception resolution and view rendering,
//! and the outcome is captured as an immutable [`MvcResult`](application::MvcResult).
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        mockmvc-test (test DSL)          │
//! │  (StandaloneSetup, ResultActions)       │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │        (MockMvc, Dispatcher)            │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Router, HandlerAdapter, ViewResolver)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    mockmvc-adapters (Infrastructure)    │
//! │  (PathRouter, UrlBasedViewResolver...)  │
//! └──────────────────┬──────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (MockRequest, MockResponse, FlashMap)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mockmvc_core::{
//!     application::{DispatcherConfig, MockMvc},
//!     domain::MockRequestBuilder,
//! };
//!
//! // 1. Assemble collaborators (routers, adapters, resolvers)
//! let config = DispatcherConfig::builder()
//!     // .router(...).adapter(...).view_resolver(...)
//!     .build();
//!
//! // 2. Perform a request and inspect the result
//! let mvc = MockMvc::new(Arc::new(config));
//! let result = mvc.perform(MockRequestBuilder::get("/hotels/{id}").uri_vars(["42"])).unwrap();
//! println!("{}", result.status());
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        DispatchError, Dispatcher, DispatcherConfig, MockMvc, MvcResult,
        ports::{
            ExceptionResolver, FlashMapManager, HandlerAdapter, HandlerExecutionChain,
            Interceptor, LocaleResolver, Router, View, ViewNameTranslator, ViewResolver,
        },
    };
    pub use crate::domain::{
        Cookie, FlashMap, Handler, HandlerError, HandlerRef, HandlerResult, Locale,
        MockRequest, MockRequestBuilder, MockResponse, MockSession, Model, ModelAndView,
        RequestBuildError, ResponseStatusError,
    };
    pub use crate::error::{MockMvcError, MockMvcResult};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

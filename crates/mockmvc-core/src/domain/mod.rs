//! Core domain layer for mockmvc.
//!
//! Pure in-memory model of one HTTP exchange plus the builder that produces
//! requests. No I/O and no logging happen here; the dispatcher in
//! `crate::application` is the only place that drives these types through
//! the request pipeline.
//!
//! - **Request / response**: mutable stand-ins a real container would own
//! - **Model-and-view**: what handlers hand to rendering
//! - **Flash / session**: state that outlives a single dispatch
//! - **Handlers**: the application objects routers select, and their errors

pub mod entities;
pub mod error;
pub mod request_builder;
pub mod request_context;

// Re-exports for convenience
pub use entities::{
    common::{Cookie, Locale},
    flash::FlashMap,
    handler::{
        AsAny, Handler, HandlerError, HandlerFailure, HandlerRef, HandlerResult,
        ResponseStatusError,
    },
    model_and_view::{Model, ModelAndView, View, ViewRef},
    request::{MockPart, MockRequest},
    response::MockResponse,
    session::MockSession,
};

pub use error::RequestBuildError;
pub use request_builder::{MULTIPART_FORM_DATA, MockRequestBuilder, RequestPostProcessor};
pub use request_context::{RequestContext, RequestContextGuard};

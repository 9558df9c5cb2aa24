//! Infrastructure adapters for mockmvc.
//!
//! This crate implements the ports defined in
//! `mockmvc_core::application::ports`: the routers, handler adapters,
//! exception resolvers, views and resolvers a dispatch is assembled from.

pub mod error;
pub mod exception;
pub mod flash;
pub mod handler;
pub mod locale;
pub mod routing;
pub mod view;
pub mod view_name;

// Re-export commonly used adapters
pub use error::ViewError;
pub use exception::{ResponseStatusExceptionResolver, SimpleMappingExceptionResolver};
pub use flash::SessionFlashMapManager;
pub use handler::{ControllerAdapter, FnController, FnRequestHandler, RequestHandlerAdapter};
pub use locale::{AcceptHeaderLocaleResolver, FixedLocaleResolver};
pub use routing::{PathPattern, PathRouter};
pub use view::{
    InternalResourceView, JsonView, RedirectView, StaticViewResolver, UrlBasedViewResolver,
};
pub use view_name::DefaultViewNameTranslator;

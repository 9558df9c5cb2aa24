//! Views and view resolvers.
//!
//! Forwards and redirects are recorded on the response only; nothing is
//! followed.

pub mod internal;
pub mod json;
pub mod redirect;
pub mod resolver;

pub use internal::InternalResourceView;
pub use json::JsonView;
pub use redirect::RedirectView;
pub use resolver::{FORWARD_URL_PREFIX, REDIRECT_URL_PREFIX, StaticViewResolver, UrlBasedViewResolver};

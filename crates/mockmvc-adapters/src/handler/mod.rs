//! Closure-backed handlers and the adapters that invoke them.
//!
//! - [`FnController`]: returns a model-and-view, or `None` if it wrote the
//!   response itself
//! - [`FnRequestHandler`]: always writes the response itself

pub mod controller;
pub mod request_handler;

pub use controller::{ControllerAdapter, FnController};
pub use request_handler::{FnRequestHandler, RequestHandlerAdapter};

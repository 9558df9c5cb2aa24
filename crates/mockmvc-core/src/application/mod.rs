//! Application layer for mockmvc.
//!
//! This layer contains:
//! - **Services**: The dispatcher and the `MockMvc` entry point
//! - **Ports**: Traits for the dispatcher's pluggable collaborators
//! - **Result**: The immutable record a dispatch produces
//! - **Errors**: Failures that abort a dispatch
//!
//! The pipeline's ordering rules live here; the domain layer only models the
//! exchange itself.

pub mod error;
pub mod ports;
pub mod result;
pub mod services;

pub use services::{Dispatcher, DispatcherConfig, DispatcherConfigBuilder, MockMvc};

// Re-export port traits (for adapter implementation)
pub use ports::{
    ExceptionResolver, FlashMapManager, HandlerAdapter, HandlerExecutionChain, Interceptor,
    LocaleResolver, Router, View, ViewNameTranslator, ViewResolver,
};

pub use error::DispatchError;
pub use result::MvcResult;

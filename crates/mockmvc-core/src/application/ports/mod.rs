//! Application ports (traits) for the dispatcher's collaborators.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by the dispatcher, implemented by adapters
//!   - `Router`: Request to handler mapping
//!   - `Interceptor`: Pre/post handler hooks
//!   - `HandlerAdapter`: Handler invocation
//!   - `ExceptionResolver`: Error to error view
//!   - `ViewResolver` / `View`: Rendering
//!   - `LocaleResolver`, `FlashMapManager`, `ViewNameTranslator`
//!
//! - **Driving (Input) Ports**: `MockMvc::perform`, implemented by services

pub mod output;

pub use output::{
    ExceptionResolver, FlashMapManager, HandlerAdapter, HandlerExecutionChain, Interceptor,
    LocaleResolver, Router, View, ViewNameTranslator, ViewResolver,
};

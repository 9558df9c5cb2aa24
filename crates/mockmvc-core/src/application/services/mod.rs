//! Application services - orchestrate the dispatch use case.
//!
//! `MockMvc` turns a request builder into a request and hands it to a fresh
//! `Dispatcher`, which drives the ports through the pipeline.

pub mod dispatcher;
pub mod mock_mvc;

pub use dispatcher::{Dispatcher, DispatcherConfig, DispatcherConfigBuilder};
pub use mock_mvc::MockMvc;

//! `MockMvc` - the entry point tests call.

use std::sync::Arc;

use tracing::instrument;

use crate::application::result::MvcResult;
use crate::application::services::dispatcher::{Dispatcher, DispatcherConfig};
use crate::domain::{MockRequestBuilder, MockResponse};
use crate::error::MockMvcResult;

/// Performs simulated requests against a fixed dispatcher configuration.
///
/// Cloning is cheap and every `perform` uses a fresh dispatcher and a fresh
/// response, so one instance can serve many requests, from many threads.
#[derive(Debug, Clone)]
pub struct MockMvc {
    config: Arc<DispatcherConfig>,
    default_request: Option<MockRequestBuilder>,
}

impl MockMvc {
    pub fn new(config: Arc<DispatcherConfig>) -> Self {
        Self {
            config,
            default_request: None,
        }
    }

    /// Settings every performed request inherits unless it overrides them.
    pub fn with_default_request(mut self, defaults: MockRequestBuilder) -> Self {
        self.default_request = Some(defaults);
        self
    }

    pub fn config(&self) -> &Arc<DispatcherConfig> {
        &self.config
    }

    pub fn default_request(&self) -> Option<&MockRequestBuilder> {
        self.default_request.as_ref()
    }

    /// Build the request from `builder` and dispatch it.
    ///
    /// # Errors
    ///
    /// - `MockMvcError::Build` if the builder describes an invalid request
    /// - `MockMvcError::Dispatch` if the dispatch aborted
    #[instrument(skip_all, fields(method = %builder.method(), uri = %builder.uri_template()))]
    pub fn perform(&self, builder: MockRequestBuilder) -> MockMvcResult<MvcResult> {
        let builder = match &self.default_request {
            Some(defaults) => builder.merged_with(defaults),
            None => builder,
        };
        let request = builder.build_request()?;
        let result =
            Dispatcher::new(Arc::clone(&self.config)).dispatch(request, MockResponse::new())?;
        Ok(result)
    }
}

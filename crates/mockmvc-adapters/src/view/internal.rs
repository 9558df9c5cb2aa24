use mockmvc_core::application::ports::View;
use mockmvc_core::domain::{HandlerResult, MockRequest, MockResponse, Model};
use tracing::debug;

/// Forwards to a resource inside the application.
///
/// Model attributes become request attributes and the target URL is
/// recorded as the response's forwarded URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalResourceView {
    url: String,
}

impl InternalResourceView {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl View for InternalResourceView {
    fn render(
        &self,
        model: &Model,
        request: &mut MockRequest,
        response: &mut MockResponse,
    ) -> HandlerResult<()> {
        for (name, value) in model {
            request.set_attribute(name.clone(), value.clone());
        }
        debug!(url = %self.url, "Forwarding");
        response.set_forwarded_url(self.url.clone());
        Ok(())
    }
}

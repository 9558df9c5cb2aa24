use mockmvc_core::application::ports::View;
use mockmvc_core::domain::{HandlerError, HandlerResult, MockRequest, MockResponse, Model};
use serde_json::Value;

use crate::error::ViewError;

pub const APPLICATION_JSON: &str = "application/json";

/// Renders the model as a JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonView {
    pretty: bool,
    model_keys: Vec<String>,
    extract_single_value: bool,
}

impl JsonView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Only render these attributes. Repeat to add more.
    pub fn model_key(mut self, key: impl Into<String>) -> Self {
        self.model_keys.push(key.into());
        self
    }

    /// Render the bare value when exactly one attribute remains.
    pub fn extract_single_value(mut self) -> Self {
        self.extract_single_value = true;
        self
    }

    fn filter(&self, model: &Model) -> Value {
        let selected: serde_json::Map<String, Value> = model
            .iter()
            .filter(|(k, _)| self.model_keys.is_empty() || self.model_keys.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if self.extract_single_value && selected.len() == 1 {
            if let Some((_, value)) = selected.into_iter().next() {
                return value;
            }
            return Value::Null;
        }
        Value::Object(selected)
    }
}

impl View for JsonView {
    fn render(
        &self,
        model: &Model,
        _request: &mut MockRequest,
        response: &mut MockResponse,
    ) -> HandlerResult<()> {
        let value = self.filter(model);
        let body = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
        .map_err(|e| HandlerError::new(ViewError::from(e)))?;

        response.set_content_type(APPLICATION_JSON);
        response.write_str(&body);
        Ok(())
    }

    fn content_type(&self) -> Option<&str> {
        Some(APPLICATION_JSON)
    }
}

//! Flash attributes: data written during one dispatch for the next one.

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::MockRequest;

/// Attributes handed from one dispatch to the next (typically across a
/// redirect), with optional targeting and expiry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashMap {
    attributes: IndexMap<String, Value>,
    target_request_path: Option<String>,
    target_request_params: IndexMap<String, Vec<String>>,
    expires_at: Option<DateTime<Utc>>,
}

impl FlashMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Restrict this flash map to requests for `path`.
    pub fn set_target_request_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.target_request_path = Some(path.into());
        self
    }

    pub fn target_request_path(&self) -> Option<&str> {
        self.target_request_path.as_deref()
    }

    /// Require a request parameter for this flash map to match.
    pub fn add_target_request_param(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.target_request_params
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn target_request_params(&self) -> &IndexMap<String, Vec<String>> {
        &self.target_request_params
    }

    /// Start the expiry clock, counting from now.
    pub fn start_expiration(&mut self, seconds: i64) {
        self.expires_at = Some(Utc::now() + Duration::seconds(seconds));
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }

    /// Whether this flash map is meant for `request`.
    ///
    /// A flash map without a target path matches every request. When a
    /// path is set it is compared against the request URI with any trailing
    /// slash ignored; every target parameter value must be present.
    pub fn matches(&self, request: &MockRequest) -> bool {
        if let Some(target) = &self.target_request_path {
            let trim = |p: &str| p.trim_end_matches('/').to_string();
            if trim(target) != trim(request.request_uri()) {
                return false;
            }
        }

        self.target_request_params.iter().all(|(name, expected)| {
            let actual = request.parameter_values(name);
            expected.iter().all(|v| actual.contains(v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockRequestBuilder;

    #[test]
    fn untargeted_map_matches_any_request() {
        let mut flash = FlashMap::new();
        flash.put("message", "saved");
        let request = MockRequestBuilder::get("/anything").build_request().unwrap();
        assert!(flash.matches(&request));
    }

    #[test]
    fn target_path_and_params_must_match() {
        let mut flash = FlashMap::new();
        flash
            .set_target_request_path("/items/")
            .add_target_request_param("page", "2");

        let hit = MockRequestBuilder::get("/items?page=2").build_request().unwrap();
        let wrong_param = MockRequestBuilder::get("/items?page=3").build_request().unwrap();
        let wrong_path = MockRequestBuilder::get("/other?page=2").build_request().unwrap();

        assert!(flash.matches(&hit));
        assert!(!flash.matches(&wrong_param));
        assert!(!flash.matches(&wrong_path));
    }

    #[test]
    fn expiration_in_the_past_is_expired() {
        let mut flash = FlashMap::new();
        assert!(!flash.is_expired());
        flash.start_expiration(-1);
        assert!(flash.is_expired());
    }

    #[test]
    fn serializes_for_session_storage() {
        let mut flash = FlashMap::new();
        flash.put("count", 3);
        let value = serde_json::to_value(&flash).unwrap();
        let back: FlashMap = serde_json::from_value(value).unwrap();
        assert_eq!(back, flash);
    }
}

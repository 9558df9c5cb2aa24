use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use serde_json::Value;
use uuid::Uuid;

/// Shared, mutable session handle.
///
/// Cloning yields another handle to the same session, which is how session
/// state survives between two `perform` calls of one test.
#[derive(Debug, Clone)]
pub struct MockSession {
    inner: Arc<Mutex<SessionInner>>,
}

#[derive(Debug)]
struct SessionInner {
    id: String,
    attributes: IndexMap<String, Value>,
    is_new: bool,
    invalid: bool,
}

impl MockSession {
    /// Create a new session with a random id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                id: id.into(),
                attributes: IndexMap::new(),
                is_new: true,
                invalid: false,
            })),
        }
    }

    // A panicking handler must not make the session unusable for assertions.
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> String {
        self.lock().id.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.lock().attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.lock().attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&self, name: &str) -> Option<Value> {
        self.lock().attributes.shift_remove(name)
    }

    /// Snapshot of all attributes in insertion order.
    pub fn attributes(&self) -> IndexMap<String, Value> {
        self.lock().attributes.clone()
    }

    pub fn is_new(&self) -> bool {
        self.lock().is_new
    }

    /// Mark the session as seen by a previous request.
    pub fn access(&self) {
        self.lock().is_new = false;
    }

    /// Clear all attributes and flag the session invalid.
    pub fn invalidate(&self) {
        let mut inner = self.lock();
        inner.attributes.clear();
        inner.invalid = true;
    }

    pub fn is_invalid(&self) -> bool {
        self.lock().invalid
    }

    /// Whether two handles point at the same session.
    pub fn same_session(&self, other: &MockSession) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let session = MockSession::new();
        let other = session.clone();
        other.set_attribute("user", "alice");
        assert_eq!(session.attribute("user"), Some(Value::from("alice")));
        assert!(session.same_session(&other));
    }

    #[test]
    fn invalidate_clears_attributes() {
        let session = MockSession::with_id("fixed");
        session.set_attribute("n", 1);
        session.invalidate();
        assert!(session.attributes().is_empty());
        assert!(session.is_invalid());
        assert_eq!(session.id(), "fixed");
    }
}

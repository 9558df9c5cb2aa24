//! Session-backed flash map storage.

use mockmvc_core::application::ports::FlashMapManager;
use mockmvc_core::domain::{FlashMap, MockRequest, MockSession};
use tracing::{debug, warn};

/// Session attribute holding the saved flash maps.
pub const FLASH_MAPS_SESSION_ATTRIBUTE: &str = "mockmvc.flash_maps";

/// Default lifetime of a saved flash map, in seconds.
pub const DEFAULT_FLASH_MAP_TIMEOUT: i64 = 180;

/// Keeps output flash maps in the session until a matching request arrives.
///
/// At dispatch start the first non-expired map matching the request is
/// removed from the session and becomes the input flash map; its attributes
/// are also exposed as request attributes. At dispatch end a non-empty
/// output flash map is saved with a fresh expiry.
#[derive(Debug, Clone)]
pub struct SessionFlashMapManager {
    timeout_seconds: i64,
}

impl Default for SessionFlashMapManager {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_FLASH_MAP_TIMEOUT,
        }
    }
}

impl SessionFlashMapManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout_seconds(mut self, seconds: i64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    fn load(session: &MockSession) -> Vec<FlashMap> {
        let Some(stored) = session.attribute(FLASH_MAPS_SESSION_ATTRIBUTE) else {
            return Vec::new();
        };
        serde_json::from_value(stored).unwrap_or_else(|e| {
            warn!(error = %e, "Discarding unreadable flash maps");
            Vec::new()
        })
    }

    fn save(session: &MockSession, maps: &[FlashMap]) {
        if maps.is_empty() {
            session.remove_attribute(FLASH_MAPS_SESSION_ATTRIBUTE);
            return;
        }
        match serde_json::to_value(maps) {
            Ok(value) => session.set_attribute(FLASH_MAPS_SESSION_ATTRIBUTE, value),
            Err(e) => warn!(error = %e, "Could not store flash maps"),
        }
    }
}

impl FlashMapManager for SessionFlashMapManager {
    fn on_dispatch_start(&self, request: &mut MockRequest) {
        let Some(session) = request.session().cloned() else {
            return;
        };
        let mut maps = Self::load(&session);
        if maps.is_empty() {
            return;
        }

        let before = maps.len();
        maps.retain(|map| !map.is_expired());
        let position = maps.iter().position(|map| map.matches(request));
        let matched = position.map(|i| maps.remove(i));
        if maps.len() != before {
            Self::save(&session, &maps);
        }

        if let Some(flash) = matched {
            debug!(attributes = flash.len(), "Retrieved input flash map");
            for (name, value) in flash.attributes() {
                request.set_attribute(name.clone(), value.clone());
            }
            request.set_input_flash_map(Some(flash));
        }
    }

    fn on_dispatch_end(&self, request: &mut MockRequest) {
        if request.output_flash_map().is_empty() {
            return;
        }

        let mut flash = request.output_flash_map().clone();
        if let Some(path) = flash.target_request_path() {
            if !path.starts_with('/') {
                let base = request.request_uri();
                let parent = &base[..base.rfind('/').map_or(0, |i| i + 1)];
                let absolute = format!("{}{}", if parent.is_empty() { "/" } else { parent }, path);
                flash.set_target_request_path(absolute);
            }
        }
        flash.start_expiration(self.timeout_seconds);

        let session = request.session_or_create().clone();
        let mut maps = Self::load(&session);
        maps.push(flash);
        Self::save(&session, &maps);
        debug!(saved = maps.len(), "Saved output flash map");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockmvc_core::domain::MockRequestBuilder;

    fn saved_maps(session: &MockSession) -> Vec<FlashMap> {
        SessionFlashMapManager::load(session)
    }

    #[test]
    fn test_output_flash_saved_and_retrieved_by_next_request() {
        let manager = SessionFlashMapManager::new();
        let session = MockSession::new();

        let mut first = MockRequestBuilder::post("/hotels")
            .session(session.clone())
            .build_request()
            .unwrap();
        first
            .output_flash_map_mut()
            .put("notice", "saved")
            .set_target_request_path("/hotels");
        manager.on_dispatch_end(&mut first);
        assert_eq!(saved_maps(&session).len(), 1);
        assert!(session.attribute(FLASH_MAPS_SESSION_ATTRIBUTE).is_some());

        // Wrong path: left in place.
        let mut other = MockRequestBuilder::get("/motels")
            .session(session.clone())
            .build_request()
            .unwrap();
        manager.on_dispatch_start(&mut other);
        assert!(other.input_flash_map().is_none());

        let mut second = MockRequestBuilder::get("/hotels")
            .session(session.clone())
            .build_request()
            .unwrap();
        manager.on_dispatch_start(&mut second);
        let input = second.input_flash_map().unwrap();
        assert_eq!(input.get("notice"), Some(&"saved".into()));
        assert_eq!(second.attribute("notice"), Some(&"saved".into()));
        assert!(saved_maps(&session).is_empty());
    }

    #[test]
    fn test_expired_maps_discarded() {
        let manager = SessionFlashMapManager::new().timeout_seconds(-1);
        let session = MockSession::new();

        let mut first = MockRequestBuilder::post("/a")
            .session(session.clone())
            .build_request()
            .unwrap();
        first.output_flash_map_mut().put("k", 1);
        manager.on_dispatch_end(&mut first);

        let mut second = MockRequestBuilder::get("/a")
            .session(session.clone())
            .build_request()
            .unwrap();
        manager.on_dispatch_start(&mut second);
        assert!(second.input_flash_map().is_none());
        assert!(saved_maps(&session).is_empty());
    }

    #[test]
    fn test_empty_output_creates_no_session() {
        let manager = SessionFlashMapManager::new();
        let mut request = MockRequestBuilder::get("/").build_request().unwrap();
        manager.on_dispatch_end(&mut request);
        assert!(request.session().is_none());
    }

    #[test]
    fn test_relative_target_path_made_absolute() {
        let manager = SessionFlashMapManager::new();
        let mut request = MockRequestBuilder::post("/hotels/new").build_request().unwrap();
        request
            .output_flash_map_mut()
            .put("k", 1)
            .set_target_request_path("list");
        manager.on_dispatch_end(&mut request);

        let session = request.session().unwrap();
        let maps = saved_maps(session);
        assert_eq!(maps[0].target_request_path(), Some("/hotels/list"));
    }
}

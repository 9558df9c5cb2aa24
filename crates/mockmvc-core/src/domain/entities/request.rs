//! The simulated inbound request.
//!
//! A [`MockRequest`] is produced by
//! [`MockRequestBuilder::build_request`](crate::domain::MockRequestBuilder::build_request)
//! and handed once to the dispatcher. Method and URI are fixed at
//! construction; everything else stays mutable so routers, interceptors,
//! handlers, and views can expose attributes the way a real container does.

use http::{HeaderMap, Method};
use indexmap::IndexMap;
use serde_json::Value;

use super::{common::Cookie, common::Locale, flash::FlashMap, session::MockSession};

/// One named part of a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    content: Vec<u8>,
}

impl MockPart {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            content: content.into(),
        }
    }

    /// A file part, as a browser would send for `<input type="file">`.
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// In-memory stand-in for an HTTP request.
#[derive(Debug, Clone)]
pub struct MockRequest {
    method: Method,
    request_uri: String,
    query_string: Option<String>,
    context_path: String,
    servlet_path: String,
    path_info: Option<String>,
    pub(crate) parameters: IndexMap<String, Vec<String>>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
    pub(crate) content_type: Option<String>,
    pub(crate) character_encoding: Option<String>,
    pub(crate) cookies: Vec<Cookie>,
    pub(crate) locales: Vec<Locale>,
    pub(crate) principal: Option<String>,
    pub(crate) secure: bool,
    pub(crate) attributes: IndexMap<String, Value>,
    pub(crate) session: Option<MockSession>,
    pub(crate) parts: Vec<MockPart>,
    input_flash_map: Option<FlashMap>,
    output_flash_map: FlashMap,
}

impl MockRequest {
    /// Create a request with decomposed paths already validated.
    ///
    /// Prefer [`MockRequestBuilder`](crate::domain::MockRequestBuilder),
    /// which checks the context/servlet path invariants.
    pub(crate) fn new(
        method: Method,
        request_uri: String,
        query_string: Option<String>,
        context_path: String,
        servlet_path: String,
        path_info: Option<String>,
    ) -> Self {
        Self {
            method,
            request_uri,
            query_string,
            context_path,
            servlet_path,
            path_info,
            parameters: IndexMap::new(),
            headers: HeaderMap::new(),
            body: Vec::new(),
            content_type: None,
            character_encoding: None,
            cookies: Vec::new(),
            locales: vec![Locale::english()],
            principal: None,
            secure: false,
            attributes: IndexMap::new(),
            session: None,
            parts: Vec::new(),
            input_flash_map: None,
            output_flash_map: FlashMap::new(),
        }
    }

    // ── Identity ──────────────────────────────────────────────────────────

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path, without query string, percent-encoded as sent.
    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }

    pub fn query_string(&self) -> Option<&str> {
        self.query_string.as_deref()
    }

    pub fn context_path(&self) -> &str {
        &self.context_path
    }

    pub fn servlet_path(&self) -> &str {
        &self.servlet_path
    }

    pub fn path_info(&self) -> Option<&str> {
        self.path_info.as_deref()
    }

    /// Path within the application: servlet path followed by path info.
    ///
    /// This is what routers match against and what default view names are
    /// derived from.
    pub fn lookup_path(&self) -> String {
        let mut path = self.servlet_path.clone();
        if let Some(info) = &self.path_info {
            path.push_str(info);
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }

    // ── Parameters / headers / body ────────────────────────────────────────

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn parameter_values(&self, name: &str) -> &[String] {
        self.parameters.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn parameters(&self) -> &IndexMap<String, Vec<String>> {
        &self.parameters
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// First value of a header, if it is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_as_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn character_encoding(&self) -> Option<&str> {
        self.character_encoding.as_deref()
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name() == name)
    }

    pub fn parts(&self) -> &[MockPart] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&MockPart> {
        self.parts.iter().find(|p| p.name() == name)
    }

    // ── Client identity ───────────────────────────────────────────────────

    /// Preferred locale (the first configured one).
    pub fn locale(&self) -> Locale {
        self.locales.first().cloned().unwrap_or_default()
    }

    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    // ── Attributes / session ───────────────────────────────────────────────

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Value> {
        self.attributes.shift_remove(name)
    }

    pub fn attributes(&self) -> &IndexMap<String, Value> {
        &self.attributes
    }

    /// The current session, without creating one.
    pub fn session(&self) -> Option<&MockSession> {
        self.session.as_ref()
    }

    /// The current session, creating it on first use.
    pub fn session_or_create(&mut self) -> &MockSession {
        self.session.get_or_insert_with(MockSession::new)
    }

    // ── Flash ─────────────────────────────────────────────────────────────

    /// Flash attributes carried over from the previous dispatch.
    pub fn input_flash_map(&self) -> Option<&FlashMap> {
        self.input_flash_map.as_ref()
    }

    pub fn set_input_flash_map(&mut self, flash: Option<FlashMap>) {
        self.input_flash_map = flash;
    }

    /// Flash attributes for the next dispatch.
    pub fn output_flash_map(&self) -> &FlashMap {
        &self.output_flash_map
    }

    pub fn output_flash_map_mut(&mut self) -> &mut FlashMap {
        &mut self.output_flash_map
    }
}

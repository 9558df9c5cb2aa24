//! The simulated response written to during dispatch.

use http::header::{CONTENT_TYPE, HeaderName, HeaderValue, LOCATION, SET_COOKIE};
use http::{HeaderMap, StatusCode};

use super::common::{Cookie, Locale};
use super::handler::{HandlerError, HandlerResult};

/// In-memory stand-in for an HTTP response.
///
/// Forward and redirect outcomes are recorded as URLs only; nothing is
/// followed and no second dispatch happens.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: StatusCode,
    error_message: Option<String>,
    headers: HeaderMap,
    body: Vec<u8>,
    content_type: Option<String>,
    character_encoding: Option<String>,
    forwarded_url: Option<String>,
    redirected_url: Option<String>,
    included_urls: Vec<String>,
    cookies: Vec<Cookie>,
    locale: Locale,
    committed: bool,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl MockResponse {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            error_message: None,
            headers: HeaderMap::new(),
            body: Vec::new(),
            content_type: None,
            character_encoding: None,
            forwarded_url: None,
            redirected_url: None,
            included_urls: Vec::new(),
            cookies: Vec::new(),
            locale: Locale::english(),
            committed: false,
        }
    }

    // ── Status ────────────────────────────────────────────────────────────

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Set an error status with an optional message and commit the response.
    pub fn send_error(&mut self, status: StatusCode, message: Option<&str>) {
        self.status = status;
        self.error_message = message.map(str::to_string);
        self.committed = true;
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Record a redirect (302 + `Location`) and commit the response.
    pub fn send_redirect(&mut self, url: impl Into<String>) {
        let url = url.into();
        if let Ok(value) = HeaderValue::from_str(&url) {
            self.headers.insert(LOCATION, value);
        }
        self.status = StatusCode::FOUND;
        self.redirected_url = Some(url);
        self.committed = true;
    }

    pub fn redirected_url(&self) -> Option<&str> {
        self.redirected_url.as_deref()
    }

    pub fn set_forwarded_url(&mut self, url: impl Into<String>) {
        self.forwarded_url = Some(url.into());
    }

    pub fn forwarded_url(&self) -> Option<&str> {
        self.forwarded_url.as_deref()
    }

    pub fn add_included_url(&mut self, url: impl Into<String>) {
        self.included_urls.push(url.into());
    }

    pub fn included_urls(&self) -> &[String] {
        &self.included_urls
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    // ── Headers ───────────────────────────────────────────────────────────

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// All values of a header, in the order they were added.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        if name == CONTENT_TYPE {
            if let Ok(ct) = value.to_str() {
                self.apply_content_type(ct);
            }
        }
        self.headers.insert(name, value);
    }

    pub fn add_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    /// String-typed `set_header` for handler code; invalid input becomes a
    /// [`HandlerError`] so it can be propagated with `?`.
    pub fn try_set_header(&mut self, name: &str, value: &str) -> HandlerResult<()> {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(HandlerError::new)?;
        let value = HeaderValue::from_str(value).map_err(HandlerError::new)?;
        self.set_header(name, value);
        Ok(())
    }

    // ── Content ───────────────────────────────────────────────────────────

    /// Set the content type, extracting a `charset` parameter if present.
    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        let content_type = content_type.into();
        if let Ok(value) = HeaderValue::from_str(&content_type) {
            self.headers.insert(CONTENT_TYPE, value);
        }
        self.apply_content_type(&content_type);
    }

    fn apply_content_type(&mut self, content_type: &str) {
        if let Some(charset) = content_type
            .split(';')
            .skip(1)
            .find_map(|p| p.trim().strip_prefix("charset="))
        {
            self.character_encoding = Some(charset.trim_matches('"').to_string());
        }
        self.content_type = Some(content_type.to_string());
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn set_character_encoding(&mut self, encoding: impl Into<String>) {
        self.character_encoding = Some(encoding.into());
    }

    pub fn character_encoding(&self) -> Option<&str> {
        self.character_encoding.as_deref()
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
        self.committed = true;
    }

    pub fn write_str(&mut self, text: &str) {
        self.write(text.as_bytes());
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn content_as_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    // ── Cookies / locale ──────────────────────────────────────────────────

    pub fn add_cookie(&mut self, cookie: Cookie) {
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            self.headers.append(SET_COOKIE, value);
        }
        self.cookies.push(cookie);
    }

    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name() == name)
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }
}

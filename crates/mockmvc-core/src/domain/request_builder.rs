//! Fluent construction of [`MockRequest`]s.
//!
//! A [`MockRequestBuilder`] only accumulates configuration; nothing is
//! validated until [`build_request`](MockRequestBuilder::build_request), which
//! is pure given the builder's state (a shared [`MockSession`] is the one
//! exception: session attributes are written into the shared handle).
//!
//! ```rust
//! use mockmvc_core::domain::MockRequestBuilder;
//!
//! let request = MockRequestBuilder::get("/hotels/{id}")
//!     .uri_vars(["42"])
//!     .param("expand", "rooms")
//!     .accept("text/html")
//!     .build_request()
//!     .unwrap();
//!
//! assert_eq!(request.request_uri(), "/hotels/42");
//! assert_eq!(request.parameter("expand"), Some("rooms"));
//! ```

use std::fmt;
use std::sync::Arc;

use http::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use indexmap::IndexMap;
use serde_json::Value;

use super::entities::{
    common::{Cookie, Locale},
    flash::FlashMap,
    request::{MockPart, MockRequest},
    session::MockSession,
};
use super::error::RequestBuildError;

/// Content type forced onto every multipart request.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Hook applied to the request after it has been built.
pub type RequestPostProcessor = Arc<dyn Fn(&mut MockRequest) + Send + Sync>;

/// Accumulates a declarative request description.
#[derive(Clone)]
pub struct MockRequestBuilder {
    method: Method,
    uri_template: String,
    uri_vars: Vec<String>,
    parameters: IndexMap<String, Vec<String>>,
    headers: IndexMap<String, Vec<String>>,
    cookies: Vec<Cookie>,
    body: Option<Vec<u8>>,
    content_type: Option<String>,
    character_encoding: Option<String>,
    locales: Vec<Locale>,
    principal: Option<String>,
    secure: Option<bool>,
    attributes: IndexMap<String, Value>,
    session: Option<MockSession>,
    session_attributes: IndexMap<String, Value>,
    flash_attributes: IndexMap<String, Value>,
    context_path: Option<String>,
    servlet_path: Option<String>,
    multipart: bool,
    parts: Vec<MockPart>,
    post_processors: Vec<RequestPostProcessor>,
}

impl MockRequestBuilder {
    pub fn request(method: Method, uri_template: impl Into<String>) -> Self {
        Self {
            method,
            uri_template: uri_template.into(),
            uri_vars: Vec::new(),
            parameters: IndexMap::new(),
            headers: IndexMap::new(),
            cookies: Vec::new(),
            body: None,
            content_type: None,
            character_encoding: None,
            locales: Vec::new(),
            principal: None,
            secure: None,
            attributes: IndexMap::new(),
            session: None,
            session_attributes: IndexMap::new(),
            flash_attributes: IndexMap::new(),
            context_path: None,
            servlet_path: None,
            multipart: false,
            parts: Vec::new(),
            post_processors: Vec::new(),
        }
    }

    pub fn get(uri_template: impl Into<String>) -> Self {
        Self::request(Method::GET, uri_template)
    }

    pub fn post(uri_template: impl Into<String>) -> Self {
        Self::request(Method::POST, uri_template)
    }

    pub fn put(uri_template: impl Into<String>) -> Self {
        Self::request(Method::PUT, uri_template)
    }

    pub fn patch(uri_template: impl Into<String>) -> Self {
        Self::request(Method::PATCH, uri_template)
    }

    pub fn delete(uri_template: impl Into<String>) -> Self {
        Self::request(Method::DELETE, uri_template)
    }

    pub fn head(uri_template: impl Into<String>) -> Self {
        Self::request(Method::HEAD, uri_template)
    }

    pub fn options(uri_template: impl Into<String>) -> Self {
        Self::request(Method::OPTIONS, uri_template)
    }

    /// A multipart upload. Always built as `POST multipart/form-data`.
    pub fn multipart(uri_template: impl Into<String>) -> Self {
        let mut builder = Self::request(Method::POST, uri_template);
        builder.multipart = true;
        builder
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri_template(&self) -> &str {
        &self.uri_template
    }

    pub fn is_multipart(&self) -> bool {
        self.multipart
    }

    // ── Fluent setters ────────────────────────────────────────────────────

    /// Positional values for `{placeholders}` in the URI template.
    pub fn uri_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.uri_vars = vars.into_iter().map(|v| v.to_string()).collect();
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn params<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters
            .entry(name.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Add a header value; repeated calls accumulate values.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.as_ref().to_ascii_lowercase())
            .or_default()
            .push(value.into());
        self
    }

    pub fn accept(self, media_type: impl Into<String>) -> Self {
        self.header(ACCEPT.as_str(), media_type)
    }

    /// Set the content type field and replace any `Content-Type` header.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        self.headers
            .insert(CONTENT_TYPE.as_str().to_string(), vec![content_type.clone()]);
        self.content_type = Some(content_type);
        self
    }

    pub fn character_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.character_encoding = Some(encoding.into());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Replace a same-named cookie or add a new one.
    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.retain(|c| c.name() != cookie.name());
        self.cookies.push(cookie);
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locales = vec![locale];
        self
    }

    pub fn locales(mut self, locales: impl IntoIterator<Item = Locale>) -> Self {
        self.locales = locales.into_iter().collect();
        self
    }

    pub fn principal(mut self, name: impl Into<String>) -> Self {
        self.principal = Some(name.into());
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    pub fn request_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Use an existing (possibly shared) session.
    pub fn session(mut self, session: MockSession) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.session_attributes.insert(name.into(), value.into());
        self
    }

    /// Seed the input flash map, as if a previous dispatch had written it.
    pub fn flash_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.flash_attributes.insert(name.into(), value.into());
        self
    }

    pub fn context_path(mut self, path: impl Into<String>) -> Self {
        self.context_path = Some(path.into());
        self
    }

    pub fn servlet_path(mut self, path: impl Into<String>) -> Self {
        self.servlet_path = Some(path.into());
        self
    }

    /// Attach a multipart part. Only honored by multipart builders.
    pub fn part(mut self, part: MockPart) -> Self {
        self.parts.push(part);
        self
    }

    pub fn file(self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.part(MockPart::new(name, content))
    }

    /// Register a hook run against the built request.
    pub fn with<F>(mut self, post_processor: F) -> Self
    where
        F: Fn(&mut MockRequest) + Send + Sync + 'static,
    {
        self.post_processors.push(Arc::new(post_processor));
        self
    }

    // ── Merge ─────────────────────────────────────────────────────────────

    /// Combine with a parent builder into a new builder.
    ///
    /// Scalars set on `self` win. Keyed collections are unioned with the
    /// parent's entries first and `self` overriding equal keys; list
    /// collections are the parent's followed by `self`'s. Neither input is
    /// modified.
    pub fn merged_with(&self, parent: &MockRequestBuilder) -> MockRequestBuilder {
        fn union<V: Clone>(
            parent: &IndexMap<String, V>,
            child: &IndexMap<String, V>,
        ) -> IndexMap<String, V> {
            let mut merged = parent.clone();
            for (k, v) in child {
                merged.insert(k.clone(), v.clone());
            }
            merged
        }

        let mut cookies: Vec<Cookie> = parent
            .cookies
            .iter()
            .filter(|p| self.cookies.iter().all(|c| c.name() != p.name()))
            .cloned()
            .collect();
        cookies.extend(self.cookies.iter().cloned());

        MockRequestBuilder {
            method: self.method.clone(),
            uri_template: self.uri_template.clone(),
            uri_vars: self.uri_vars.clone(),
            parameters: union(&parent.parameters, &self.parameters),
            headers: union(&parent.headers, &self.headers),
            cookies,
            body: self.body.clone().or_else(|| parent.body.clone()),
            content_type: self
                .content_type
                .clone()
                .or_else(|| parent.content_type.clone()),
            character_encoding: self
                .character_encoding
                .clone()
                .or_else(|| parent.character_encoding.clone()),
            locales: if self.locales.is_empty() {
                parent.locales.clone()
            } else {
                self.locales.clone()
            },
            principal: self.principal.clone().or_else(|| parent.principal.clone()),
            secure: self.secure.or(parent.secure),
            attributes: union(&parent.attributes, &self.attributes),
            session: self.session.clone().or_else(|| parent.session.clone()),
            session_attributes: union(&parent.session_attributes, &self.session_attributes),
            flash_attributes: union(&parent.flash_attributes, &self.flash_attributes),
            context_path: self
                .context_path
                .clone()
                .or_else(|| parent.context_path.clone()),
            servlet_path: self
                .servlet_path
                .clone()
                .or_else(|| parent.servlet_path.clone()),
            multipart: self.multipart,
            parts: parent.parts.iter().chain(&self.parts).cloned().collect(),
            post_processors: parent
                .post_processors
                .iter()
                .chain(&self.post_processors)
                .cloned()
                .collect(),
        }
    }

    // ── Build ─────────────────────────────────────────────────────────────

    pub fn build_request(&self) -> Result<MockRequest, RequestBuildError> {
        let uri = expand_uri_template(&self.uri_template, &self.uri_vars)?;
        let target = parse_target(&uri)?;

        let context_path = validated_prefix("context path", self.context_path.as_deref())?;
        let servlet_path = validated_prefix("servlet path", self.servlet_path.as_deref())?;

        let after_context = strip_path_prefix(&target.path, &context_path).ok_or_else(|| {
            RequestBuildError::ContextPathMismatch {
                uri: target.path.clone(),
                context_path: context_path.clone(),
            }
        })?;
        let path_info = strip_path_prefix(after_context, &servlet_path).ok_or_else(|| {
            RequestBuildError::ServletPathMismatch {
                uri: target.path.clone(),
                servlet_path: servlet_path.clone(),
            }
        })?;
        let path_info = (!path_info.is_empty()).then(|| path_info.to_string());

        let method = if self.multipart {
            Method::POST
        } else {
            self.method.clone()
        };

        let mut request = MockRequest::new(
            method,
            target.path.clone(),
            target.query.clone(),
            context_path,
            servlet_path,
            path_info,
        );

        // URI-derived parameters first, explicit ones appended per name.
        if let Some(query) = &target.query {
            for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
                request
                    .parameters
                    .entry(name.into_owned())
                    .or_default()
                    .push(value.into_owned());
            }
        }
        for (name, values) in &self.parameters {
            request
                .parameters
                .entry(name.clone())
                .or_default()
                .extend(values.iter().cloned());
        }

        let content_type = if self.multipart {
            Some(MULTIPART_FORM_DATA.to_string())
        } else {
            self.content_type.clone()
        };
        request.headers = self.build_headers(content_type.as_deref())?;
        request.content_type = content_type;
        request.character_encoding = self.character_encoding.clone();
        request.body = self.body.clone().unwrap_or_default();
        request.cookies = self.cookies.clone();
        request.principal = self.principal.clone();
        request.secure = self.secure.unwrap_or(target.secure);
        request.attributes = self.attributes.clone();

        request.locales = if !self.locales.is_empty() {
            self.locales.clone()
        } else {
            let from_header = request
                .header(ACCEPT_LANGUAGE.as_str())
                .map(Locale::parse_accept_language)
                .unwrap_or_default();
            if from_header.is_empty() {
                vec![Locale::english()]
            } else {
                from_header
            }
        };

        if self.session.is_some() || !self.session_attributes.is_empty() {
            let session = self.session.clone().unwrap_or_default();
            for (name, value) in &self.session_attributes {
                session.set_attribute(name.clone(), value.clone());
            }
            request.session = Some(session);
        }

        if !self.flash_attributes.is_empty() {
            let mut flash = FlashMap::new();
            for (name, value) in &self.flash_attributes {
                flash.put(name.clone(), value.clone());
                request.set_attribute(name.clone(), value.clone());
            }
            request.set_input_flash_map(Some(flash));
        }

        if self.multipart {
            request.parts = self.parts.clone();
        }

        for post_processor in &self.post_processors {
            post_processor(&mut request);
        }

        Ok(request)
    }

    fn build_headers(&self, content_type: Option<&str>) -> Result<HeaderMap, RequestBuildError> {
        let mut headers = HeaderMap::new();
        for (name, values) in &self.headers {
            if name == CONTENT_TYPE.as_str() && content_type.is_some() {
                continue;
            }
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                RequestBuildError::InvalidHeader {
                    name: name.clone(),
                    value: values.join(", "),
                }
            })?;
            for value in values {
                headers.append(header_name.clone(), header_value(name, value)?);
            }
        }

        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, header_value(CONTENT_TYPE.as_str(), content_type)?);
        }

        if !self.cookies.is_empty() && !headers.contains_key(COOKIE) {
            let joined = self
                .cookies
                .iter()
                .map(|c| format!("{}={}", c.name(), c.value()))
                .collect::<Vec<_>>()
                .join("; ");
            headers.insert(COOKIE, header_value(COOKIE.as_str(), &joined)?);
        }

        Ok(headers)
    }
}

impl fmt::Debug for MockRequestBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockRequestBuilder")
            .field("method", &self.method)
            .field("uri_template", &self.uri_template)
            .field("uri_vars", &self.uri_vars)
            .field("parameters", &self.parameters)
            .field("headers", &self.headers)
            .field("multipart", &self.multipart)
            .field("post_processors", &self.post_processors.len())
            .finish_non_exhaustive()
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, RequestBuildError> {
    HeaderValue::from_str(value).map_err(|_| RequestBuildError::InvalidHeader {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Replace each `{name}` placeholder, left to right, with the next
/// positional variable, percent-encoded.
fn expand_uri_template(template: &str, vars: &[String]) -> Result<String, RequestBuildError> {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;
    let mut next_var = vars.iter();

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            break;
        };
        expanded.push_str(&rest[..open]);
        let name = &rest[open + 1..close];
        let value = next_var
            .next()
            .ok_or_else(|| RequestBuildError::MissingUriVariable {
                template: template.to_string(),
                variable: name.to_string(),
                supplied: vars.len(),
            })?;
        expanded.push_str(&urlencoding::encode(value));
        rest = &rest[close + 1..];
    }
    expanded.push_str(rest);
    Ok(expanded)
}

struct Target {
    path: String,
    query: Option<String>,
    secure: bool,
}

/// Split a request target into path and query. Absolute `http(s)` URLs are
/// accepted; their scheme decides the default `secure` flag.
fn parse_target(uri: &str) -> Result<Target, RequestBuildError> {
    if uri.starts_with("http://") || uri.starts_with("https://") {
        let url = url::Url::parse(uri).map_err(|e| RequestBuildError::InvalidUri {
            uri: uri.to_string(),
            reason: e.to_string(),
        })?;
        return Ok(Target {
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            secure: url.scheme() == "https",
        });
    }

    let without_fragment = uri.split('#').next().unwrap_or_default();
    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (without_fragment, None),
    };

    if !path.starts_with('/') {
        return Err(RequestBuildError::InvalidUri {
            uri: uri.to_string(),
            reason: "path must start with '/'".into(),
        });
    }

    Ok(Target {
        path: path.to_string(),
        query,
        secure: false,
    })
}

fn validated_prefix(kind: &'static str, prefix: Option<&str>) -> Result<String, RequestBuildError> {
    match prefix {
        None | Some("") => Ok(String::new()),
        Some(p) if p.starts_with('/') && !p.ends_with('/') => Ok(p.to_string()),
        Some(p) => Err(RequestBuildError::InvalidContextPath {
            kind,
            path: p.to_string(),
        }),
    }
}

/// Strip `prefix` from `path` on a segment boundary.
fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    (rest.is_empty() || rest.starts_with('/')).then_some(rest)
}

//! Method + path pattern routing.

use std::fmt;
use std::sync::Arc;

use http::Method;
use indexmap::IndexMap;
use mockmvc_core::application::ports::{HandlerExecutionChain, Interceptor, Router};
use mockmvc_core::domain::{HandlerRef, MockRequest};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Request attribute holding the captured path variables as a JSON object.
pub const PATH_VARIABLES_ATTRIBUTE: &str = "mockmvc.path_variables";

/// Request attribute holding the pattern that matched.
pub const BEST_MATCHING_PATTERN_ATTRIBUTE: &str = "mockmvc.best_matching_pattern";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
    /// `*`: exactly one segment, any value.
    Any,
    /// `**`: the rest of the path, possibly empty. Only valid last.
    Rest,
}

/// A path pattern such as `/hotels/{hotel}/bookings/*`.
///
/// Segments are literals, `{name}` captures, `*` (one segment) or a trailing
/// `**`. Empty segments are ignored, so a trailing slash never matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let last = parts.len().saturating_sub(1);
        let segments = parts
            .iter()
            .enumerate()
            .map(|(i, part)| match *part {
                "**" if i == last => Segment::Rest,
                "*" => Segment::Any,
                p if p.len() > 2 && p.starts_with('{') && p.ends_with('}') => {
                    Segment::Variable(p[1..p.len() - 1].to_string())
                }
                p => Segment::Literal(p.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Captured variables if `path` matches, URL-decoded.
    pub fn matches(&self, path: &str) -> Option<IndexMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut variables = IndexMap::new();

        for (i, segment) in self.segments.iter().enumerate() {
            let part = match (segment, parts.get(i)) {
                (Segment::Rest, _) => return Some(variables),
                (_, None) => return None,
                (_, Some(part)) => *part,
            };
            match segment {
                Segment::Literal(literal) if literal != part => return None,
                Segment::Variable(name) => {
                    let value = urlencoding::decode(part)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| part.to_string());
                    variables.insert(name.clone(), value);
                }
                _ => {}
            }
        }

        (parts.len() == self.segments.len()).then_some(variables)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

struct Route {
    method: Option<Method>,
    pattern: PathPattern,
    handler: HandlerRef,
}

/// Ordered route table. The first route whose method and pattern both match
/// wins; registration order is priority.
#[derive(Default)]
pub struct PathRouter {
    routes: Vec<Route>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl PathRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `method` requests matching `pattern` to `handler`.
    pub fn handle(mut self, method: Method, pattern: &str, handler: HandlerRef) -> Self {
        self.routes.push(Route {
            method: Some(method),
            pattern: PathPattern::parse(pattern),
            handler,
        });
        self
    }

    /// Route requests of any method matching `pattern`.
    pub fn any(mut self, pattern: &str, handler: HandlerRef) -> Self {
        self.routes.push(Route {
            method: None,
            pattern: PathPattern::parse(pattern),
            handler,
        });
        self
    }

    pub fn get(self, pattern: &str, handler: HandlerRef) -> Self {
        self.handle(Method::GET, pattern, handler)
    }

    pub fn post(self, pattern: &str, handler: HandlerRef) -> Self {
        self.handle(Method::POST, pattern, handler)
    }

    pub fn put(self, pattern: &str, handler: HandlerRef) -> Self {
        self.handle(Method::PUT, pattern, handler)
    }

    pub fn delete(self, pattern: &str, handler: HandlerRef) -> Self {
        self.handle(Method::DELETE, pattern, handler)
    }

    /// Interceptor applied to every route of this router, in call order.
    pub fn interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Router for PathRouter {
    #[instrument(skip_all, fields(path))]
    fn route(&self, request: &mut MockRequest) -> Option<HandlerExecutionChain> {
        let path = request.lookup_path();
        tracing::Span::current().record("path", path.as_str());

        let (route, variables) = self.routes.iter().find_map(|route| {
            if route.method.as_ref().is_some_and(|m| m != request.method()) {
                return None;
            }
            route.pattern.matches(&path).map(|vars| (route, vars))
        })?;

        debug!(pattern = %route.pattern, handler = %route.handler.name(), "Route matched");

        let variables: Map<String, Value> = variables
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        request.set_attribute(PATH_VARIABLES_ATTRIBUTE, Value::Object(variables));
        request.set_attribute(BEST_MATCHING_PATTERN_ATTRIBUTE, route.pattern.as_str());

        Some(HandlerExecutionChain::with_interceptors(
            Arc::clone(&route.handler),
            self.interceptors.clone(),
        ))
    }
}

/// Path variables captured by a [`PathRouter`] for this request.
pub fn path_variables(request: &MockRequest) -> IndexMap<String, String> {
    request
        .attribute(PATH_VARIABLES_ATTRIBUTE)
        .and_then(Value::as_object)
        .map(|vars| {
            vars.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

pub fn path_variable<'a>(request: &'a MockRequest, name: &str) -> Option<&'a str> {
    request
        .attribute(PATH_VARIABLES_ATTRIBUTE)
        .and_then(|vars| vars.get(name))
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::FnRequestHandler;
    use mockmvc_core::domain::MockRequestBuilder;

    fn handler(name: &str) -> HandlerRef {
        FnRequestHandler::shared(name, |_, _| Ok(()))
    }

    #[test]
    fn test_pattern_captures_and_decodes_variables() {
        let pattern = PathPattern::parse("/hotels/{hotel}/rooms/{room}");
        let vars = pattern.matches("/hotels/grand%20plaza/rooms/12").unwrap();
        assert_eq!(vars["hotel"], "grand plaza");
        assert_eq!(vars["room"], "12");
        assert!(pattern.matches("/hotels/a/rooms").is_none());
        assert!(pattern.matches("/hotels/a/rooms/1/extra").is_none());
    }

    #[test]
    fn test_pattern_wildcards() {
        assert!(PathPattern::parse("/files/*").matches("/files/a").is_some());
        assert!(PathPattern::parse("/files/*").matches("/files/a/b").is_none());
        assert!(PathPattern::parse("/files/**").matches("/files/a/b").is_some());
        assert!(PathPattern::parse("/files/**").matches("/files").is_some());
    }

    #[test]
    fn test_trailing_slash_ignored() {
        assert!(PathPattern::parse("/hotels").matches("/hotels/").is_some());
        assert!(PathPattern::parse("/").matches("/").is_some());
    }

    #[test]
    fn test_router_matches_method_and_records_variables() {
        let router = PathRouter::new()
            .post("/hotels/{id}", handler("update"))
            .get("/hotels/{id}", handler("show"));

        let mut request = MockRequestBuilder::get("/hotels/7").build_request().unwrap();
        let chain = router.route(&mut request).unwrap();

        assert_eq!(chain.handler().name(), "show");
        assert_eq!(path_variable(&request, "id"), Some("7"));
        assert_eq!(
            request.attribute(BEST_MATCHING_PATTERN_ATTRIBUTE),
            Some(&Value::from("/hotels/{id}"))
        );
    }

    #[test]
    fn test_router_declines_unknown_path_and_method() {
        let router = PathRouter::new().get("/hotels", handler("list"));

        let mut request = MockRequestBuilder::delete("/hotels").build_request().unwrap();
        assert!(router.route(&mut request).is_none());

        let mut request = MockRequestBuilder::get("/motels").build_request().unwrap();
        assert!(router.route(&mut request).is_none());
        assert!(path_variables(&request).is_empty());
    }

    #[test]
    fn test_router_uses_lookup_path_inside_context() {
        let router = PathRouter::new().any("/hotels", handler("list"));
        let mut request = MockRequestBuilder::get("/app/hotels")
            .context_path("/app")
            .build_request()
            .unwrap();
        assert!(router.route(&mut request).is_some());
    }
}

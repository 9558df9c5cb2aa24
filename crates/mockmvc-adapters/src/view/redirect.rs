use mockmvc_core::application::ports::View;
use mockmvc_core::domain::{HandlerError, HandlerResult, MockRequest, MockResponse, Model};
use serde_json::Value;
use tracing::debug;

use crate::error::ViewError;
use crate::routing::path_variable;

/// Redirects to a URL, recorded on the response as its redirected URL.
///
/// `{name}` placeholders in the URL are filled from model attributes, then
/// from path variables. Remaining scalar model attributes are appended as
/// query parameters. If the handler stored flash attributes, the output
/// flash map is targeted at the redirect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectView {
    url: String,
    context_relative: bool,
    expose_model_attributes: bool,
}

impl RedirectView {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            context_relative: true,
            expose_model_attributes: true,
        }
    }

    /// Whether a URL starting with `/` is prefixed with the context path.
    pub fn context_relative(mut self, context_relative: bool) -> Self {
        self.context_relative = context_relative;
        self
    }

    pub fn expose_model_attributes(mut self, expose: bool) -> Self {
        self.expose_model_attributes = expose;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn target_url(&self, model: &Model, request: &MockRequest) -> Result<String, ViewError> {
        let mut used = Vec::new();
        let mut target = String::new();
        if self.context_relative && self.url.starts_with('/') {
            target.push_str(request.context_path());
        }

        let mut rest = self.url.as_str();
        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|c| open + c) else {
                break;
            };
            target.push_str(&rest[..open]);
            let name = &rest[open + 1..close];
            let value = model
                .get(name)
                .and_then(scalar)
                .or_else(|| path_variable(request, name).map(str::to_string))
                .ok_or_else(|| ViewError::MissingRedirectVariable {
                    url: self.url.clone(),
                    variable: name.to_string(),
                })?;
            target.push_str(&urlencoding::encode(&value));
            used.push(name.to_string());
            rest = &rest[close + 1..];
        }
        target.push_str(rest);

        if self.expose_model_attributes {
            let (base, fragment) = match target.split_once('#') {
                Some((base, fragment)) => (base.to_string(), Some(fragment.to_string())),
                None => (target.clone(), None),
            };
            let mut base = base;
            for (name, value) in model {
                if used.contains(name) {
                    continue;
                }
                let Some(value) = scalar(value) else { continue };
                base.push(if base.contains('?') { '&' } else { '?' });
                base.push_str(&urlencoding::encode(name));
                base.push('=');
                base.push_str(&urlencoding::encode(&value));
            }
            target = match fragment {
                Some(fragment) => format!("{base}#{fragment}"),
                None => base,
            };
        }
        Ok(target)
    }
}

impl View for RedirectView {
    fn render(
        &self,
        model: &Model,
        request: &mut MockRequest,
        response: &mut MockResponse,
    ) -> HandlerResult<()> {
        let target = self.target_url(model, request).map_err(HandlerError::new)?;

        if !request.output_flash_map().is_empty() {
            let (path, query) = split_target(&target);
            let flash = request.output_flash_map_mut();
            flash.set_target_request_path(path);
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                let decode = |s: &str| {
                    urlencoding::decode(s)
                        .map(|d| d.into_owned())
                        .unwrap_or_else(|_| s.to_string())
                };
                flash.add_target_request_param(decode(name), decode(value));
            }
        }

        debug!(url = %target, "Redirecting");
        response.send_redirect(target);
        Ok(())
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Path and query of a redirect target, ignoring scheme, host and fragment.
fn split_target(target: &str) -> (&str, &str) {
    let without_fragment = target.split('#').next().unwrap_or(target);
    let local = match without_fragment.find("://") {
        Some(scheme_end) => {
            let after = &without_fragment[scheme_end + 3..];
            after.find('/').map_or("/", |slash| &after[slash..])
        }
        None => without_fragment,
    };
    local.split_once('?').unwrap_or((local, ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use mockmvc_core::domain::MockRequestBuilder;
    use serde_json::json;

    use crate::routing::PATH_VARIABLES_ATTRIBUTE;

    #[test]
    fn test_redirect_is_context_relative_and_exposes_model() {
        let mut model = Model::new();
        model.insert("page".into(), json!(2));
        model.insert("hotel".into(), json!({"nested": true}));
        let mut request = MockRequestBuilder::post("/app/hotels")
            .context_path("/app")
            .build_request()
            .unwrap();
        let mut response = MockResponse::new();

        RedirectView::new("/hotels")
            .render(&model, &mut request, &mut response)
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.redirected_url(), Some("/app/hotels?page=2"));
    }

    #[test]
    fn test_placeholders_from_model_and_path_variables() {
        let mut model = Model::new();
        model.insert("booking".into(), json!("b 1"));
        let mut request = MockRequestBuilder::post("/hotels/7/bookings")
            .build_request()
            .unwrap();
        request.set_attribute(PATH_VARIABLES_ATTRIBUTE, json!({"hotel": "7"}));
        let mut response = MockResponse::new();

        RedirectView::new("/hotels/{hotel}/bookings/{booking}")
            .render(&model, &mut request, &mut response)
            .unwrap();

        assert_eq!(response.redirected_url(), Some("/hotels/7/bookings/b%201"));
    }

    #[test]
    fn test_missing_placeholder_is_an_error() {
        let mut request = MockRequestBuilder::post("/").build_request().unwrap();
        let err = RedirectView::new("/hotels/{hotel}")
            .render(&Model::new(), &mut request, &mut MockResponse::new())
            .unwrap_err();
        assert!(err.is::<ViewError>());
    }

    #[test]
    fn test_flash_map_targeted_at_redirect() {
        let mut request = MockRequestBuilder::post("/hotels").build_request().unwrap();
        request.output_flash_map_mut().put("notice", "saved");
        let mut model = Model::new();
        model.insert("page".into(), json!("3"));

        RedirectView::new("/hotels")
            .render(&model, &mut request, &mut MockResponse::new())
            .unwrap();

        let flash = request.output_flash_map();
        assert_eq!(flash.target_request_path(), Some("/hotels"));
        assert_eq!(flash.target_request_params()["page"], vec!["3".to_string()]);
    }

    #[test]
    fn test_split_target_handles_absolute_urls() {
        assert_eq!(split_target("https://example.com/a?b=1#f"), ("/a", "b=1"));
        assert_eq!(split_target("https://example.com"), ("/", ""));
        assert_eq!(split_target("/x"), ("/x", ""));
    }
}

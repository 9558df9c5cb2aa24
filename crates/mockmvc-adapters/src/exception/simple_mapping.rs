use std::any::type_name;
use std::collections::HashMap;
use std::error::Error as StdError;

use http::StatusCode;
use mockmvc_core::application::ports::ExceptionResolver;
use mockmvc_core::domain::{Handler, HandlerError, MockRequest, MockResponse, ModelAndView};
use tracing::debug;

/// Model attribute the error is exposed under by default.
pub const DEFAULT_EXCEPTION_ATTRIBUTE: &str = "exception";

#[derive(Debug, Clone)]
enum ErrorMatch {
    /// Exact concrete type.
    Type(&'static str),
    /// Substring of the full type name.
    Name(String),
}

impl ErrorMatch {
    fn matches(&self, error: &HandlerError) -> bool {
        match self {
            Self::Type(name) => error.type_name() == *name,
            Self::Name(fragment) => error.type_name().contains(fragment.as_str()),
        }
    }
}

/// Maps error types to error view names.
///
/// Mappings are checked in registration order. Unmapped errors go to the
/// default view if one is set, otherwise they are declined.
#[derive(Debug, Clone)]
pub struct SimpleMappingExceptionResolver {
    mappings: Vec<(ErrorMatch, String)>,
    excluded: Vec<ErrorMatch>,
    default_view: Option<String>,
    status_codes: HashMap<String, StatusCode>,
    default_status: Option<StatusCode>,
    exception_attribute: Option<String>,
}

impl Default for SimpleMappingExceptionResolver {
    fn default() -> Self {
        Self {
            mappings: Vec::new(),
            excluded: Vec::new(),
            default_view: None,
            status_codes: HashMap::new(),
            default_status: None,
            exception_attribute: Some(DEFAULT_EXCEPTION_ATTRIBUTE.to_string()),
        }
    }
}

impl SimpleMappingExceptionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map errors of concrete type `E` to `view`.
    pub fn map_type<E: StdError + 'static>(mut self, view: impl Into<String>) -> Self {
        self.mappings
            .push((ErrorMatch::Type(type_name::<E>()), view.into()));
        self
    }

    /// Map errors whose type name contains `fragment` to `view`.
    pub fn map_name(mut self, fragment: impl Into<String>, view: impl Into<String>) -> Self {
        self.mappings
            .push((ErrorMatch::Name(fragment.into()), view.into()));
        self
    }

    /// Never resolve errors of type `E`, not even to the default view.
    pub fn exclude<E: StdError + 'static>(mut self) -> Self {
        self.excluded.push(ErrorMatch::Type(type_name::<E>()));
        self
    }

    pub fn default_view(mut self, view: impl Into<String>) -> Self {
        self.default_view = Some(view.into());
        self
    }

    /// Response status to apply when `view` is chosen.
    pub fn status_code(mut self, view: impl Into<String>, status: StatusCode) -> Self {
        self.status_codes.insert(view.into(), status);
        self
    }

    /// Response status for views without their own status code.
    pub fn default_status(mut self, status: StatusCode) -> Self {
        self.default_status = Some(status);
        self
    }

    /// Model attribute to expose the error under; `None` to not expose it.
    pub fn exception_attribute(mut self, attribute: Option<&str>) -> Self {
        self.exception_attribute = attribute.map(str::to_string);
        self
    }

    fn view_for(&self, error: &HandlerError) -> Option<&str> {
        if self.excluded.iter().any(|m| m.matches(error)) {
            return None;
        }
        self.mappings
            .iter()
            .find(|(m, _)| m.matches(error))
            .map(|(_, view)| view.as_str())
            .or(self.default_view.as_deref())
    }
}

impl ExceptionResolver for SimpleMappingExceptionResolver {
    fn resolve(
        &self,
        _request: &mut MockRequest,
        response: &mut MockResponse,
        _handler: Option<&dyn Handler>,
        error: &HandlerError,
    ) -> Option<ModelAndView> {
        let view = self.view_for(error)?;
        debug!(error = %error.type_name(), view, "Mapped error to view");

        if let Some(status) = self.status_codes.get(view).copied().or(self.default_status) {
            response.set_status(status);
        }

        let mut mav = ModelAndView::with_view_name(view);
        if let Some(attribute) = &self.exception_attribute {
            mav.add_attribute(attribute.clone(), error.to_string());
        }
        Some(mav)
    }
}

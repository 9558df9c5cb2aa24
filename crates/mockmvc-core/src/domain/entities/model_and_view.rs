//! Model-and-view: what a handler hands to rendering.
//!
//! ## Empty vs. absent
//!
//! `Option<ModelAndView>` carries two distinct meanings the dispatcher
//! relies on:
//!
//! - `None` from a handler: the handler wrote the response itself, skip
//!   rendering.
//! - `Some(empty)` from an exception resolver: the error was handled and
//!   there is nothing to render. The dispatcher normalizes this to `None`.

use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use indexmap::IndexMap;
use serde_json::Value;

use super::handler::HandlerResult;
use super::request::MockRequest;
use super::response::MockResponse;

/// Named model attributes, in insertion order.
pub type Model = IndexMap<String, Value>;

/// A renderable view.
///
/// Views are produced by view resolvers or supplied directly on a
/// [`ModelAndView`]. Rendering writes to the response in place.
pub trait View: Send + Sync + fmt::Debug {
    fn render(
        &self,
        model: &Model,
        request: &mut MockRequest,
        response: &mut MockResponse,
    ) -> HandlerResult<()>;

    /// Content type this view produces, if fixed.
    fn content_type(&self) -> Option<&str> {
        None
    }
}

/// Either a logical view name to resolve later or a view instance.
#[derive(Debug, Clone)]
pub enum ViewRef {
    Name(String),
    Instance(Arc<dyn View>),
}

/// View selector plus model attributes.
#[derive(Debug, Clone, Default)]
pub struct ModelAndView {
    view: Option<ViewRef>,
    model: Model,
    status: Option<StatusCode>,
}

impl ModelAndView {
    /// No view and no model. Returned by exception resolvers to signal
    /// "handled, nothing to render".
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_view_name(name: impl Into<String>) -> Self {
        Self {
            view: Some(ViewRef::Name(name.into())),
            ..Self::default()
        }
    }

    pub fn with_view(view: Arc<dyn View>) -> Self {
        Self {
            view: Some(ViewRef::Instance(view)),
            ..Self::default()
        }
    }

    /// A model without a view; the dispatcher derives the view name.
    pub fn with_model(model: Model) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    /// Builder-style attribute addition.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_attribute(name, value);
        self
    }

    /// Builder-style response status.
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.model.insert(name.into(), value.into());
        self
    }

    /// Add every entry; existing keys keep their position but take the new value.
    pub fn add_all_attributes(&mut self, attributes: impl IntoIterator<Item = (String, Value)>) -> &mut Self {
        self.model.extend(attributes);
        self
    }

    pub fn set_view_name(&mut self, name: impl Into<String>) {
        self.view = Some(ViewRef::Name(name.into()));
    }

    pub fn set_view(&mut self, view: Arc<dyn View>) {
        self.view = Some(ViewRef::Instance(view));
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    pub fn view(&self) -> Option<&ViewRef> {
        self.view.as_ref()
    }

    /// Logical view name, if the view is a name rather than an instance.
    pub fn view_name(&self) -> Option<&str> {
        match &self.view {
            Some(ViewRef::Name(name)) => Some(name),
            _ => None,
        }
    }

    pub fn view_instance(&self) -> Option<&Arc<dyn View>> {
        match &self.view {
            Some(ViewRef::Instance(view)) => Some(view),
            _ => None,
        }
    }

    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn response_status(&self) -> Option<StatusCode> {
        self.status
    }

    /// No view and no model attributes.
    pub fn is_empty(&self) -> bool {
        self.view.is_none() && self.model.is_empty()
    }
}

impl fmt::Display for ModelAndView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.view {
            Some(ViewRef::Name(name)) => write!(f, "view name '{name}'")?,
            Some(ViewRef::Instance(view)) => write!(f, "view {view:?}")?,
            None => f.write_str("no view")?,
        }
        write!(f, "; model keys {:?}", self.model.keys().collect::<Vec<_>>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_means_no_view_and_no_model() {
        assert!(ModelAndView::empty().is_empty());
        assert!(!ModelAndView::with_view_name("x").is_empty());
        assert!(!ModelAndView::empty().attribute("k", 1).is_empty());
    }

    #[test]
    fn model_preserves_insertion_order() {
        let mav = ModelAndView::with_view_name("list")
            .attribute("zeta", 1)
            .attribute("alpha", 2)
            .attribute("mid", 3);
        let keys: Vec<&str> = mav.model().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(mav.view_name(), Some("list"));
        assert!(mav.view_instance().is_none());
    }
}

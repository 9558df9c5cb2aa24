use std::sync::Arc;

use indexmap::IndexMap;
use mockmvc_core::application::ports::{View, ViewResolver};
use mockmvc_core::domain::Locale;
use tracing::debug;

use super::{InternalResourceView, RedirectView};

pub const REDIRECT_URL_PREFIX: &str = "redirect:";
pub const FORWARD_URL_PREFIX: &str = "forward:";

/// Resolves names to URLs: `prefix + name + suffix`.
///
/// `redirect:` names become [`RedirectView`]s and `forward:` names become
/// [`InternalResourceView`]s on the bare URL. Resolves every name, so
/// register it last.
#[derive(Debug, Clone)]
pub struct UrlBasedViewResolver {
    prefix: String,
    suffix: String,
    redirect_context_relative: bool,
}

impl Default for UrlBasedViewResolver {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            redirect_context_relative: true,
        }
    }
}

impl UrlBasedViewResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn redirect_context_relative(mut self, context_relative: bool) -> Self {
        self.redirect_context_relative = context_relative;
        self
    }
}

impl ViewResolver for UrlBasedViewResolver {
    fn resolve_view_name(&self, view_name: &str, _locale: &Locale) -> Option<Arc<dyn View>> {
        let view: Arc<dyn View> = if let Some(url) = view_name.strip_prefix(REDIRECT_URL_PREFIX) {
            Arc::new(RedirectView::new(url).context_relative(self.redirect_context_relative))
        } else if let Some(url) = view_name.strip_prefix(FORWARD_URL_PREFIX) {
            Arc::new(InternalResourceView::new(url))
        } else {
            Arc::new(InternalResourceView::new(format!(
                "{}{}{}",
                self.prefix, view_name, self.suffix
            )))
        };
        debug!(view_name, view = ?view, "Resolved view");
        Some(view)
    }
}

/// Fixed name-to-view table.
#[derive(Debug, Clone, Default)]
pub struct StaticViewResolver {
    views: IndexMap<String, Arc<dyn View>>,
}

impl StaticViewResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(mut self, name: impl Into<String>, view: Arc<dyn View>) -> Self {
        self.views.insert(name.into(), view);
        self
    }
}

impl ViewResolver for StaticViewResolver {
    fn resolve_view_name(&self, view_name: &str, _locale: &Locale) -> Option<Arc<dyn View>> {
        self.views.get(view_name).cloned()
    }
}

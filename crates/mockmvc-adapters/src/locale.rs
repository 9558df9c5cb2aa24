//! Locale resolvers.

use mockmvc_core::application::ports::LocaleResolver;
use mockmvc_core::domain::{Locale, MockRequest};

/// Uses the request's preferred locales (from `Accept-Language`).
///
/// With supported locales configured, the first request locale that is
/// supported wins, falling back to a language-only match, then the default.
#[derive(Debug, Clone, Default)]
pub struct AcceptHeaderLocaleResolver {
    default_locale: Option<Locale>,
    supported: Vec<Locale>,
}

impl AcceptHeaderLocaleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locale used when the request has no `Accept-Language` header.
    pub fn default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = Some(locale);
        self
    }

    pub fn supported_locales(mut self, locales: impl IntoIterator<Item = Locale>) -> Self {
        self.supported = locales.into_iter().collect();
        self
    }

    fn find_supported(&self, request: &MockRequest) -> Option<Locale> {
        let requested = request.locales();
        requested
            .iter()
            .find(|l| self.supported.contains(l))
            .or_else(|| {
                requested.iter().find_map(|l| {
                    self.supported
                        .iter()
                        .find(|s| s.country().is_none() && s.language() == l.language())
                })
            })
            .cloned()
    }
}

impl LocaleResolver for AcceptHeaderLocaleResolver {
    fn resolve_locale(&self, request: &MockRequest) -> Locale {
        if request.header("accept-language").is_none() {
            if let Some(default) = &self.default_locale {
                return default.clone();
            }
        }

        let preferred = request.locale();
        if self.supported.is_empty() || self.supported.contains(&preferred) {
            return preferred;
        }
        self.find_supported(request)
            .or_else(|| self.default_locale.clone())
            .unwrap_or(preferred)
    }
}

/// Always the same locale.
#[derive(Debug, Clone, Default)]
pub struct FixedLocaleResolver {
    locale: Locale,
}

impl FixedLocaleResolver {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

impl LocaleResolver for FixedLocaleResolver {
    fn resolve_locale(&self, _request: &MockRequest) -> Locale {
        self.locale.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockmvc_core::domain::MockRequestBuilder;

    fn request(accept_language: Option<&str>) -> MockRequest {
        let mut builder = MockRequestBuilder::get("/");
        if let Some(value) = accept_language {
            builder = builder.header("Accept-Language", value);
        }
        builder.build_request().unwrap()
    }

    #[test]
    fn test_uses_header_preference() {
        let resolver = AcceptHeaderLocaleResolver::new();
        let locale = resolver.resolve_locale(&request(Some("de-CH;q=0.5, fr-FR")));
        assert_eq!(locale.to_string(), "fr-FR");
    }

    #[test]
    fn test_default_when_no_header() {
        let resolver = AcceptHeaderLocaleResolver::new().default_locale(Locale::new("it", None));
        assert_eq!(resolver.resolve_locale(&request(None)).to_string(), "it");
        assert_eq!(resolver.resolve_locale(&request(Some("es"))).to_string(), "es");
    }

    #[test]
    fn test_supported_locales_narrow_the_choice() {
        let resolver = AcceptHeaderLocaleResolver::new()
            .supported_locales([Locale::new("en", Some("GB")), Locale::new("de", None)])
            .default_locale(Locale::new("en", Some("GB")));

        let locale = resolver.resolve_locale(&request(Some("fr, de-AT;q=0.8")));
        assert_eq!(locale.to_string(), "de");

        let locale = resolver.resolve_locale(&request(Some("ja")));
        assert_eq!(locale.to_string(), "en-GB");
    }

    #[test]
    fn test_fixed_resolver_ignores_request() {
        let resolver = FixedLocaleResolver::new(Locale::new("pt", Some("br")));
        assert_eq!(resolver.resolve_locale(&request(Some("en"))).to_string(), "pt-BR");
    }
}

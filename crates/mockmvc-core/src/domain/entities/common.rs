use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::RequestBuildError;

/// A language tag with an optional country, e.g. `en` or `en-US`.
///
/// Invariant: language is lowercase, country (if any) is uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    pub fn new(language: impl AsRef<str>, country: Option<&str>) -> Self {
        Self {
            language: language.as_ref().to_ascii_lowercase(),
            country: country
                .filter(|c| !c.is_empty())
                .map(str::to_ascii_uppercase),
        }
    }

    pub fn english() -> Self {
        Self::new("en", None)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Parse an `Accept-Language` header value into locales, best first.
    ///
    /// Entries with `q=0` or unparsable tags are dropped. Equal weights keep
    /// header order.
    pub fn parse_accept_language(header: &str) -> Vec<Locale> {
        let mut weighted: Vec<(f32, usize, Locale)> = header
            .split(',')
            .enumerate()
            .filter_map(|(idx, entry)| {
                let mut parts = entry.trim().split(';');
                let tag = parts.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }
                let quality = parts
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                if quality <= 0.0 {
                    return None;
                }
                tag.parse::<Locale>().ok().map(|l| (quality, idx, l))
            })
            .collect();

        weighted.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        weighted.into_iter().map(|(_, _, l)| l).collect()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}-{}", self.language, country),
            None => f.write_str(&self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = RequestBuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(2, ['-', '_']);
        let language = parts.next().unwrap_or_default();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RequestBuildError::InvalidLocale {
                value: s.to_string(),
            });
        }
        Ok(Self::new(language, parts.next()))
    }
}

/// An HTTP cookie.
///
/// Request cookies only carry name and value; response cookies may set the
/// remaining attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    name: String,
    value: String,
    path: Option<String>,
    domain: Option<String>,
    max_age: Option<i64>,
    secure: bool,
    http_only: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: None,
            domain: None,
            max_age: None,
            secure: false,
            http_only: false,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Seconds until expiry; `0` deletes the cookie, negative means session.
    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn value(&self) -> &str {
        &self.value
    }
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
    pub const fn max_age(&self) -> Option<i64> {
        self.max_age
    }
    pub const fn is_secure(&self) -> bool {
        self.secure
    }
    pub const fn is_http_only(&self) -> bool {
        self.http_only
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parses_both_separators() {
        assert_eq!("en-us".parse::<Locale>().unwrap().to_string(), "en-US");
        assert_eq!("fr_CA".parse::<Locale>().unwrap().country(), Some("CA"));
        assert_eq!("de".parse::<Locale>().unwrap().country(), None);
        assert!("".parse::<Locale>().is_err());
        assert!("1x".parse::<Locale>().is_err());
    }

    #[test]
    fn accept_language_orders_by_quality() {
        let locales = Locale::parse_accept_language("da, en-GB;q=0.8, en;q=0.9, fr;q=0");
        let tags: Vec<String> = locales.iter().map(ToString::to_string).collect();
        assert_eq!(tags, vec!["da", "en", "en-GB"]);
    }

    #[test]
    fn cookie_display_includes_attributes() {
        let cookie = Cookie::new("sid", "abc")
            .with_path("/")
            .with_max_age(60)
            .http_only(true);
        assert_eq!(cookie.to_string(), "sid=abc; Path=/; Max-Age=60; HttpOnly");
    }
}

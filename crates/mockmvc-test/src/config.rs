//! Test-suite configuration.
//!
//! [`MockMvcConfig`] controls the defaults [`StandaloneSetup`] wires in.
//!
//! # Resolution order (highest priority first)
//!
//! 1. Explicit builder calls on `StandaloneSetup`
//! 2. Environment variables prefixed `MOCKMVC_` (nested keys use `__`,
//!    e.g. `MOCKMVC_VIEWS__PREFIX`)
//! 3. Config file passed to [`MockMvcConfig::load`]
//! 4. Built-in defaults (always present)
//!
//! [`StandaloneSetup`]: crate::setup::StandaloneSetup

use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File};
use mockmvc_adapters::flash::DEFAULT_FLASH_MAP_TIMEOUT;
use mockmvc_core::domain::Locale;
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "MOCKMVC";

/// Defaults applied by `StandaloneSetup`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockMvcConfig {
    /// Prefix and suffix for URL-based view resolution.
    pub views: ViewConfig,
    /// Locale used when a request has no `Accept-Language`, e.g. `en-GB`.
    pub default_locale: Option<String>,
    /// Character encoding set on every request unless overridden.
    pub character_encoding: Option<String>,
    /// Log filter level; logging is installed only when set.
    pub log_level: Option<String>,
    /// Print every performed result to stdout.
    pub print_results: bool,
    /// Lifetime of saved flash maps, in seconds.
    pub flash_timeout_seconds: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub prefix: String,
    pub suffix: String,
}

impl Default for MockMvcConfig {
    fn default() -> Self {
        Self {
            views: ViewConfig::default(),
            default_locale: None,
            character_encoding: None,
            log_level: None,
            print_results: false,
            flash_timeout_seconds: DEFAULT_FLASH_MAP_TIMEOUT,
        }
    }
}

impl MockMvcConfig {
    /// Load configuration: defaults, then `file` (if given), then
    /// `MOCKMVC_*` environment variables.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with_env(
            file,
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn load_with_env(file: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&Self::default()).context("Failed to serialize default config")?,
        );
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(env)
            .build()
            .context("Failed to read mockmvc configuration")?
            .try_deserialize()
            .context("Invalid mockmvc configuration")
    }

    /// The configured default locale, parsed.
    pub fn locale(&self) -> anyhow::Result<Option<Locale>> {
        self.default_locale
            .as_deref()
            .map(|tag| {
                tag.parse::<Locale>()
                    .with_context(|| format!("Invalid default_locale '{tag}'"))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(map))
    }

    #[test]
    fn defaults_when_nothing_configured() {
        let cfg = MockMvcConfig::load_with_env(None, env(&[])).unwrap();
        assert_eq!(cfg, MockMvcConfig::default());
        assert_eq!(cfg.flash_timeout_seconds, 180);
        assert!(cfg.locale().unwrap().is_none());
    }

    #[test]
    fn file_values_layer_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "print_results = true\ndefault_locale = \"fr-CA\"\n\n[views]\nprefix = \"/WEB-INF/\"\nsuffix = \".jsp\""
        )
        .unwrap();

        let cfg = MockMvcConfig::load_with_env(Some(file.path()), env(&[])).unwrap();
        assert!(cfg.print_results);
        assert_eq!(cfg.views.prefix, "/WEB-INF/");
        assert_eq!(cfg.views.suffix, ".jsp");
        assert_eq!(cfg.locale().unwrap().unwrap().to_string(), "fr-CA");
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[views]\nprefix = \"/from-file/\"").unwrap();

        let cfg = MockMvcConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("MOCKMVC_VIEWS__PREFIX", "/from-env/"),
                ("MOCKMVC_FLASH_TIMEOUT_SECONDS", "30"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.views.prefix, "/from-env/");
        assert_eq!(cfg.flash_timeout_seconds, 30);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = MockMvcConfig::load_with_env(Some(Path::new("/no/such/mockmvc.toml")), env(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn invalid_locale_reported() {
        let cfg = MockMvcConfig {
            default_locale: Some("".into()),
            ..MockMvcConfig::default()
        };
        assert!(cfg.locale().is_err());
    }
}

//! Loader configuration
//!
//! Every field is optional in the TOML form and falls back to the defaults
//! below:
//!
//! ```toml
//! default_locale = "en"
//! tex_compatibility = false
//! additional_delimiters = ["\\ce{"]
//! mathjax_config = """
//! MathJax.Hub.Config({ skipStartupTypeset: true });
//! """
//!
//! [poll]
//! interval_ms = 250
//! max_attempts = 20
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::filter::FilterOptions;
use crate::core::poller::PollConfig;
use crate::data::locales::DEFAULT_LOCALE;
use crate::utils::error::{LoaderError, LoaderResult};

/// Renderer configuration handed over verbatim when none is configured
pub const DEFAULT_MATHJAX_CONFIG: &str = r#"MathJax.Hub.Config({
    config: ["Accessible.js", "Safe.js"],
    errorSettings: { message: ["!"] },
    skipStartupTypeset: true,
    messageStyle: "none"
});"#;

/// Settings for the filter and the renderer bridge
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Locale used when the application locale has no MathJax match and the
    /// locale provider supplies no default of its own
    pub default_locale: String,
    /// Opaque renderer configuration script
    pub mathjax_config: String,
    /// Rewrite legacy TeX filter delimiters to inline math before scanning
    pub tex_compatibility: bool,
    /// Extra strings that mark text as needing the renderer
    pub additional_delimiters: Vec<String>,
    /// Readiness polling schedule
    pub poll: PollConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            mathjax_config: DEFAULT_MATHJAX_CONFIG.to_string(),
            tex_compatibility: false,
            additional_delimiters: Vec::new(),
            poll: PollConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> LoaderResult<Self> {
        let config: LoaderConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> LoaderResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&input)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> LoaderResult<()> {
        if self.default_locale.trim().is_empty() {
            return Err(LoaderError::invalid("default_locale must not be empty"));
        }
        if self.additional_delimiters.iter().any(|d| d.is_empty()) {
            return Err(LoaderError::invalid(
                "additional_delimiters must not contain empty strings",
            ));
        }
        Ok(())
    }

    /// Filter options for text that was not filtered upstream
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            already_filtered: false,
            tex_compatibility: self.tex_compatibility,
            additional_delimiters: self.additional_delimiters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_document_is_default() {
        let config = LoaderConfig::from_toml_str("").unwrap();
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(config.poll.interval, Duration::from_millis(250));
        assert_eq!(config.poll.max_attempts, 20);
    }

    #[test]
    fn test_partial_document() {
        let config = LoaderConfig::from_toml_str(
            r#"
            default_locale = "de"
            additional_delimiters = ["\\ce{"]

            [poll]
            interval_ms = 100
            "#,
        )
        .unwrap();
        assert_eq!(config.default_locale, "de");
        assert_eq!(config.additional_delimiters, vec![r"\ce{".to_string()]);
        assert_eq!(config.poll.interval, Duration::from_millis(100));
        assert_eq!(config.poll.max_attempts, 20);
        assert_eq!(config.mathjax_config, DEFAULT_MATHJAX_CONFIG);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = LoaderConfig::from_toml_str("locale = \"fr\"").unwrap_err();
        assert!(matches!(err, LoaderError::Config(_)));
    }

    #[test]
    fn test_validation() {
        let err = LoaderConfig::from_toml_str("default_locale = \"  \"").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidInput { .. }));

        let err = LoaderConfig::from_toml_str("additional_delimiters = [\"\"]").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidInput { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = LoaderConfig::from_file("/nonexistent/mathjaxloader.toml").unwrap_err();
        assert!(matches!(err, LoaderError::Io(_)));
    }

    #[test]
    fn test_filter_options() {
        let config = LoaderConfig {
            tex_compatibility: true,
            ..Default::default()
        };
        let options = config.filter_options();
        assert!(options.tex_compatibility);
        assert!(!options.already_filtered);
    }
}

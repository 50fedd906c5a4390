//! Language code mapping
//!
//! Resolves an application locale code to the closest locale MathJax has
//! localization data for. Resolution order, first match wins:
//!
//! 1. Explicit override table
//! 2. Exact match in the supported list
//! 3. Base subtag (before the first `-` or `_`) if supported
//! 4. The caller supplied default
//!
//! ```rust
//! use mathjaxloader::language::map_language_code;
//!
//! assert_eq!(map_language_code("zh-tw", "en"), "zh-hant");
//! assert_eq!(map_language_code("fr-ca", "en"), "fr");
//! assert_eq!(map_language_code("xx-yy", "en"), "en");
//! ```

use tracing::trace;

use crate::core::renderer::LocaleProvider;
use crate::data::locales::{LOCALE_OVERRIDES, MATHJAX_LOCALES};

/// Separators between a base language and its region or script subtag
const SUBTAG_SEPARATORS: [char; 2] = ['-', '_'];

/// Check whether MathJax ships localization data for `code`
pub fn is_supported(code: &str) -> bool {
    MATHJAX_LOCALES.contains(code)
}

/// Resolve `app_locale` to a MathJax locale, falling back to `default`
pub fn map_language_code(app_locale: &str, default: &str) -> String {
    if let Some(mapped) = LOCALE_OVERRIDES.get(app_locale) {
        return (*mapped).to_string();
    }

    if is_supported(app_locale) {
        return app_locale.to_string();
    }

    if let Some((base, _)) = app_locale.split_once(SUBTAG_SEPARATORS) {
        if is_supported(base) {
            return base.to_string();
        }
    }

    trace!(app_locale, default, "no MathJax locale match, using default");
    default.to_string()
}

/// Resolve the provider's current locale against its own default
pub fn resolve_locale<P: LocaleProvider + ?Sized>(provider: &P) -> String {
    map_language_code(&provider.current_locale(), &provider.default_locale())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::renderer::StaticLocaleProvider;

    #[test]
    fn test_explicit_overrides() {
        assert_eq!(map_language_code("zh-tw", "en"), "zh-hant");
        assert_eq!(map_language_code("zh-cn", "en"), "zh-hans");
        assert_eq!(map_language_code("zh_tw", "en"), "zh-hant");
        assert_eq!(map_language_code("cz", "en"), "cs");
        assert_eq!(map_language_code("pt_br", "en"), "pt-br");
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(map_language_code("fr", "en"), "fr");
        assert_eq!(map_language_code("pt-br", "en"), "pt-br");
        assert_eq!(map_language_code("zh-hant", "en"), "zh-hant");
    }

    #[test]
    fn test_prefix_fallback() {
        assert_eq!(map_language_code("fr-ca", "en"), "fr");
        assert_eq!(map_language_code("de_ch", "en"), "de");
        assert_eq!(map_language_code("es-mx-x-private", "en"), "es");
    }

    #[test]
    fn test_default_fallback() {
        assert_eq!(map_language_code("xx-yy", "en"), "en");
        assert_eq!(map_language_code("xx", "de"), "de");
        assert_eq!(map_language_code("", "en"), "en");
    }

    #[test]
    fn test_overrides_win_over_prefix() {
        // "zh" alone is unsupported, only the script variants are.
        assert_eq!(map_language_code("zh", "en"), "en");
        assert_eq!(map_language_code("zh-cn", "en"), "zh-hans");
    }

    #[test]
    fn test_resolve_locale_from_provider() {
        let provider = StaticLocaleProvider::new("fr-ca", "en");
        assert_eq!(resolve_locale(&provider), "fr");

        let provider = StaticLocaleProvider::new("tlh", "de");
        assert_eq!(resolve_locale(&provider), "de");
    }
}

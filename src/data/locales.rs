//! Locale tables for the MathJax localization assets
//!
//! Both tables are compile-time constants. Application locale codes are
//! resolved against them by [`crate::core::language`].

use phf::{phf_map, phf_set};

/// Locale codes that MathJax ships localization data for
pub static MATHJAX_LOCALES: phf::Set<&'static str> = phf_set! {
    "ar", "ast", "bcc", "bg", "br", "ca", "cdo", "ce", "cs", "cy",
    "da", "de", "diq", "en", "eo", "es", "fa", "fi", "fr", "gl",
    "he", "ia", "it", "ja", "kn", "ko", "lb", "lki", "lt", "mk",
    "nl", "oc", "pl", "pt", "pt-br", "qqq", "ru", "scn", "sco", "sk",
    "sl", "sv", "th", "tr", "uk", "vi", "zh-hans", "zh-hant",
};

/// Application locale codes whose naive mapping would be wrong
///
/// Checked before anything else.
pub static LOCALE_OVERRIDES: phf::Map<&'static str, &'static str> = phf_map! {
    // Czech was historically packaged as "cz"
    "cz" => "cs",
    "pt_br" => "pt-br",
    // Chinese region codes collapse onto the script variants
    "zh-tw" => "zh-hant",
    "zh_tw" => "zh-hant",
    "zh-hk" => "zh-hant",
    "zh-cn" => "zh-hans",
    "zh_cn" => "zh-hans",
    "zh-sg" => "zh-hans",
};

/// Fallback used when the host application does not supply a default locale
pub const DEFAULT_LOCALE: &str = "en";

//! WASM bindings for mathjaxloader
//!
//! This module provides JavaScript-accessible functions for filtering text,
//! scanning math delimiters and resolving renderer locales.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

/// Filter options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize, Default)]
pub struct WasmFilterOptions {
    /// The text already went through the filter upstream
    #[serde(default)]
    pub already_filtered: bool,
    /// Rewrite legacy TeX filter delimiters first
    #[serde(default)]
    pub tex_compatibility: bool,
    /// Extra strings that mark text as needing the renderer
    #[serde(default)]
    pub additional_delimiters: Vec<String>,
}

/// Filter result with metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct WasmFilterResult {
    /// The filtered text
    pub output: String,
    /// Whether the outer equation span was added
    pub wrapped: bool,
}

/// Summary of a delimiter check
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub regions: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Wrap math regions in marker spans
///
/// # Arguments
/// * `input` - HTML or plain text
///
/// # Returns
/// The text with every math region wrapped
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "scanMath")]
pub fn scan_wasm(input: &str) -> String {
    crate::scan(input).text
}

/// Filter text with default options
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "filterText")]
pub fn filter_text_wasm(input: &str) -> String {
    crate::filter_math(input)
}

/// Filter text with options
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "filterTextWithOptions")]
pub fn filter_text_with_options_wasm(input: &str, options: JsValue) -> JsValue {
    let opts: WasmFilterOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();

    let filter_opts = crate::FilterOptions {
        already_filtered: opts.already_filtered,
        tex_compatibility: opts.tex_compatibility,
        additional_delimiters: opts.additional_delimiters,
    };
    let filtered = crate::filter_text(input, &filter_opts);

    let result = WasmFilterResult {
        output: filtered.text,
        wrapped: filtered.wrapped,
    };
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

/// Resolve an application locale to a MathJax locale
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "mapLanguageCode")]
pub fn map_language_code_wasm(locale: &str, default_locale: &str) -> String {
    crate::map_language_code(locale, default_locale)
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check text for delimiter problems
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkDelimiters")]
pub fn check_delimiters_wasm(input: &str) -> JsValue {
    use crate::diagnostics::DiagnosticLevel;

    let result = crate::diagnostics::check_delimiters(input);

    // Group diagnostics by level
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for d in &result.diagnostics {
        match d.level {
            DiagnosticLevel::Error => errors.push(d.message.clone()),
            DiagnosticLevel::Warning => warnings.push(d.message.clone()),
            DiagnosticLevel::Info => infos.push(d.message.clone()),
        }
    }

    let summary = CheckSummary {
        regions: result.regions,
        errors,
        warnings,
        infos,
        has_errors: result.has_errors(),
    };
    serde_wasm_bindgen::to_value(&summary).unwrap_or(JsValue::NULL)
}

//! # mathjaxloader
//!
//! Prepares text for a MathJax-style renderer and keeps that renderer in step
//! with the host application.
//!
//! ## Features
//!
//! - **Delimiter Scanner**: finds `\( \)`, `\[ \]` and `$$ $$` math and wraps
//!   it in `nolink` marker spans in a single pass
//! - **Text Filter**: tags filtered text with an outer equation span so the
//!   renderer can find it later
//! - **Language Mapping**: resolves application locales to MathJax locales
//! - **Readiness Polling**: bounded wait for a lazily initialized renderer
//! - **Renderer Bridge**: explicit configuration state and injected renderer
//! - **WASM Support**: compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Filtering Text
//!
//! ```rust
//! use mathjaxloader::{filter_math, scan};
//!
//! let scanned = scan(r"\[ \(x\) \]");
//! assert_eq!(scanned.text, r#"<span class="nolink">\[ \(x\) \]</span>"#);
//!
//! let filtered = filter_math("no math here");
//! assert_eq!(filtered, "no math here");
//! ```
//!
//! ### Typesetting
//!
//! ```rust
//! use mathjaxloader::renderer::{NoopRenderer, StaticLocaleProvider};
//! use mathjaxloader::{filter_math, LoaderConfig, MathJaxLoader};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let loader = MathJaxLoader::new(NoopRenderer, LoaderConfig::default());
//! loader.configure(&StaticLocaleProvider::new("pt-br", "en"));
//!
//! let html = format!("<p>{}</p>", filter_math(r"\(a^2 + b^2\)"));
//! let report = loader.typeset(&html).await;
//! assert_eq!(report.typeset, 1);
//! # });
//! ```

/// Core filter modules
pub mod core;

/// Data layer - static tables and constants
pub mod data;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core modules
pub use crate::core::filter;
pub use crate::core::language;
pub use crate::core::loader;
pub use crate::core::markup;
pub use crate::core::poller;
pub use crate::core::renderer;
pub use crate::core::scanner;

pub use crate::core::{
    await_ready, equation_nodes, filter_text, map_language_code, resolve_locale, scan,
    ConfigState, EquationNode, FilterOptions, Filtered, LocaleProvider, MathJaxLoader,
    MathRenderer, PollConfig, Readiness, Scanned, TypesetReport,
};

// Re-export data modules
pub use crate::data::constants;
pub use crate::data::locales;

// Re-export utilities
pub use crate::utils::config::{LoaderConfig, DEFAULT_MATHJAX_CONFIG};
pub use crate::utils::diagnostics;
pub use crate::utils::error::{LoaderError, LoaderResult};

/// Filter text with default options
///
/// # Arguments
/// * `input` - HTML or plain text
///
/// # Returns
/// The text, wrapped in an equation span if it contained math
pub fn filter_math(input: &str) -> String {
    filter_text(input, &FilterOptions::default()).text
}

/// Filter text with options taken from a loader configuration
pub fn filter_with_config(input: &str, config: &LoaderConfig) -> String {
    filter_text(input, &config.filter_options()).text
}

/// Check whether text contains anything the scanner would wrap
pub fn contains_math(input: &str) -> bool {
    filter::has_math_delimiters(input) && scan(input).changed
}

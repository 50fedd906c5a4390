//! Data layer - Static tables and constants
//!
//! This module contains all static data used by the filter and loader:
//! - Marker markup and class names
//! - Readiness polling defaults
//! - MathJax locale tables

pub mod constants;
pub mod locales;

// Re-export commonly used items
pub use constants::{
    EQUATION_CLASS, EQUATION_OPEN, MAX_POLL_ATTEMPTS, NOLINK_CLASS, NOLINK_OPEN, POLL_INTERVAL_MS,
    SPAN_CLOSE,
};
pub use locales::{DEFAULT_LOCALE, LOCALE_OVERRIDES, MATHJAX_LOCALES};

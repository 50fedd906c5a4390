//! Utility modules
//!
//! This module contains utilities and helpers:
//! - Configuration loading
//! - Delimiter diagnostics and reporting
//! - Error types and result types

pub mod config;
pub mod diagnostics;
pub mod error;

// Re-export commonly used items
pub use config::{LoaderConfig, DEFAULT_MATHJAX_CONFIG};
pub use diagnostics::{check_delimiters, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel};
pub use error::{LoaderError, LoaderResult};

//! Core filter modules
//!
//! This module contains the three algorithms and the glue around them:
//! - `scanner`: math delimiter scanner and marker insertion
//! - `language`: application locale to MathJax locale mapping
//! - `poller`: bounded readiness polling
//! - `filter`: text filter entry point
//! - `loader`: renderer bridge with explicit configuration state
//! - `renderer`: external capability traits
//! - `markup`: marker span helpers

pub mod filter;
pub mod language;
pub mod loader;
pub mod markup;
pub mod poller;
pub mod renderer;
pub mod scanner;

// Re-export main types and functions
pub use filter::{filter_text, Filtered, FilterOptions};
pub use language::{map_language_code, resolve_locale};
pub use loader::{ConfigState, MathJaxLoader, TypesetReport};
pub use markup::{equation_nodes, EquationNode};
pub use poller::{await_ready, PollConfig, Readiness};
pub use renderer::{LocaleProvider, MathRenderer};
pub use scanner::{scan, walk, MathKind, MathRegion, ScanEvent, Scanned};

//! Markup and timing constants shared by the filter, scanner and loader
//!
//! - Marker span markup inserted around detected math
//! - Outer equation class used to locate renderable nodes
//! - Readiness polling defaults

// ============================================================================
// Marker Markup
// ============================================================================

/// Class of the span wrapped around each detected math region
///
/// Link-detection filters leave `nolink` content alone.
pub const NOLINK_CLASS: &str = "nolink";

/// Opening tag of the per-region marker span
pub const NOLINK_OPEN: &str = r#"<span class="nolink">"#;

/// Closing tag shared by every marker span
pub const SPAN_CLOSE: &str = "</span>";

/// Class of the span wrapped around a whole filtered text
pub const EQUATION_CLASS: &str = "filter_mathjaxloader_equation";

/// Opening tag of the outer equation span
pub const EQUATION_OPEN: &str = r#"<span class="filter_mathjaxloader_equation">"#;

// ============================================================================
// Readiness Polling
// ============================================================================

/// Delay between two readiness checks, in milliseconds
pub const POLL_INTERVAL_MS: u64 = 250;

/// Number of readiness checks before giving up and proceeding anyway
pub const MAX_POLL_ATTEMPTS: u32 = 20;

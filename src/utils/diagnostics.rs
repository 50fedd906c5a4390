//! Delimiter diagnostics
//!
//! The scanner silently leaves malformed math alone. This module reports
//! what it left alone and why, for authors and for the `check` command:
//!
//! - Unterminated openers (the math will not render)
//! - Closers with nothing to close
//! - Delimiters swallowed by an open display region
//!
//! ## Example
//!
//! ```rust
//! use mathjaxloader::diagnostics::{check_delimiters, DiagnosticLevel};
//!
//! let result = check_delimiters(r"\[ x");
//! assert!(result.has_errors());
//! assert_eq!(result.diagnostics[0].level, DiagnosticLevel::Error);
//! ```

use std::fmt;

use crate::core::scanner::{walk, IgnoreReason, MathKind, ScanEvent};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Warning - the text probably does not mean what it says
    Warning,
    /// Error - math in the text will not be rendered
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level
    pub level: DiagnosticLevel,
    /// Human-readable message
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed, in characters)
    pub column: Option<usize>,
    /// Byte offset of the delimiter
    pub offset: Option<usize>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            offset: None,
            suggestion: None,
        }
    }

    /// Attach the position of byte `offset` in `source`
    pub fn at(mut self, source: &str, offset: usize) -> Self {
        let (line, column) = offset_to_location(source, offset);
        self.line = Some(line);
        self.column = Some(column);
        self.offset = Some(offset);
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)?;

        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        }

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Regions the scanner would wrap
    pub regions: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "{} math region{}",
            self.regions,
            plural(self.regions)
        )];
        if self.errors > 0 {
            parts.push(format!("{} error{}", self.errors, plural(self.errors)));
        }
        if self.warnings > 0 {
            parts.push(format!("{} warning{}", self.warnings, plural(self.warnings)));
        }
        if self.infos > 0 {
            parts.push(format!("{} note{}", self.infos, plural(self.infos)));
        }
        parts.join(", ")
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Report delimiter problems in `input`
pub fn check_delimiters(input: &str) -> CheckResult {
    let mut result = CheckResult::new();

    let end = walk(input, |event| match event {
        ScanEvent::Closed(_) => result.regions += 1,
        ScanEvent::Ignored {
            delimiter,
            start,
            reason,
        } => result.add(ignored_diagnostic(input, delimiter, start, reason)),
        ScanEvent::Opened { .. } | ScanEvent::Skipped { .. } => {}
    });

    if let Some((start, style)) = end.display {
        let kind = MathKind::Display(style);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!(
                    "unterminated display math '{}'; it and everything after it is left unwrapped",
                    kind.opener()
                ),
            )
            .at(input, start)
            .with_suggestion(format!("Add '{}'", kind.closer())),
        );
    }

    if let Some(start) = end.inline_start {
        result.add(
            Diagnostic::new(DiagnosticLevel::Error, r"unterminated inline math '\('")
                .at(input, start)
                .with_suggestion(r"Add '\)'"),
        );
    }

    result
}

fn ignored_diagnostic(
    input: &str,
    delimiter: &str,
    start: usize,
    reason: IgnoreReason,
) -> Diagnostic {
    match reason {
        IgnoreReason::InsideDisplay => Diagnostic::new(
            DiagnosticLevel::Info,
            format!("'{}' inside display math is treated as math content", delimiter),
        )
        .at(input, start),
        IgnoreReason::AlreadyOpen => Diagnostic::new(
            DiagnosticLevel::Warning,
            format!("'{}' while inline math is already open is ignored", delimiter),
        )
        .at(input, start)
        .with_suggestion("Inline math cannot nest"),
        IgnoreReason::NothingOpen => Diagnostic::new(
            DiagnosticLevel::Warning,
            format!("'{}' has no matching opener", delimiter),
        )
        .at(input, start),
    }
}

/// Convert byte offset to 1-indexed line and character column
fn offset_to_location(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",   // Red
                DiagnosticLevel::Warning => "\x1b[33m", // Yellow
                DiagnosticLevel::Info => "\x1b[34m",    // Blue
            };
            output.push_str(color);
            output.push_str(&format!("{}", diag));
            output.push_str("\x1b[0m\n\n");
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    if use_color {
        if result.has_errors() {
            output.push_str("\x1b[31m");
        } else if result.warnings > 0 {
            output.push_str("\x1b[33m");
        } else {
            output.push_str("\x1b[32m");
        }
    }

    output.push_str(&format!("Summary: {}", result.summary()));

    if use_color {
        output.push_str("\x1b[0m");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_input() {
        let result = check_delimiters(r"\(a\) and $$b$$");
        assert!(result.is_empty());
        assert_eq!(result.regions, 2);
        assert_eq!(result.summary(), "2 math regions");
    }

    #[test]
    fn test_unterminated_display() {
        let result = check_delimiters("line one\n  $$ x");
        assert!(result.has_errors());
        let diag = &result.diagnostics[0];
        assert_eq!((diag.line, diag.column), (Some(2), Some(3)));
        assert_eq!(diag.suggestion.as_deref(), Some("Add '$$'"));
    }

    #[test]
    fn test_unterminated_inline() {
        let result = check_delimiters(r"price \(x");
        assert_eq!(result.errors, 1);
        assert_eq!(result.diagnostics[0].offset, Some(6));
    }

    #[test]
    fn test_swallowed_inline_is_info() {
        let result = check_delimiters(r"\[ \(x\) \]");
        assert!(!result.has_errors());
        assert_eq!(result.infos, 2);
        assert_eq!(result.regions, 1);
    }

    #[test]
    fn test_stray_closer_is_warning() {
        let result = check_delimiters(r"oops \) and \]");
        assert_eq!(result.warnings, 2);
    }

    #[test]
    fn test_nested_inline_opener_is_warning() {
        let result = check_delimiters(r"\( a \( b \)");
        assert_eq!(result.warnings, 1);
        assert_eq!(result.regions, 1);
    }

    #[test]
    fn test_column_counts_characters() {
        let result = check_delimiters(r"αβ \(");
        assert_eq!(result.diagnostics[0].column, Some(4));
    }

    #[test]
    fn test_format_without_color() {
        let result = check_delimiters(r"\[ x");
        let output = format_diagnostics(&result, false);
        assert!(output.contains("error: unterminated display math"));
        assert!(output.contains("--> line 1:1"));
        assert!(output.ends_with("Summary: 0 math regions, 1 error"));
    }

    #[test]
    fn test_summary_format() {
        let mut result = CheckResult::new();
        result.add(Diagnostic::new(DiagnosticLevel::Error, "test"));
        result.add(Diagnostic::new(DiagnosticLevel::Warning, "test"));

        let summary = result.summary();
        assert!(summary.contains("1 error"));
        assert!(summary.contains("1 warning"));
    }
}

//! Math delimiter scanner
//!
//! Finds display math (`\[...\]`, `$$...$$`) and inline math (`\(...\)`)
//! in arbitrary text and wraps each outermost region in a
//! `<span class="nolink">` marker so link filters and later passes leave it
//! alone. The scanner is purely textual: it never looks inside the math.
//!
//! ## Rules
//!
//! - Display math swallows everything until its own closer. Inline markers
//!   and nested display openers inside it are ignored.
//! - Inline math only opens or closes while no display region is open.
//! - Unterminated openers are left as they are.
//! - A single `$` is never a delimiter.
//! - Existing marker spans around a single math region are stepped over
//!   while no display region is open, so scanning is idempotent.
//!
//! ## Example
//!
//! ```rust
//! use mathjaxloader::scanner::scan;
//!
//! let result = scan(r"Euler: \(e^{i\pi} + 1 = 0\)");
//! assert!(result.changed);
//! assert_eq!(
//!     result.text,
//!     r#"Euler: <span class="nolink">\(e^{i\pi} + 1 = 0\)</span>"#
//! );
//! ```

use tracing::trace;

use crate::core::markup;
use crate::data::constants::{NOLINK_CLASS, NOLINK_OPEN, SPAN_CLOSE};

/// Delimiter pair used by a display region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStyle {
    /// `\[ ... \]`
    Bracket,
    /// `$$ ... $$`
    Dollar,
}

/// Kind of math region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathKind {
    /// `\( ... \)`
    Inline,
    /// Display math in either style
    Display(DisplayStyle),
}

impl MathKind {
    /// Opening delimiter as written in the source
    pub fn opener(self) -> &'static str {
        match self {
            MathKind::Inline => r"\(",
            MathKind::Display(DisplayStyle::Bracket) => r"\[",
            MathKind::Display(DisplayStyle::Dollar) => "$$",
        }
    }

    /// Closing delimiter as written in the source
    pub fn closer(self) -> &'static str {
        match self {
            MathKind::Inline => r"\)",
            MathKind::Display(DisplayStyle::Bracket) => r"\]",
            MathKind::Display(DisplayStyle::Dollar) => "$$",
        }
    }
}

/// A matched region, as byte offsets into the scanned text
///
/// `end` is exclusive and points just past the closing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathRegion {
    pub start: usize,
    pub end: usize,
    pub kind: MathKind,
}

/// Something the scanner noticed while walking the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    /// A region opened at `start`
    Opened { kind: MathKind, start: usize },
    /// A region found its closer
    Closed(MathRegion),
    /// A two-character delimiter at `start` that changed nothing
    Ignored {
        delimiter: &'static str,
        start: usize,
        reason: IgnoreReason,
    },
    /// An existing marker span stepped over without scanning
    Skipped { start: usize, end: usize },
}

/// Why a delimiter did not change the scan state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Swallowed by an open display region
    InsideDisplay,
    /// Inline opener while inline math is already open
    AlreadyOpen,
    /// Closer with no matching open region
    NothingOpen,
}

/// Open regions at some point of the walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanState {
    /// Start offset and style of the open display region
    pub display: Option<(usize, DisplayStyle)>,
    /// Start offset of the open inline region
    pub inline_start: Option<usize>,
}

impl ScanState {
    /// True when no region is open
    pub fn is_idle(&self) -> bool {
        self.display.is_none() && self.inline_start.is_none()
    }

    /// Apply one (previous, current) character pair.
    ///
    /// `at` is the offset of the previous character. Returns true when the
    /// pair closed a region.
    fn step<F: FnMut(ScanEvent)>(&mut self, prev: u8, cur: u8, at: usize, emit: &mut F) -> bool {
        let end = at + 2;
        match self.display {
            None => match (prev, cur) {
                (b'\\', b'[') => {
                    self.display = Some((at, DisplayStyle::Bracket));
                    emit(ScanEvent::Opened {
                        kind: MathKind::Display(DisplayStyle::Bracket),
                        start: at,
                    });
                }
                (b'\\', b'(') => {
                    if self.inline_start.is_none() {
                        self.inline_start = Some(at);
                        emit(ScanEvent::Opened {
                            kind: MathKind::Inline,
                            start: at,
                        });
                    } else {
                        emit(ScanEvent::Ignored {
                            delimiter: r"\(",
                            start: at,
                            reason: IgnoreReason::AlreadyOpen,
                        });
                    }
                }
                (b'\\', b')') => match self.inline_start.take() {
                    Some(start) => {
                        emit(ScanEvent::Closed(MathRegion {
                            start,
                            end,
                            kind: MathKind::Inline,
                        }));
                        return true;
                    }
                    None => emit(ScanEvent::Ignored {
                        delimiter: r"\)",
                        start: at,
                        reason: IgnoreReason::NothingOpen,
                    }),
                },
                (b'\\', b']') => emit(ScanEvent::Ignored {
                    delimiter: r"\]",
                    start: at,
                    reason: IgnoreReason::NothingOpen,
                }),
                (b'$', b'$') => {
                    self.display = Some((at, DisplayStyle::Dollar));
                    emit(ScanEvent::Opened {
                        kind: MathKind::Display(DisplayStyle::Dollar),
                        start: at,
                    });
                }
                _ => {}
            },
            Some((start, style)) => match (prev, cur, style) {
                (b'\\', b']', DisplayStyle::Bracket) | (b'$', b'$', DisplayStyle::Dollar) => {
                    self.display = None;
                    emit(ScanEvent::Closed(MathRegion {
                        start,
                        end,
                        kind: MathKind::Display(style),
                    }));
                    return true;
                }
                (b'\\', b'(' | b')' | b'[' | b']', _) | (b'$', b'$', _) => {
                    emit(ScanEvent::Ignored {
                        delimiter: delimiter_text(prev, cur),
                        start: at,
                        reason: IgnoreReason::InsideDisplay,
                    })
                }
                _ => {}
            },
        }
        false
    }
}

/// Source text of a two-character delimiter
fn delimiter_text(prev: u8, cur: u8) -> &'static str {
    match (prev, cur) {
        (b'\\', b'(') => r"\(",
        (b'\\', b')') => r"\)",
        (b'\\', b'[') => r"\[",
        (b'\\', b']') => r"\]",
        _ => "$$",
    }
}

/// Result of [`scan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanned {
    /// The text with every matched region wrapped
    pub text: String,
    /// True iff at least one region was wrapped
    pub changed: bool,
    /// Number of regions wrapped
    pub regions: usize,
}

/// Walk `text` once, reporting every state change to `emit`.
///
/// Returns the state left at the end of the text; any region still open
/// there is unterminated.
pub fn walk<F: FnMut(ScanEvent)>(text: &str, mut emit: F) -> ScanState {
    // All delimiters are ASCII, so byte offsets always land on char boundaries.
    let bytes = text.as_bytes();
    let mut state = ScanState::default();
    let mut prev: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let cur = bytes[i];

        if cur == b'<' && state.display.is_none() {
            if let Some(end) = marker_span_end(text, i) {
                emit(ScanEvent::Skipped { start: i, end });
                prev = None;
                i = end;
                continue;
            }
        }

        let closed = match prev {
            Some(p) => state.step(p, cur, i - 1, &mut emit),
            None => false,
        };
        // A closing character never starts the next pair.
        prev = if closed { None } else { Some(cur) };
        i += 1;
    }

    state
}

/// End of the marker span at `pos` if it wraps exactly one math region
///
/// Only spans this scanner would have produced qualify. A `nolink` span
/// written around prose is scanned like any other markup.
fn marker_span_end(text: &str, pos: usize) -> Option<usize> {
    let span = markup::marked_span_at(text, pos, NOLINK_CLASS)?;
    let inner = &text[span.content];
    let mut whole = false;
    walk(inner, |event| {
        if let ScanEvent::Closed(region) = event {
            whole |= region.start == 0 && region.end == inner.len();
        }
    });
    whole.then_some(span.end)
}

/// Wrap every outermost math region of `text` in a marker span
pub fn scan(text: &str) -> Scanned {
    let mut builder = SegmentBuilder::new(text);
    let mut inline_mark = None;
    let mut display_mark = None;

    walk(text, |event| match event {
        ScanEvent::Opened { kind, start } => {
            let mark = builder.mark(start);
            match kind {
                MathKind::Inline => inline_mark = Some(mark),
                MathKind::Display(_) => display_mark = Some(mark),
            }
        }
        ScanEvent::Closed(region) => {
            let mark = match region.kind {
                MathKind::Inline => inline_mark.take(),
                MathKind::Display(_) => display_mark.take(),
            };
            if let Some(mark) = mark {
                builder.wrap(mark, region.end);
            }
        }
        ScanEvent::Ignored { .. } | ScanEvent::Skipped { .. } => {}
    });

    let regions = builder.wrapped;
    if regions == 0 {
        return Scanned {
            text: text.to_string(),
            changed: false,
            regions,
        };
    }

    trace!(regions, "wrapped math regions");
    Scanned {
        text: builder.finish(),
        changed: true,
        regions,
    }
}

/// Piece of output: source text copied as is, or a wrapped group
#[derive(Debug)]
enum Segment<'a> {
    Verbatim(&'a str),
    Wrapped(Vec<Segment<'a>>),
}

/// Accumulates output segments and concatenates them once at the end
struct SegmentBuilder<'a> {
    source: &'a str,
    segments: Vec<Segment<'a>>,
    /// Source offset up to which text has been turned into segments
    flushed: usize,
    wrapped: usize,
}

impl<'a> SegmentBuilder<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            segments: Vec::new(),
            flushed: 0,
            wrapped: 0,
        }
    }

    fn flush_to(&mut self, pos: usize) {
        if pos > self.flushed {
            self.segments
                .push(Segment::Verbatim(&self.source[self.flushed..pos]));
            self.flushed = pos;
        }
    }

    /// Segment index at which a region starting at `pos` begins
    fn mark(&mut self, pos: usize) -> usize {
        self.flush_to(pos);
        self.segments.len()
    }

    /// Group everything from `mark` up to source offset `end` into one wrap
    fn wrap(&mut self, mark: usize, end: usize) {
        self.flush_to(end);
        let inner = self.segments.split_off(mark.min(self.segments.len()));
        self.segments.push(Segment::Wrapped(inner));
        self.wrapped += 1;
    }

    fn finish(mut self) -> String {
        self.flush_to(self.source.len());
        let extra = self.wrapped * (NOLINK_OPEN.len() + SPAN_CLOSE.len());
        let mut out = String::with_capacity(self.source.len() + extra);
        render(&self.segments, &mut out);
        out
    }
}

fn render(segments: &[Segment<'_>], out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Verbatim(text) => out.push_str(text),
            Segment::Wrapped(inner) => {
                out.push_str(NOLINK_OPEN);
                render(inner, out);
                out.push_str(SPAN_CLOSE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wrap(math: &str) -> String {
        format!("{}{}{}", NOLINK_OPEN, math, SPAN_CLOSE)
    }

    #[test]
    fn test_no_delimiters() {
        let result = scan("Plain text with a single $ sign and (parens).");
        assert!(!result.changed);
        assert_eq!(result.text, "Plain text with a single $ sign and (parens).");
    }

    #[test]
    fn test_empty_and_single_char() {
        assert!(!scan("").changed);
        assert!(!scan("\\").changed);
    }

    #[test]
    fn test_inline() {
        let result = scan(r"a \(x^2\) b");
        assert!(result.changed);
        assert_eq!(result.regions, 1);
        assert_eq!(result.text, format!("a {} b", wrap(r"\(x^2\)")));
    }

    #[test]
    fn test_display_bracket() {
        let result = scan(r"\[ \sum_i i \]");
        assert_eq!(result.text, wrap(r"\[ \sum_i i \]"));
    }

    #[test]
    fn test_display_dollar() {
        let result = scan("before $$x+y$$ after");
        assert_eq!(result.text, format!("before {} after", wrap("$$x+y$$")));
    }

    #[test]
    fn test_multiple_regions() {
        let result = scan(r"\(a\) and \(b\) and $$c$$");
        assert_eq!(result.regions, 3);
        assert_eq!(
            result.text,
            format!("{} and {} and {}", wrap(r"\(a\)"), wrap(r"\(b\)"), wrap("$$c$$"))
        );
    }

    #[test]
    fn test_adjacent_dollar_regions() {
        // The closing `$` must not pair with the next opener.
        let result = scan("$$a$$$$b$$");
        assert_eq!(result.text, format!("{}{}", wrap("$$a$$"), wrap("$$b$$")));
    }

    #[test]
    fn test_inline_ignored_inside_display() {
        let result = scan(r"\[ \(x\) \]");
        assert_eq!(result.regions, 1);
        assert_eq!(result.text, wrap(r"\[ \(x\) \]"));
    }

    #[test]
    fn test_display_styles_do_not_cross() {
        let result = scan(r"\[ a $$ b \]");
        assert_eq!(result.text, wrap(r"\[ a $$ b \]"));

        let result = scan(r"$$ a \] b $$");
        assert_eq!(result.text, wrap(r"$$ a \] b $$"));
    }

    #[test]
    fn test_unterminated_left_alone() {
        for input in [r"open \( never closed", r"open \[ never closed", "$$ dangling"] {
            let result = scan(input);
            assert!(!result.changed, "{}", input);
            assert_eq!(result.text, input);
        }
    }

    #[test]
    fn test_unterminated_display_blocks_later_inline() {
        let result = scan(r"\[ open \(x\)");
        assert!(!result.changed);
    }

    #[test]
    fn test_display_inside_open_inline_nests() {
        let result = scan(r"\( a \[b\] c \)");
        assert_eq!(result.regions, 2);
        assert_eq!(result.text, wrap(&format!(r"\( a {} c \)", wrap(r"\[b\]"))));
    }

    #[test]
    fn test_rescan_is_noop() {
        let inputs = [
            r"a \(x\) b $$y$$ c",
            r"\( a \[b\] c \)",
            r"\[ \(x\) \]",
            r"\( a $$b$$ tail",
        ];
        for input in inputs {
            let first = scan(input);
            assert!(first.changed);
            let second = scan(&first.text);
            assert!(!second.changed, "rescanned: {}", first.text);
            assert_eq!(second.text, first.text);
        }
    }

    #[test]
    fn test_new_math_after_existing_marker() {
        let input = format!("{} then \\(b\\)", wrap(r"\(a\)"));
        let result = scan(&input);
        assert_eq!(result.regions, 1);
        assert_eq!(result.text, format!("{} then {}", wrap(r"\(a\)"), wrap(r"\(b\)")));
    }

    #[test]
    fn test_prose_nolink_span_is_scanned() {
        let input = format!("<p>{}</p>", wrap(r"Area \(\pi r^2\)"));
        let result = scan(&input);
        assert_eq!(result.regions, 1);
        assert_eq!(
            result.text,
            format!("<p>{}</p>", wrap(&format!("Area {}", wrap(r"\(\pi r^2\)"))))
        );
        assert!(!scan(&result.text).changed);
    }

    #[test]
    fn test_span_with_two_regions_is_scanned() {
        let input = wrap(r"\(a\) and \(b\)");
        let result = scan(&input);
        assert_eq!(result.regions, 2);
    }

    #[test]
    fn test_marker_skipped_while_inline_open() {
        let input = format!(r"\( a {} tail", wrap("$$b$$"));
        let mut skipped = 0;
        walk(&input, |event| {
            if let ScanEvent::Skipped { .. } = event {
                skipped += 1;
            }
        });
        assert_eq!(skipped, 1);
        assert!(!scan(&input).changed);
    }

    #[test]
    fn test_multibyte_text() {
        let result = scan(r"größe \(α + β\) ü");
        assert_eq!(result.text, format!("größe {} ü", wrap(r"\(α + β\)")));
    }

    #[test]
    fn test_walk_events() {
        let mut events = Vec::new();
        let state = walk(r"\[ \( \] \)", |e| events.push(e));
        assert!(state.is_idle());
        assert_eq!(
            events,
            vec![
                ScanEvent::Opened {
                    kind: MathKind::Display(DisplayStyle::Bracket),
                    start: 0
                },
                ScanEvent::Ignored {
                    delimiter: r"\(",
                    start: 3,
                    reason: IgnoreReason::InsideDisplay,
                },
                ScanEvent::Closed(MathRegion {
                    start: 0,
                    end: 8,
                    kind: MathKind::Display(DisplayStyle::Bracket)
                }),
                ScanEvent::Ignored {
                    delimiter: r"\)",
                    start: 9,
                    reason: IgnoreReason::NothingOpen,
                },
            ]
        );
    }

    #[test]
    fn test_walk_reports_unterminated_state() {
        let state = walk(r"x \( y", |_| {});
        assert_eq!(state.inline_start, Some(2));
        assert!(state.display.is_none());
    }
}

//! Marker markup helpers
//!
//! Just enough HTML awareness to find the spans this crate inserts:
//! balanced `<span>` matching and class-list checks. This is not an HTML
//! parser; markup is only inspected, never rewritten here.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use crate::data::constants::EQUATION_CLASS;

lazy_static! {
    /// Any opening or closing span tag; group 1 is "/" for closing tags
    static ref SPAN_TAG: Regex = Regex::new(r"(?i)<(/?)span\b[^>]*>").unwrap();

    /// An opening span tag anchored at the start of the haystack
    static ref SPAN_OPEN_ANCHORED: Regex = Regex::new(r"(?i)^<span\b[^>]*>").unwrap();

    /// Quoted class attribute inside a tag
    static ref CLASS_ATTR: Regex =
        Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap();
}

/// An outer equation element located inside a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquationNode<'a> {
    /// Byte range of the whole element, tags included
    pub range: Range<usize>,
    /// Byte range of the element content, tags excluded
    pub content: Range<usize>,
    /// The element markup
    pub html: &'a str,
}

impl<'a> EquationNode<'a> {
    /// Markup between the opening and closing tags
    pub fn inner_html(&self) -> &'a str {
        let offset = self.range.start;
        &self.html[self.content.start - offset..self.content.end - offset]
    }
}

/// Check whether an opening tag lists `class` in its class attribute
pub fn has_class(tag: &str, class: &str) -> bool {
    CLASS_ATTR.captures_iter(tag).any(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    })
}

/// Find the end of the span element whose opening tag starts at `open_start`
///
/// Returns the byte offset just past the matching `</span>`, or `None` when
/// no span opens at `open_start` or it is never closed.
pub fn find_element_end(html: &str, open_start: usize) -> Option<usize> {
    let tail = html.get(open_start..)?;
    let mut depth = 0usize;

    for caps in SPAN_TAG.captures_iter(tail) {
        let tag = caps.get(0)?;
        if depth == 0 && tag.start() != 0 {
            return None;
        }
        if caps[1].is_empty() {
            depth += 1;
        } else {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(open_start + tag.end());
            }
        }
    }

    None
}

/// Bounds of a span element found by [`marked_span_at`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedSpan {
    /// Byte range of the element content, tags excluded
    pub content: Range<usize>,
    /// Offset just past the closing tag
    pub end: usize,
}

/// If a span carrying `class` opens at `pos`, return its bounds
pub fn marked_span_at(text: &str, pos: usize, class: &str) -> Option<MarkedSpan> {
    let tail = text.get(pos..)?;
    if !tail.starts_with('<') {
        return None;
    }
    let open = SPAN_OPEN_ANCHORED.find(tail)?;
    if !has_class(open.as_str(), class) {
        return None;
    }
    let end = find_element_end(text, pos)?;
    let close_start = text[..end].rfind('<')?;
    Some(MarkedSpan {
        content: pos + open.end()..close_start,
        end,
    })
}

/// Locate every outermost equation element in `container`
///
/// Elements nested inside another equation element are covered by their
/// ancestor and are not reported separately. Unclosed elements are skipped.
pub fn equation_nodes(container: &str) -> Vec<EquationNode<'_>> {
    let mut nodes = Vec::new();
    let mut resume = 0;

    for caps in SPAN_TAG.captures_iter(container) {
        let Some(tag) = caps.get(0) else {
            continue;
        };
        if tag.start() < resume || !caps[1].is_empty() {
            continue;
        }
        if !has_class(tag.as_str(), EQUATION_CLASS) {
            continue;
        }
        let Some(end) = find_element_end(container, tag.start()) else {
            continue;
        };
        let close_start = container[..end].rfind('<').unwrap_or(end);
        nodes.push(EquationNode {
            range: tag.start()..end,
            content: tag.end()..close_start,
            html: &container[tag.start()..end],
        });
        resume = end;
    }

    nodes
}

//! Text filter entry point
//!
//! Prepares a piece of text for the math renderer: math regions get
//! `nolink` marker spans and, when anything was marked, the whole text is
//! wrapped in a `filter_mathjaxloader_equation` span so the loader can find
//! it again later.
//!
//! ## Example
//!
//! ```rust
//! use mathjaxloader::filter::{filter_text, FilterOptions};
//!
//! let result = filter_text(r"\(x\)", &FilterOptions::default());
//! assert!(result.wrapped);
//! assert_eq!(
//!     result.text,
//!     r#"<span class="filter_mathjaxloader_equation"><span class="nolink">\(x\)</span></span>"#
//! );
//! ```

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::core::scanner::scan;
use crate::data::constants::{EQUATION_CLASS, EQUATION_OPEN, SPAN_CLOSE};

lazy_static! {
    /// `<tex ...>` and `</tex>` tags of the legacy TeX filter
    static ref TEX_TAG: Regex = Regex::new(r"<(/?) *tex( [^>]*)?>").unwrap();

    /// Dollar display math, shortest match
    static ref DOLLAR_DISPLAY: Regex = Regex::new(r"\$\$([\s\S]*?)\$\$").unwrap();
}

/// Per-call filter settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// The text already went through this filter upstream
    pub already_filtered: bool,
    /// Rewrite legacy TeX filter delimiters to inline math first
    pub tex_compatibility: bool,
    /// Extra strings that mark text as needing the renderer
    pub additional_delimiters: Vec<String>,
}

/// Result of [`filter_text`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered {
    pub text: String,
    /// True when the outer equation span was added
    pub wrapped: bool,
}

impl Filtered {
    fn unchanged(text: &str) -> Self {
        Self {
            text: text.to_string(),
            wrapped: false,
        }
    }
}

/// Cheap check for a complete delimiter pair before running the scanner
pub fn has_math_delimiters(text: &str) -> bool {
    let has_inline = text.contains(r"\(") && text.contains(r"\)");
    let has_display = text.contains("$$") || (text.contains(r"\[") && text.contains(r"\]"));
    has_inline || has_display
}

/// Rewrite every legacy TeX filter delimiter as inline math.
///
/// `<tex>`, `[tex]`, `$$` and `\[` pairs all become `\( ... \)`.
pub fn legacy_tex_to_inline(text: &str) -> String {
    let text = TEX_TAG.replace_all(text, "[${1}tex]");
    let text = text.replace("[tex]", r"\(").replace("[/tex]", r"\)");
    let text = DOLLAR_DISPLAY.replace_all(&text, r"\(${1}\)");
    text.replace(r"\[", r"\(").replace(r"\]", r"\)")
}

/// Filter one piece of text.
///
/// Text that was filtered upstream or already carries the equation class is
/// returned unchanged.
pub fn filter_text(text: &str, options: &FilterOptions) -> Filtered {
    if options.already_filtered || text.contains(EQUATION_CLASS) {
        return Filtered::unchanged(text);
    }

    let text: Cow<'_, str> = if options.tex_compatibility {
        Cow::Owned(legacy_tex_to_inline(text))
    } else {
        Cow::Borrowed(text)
    };

    let has_extra = options
        .additional_delimiters
        .iter()
        .any(|d| !d.is_empty() && text.contains(d.as_str()));

    let (body, changed) = if has_math_delimiters(&text) {
        let scanned = scan(&text);
        (Cow::Owned(scanned.text), scanned.changed)
    } else {
        (text, false)
    };

    if !changed && !has_extra {
        return Filtered {
            text: body.into_owned(),
            wrapped: false,
        };
    }

    trace!(changed, has_extra, "wrapping filtered text");
    let mut out = String::with_capacity(EQUATION_OPEN.len() + body.len() + SPAN_CLOSE.len());
    out.push_str(EQUATION_OPEN);
    out.push_str(&body);
    out.push_str(SPAN_CLOSE);
    Filtered {
        text: out,
        wrapped: true,
    }
}

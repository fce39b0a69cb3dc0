use once_cell::sync::Lazy;
use regex::Regex;

// @module: Markup scanning over paragraph text

// @const: Tag-shaped span at the start of a paragraph, e.g. "/JN/ "
pub static UNKNOWN_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/[A-Za-z0-9_\-]{1,8}/ ").unwrap()
});

// @const: Bare character slug filling a whole paragraph
pub static BARE_SLUG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\- #]{1,50}$").unwrap()
});

// @const: Continuation slug suffix, e.g. "JOHN (CONT'D)"
pub static CONTD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(CONT'D\)$").unwrap()
});

// @const: Inline parenthetical stage direction
pub static INLINE_DIRECTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([^\(]*\)").unwrap()
});

/// A delimiter-enclosed span found in paragraph text. Ephemeral scan
/// result, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    /// Byte offset of the opening delimiter
    pub start: usize,
    /// Byte offset one past the closing delimiter
    pub end: usize,
    /// The opening delimiter that matched
    pub open_tag: String,
    /// The closing delimiter that matched
    pub close_tag: String,
    /// Text between the delimiters
    pub enclosed_text: String,
}

/// Determine whether `text` contains an occurrence of `open` followed,
/// strictly after its end, by an occurrence of `close`.
///
/// The `strict` flag is a reserved extension point for stricter
/// validation (e.g. rejecting nested or unbalanced delimiters). It is
/// intentionally unimplemented and currently has no effect.
pub fn has_delimiter_enclosed_text(text: &str, open: &str, close: &str, strict: bool) -> bool {
    if text.is_empty() {
        return false;
    }

    let Some(first) = text.find(open) else {
        return false;
    };

    let after_open = first + open.len();
    if text[after_open..].find(close).is_none() {
        return false;
    }

    if strict {
        // TODO: strict checking (nesting, balance) once a markup dialect needs it
    }

    true
}

/// Locate the first delimiter-enclosed span in `text`.
pub fn find_enclosed(text: &str, open: &str, close: &str) -> Option<MarkupSpan> {
    let start = text.find(open)?;
    let after_open = start + open.len();
    let close_rel = text[after_open..].find(close)?;
    let close_start = after_open + close_rel;

    Some(MarkupSpan {
        start,
        end: close_start + close.len(),
        open_tag: open.to_string(),
        close_tag: close.to_string(),
        enclosed_text: text[after_open..close_start].to_string(),
    })
}

/// Check for an overline stage direction, delimited by `[[` and `]]`.
pub fn has_overline_direction(text: &str) -> bool {
    has_delimiter_enclosed_text(text, "[[", "]]", false)
}

/// Check for an inline parenthetical stage direction.
pub fn has_inline_direction(text: &str) -> bool {
    has_delimiter_enclosed_text(text, "(", ")", false)
}

/// Check for bold markup with the configured delimiters.
pub fn has_bold(text: &str, open: &str, close: &str) -> bool {
    has_delimiter_enclosed_text(text, open, close, true)
}

/// Trim whitespace, then remove exactly one layer of surrounding
/// parentheses if both are present, then trim again.
pub fn strip_parentheses(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.starts_with('(') && trimmed.ends_with(')') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

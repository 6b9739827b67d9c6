//! Label and icon normalization for raw navigation snapshots.
//!
//! Labels scraped from the host carry counters and badges ("Comments (3)",
//! "Plugins - 12+"). `normalize_label` strips the trailing badge and tidies
//! whitespace. `resolve_icon` turns the heterogeneous icon hints a collector
//! may supply into a single [`Icon`].

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::Icon;

// A badge is a counter set off from the label: bracketed as a whole, after a
// separator, or after whitespace. Digits glued to a word ("v2") are text.
static TRAILING_BADGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:",
        r"[\s\x{a0}]*(?:\([\s\x{a0}]*\d+\+?[\s\x{a0}]*\)|\[[\s\x{a0}]*\d+\+?[\s\x{a0}]*\])",
        r"|(?:[\s\x{a0}]+[•·|:\-\x{2013}\x{2014}][\s\x{a0}]*|[•·|:\-\x{2013}\x{2014}][\s\x{a0}]+)\d+\+?",
        r"|(?:^|[\s\x{a0}]+)\d+\+?",
        r")$",
    ))
    .expect("trailing badge pattern")
});

static DATA_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^data:image/").expect("data uri pattern"));

static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^url\(").expect("css url pattern"));

static IMAGE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(svg|png|jpe?g|gif)(\?.*)?$").expect("image file pattern")
});

static SAFE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-:]+$").expect("class token pattern"));

/// Collapse whitespace runs, strip a trailing numeric badge and trim.
///
/// A label made only of a badge normalizes to the empty string; callers
/// drop entries that end up with nothing to show.
pub fn normalize_label(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let stripped = TRAILING_BADGE.replace(&collapsed, "");
    stripped.trim().to_string()
}

pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Icon hints as supplied by a collector. Any subset may be non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconHints {
    /// Class-name token, or a sniffed string (data URI, `url(...)`, file URL).
    pub class: String,
    /// Explicit background reference.
    pub background: String,
    /// Inline vector markup.
    pub svg: String,
}

impl IconHints {
    pub fn new(
        class: impl Into<String>,
        background: impl Into<String>,
        svg: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            background: background.into(),
            svg: svg.into(),
        }
    }
}

/// Resolve icon hints; the first matching rule wins.
///
/// Structured hints (an explicit background) take precedence over strings
/// sniffed out of the class slot, which in turn beat inline markup and
/// font tokens.
pub fn resolve_icon(hints: &IconHints) -> Icon {
    let background = hints.background.trim();
    let svg = hints.svg.trim();
    let class = hints.class.trim();

    if !background.is_empty() {
        return Icon::Background(css_url(background));
    }
    if DATA_URI.is_match(class) {
        return Icon::Background(format!("url({class})"));
    }
    if CSS_URL.is_match(class) {
        return Icon::Background(class.to_string());
    }
    if IMAGE_FILE.is_match(class) {
        return Icon::Image(class.to_string());
    }
    if !svg.is_empty() {
        return Icon::Svg(svg.to_string());
    }
    if class.starts_with("dashicons") && is_safe_class(class) {
        return Icon::Glyph(class.to_string());
    }
    Icon::Generic
}

fn css_url(value: &str) -> String {
    if CSS_URL.is_match(value) {
        value.to_string()
    } else {
        format!("url({value})")
    }
}

/// Class tokens copied from scraped markup must be plain identifiers.
pub fn is_safe_class(token: &str) -> bool {
    token.len() < 128 && SAFE_CLASS.is_match(token)
}

/// Extract the `url(...)` argument of an inline `background-image` style.
pub fn background_from_style(style: &str) -> Option<String> {
    static BACKGROUND_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)background-image:\s*url\(([^)]+)\)").expect("background style pattern")
    });
    BACKGROUND_IMAGE
        .captures(style)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Label ordering used for every section: case-insensitive first, then
/// lowercase before uppercase, then code points.
pub fn label_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }
    let case = a
        .chars()
        .map(|c| !c.is_lowercase())
        .cmp(b.chars().map(|c| !c.is_lowercase()));
    case.then_with(|| a.cmp(b))
}

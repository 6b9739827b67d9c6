//! Inbound data contracts.
//!
//! Three shapes arrive from outside the core:
//! - the pre-built navigation snapshot (`[{id, label, href, iconClass|iconBg|iconSvg, subs}]`),
//!   parsed leniently because collectors emit partially malformed entries;
//! - a structured capture of the host's rendered admin menu, used when no
//!   snapshot exists;
//! - a structured capture of the host toolbar.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One top-level entry of the navigation snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: String,
    pub label: String,
    pub href: String,
    pub icon_class: String,
    pub icon_bg: String,
    pub icon_svg: String,
    pub subs: Vec<SnapshotSub>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotSub {
    pub label: String,
    pub href: String,
}

impl SnapshotEntry {
    /// Lenient conversion: missing or mistyped fields become empty values.
    pub fn from_value(value: &Value) -> Self {
        let subs = value
            .get("subs")
            .and_then(Value::as_array)
            .map(|subs| {
                subs.iter()
                    .filter(|s| s.is_object())
                    .map(|s| SnapshotSub {
                        label: lenient_str(s.get("label")),
                        href: lenient_str(s.get("href")),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            id: lenient_str(value.get("id")),
            label: lenient_str(value.get("label")),
            href: lenient_str(value.get("href")),
            icon_class: lenient_str(value.get("iconClass")),
            icon_bg: lenient_str(value.get("iconBg")),
            icon_svg: lenient_str(value.get("iconSvg")),
            subs,
        }
    }
}

fn lenient_str(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Parse a snapshot payload. Anything other than an array of objects
/// yields an empty snapshot.
pub fn parse_snapshot(value: &Value) -> Vec<SnapshotEntry> {
    value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|e| e.is_object())
                .map(SnapshotEntry::from_value)
                .collect()
        })
        .unwrap_or_default()
}

pub fn load_snapshot(path: &Path) -> Result<Vec<SnapshotEntry>, SourceError> {
    let value: Value = read_json(path)?;
    Ok(parse_snapshot(&value))
}

/// A run of text inside captured markup, with the classes of its element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TextFragment {
    Plain(String),
    Classed {
        text: String,
        #[serde(default)]
        classes: Vec<String>,
    },
}

impl TextFragment {
    pub fn text(&self) -> &str {
        match self {
            TextFragment::Plain(text) => text,
            TextFragment::Classed { text, .. } => text,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        match self {
            TextFragment::Plain(_) => false,
            TextFragment::Classed { classes, .. } => classes.iter().any(|c| c == class),
        }
    }
}

/// Classes whose text is never part of a visible label (counters, badges,
/// screen-reader hints).
const HIDDEN_TEXT_CLASSES: &[&str] = &[
    "screen-reader-text",
    "awaiting-mod",
    "update-plugins",
    "count",
    "plugin-count",
    "wp-ui-notification",
];

/// Concatenated text of `fragments` minus badge and screen-reader text.
pub fn visible_text(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .filter(|f| !HIDDEN_TEXT_CLASSES.iter().any(|c| f.has_class(c)))
        .map(TextFragment::text)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Text of the first screen-reader-only fragment, if any.
pub fn screen_reader_text(fragments: &[TextFragment]) -> Option<String> {
    fragments
        .iter()
        .find(|f| f.has_class("screen-reader-text"))
        .map(|f| f.text().trim().to_string())
}

/// A captured anchor-like element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkupAnchor {
    pub tag: String,
    pub href: Option<String>,
    pub classes: Vec<String>,
    pub role: Option<String>,
    pub text: Vec<TextFragment>,
    pub aria_label: Option<String>,
    pub title: Option<String>,
    /// Classes found on descendants (icon spans and the like).
    pub descendant_classes: Vec<String>,
}

impl Default for MarkupAnchor {
    fn default() -> Self {
        Self {
            tag: "a".to_string(),
            href: None,
            classes: Vec::new(),
            role: None,
            text: Vec::new(),
            aria_label: None,
            title: None,
            descendant_classes: Vec::new(),
        }
    }
}

impl MarkupAnchor {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn href_or_hash(&self) -> String {
        self.href.clone().unwrap_or_else(|| "#".to_string())
    }
}

/// Icon element of an admin-menu entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarkupIcon {
    pub classes: Vec<String>,
    pub style: String,
    pub svg: Option<String>,
}

/// A top-level `li` of the rendered admin menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdminMenuNode {
    pub id: String,
    pub classes: Vec<String>,
    pub anchor: Option<MarkupAnchor>,
    /// The `.wp-menu-name` element, when present.
    pub name: Option<Vec<TextFragment>>,
    pub icon: Option<MarkupIcon>,
    pub subs: Vec<MarkupAnchor>,
}

impl AdminMenuNode {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

pub fn load_admin_menu(path: &Path) -> Result<Vec<AdminMenuNode>, SourceError> {
    read_json(path)
}

/// A direct child `li` of one of the toolbar roots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolbarNode {
    pub id: String,
    /// Anchor-like elements of the node, in document order.
    pub items: Vec<MarkupAnchor>,
    /// Anchors inside the node's submenu.
    pub subs: Vec<MarkupAnchor>,
}

impl ToolbarNode {
    /// First of `a.ab-item`, `.ab-item`, `[role=menuitem]`.
    pub fn anchor(&self) -> Option<&MarkupAnchor> {
        self.items
            .iter()
            .find(|a| a.tag == "a" && a.has_class("ab-item"))
            .or_else(|| self.items.iter().find(|a| a.has_class("ab-item")))
            .or_else(|| {
                self.items
                    .iter()
                    .find(|a| a.role.as_deref() == Some("menuitem"))
            })
    }
}

/// Both toolbar roots in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolbarCapture {
    pub primary: Vec<ToolbarNode>,
    pub secondary: Vec<ToolbarNode>,
}

impl ToolbarCapture {
    pub fn nodes(&self) -> impl Iterator<Item = &ToolbarNode> {
        self.primary.iter().chain(self.secondary.iter())
    }
}

pub fn load_toolbar(path: &Path) -> Result<ToolbarCapture, SourceError> {
    read_json(path)
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SourceError> {
    let raw = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SourceError::Json {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lenient_snapshot_parsing() {
        let value = json!([
            {"id": "menu-posts", "label": "Posts", "href": "edit.php",
             "iconClass": "dashicons-admin-post",
             "subs": [{"label": "All Posts", "href": "edit.php"}, "junk", {"label": 5}]},
            {"id": null, "label": 404, "subs": "not-a-list"},
            "garbage"
        ]);
        let entries = parse_snapshot(&value);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].subs.len(), 2);
        assert_eq!(entries[0].subs[1].label, "5");
        assert_eq!(entries[0].subs[1].href, "");
        assert_eq!(entries[1].id, "");
        assert_eq!(entries[1].label, "404");
        assert!(entries[1].subs.is_empty());
    }

    #[test]
    fn non_array_snapshot_is_empty() {
        assert!(parse_snapshot(&json!({"a": 1})).is_empty());
        assert!(parse_snapshot(&Value::Null).is_empty());
    }

    #[test]
    fn visible_text_skips_badges() {
        let fragments: Vec<TextFragment> = serde_json::from_value(json!([
            "Comments ",
            {"text": "3", "classes": ["awaiting-mod"]},
            {"text": "3 Comments in moderation", "classes": ["screen-reader-text"]}
        ]))
        .unwrap();
        assert_eq!(visible_text(&fragments), "Comments");
        assert_eq!(
            screen_reader_text(&fragments).as_deref(),
            Some("3 Comments in moderation")
        );
    }

    #[test]
    fn toolbar_anchor_preference() {
        let node = ToolbarNode {
            id: "n".into(),
            items: vec![
                MarkupAnchor {
                    tag: "div".into(),
                    role: Some("menuitem".into()),
                    ..MarkupAnchor::default()
                },
                MarkupAnchor {
                    tag: "div".into(),
                    classes: vec!["ab-item".into()],
                    ..MarkupAnchor::default()
                },
                MarkupAnchor {
                    classes: vec!["ab-item".into()],
                    href: Some("/x".into()),
                    ..MarkupAnchor::default()
                },
            ],
            subs: vec![],
        };
        assert_eq!(node.anchor().and_then(|a| a.href.as_deref()), Some("/x"));
    }
}

//! Navigation data model shared by the classifier, the overlay renderer and
//! the engines that operate on the rendered tree.

use std::fmt;

/// Resolved icon of a navigation card.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Icon {
    /// Icon-font class token such as `dashicons-admin-home`.
    Glyph(String),
    /// CSS background reference, always in `url(...)` form.
    Background(String),
    /// Direct raster/vector image file reference.
    Image(String),
    /// Inline vector markup, used verbatim.
    Svg(String),
    #[default]
    Generic,
}

impl Icon {
    /// Build an icon from an icon-font token, falling back to the generic
    /// icon when the token is not a `dashicons-` class.
    pub fn glyph(token: &str) -> Self {
        if token.starts_with("dashicons-") {
            Icon::Glyph(token.to_string())
        } else {
            Icon::Generic
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubItem {
    pub label: String,
    pub href: String,
}

impl SubItem {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// A top-level navigation entry.
///
/// Only constructible when the label is non-empty or at least one sub-item
/// carries a non-empty label; see [`NavigationItem::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationItem {
    id: String,
    label: String,
    href: String,
    icon: Icon,
    subs: Vec<SubItem>,
    meta: Option<String>,
    update_count: Option<u32>,
}

impl NavigationItem {
    /// Returns `None` for entries that have nothing to render.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        href: impl Into<String>,
        icon: Icon,
        subs: Vec<SubItem>,
    ) -> Option<Self> {
        let label = label.into();
        let subs: Vec<SubItem> = subs.into_iter().filter(|s| !s.label.is_empty()).collect();
        if label.is_empty() && subs.is_empty() {
            return None;
        }
        let href = href.into();
        Some(Self {
            id: id.into(),
            label,
            href: if href.is_empty() { "#".to_string() } else { href },
            icon,
            subs,
            meta: None,
            update_count: None,
        })
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn with_update_count(mut self, count: u32) -> Self {
        self.update_count = Some(count);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn icon(&self) -> &Icon {
        &self.icon
    }

    pub fn subs(&self) -> &[SubItem] {
        &self.subs
    }

    pub fn meta(&self) -> Option<&str> {
        self.meta.as_deref()
    }

    /// Secondary line shown under the card label.
    pub fn meta_text(&self) -> String {
        if let Some(meta) = &self.meta {
            return meta.clone();
        }
        if let Some(count) = self.update_count {
            return format!("{count} updates");
        }
        if !self.subs.is_empty() {
            return format!("{} shortcuts", self.subs.len());
        }
        "Open".to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    System,
    Extensions,
    ToolbarExtras,
    Toolbar,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::System => "System",
            SectionKind::Extensions => "Extensions",
            SectionKind::ToolbarExtras => "Toolbar Extras",
            SectionKind::Toolbar => "Toolbar",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub items: Vec<NavigationItem>,
}

impl Section {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// Primary navigation split into its two categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuGroups {
    pub system: Vec<NavigationItem>,
    pub extensions: Vec<NavigationItem>,
}

/// Toolbar entries split into their two categories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolbarGroups {
    pub system: Vec<NavigationItem>,
    pub extras: Vec<NavigationItem>,
    /// Ids of entries moved into the overlay and hidden from the host toolbar.
    pub hidden_ids: Vec<String>,
}

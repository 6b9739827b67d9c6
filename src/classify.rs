//! Snapshot classification.
//!
//! Turns raw inbound entries into [`NavigationItem`]s and splits them into
//! the System/Extensions and Toolbar/Toolbar Extras buckets, then applies
//! the fixed promotions and composes the four overlay sections.

use tracing::{debug, trace};

use crate::config::HelmConfig;
use crate::constants::{
    COMMERCE_BADGE_ID, COMMERCE_FALLBACK_LABEL, COMMERCE_ICON, EDIT_PROFILE_LABEL, TOGGLE_ID,
    UP_TO_DATE_LABEL, UPDATES_AVAILABLE_LABEL, UPDATES_ICON, UPDATES_ID,
};
use crate::model::{
    Icon, MenuGroups, NavigationItem, Section, SectionKind, SubItem, ToolbarGroups,
};
use crate::normalize::{
    IconHints, background_from_style, label_cmp, normalize_label, resolve_icon,
};
use crate::snapshot::{
    AdminMenuNode, MarkupAnchor, SnapshotEntry, ToolbarCapture, screen_reader_text, visible_text,
};

/// Admin paths that mark a scraped menu entry as built-in even when its id
/// is not in the configured core set.
const CORE_ADMIN_PATHS: &[&str] = &[
    "/wp-admin/index.php",
    "/wp-admin/upload.php",
    "/wp-admin/edit.php",
    "/wp-admin/edit.php?post_type=page",
    "/wp-admin/themes.php",
    "/wp-admin/plugins.php",
    "/wp-admin/users.php",
    "/wp-admin/tools.php",
    "/wp-admin/options-general.php",
];

/// Build an item from a snapshot entry, or `None` when nothing is left to
/// render after normalization.
pub fn item_from_snapshot(entry: &SnapshotEntry) -> Option<NavigationItem> {
    let subs = entry
        .subs
        .iter()
        .map(|sub| SubItem::new(normalize_label(&sub.label), href_or_hash(&sub.href)))
        .collect();
    let icon = resolve_icon(&IconHints::new(
        entry.icon_class.as_str(),
        entry.icon_bg.as_str(),
        entry.icon_svg.as_str(),
    ));
    NavigationItem::new(
        entry.id.as_str(),
        normalize_label(&entry.label),
        entry.href.as_str(),
        icon,
        subs,
    )
}

/// Partition a snapshot by core-id membership. Both halves are sorted by
/// label.
pub fn partition_snapshot(entries: &[SnapshotEntry], config: &HelmConfig) -> MenuGroups {
    let mut groups = MenuGroups::default();
    for entry in entries {
        let Some(item) = item_from_snapshot(entry) else {
            trace!(id = %entry.id, "dropping snapshot entry without a label");
            continue;
        };
        if !item.id().is_empty() && config.is_core_id(item.id()) {
            groups.system.push(item);
        } else {
            groups.extensions.push(item);
        }
    }
    sort_items(&mut groups.system);
    sort_items(&mut groups.extensions);
    groups
}

/// Partition a capture of the rendered admin menu.
pub fn partition_markup(nodes: &[AdminMenuNode], config: &HelmConfig) -> MenuGroups {
    let mut groups = MenuGroups::default();
    for node in nodes {
        if node.has_class("wp-menu-separator") || node.id == "collapse-menu" {
            continue;
        }
        let Some(anchor) = node.anchor.as_ref() else {
            continue;
        };
        let label = match &node.name {
            Some(name) => normalize_label(&visible_text(name)),
            None => normalize_label(&visible_text(&anchor.text)),
        };
        let subs = node
            .subs
            .iter()
            .filter(|sub| !sub.has_class("wp-submenu-head"))
            .map(|sub| SubItem::new(normalize_label(&visible_text(&sub.text)), sub.href_or_hash()))
            .collect();
        let icon = node
            .icon
            .as_ref()
            .map(|icon| {
                let class = icon
                    .classes
                    .iter()
                    .find(|c| c.starts_with("dashicons-") && c.as_str() != "dashicons-before")
                    .cloned()
                    .unwrap_or_default();
                let background = background_from_style(&icon.style).unwrap_or_default();
                let svg = icon.svg.clone().unwrap_or_default();
                resolve_icon(&IconHints::new(class, background, svg))
            })
            .unwrap_or_default();
        let Some(item) = NavigationItem::new(
            node.id.as_str(),
            label,
            anchor.href_or_hash(),
            icon,
            subs,
        ) else {
            continue;
        };
        if is_system_markup(node, anchor, config) {
            groups.system.push(item);
        } else {
            groups.extensions.push(item);
        }
    }
    sort_items(&mut groups.system);
    sort_items(&mut groups.extensions);
    groups
}

fn is_system_markup(node: &AdminMenuNode, anchor: &MarkupAnchor, config: &HelmConfig) -> bool {
    if node.id.is_empty() {
        return false;
    }
    if config.is_core_id(&node.id) {
        return true;
    }
    let Some(target) = anchor.href.as_deref().and_then(|h| config.site().resolve(h)) else {
        return false;
    };
    let mut path = target.path().to_string();
    if let Some(query) = target.query() {
        path.push('?');
        path.push_str(query);
    }
    CORE_ADMIN_PATHS.iter().any(|prefix| path.starts_with(prefix))
}

/// Collect toolbar entries into kept (system) and extras.
pub fn collect_toolbar(capture: &ToolbarCapture, config: &HelmConfig) -> ToolbarGroups {
    let mut groups = ToolbarGroups::default();
    for node in capture.nodes() {
        if config.is_toolbar_skipped(&node.id) {
            continue;
        }
        let Some(anchor) = node.anchor() else {
            continue;
        };

        let subs: Vec<SubItem> = node
            .subs
            .iter()
            .map(|sub| {
                let href = sub.href_or_hash();
                let label = if href.contains("profile.php") || href.contains("user-edit.php") {
                    EDIT_PROFILE_LABEL.to_string()
                } else {
                    normalize_label(&visible_text(&sub.text))
                };
                SubItem::new(label, href)
            })
            .collect();

        let label = toolbar_label(anchor, &subs, config.toolbar_label(&node.id));
        let href = match anchor.href.as_deref().filter(|h| !h.is_empty()) {
            Some(href) => href.to_string(),
            None => subs.first().map(|s| s.href.clone()).unwrap_or_default(),
        };
        let icon = config
            .toolbar_icon(&node.id)
            .map(Icon::glyph)
            .or_else(|| {
                anchor
                    .classes
                    .iter()
                    .chain(anchor.descendant_classes.iter())
                    .find(|c| c.starts_with("dashicons-"))
                    .map(|c| Icon::glyph(c))
            })
            .unwrap_or_default();

        let Some(item) = NavigationItem::new(node.id.as_str(), label, href, icon, subs) else {
            continue;
        };
        if config.is_toolbar_kept(&node.id) {
            groups.system.push(item);
        } else {
            groups.hidden_ids.push(node.id.clone());
            groups.extras.push(item);
        }
    }
    sort_items(&mut groups.system);
    sort_items(&mut groups.extras);
    debug!(
        kept = groups.system.len(),
        extras = groups.extras.len(),
        "toolbar collected"
    );
    groups
}

fn toolbar_label(anchor: &MarkupAnchor, subs: &[SubItem], mapped: Option<&str>) -> String {
    if let Some(mapped) = mapped {
        return mapped.to_string();
    }
    let mut label = normalize_label(&visible_text(&anchor.text));
    if label.is_empty() {
        let aria = anchor.aria_label.as_deref().map(str::trim).unwrap_or("");
        let title = anchor.title.as_deref().map(str::trim).unwrap_or("");
        label = normalize_label(if aria.is_empty() { title } else { aria });
    }
    if label.is_empty()
        && let Some(sr) = screen_reader_text(&anchor.text)
    {
        label = normalize_label(&sr);
    }
    if label.is_empty()
        && let Some(first) = subs.first()
    {
        label = first.label.clone();
    }
    label
}

/// Apply the fixed promotions and lay out the overlay sections in display
/// order. Empty sections are omitted.
pub fn compose_sections(
    mut menu: MenuGroups,
    mut toolbar: ToolbarGroups,
    updates_count: u32,
) -> Vec<Section> {
    if let Some(pos) = toolbar.extras.iter().position(|it| it.id() == UPDATES_ID) {
        let updates = toolbar.extras.remove(pos);
        let label = if updates_count > 0 {
            UPDATES_AVAILABLE_LABEL
        } else {
            UP_TO_DATE_LABEL
        };
        if let Some(item) = NavigationItem::new(
            UPDATES_ID,
            label,
            updates.href(),
            Icon::glyph(UPDATES_ICON),
            updates.subs().to_vec(),
        ) {
            menu.system.insert(0, item.with_update_count(updates_count));
        }
    }

    if let Some(pos) = toolbar
        .extras
        .iter()
        .position(|it| it.id() == COMMERCE_BADGE_ID)
    {
        let badge = toolbar.extras.remove(pos);
        let label = if badge.label().is_empty() {
            COMMERCE_FALLBACK_LABEL
        } else {
            badge.label()
        };
        if let Some(item) = NavigationItem::new(
            COMMERCE_BADGE_ID,
            label,
            badge.href(),
            Icon::glyph(COMMERCE_ICON),
            badge.subs().to_vec(),
        ) {
            menu.extensions.insert(0, item);
        }
    }

    toolbar.system.retain(|it| it.id() != TOGGLE_ID);

    [
        (SectionKind::System, menu.system),
        (SectionKind::Extensions, menu.extensions),
        (SectionKind::ToolbarExtras, toolbar.extras),
        (SectionKind::Toolbar, toolbar.system),
    ]
    .into_iter()
    .filter(|(_, items)| !items.is_empty())
    .map(|(kind, items)| Section { kind, items })
    .collect()
}

fn sort_items(items: &mut [NavigationItem]) {
    items.sort_by(|a, b| label_cmp(a.label(), b.label()));
}

fn href_or_hash(href: &str) -> String {
    if href.is_empty() {
        "#".to_string()
    } else {
        href.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotSub, TextFragment, ToolbarNode};

    fn entry(id: &str, label: &str) -> SnapshotEntry {
        SnapshotEntry {
            id: id.into(),
            label: label.into(),
            ..SnapshotEntry::default()
        }
    }

    fn anchor(text: &str, href: &str) -> MarkupAnchor {
        MarkupAnchor {
            href: Some(href.into()),
            classes: vec!["ab-item".into()],
            text: vec![TextFragment::Plain(text.into())],
            ..MarkupAnchor::default()
        }
    }

    fn toolbar_node(id: &str, text: &str) -> ToolbarNode {
        ToolbarNode {
            id: id.into(),
            items: vec![anchor(text, "/x")],
            subs: vec![],
        }
    }

    #[test]
    fn snapshot_partition_sorts_and_strips_badges() {
        let config = HelmConfig::default().with_core_ids(["menu-dashboard", "menu-posts"]);
        let groups = partition_snapshot(
            &[
                entry("x", "Redirection"),
                entry("menu-posts", "Posts"),
                entry("menu-dashboard", "Dashboard (3)"),
                entry("", "analytics"),
                entry("y", "5"),
            ],
            &config,
        );
        let system: Vec<_> = groups.system.iter().map(|i| i.label()).collect();
        let ext: Vec<_> = groups.extensions.iter().map(|i| i.label()).collect();
        assert_eq!(system, vec!["Dashboard", "Posts"]);
        assert_eq!(ext, vec!["analytics", "Redirection"]);
    }

    #[test]
    fn snapshot_item_with_only_subs_survives() {
        let mut e = entry("x", "");
        e.subs = vec![SnapshotSub {
            label: "Reports (2)".into(),
            href: String::new(),
        }];
        let item = item_from_snapshot(&e).unwrap();
        assert_eq!(item.label(), "");
        assert_eq!(item.subs()[0].label, "Reports");
        assert_eq!(item.subs()[0].href, "#");
        assert_eq!(item.href(), "#");
    }

    #[test]
    fn markup_partition_uses_paths() {
        let config = HelmConfig::default()
            .with_site_url("https://example.com/wp-admin/")
            .unwrap()
            .with_core_ids(Vec::<String>::new());
        let nodes: Vec<AdminMenuNode> = serde_json::from_value(serde_json::json!([
            {"id": "menu-posts", "classes": ["menu-top"],
             "anchor": {"href": "edit.php", "text": ["Posts"]},
             "name": ["Posts ", {"text": "4", "classes": ["awaiting-mod"]}],
             "subs": [
                {"href": "edit.php", "text": ["Posts"], "classes": ["wp-submenu-head"]},
                {"href": "post-new.php", "text": ["Add New"]}
             ]},
            {"id": "", "classes": ["wp-menu-separator"]},
            {"id": "collapse-menu", "anchor": {"href": "#", "text": ["Collapse"]}},
            {"id": "toplevel_page_seo", "anchor": {"href": "admin.php?page=seo", "text": ["SEO"]},
             "icon": {"classes": ["wp-menu-image", "dashicons-before", "dashicons-chart-bar"]}},
            {"id": "no-anchor"}
        ]))
        .unwrap();
        let groups = partition_markup(&nodes, &config);
        assert_eq!(groups.system.len(), 1);
        assert_eq!(groups.system[0].label(), "Posts");
        assert_eq!(groups.system[0].subs().len(), 1);
        assert_eq!(groups.system[0].subs()[0].label, "Add New");
        assert_eq!(groups.extensions.len(), 1);
        assert_eq!(
            groups.extensions[0].icon(),
            &Icon::Glyph("dashicons-chart-bar".into())
        );
    }

    #[test]
    fn toolbar_skip_keep_and_extras() {
        let config = HelmConfig::default();
        let capture = ToolbarCapture {
            primary: vec![
                toolbar_node("wp-admin-bar-menu-toggle", "Menu"),
                toolbar_node("wp-admin-bar-site-name", "My Site"),
                toolbar_node("wp-admin-bar-seo", "SEO"),
            ],
            secondary: vec![toolbar_node("wp-admin-bar-my-account", "Howdy")],
        };
        let groups = collect_toolbar(&capture, &config);
        let kept: Vec<_> = groups.system.iter().map(|i| i.label()).collect();
        assert_eq!(kept, vec!["Howdy", "My Site"]);
        assert_eq!(groups.extras.len(), 1);
        assert_eq!(groups.hidden_ids, vec!["wp-admin-bar-seo".to_string()]);
        assert_eq!(
            groups.system[1].icon(),
            &Icon::Glyph("dashicons-admin-home".into())
        );
    }

    #[test]
    fn toolbar_label_fallbacks() {
        let config = HelmConfig::default();
        let mut aria = toolbar_node("a", "");
        aria.items[0].aria_label = Some(" Notifications ".into());
        let mut sr = toolbar_node("b", "");
        sr.items[0].text = vec![TextFragment::Classed {
            text: "Search".into(),
            classes: vec!["screen-reader-text".into()],
        }];
        let mut from_sub = toolbar_node("c", "");
        from_sub.items[0].href = None;
        from_sub.subs = vec![anchor("Account", "/wp-admin/profile.php")];
        let mapped = toolbar_node("wp-admin-bar-comments", "3");
        let capture = ToolbarCapture {
            primary: vec![aria, sr, from_sub, mapped],
            secondary: vec![],
        };
        let groups = collect_toolbar(&capture, &config);
        let mut labels: Vec<_> = groups
            .system
            .iter()
            .chain(groups.extras.iter())
            .map(|i| (i.id().to_string(), i.label().to_string(), i.href().to_string()))
            .collect();
        labels.sort();
        assert_eq!(
            labels,
            vec![
                ("a".into(), "Notifications".into(), "/x".into()),
                ("b".into(), "Search".into(), "/x".into()),
                ("c".into(), "Edit Profile".into(), "/wp-admin/profile.php".into()),
                ("wp-admin-bar-comments".into(), "Comments".into(), "/x".into()),
            ]
        );
    }

    #[test]
    fn descendant_dashicon_is_used() {
        let config = HelmConfig::default();
        let mut node = toolbar_node("wp-admin-bar-custom", "Custom");
        node.items[0].descendant_classes = vec!["ab-icon".into(), "dashicons-star-filled".into()];
        let groups = collect_toolbar(
            &ToolbarCapture {
                primary: vec![node],
                secondary: vec![],
            },
            &config,
        );
        assert_eq!(
            groups.extras[0].icon(),
            &Icon::Glyph("dashicons-star-filled".into())
        );
    }

    #[test]
    fn promotions_and_toggle_exclusion() {
        let config = HelmConfig::default();
        let capture = ToolbarCapture {
            primary: vec![
                toolbar_node(TOGGLE_ID, "Menu"),
                toolbar_node("wp-admin-bar-site-name", "Site"),
                toolbar_node(UPDATES_ID, "Updates 2"),
                toolbar_node(COMMERCE_BADGE_ID, "Store coming soon"),
            ],
            secondary: vec![],
        };
        let toolbar = collect_toolbar(&capture, &config);
        let menu = partition_snapshot(&[entry("menu-dashboard", "Dashboard")], &config);
        let sections = compose_sections(menu, toolbar, 4);
        let kinds: Vec<_> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SectionKind::System, SectionKind::Extensions, SectionKind::Toolbar]
        );
        let updates = &sections[0].items[0];
        assert_eq!(updates.label(), UPDATES_AVAILABLE_LABEL);
        assert_eq!(updates.meta_text(), "4 updates");
        assert_eq!(updates.icon(), &Icon::Glyph(UPDATES_ICON.into()));
        assert_eq!(sections[1].items[0].label(), "Store coming soon");
        assert_eq!(sections[1].items[0].icon(), &Icon::Glyph(COMMERCE_ICON.into()));
        assert!(sections[2].items.iter().all(|i| i.id() != TOGGLE_ID));
    }

    #[test]
    fn zero_updates_reads_up_to_date() {
        let config = HelmConfig::default();
        let toolbar = collect_toolbar(
            &ToolbarCapture {
                primary: vec![toolbar_node(UPDATES_ID, "Updates")],
                secondary: vec![],
            },
            &config,
        );
        let sections = compose_sections(MenuGroups::default(), toolbar, 0);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].items[0].label(), UP_TO_DATE_LABEL);
    }
}

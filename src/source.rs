//! Primary-navigation item sources.
//!
//! The pre-built snapshot is preferred. When it is absent the menu is
//! re-derived from a capture of the host's rendered admin menu, and when
//! neither exists the overlay simply has no System/Extensions entries.

use tracing::info;

use crate::classify::{partition_markup, partition_snapshot};
use crate::config::HelmConfig;
use crate::model::MenuGroups;
use crate::snapshot::{AdminMenuNode, SnapshotEntry};

pub trait ItemSource {
    fn name(&self) -> &'static str;
    fn collect(&self, config: &HelmConfig) -> MenuGroups;
}

#[derive(Debug, Clone)]
pub struct SnapshotSource {
    entries: Vec<SnapshotEntry>,
}

impl SnapshotSource {
    pub fn new(entries: Vec<SnapshotEntry>) -> Self {
        Self { entries }
    }
}

impl ItemSource for SnapshotSource {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn collect(&self, config: &HelmConfig) -> MenuGroups {
        partition_snapshot(&self.entries, config)
    }
}

#[derive(Debug, Clone)]
pub struct MarkupSource {
    nodes: Vec<AdminMenuNode>,
}

impl MarkupSource {
    pub fn new(nodes: Vec<AdminMenuNode>) -> Self {
        Self { nodes }
    }
}

impl ItemSource for MarkupSource {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn collect(&self, config: &HelmConfig) -> MenuGroups {
        partition_markup(&self.nodes, config)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmptySource;

impl ItemSource for EmptySource {
    fn name(&self) -> &'static str {
        "empty"
    }

    fn collect(&self, _config: &HelmConfig) -> MenuGroups {
        MenuGroups::default()
    }
}

/// Pick the source for this session: a non-empty snapshot wins, then a
/// markup capture, then nothing.
pub fn select_source(
    snapshot: &[SnapshotEntry],
    markup: Option<Vec<AdminMenuNode>>,
) -> Box<dyn ItemSource> {
    let source: Box<dyn ItemSource> = if !snapshot.is_empty() {
        Box::new(SnapshotSource::new(snapshot.to_vec()))
    } else if let Some(nodes) = markup {
        Box::new(MarkupSource::new(nodes))
    } else {
        Box::new(EmptySource)
    };
    info!(source = source.name(), "navigation source selected");
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_preferred_over_markup() {
        let entries = vec![SnapshotEntry {
            id: "menu-posts".into(),
            label: "Posts".into(),
            ..SnapshotEntry::default()
        }];
        let source = select_source(&entries, Some(vec![AdminMenuNode::default()]));
        assert_eq!(source.name(), "snapshot");
        let groups = source.collect(&HelmConfig::default());
        assert_eq!(groups.system.len(), 1);
    }

    #[test]
    fn empty_snapshot_falls_back() {
        assert_eq!(select_source(&[], Some(vec![])).name(), "markup");
        let none = select_source(&[], None);
        assert_eq!(none.name(), "empty");
        let groups = none.collect(&HelmConfig::default());
        assert!(groups.system.is_empty() && groups.extensions.is_empty());
    }
}

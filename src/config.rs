//! Injected page configuration, loaded once and frozen.
//!
//! The JSON keys mirror the configuration object the host page receives
//! (`coreIds`, `toolbarKeepIds`, ...). After loading and CLI overrides the
//! value is wrapped in an `Arc` and never mutated again.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::links::SiteOrigin;
use crate::snapshot::{SnapshotEntry, parse_snapshot};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid site url {url:?}: {source}")]
    SiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

const DEFAULT_CORE_IDS: &[&str] = &[
    "menu-dashboard",
    "menu-posts",
    "menu-media",
    "menu-pages",
    "menu-comments",
    "menu-appearance",
    "menu-plugins",
    "menu-users",
    "menu-tools",
    "menu-settings",
];

const DEFAULT_TOOLBAR_KEEP_IDS: &[&str] = &[
    "wp-admin-bar-cch-popout-toggle",
    "wp-admin-bar-site-name",
    "wp-admin-bar-new-content",
    "wp-admin-bar-comments",
    "wp-admin-bar-my-account",
    "wp-admin-bar-view",
];

const DEFAULT_TOOLBAR_SKIP_IDS: &[&str] = &["wp-admin-bar-menu-toggle", "wp-admin-bar-search"];

const DEFAULT_TOOLBAR_ICONS: &[(&str, &str)] = &[
    ("wp-admin-bar-site-name", "dashicons-admin-home"),
    ("wp-admin-bar-new-content", "dashicons-plus"),
    ("wp-admin-bar-comments", "dashicons-admin-comments"),
    ("wp-admin-bar-updates", "dashicons-update"),
    ("wp-admin-bar-customize", "dashicons-admin-customize"),
    ("wp-admin-bar-search", "dashicons-search"),
    ("wp-admin-bar-my-account", "dashicons-admin-users"),
    ("wp-admin-bar-edit", "dashicons-edit"),
];

const DEFAULT_SITE_URL: &str = "http://localhost/";

/// Raw on-disk shape. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawConfig {
    core_ids: Option<Vec<String>>,
    toolbar_keep_ids: Option<Vec<String>>,
    toolbar_skip_ids: Option<Vec<String>>,
    toolbar_icon_map: BTreeMap<String, String>,
    toolbar_label_map: Option<BTreeMap<String, String>>,
    updates_count: Option<Value>,
    menu_snapshot: Value,
    site_url: Option<String>,
}

/// Frozen configuration snapshot passed to every component at startup.
#[derive(Debug, Clone)]
pub struct HelmConfig {
    core_ids: HashSet<String>,
    toolbar_keep_ids: HashSet<String>,
    toolbar_skip_ids: HashSet<String>,
    toolbar_icon_map: BTreeMap<String, String>,
    toolbar_label_map: BTreeMap<String, String>,
    updates_count: u32,
    menu_snapshot: Vec<SnapshotEntry>,
    site: SiteOrigin,
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self::from_raw(RawConfig::default()).unwrap_or_else(|_| unreachable!("default site url"))
    }
}

impl HelmConfig {
    /// Load from a JSON file; `None` yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Self::from_raw(RawConfig::default());
        };
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: RawConfig = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        Self::from_raw(parsed)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let core_ids = raw
            .core_ids
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_else(|| owned_set(DEFAULT_CORE_IDS));
        let toolbar_keep_ids = raw
            .toolbar_keep_ids
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_else(|| owned_set(DEFAULT_TOOLBAR_KEEP_IDS));
        let toolbar_skip_ids = match raw.toolbar_skip_ids {
            Some(ids) if !ids.is_empty() => ids.into_iter().collect(),
            _ => owned_set(DEFAULT_TOOLBAR_SKIP_IDS),
        };
        let mut toolbar_icon_map: BTreeMap<String, String> = DEFAULT_TOOLBAR_ICONS
            .iter()
            .map(|(id, icon)| (id.to_string(), icon.to_string()))
            .collect();
        toolbar_icon_map.extend(raw.toolbar_icon_map);
        let toolbar_label_map = raw.toolbar_label_map.unwrap_or_else(|| {
            BTreeMap::from([("wp-admin-bar-comments".to_string(), "Comments".to_string())])
        });
        let updates_count = raw.updates_count.as_ref().map(lenient_count).unwrap_or(0);
        let menu_snapshot = parse_snapshot(&raw.menu_snapshot);
        let site_url = raw.site_url.unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let site = SiteOrigin::parse(&site_url).map_err(|source| ConfigError::SiteUrl {
            url: site_url.clone(),
            source,
        })?;
        debug!(
            core_ids = core_ids.len(),
            snapshot_entries = menu_snapshot.len(),
            updates_count,
            "configuration loaded"
        );
        Ok(Self {
            core_ids,
            toolbar_keep_ids,
            toolbar_skip_ids,
            toolbar_icon_map,
            toolbar_label_map,
            updates_count,
            menu_snapshot,
            site,
        })
    }

    pub fn with_updates_count(mut self, count: u32) -> Self {
        self.updates_count = count;
        self
    }

    pub fn with_site_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.site = SiteOrigin::parse(url).map_err(|source| ConfigError::SiteUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(self)
    }

    pub fn with_snapshot(mut self, snapshot: Vec<SnapshotEntry>) -> Self {
        self.menu_snapshot = snapshot;
        self
    }

    pub fn with_core_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.core_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_toolbar_keep_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.toolbar_keep_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Freeze the configuration for sharing.
    pub fn freeze(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn is_core_id(&self, id: &str) -> bool {
        self.core_ids.contains(id)
    }

    pub fn is_toolbar_kept(&self, id: &str) -> bool {
        self.toolbar_keep_ids.contains(id)
    }

    pub fn is_toolbar_skipped(&self, id: &str) -> bool {
        self.toolbar_skip_ids.contains(id)
    }

    pub fn toolbar_icon(&self, id: &str) -> Option<&str> {
        self.toolbar_icon_map.get(id).map(String::as_str)
    }

    pub fn toolbar_label(&self, id: &str) -> Option<&str> {
        self.toolbar_label_map.get(id).map(String::as_str)
    }

    pub fn updates_count(&self) -> u32 {
        self.updates_count
    }

    pub fn menu_snapshot(&self) -> &[SnapshotEntry] {
        &self.menu_snapshot
    }

    pub fn site(&self) -> &SiteOrigin {
        &self.site
    }
}

fn owned_set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

fn lenient_count(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .map(|n| n.min(u32::MAX as u64) as u32)
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

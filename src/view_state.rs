//! Persisted layout preference.
//!
//! A tiny JSON-backed store holding the one value that outlives a session:
//! whether the overlay shows compact cards or expanded lists. The file lives
//! in the user's configuration directory (`~/.config/helm-menu/view.json` on
//! most platforms) unless overridden.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants::VIEW_KEY;

/// Environment variable overriding the state file path.
pub const STATE_PATH_ENV: &str = "HELM_MENU_STATE_PATH";

pub const STATE_FILE_NAME: &str = "view.json";

#[derive(Debug, Error)]
pub enum ViewStoreError {
    #[error("view state I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("view state serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Cards,
    Expanded,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Cards => "cards",
            ViewMode::Expanded => "expanded",
        }
    }

    /// Anything other than `"expanded"` reads as cards.
    pub fn from_stored(value: &str) -> Self {
        if value == "expanded" {
            ViewMode::Expanded
        } else {
            ViewMode::Cards
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Cards => ViewMode::Expanded,
            ViewMode::Expanded => ViewMode::Cards,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON-file store for the view preference.
#[derive(Debug)]
pub struct ViewStore {
    path: PathBuf,
    view: ViewMode,
    persist_to_disk: bool,
}

impl ViewStore {
    /// Open the store at `path`, or at the default location when `None`.
    pub fn open(path: Option<PathBuf>) -> Self {
        let Some(path) = path.or_else(default_state_path) else {
            debug!("no configuration directory; view preference will not persist");
            return Self::ephemeral();
        };
        let view = load_view(&path);
        Self {
            path,
            view,
            persist_to_disk: true,
        }
    }

    /// In-memory store used when nothing can be persisted.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            view: ViewMode::default(),
            persist_to_disk: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Record a new view. Write failures are logged and otherwise ignored.
    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
        if !self.persist_to_disk {
            return;
        }
        if let Err(error) = self.save() {
            warn!(
                path = %self.path.display(),
                error = %error,
                "failed to persist view preference"
            );
        }
    }

    fn save(&self) -> Result<(), ViewStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let payload = BTreeMap::from([(VIEW_KEY, self.view.as_str())]);
        fs::write(&self.path, serde_json::to_string_pretty(&payload)?)?;
        Ok(())
    }
}

fn default_state_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(STATE_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    config_dir().map(|dir| dir.join("helm-menu").join(STATE_FILE_NAME))
}

fn load_view(path: &Path) -> ViewMode {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return ViewMode::default(),
        Err(error) => {
            warn!(path = %path.display(), error = %error, "failed to read view state; using defaults");
            return ViewMode::default();
        }
    };
    match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&data) {
        Ok(payload) => payload
            .get(VIEW_KEY)
            .and_then(serde_json::Value::as_str)
            .map(ViewMode::from_stored)
            .unwrap_or_default(),
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "failed to parse view state; using defaults"
            );
            ViewMode::default()
        }
    }
}

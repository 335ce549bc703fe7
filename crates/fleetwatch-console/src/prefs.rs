//! Operator display preferences, persisted across sessions.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Night,
    Day,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Night => "NIGHT",
            Theme::Day => "DAY",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prefs {
    #[serde(default)]
    pub theme: Theme,
}

/// Loads preferences from disk, falling back to defaults when the file is
/// missing or unreadable.
pub async fn load(path: &Path) -> Prefs {
    if !path.exists() {
        return Prefs::default();
    }
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!("Ignoring malformed prefs file {}: {}", path.display(), err);
                Prefs::default()
            }
        },
        Err(err) => {
            tracing::warn!("Failed to read prefs file {}: {}", path.display(), err);
            Prefs::default()
        }
    }
}

pub async fn store(path: &Path, prefs: &Prefs) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let payload = serde_json::to_vec_pretty(prefs)?;
    fs::write(path, payload).await?;
    Ok(())
}

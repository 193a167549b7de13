//! Theme preference store
//!
//! Small file-backed key-value store for UI preferences. A missing or
//! corrupt file falls back to the default theme.


use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{JournalError, Result};

/// Key used until per-user auth exists
const DEFAULT_USER: &str = "default";

/// UI theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => Err(JournalError::Validation(format!(
                "theme must be either 'dark' or 'light', got '{}'",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// File-backed theme store
#[derive(Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Saved preference, or dark when nothing usable is on disk
    pub fn get(&self) -> Theme {
        self.load()
            .get(DEFAULT_USER)
            .and_then(|s| s.parse().ok())
            .unwrap_or(Theme::Dark)
    }

    /// Persist a preference
    pub fn set(&self, theme: Theme) -> Result<()> {
        let mut themes = self.load();
        themes.insert(DEFAULT_USER.to_string(), theme.as_str().to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string(&themes)?)?;
        Ok(())
    }

    fn load(&self) -> HashMap<String, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Corrupt theme file {}: {}", self.path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        }
    }
}

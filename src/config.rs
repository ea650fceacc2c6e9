//! User settings
//!
//! Stored as JSON in the user's config directory. A missing file means
//! defaults; a broken one is an error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ops::{BoxToggle, RotateImage};

/// Blend used when a node is switched to box projection
pub const DEFAULT_PROJECTION_BLEND: f32 = 0.2;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Blend value written when enabling box projection
    pub projection_blend: f32,

    /// Operator idname -> key chord (e.g. "alt+q")
    pub keymap: BTreeMap<String, String>,

    /// Image catalog location, platform data dir when unset
    pub library_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let keymap = [
            (BoxToggle::IDNAME, "alt+q"),
            (RotateImage::IDNAME, "alt+w"),
        ]
        .into_iter()
        .map(|(idname, chord)| (idname.to_string(), chord.to_string()))
        .collect();

        Self {
            projection_blend: DEFAULT_PROJECTION_BLEND,
            keymap,
            library_path: None,
        }
    }
}

impl Settings {
    /// ~/.config/boxproject-tools/settings.json on Linux
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("boxproject-tools");
        path.push("settings.json");
        Some(path)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults if the file is absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_json(&json)?)
    }

    /// Load from the default location, or defaults when there is none
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

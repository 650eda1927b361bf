use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    DEFAULT_BLOCK_SIZE, MIN_REGION_SIZE, SETTINGS_DIR_NAME, SETTINGS_FILE_NAME,
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persisted tool defaults. Command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    #[serde(default = "default_min_region_size")]
    pub min_region_size: u32,
}

fn default_block_size() -> u32 {
    DEFAULT_BLOCK_SIZE
}

fn default_min_region_size() -> u32 {
    MIN_REGION_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            min_region_size: MIN_REGION_SIZE,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Loads from the platform config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing or unreadable files yield defaults; so does a zero block size.
    pub fn load_from(path: &Path) -> Self {
        let settings: Self = fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        if settings.block_size == 0 {
            log::warn!(
                "Ignoring block_size=0 in {}, using {DEFAULT_BLOCK_SIZE}",
                path.display()
            );
            return Self {
                block_size: DEFAULT_BLOCK_SIZE,
                ..settings
            };
        }
        settings
    }

    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::config_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.block_size, 10);
        assert_eq!(s.min_region_size, 10);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let s = Settings::load_from(Path::new("/nonexistent/settings.json"));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let s = Settings {
            block_size: 24,
            min_region_size: 5,
        };
        s.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), s);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"block_size": 32}"#).unwrap();
        let s = Settings::load_from(&path);
        assert_eq!(s.block_size, 32);
        assert_eq!(s.min_region_size, MIN_REGION_SIZE);
    }

    #[test]
    fn test_zero_block_size_replaced_with_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"block_size": 0, "min_region_size": 3}"#).unwrap();
        let s = Settings::load_from(&path);
        assert_eq!(s.block_size, DEFAULT_BLOCK_SIZE);
        assert_eq!(s.min_region_size, 3);
    }
}

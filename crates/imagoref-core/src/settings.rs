//! User settings and theme palettes.

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::snap::DEFAULT_GRID_SIZE;
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Grid size must be positive, got {0}")]
    InvalidGridSize(u32),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Could not determine the config directory")]
    NoConfigDir,
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// UI colour theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Colours derived from a theme.
#[derive(Debug, Clone, Copy)]
pub struct ThemePalette {
    /// Toolbar icon tint.
    pub icon: Color,
    /// Background grid dots.
    pub grid: Color,
}

impl Theme {
    /// Parse a theme identifier. Unknown identifiers fall back to dark.
    pub fn from_id(id: &str) -> Self {
        match id {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            other => {
                log::warn!("Unknown theme '{other}', using dark");
                Theme::Dark
            }
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn palette(self) -> ThemePalette {
        match self {
            Theme::Dark => ThemePalette {
                icon: Color::from_rgba8(0xe0, 0xe0, 0xe0, 0xff),
                grid: Color::from_rgba8(0x1f, 0x1f, 0x1f, 0xff),
            },
            Theme::Light => ThemePalette {
                icon: Color::from_rgba8(0x2a, 0x2a, 0x2a, 0xff),
                grid: Color::from_rgba8(0xcc, 0xcc, 0xcc, 0xff),
            },
        }
    }
}

/// Persistent user settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grid spacing in scene units.
    pub grid_size: u32,
    /// Theme identifier, see [`Theme::from_id`].
    pub theme: String,
    /// Maximum undo entries, 0 for unlimited.
    pub history_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            theme: Theme::Dark.id().to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> SettingsResult<()> {
        if self.grid_size == 0 {
            return Err(SettingsError::InvalidGridSize(self.grid_size));
        }
        Ok(())
    }

    pub fn set_grid_size(&mut self, grid_size: u32) -> SettingsResult<()> {
        if grid_size == 0 {
            return Err(SettingsError::InvalidGridSize(grid_size));
        }
        self.grid_size = grid_size;
        Ok(())
    }

    pub fn theme(&self) -> Theme {
        Theme::from_id(&self.theme)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme.id().to_string();
    }

    /// Default settings file: `<config dir>/imagoref/settings.json`.
    pub fn default_path() -> SettingsResult<PathBuf> {
        let base = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(base.join("imagoref").join("settings.json"))
    }

    /// Load and validate settings from a JSON file.
    pub fn load_from(path: &Path) -> SettingsResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let settings: Settings = serde_json::from_str(&json)
            .map_err(|e| SettingsError::Serialization(format!("Failed to parse {}: {}", path.display(), e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings as JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SettingsError::Io(format!("Failed to create {}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| SettingsError::Serialization(e.to_string()))?;
        fs::write(path, json).map_err(|e| SettingsError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Load from `path`, or defaults if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(path)
    }
}

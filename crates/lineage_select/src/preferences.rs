//! Selection preferences.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Explicit path passed by the caller
//! 2. Environment variable: `LINEAGE_CONFIG=/path/to/preferences.toml`
//! 3. Config file: `<config_dir>/lineage/preferences.toml`
//! 4. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! [hud]
//! fade_time = 1.0
//! ui_scale = 1.0
//!
//! [up]
//! recursive = true
//!
//! [down]
//! recursive = false
//! include_modifier_targets = true
//! ```

use std::path::{Path, PathBuf};

use lineage_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::walker::{Direction, WalkPolicy};

/// Environment variable naming a preferences file.
pub const CONFIG_ENV: &str = "LINEAGE_CONFIG";

/// HUD label settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HudPreferences {
    /// Seconds a label takes to fade out
    pub fade_time: f32,
    pub ui_scale: f32,
}

impl Default for HudPreferences {
    fn default() -> Self {
        Self {
            fade_time: 1.0,
            ui_scale: 1.0,
        }
    }
}

/// Default flags for stepping up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpPreferences {
    pub recursive: bool,
    pub include_selection: bool,
    pub unhide: bool,
}

impl Default for UpPreferences {
    fn default() -> Self {
        let policy = WalkPolicy::up();
        Self {
            recursive: policy.recursive,
            include_selection: policy.include_selection,
            unhide: policy.unhide,
        }
    }
}

/// Default flags for stepping down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownPreferences {
    pub recursive: bool,
    pub include_selection: bool,
    pub include_modifier_targets: bool,
    pub unhide: bool,
}

impl Default for DownPreferences {
    fn default() -> Self {
        let policy = WalkPolicy::down();
        Self {
            recursive: policy.recursive,
            include_selection: policy.include_selection,
            include_modifier_targets: policy.include_modifier_targets,
            unhide: policy.unhide,
        }
    }
}

/// All selection preferences.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectPreferences {
    pub hud: HudPreferences,
    pub up: UpPreferences,
    pub down: DownPreferences,
}

impl SelectPreferences {
    /// Default walk flags for `direction`.
    pub fn policy(&self, direction: Direction) -> WalkPolicy {
        match direction {
            Direction::Up => WalkPolicy::up()
                .recursive(self.up.recursive)
                .include_selection(self.up.include_selection)
                .unhide(self.up.unhide),
            Direction::Down => WalkPolicy::down()
                .recursive(self.down.recursive)
                .include_selection(self.down.include_selection)
                .include_modifier_targets(self.down.include_modifier_targets)
                .unhide(self.down.unhide),
        }
    }

    /// Parse preferences from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let prefs: Self = toml::from_str(source).map_err(|e| Error::Config(e.to_string()))?;
        prefs.validate()?;
        Ok(prefs)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.hud.fade_time.is_nan() || self.hud.fade_time < 0.0 {
            return Err(Error::Config(format!(
                "hud.fade_time must be non-negative, got {}",
                self.hud.fade_time
            )));
        }
        if self.hud.ui_scale.is_nan() || self.hud.ui_scale <= 0.0 {
            return Err(Error::Config(format!(
                "hud.ui_scale must be positive, got {}",
                self.hud.ui_scale
            )));
        }
        Ok(())
    }

    /// Load preferences from a file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let prefs = Self::from_toml_str(&content)?;
        log::info!("Loaded preferences from {:?}", path);
        Ok(prefs)
    }

    /// Save preferences to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        log::info!("Saved preferences to {:?}", path);
        Ok(())
    }

    /// Resolve and load preferences from the configured sources.
    ///
    /// An explicit path or `LINEAGE_CONFIG` must point at a readable file.
    /// The default location is optional and falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Self::load_from(Path::new(&path));
            }
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                log::debug!("No preferences file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Get the default preferences path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("lineage");
            p.push("preferences.toml");
            p
        })
    }
}

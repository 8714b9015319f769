//! User configuration.
//!
//! Stored in `<config_dir>/tartan/config.yaml`, e.g.
//!
//! ```yaml
//! design_dir: ~/tartans
//! thread_size: 8
//! duplicate: false
//! guide_colour: "#00ff00"
//! ```
//!
//! Every field is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tartan::{Colour, Design, LoomContext};

const APP_DIR: &str = "tartan";
const CONFIG_FILE: &str = "config.yaml";

/// Settings for new designs and the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where designs are saved (defaults to `<data_dir>/tartan/designs`)
    pub design_dir: Option<PathBuf>,
    pub thread_size: f64,
    pub border_thickness: f64,
    pub thread_count: usize,
    pub duplicate: bool,
    pub show_guide: bool,
    pub guide_colour: Colour,
    /// Clicks on the cloth edit the thread on top
    pub paint_interior: bool,
}

impl Default for Config {
    fn default() -> Self {
        let design = Design::default();
        Self {
            design_dir: None,
            thread_size: design.thread_size,
            border_thickness: design.border_thickness,
            thread_count: design.thread_count,
            duplicate: design.duplicate,
            show_guide: design.show_guide,
            guide_colour: design.guide_colour,
            paint_interior: false,
        }
    }
}

/// `<config_dir>/tartan`
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Directory for rolling editor logs.
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

impl Config {
    /// Load from an explicit path. Missing or malformed files are errors.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the default config file, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{:#}", e);
                Self::default()
            }
        }
    }

    /// The explicit file if given, otherwise the default location.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Ok(Self::load()),
        }
    }

    /// Base directory for the design store.
    pub fn design_dir(&self) -> PathBuf {
        if let Some(dir) = &self.design_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join("designs"))
            .unwrap_or_else(|| PathBuf::from("designs"))
    }

    /// Editor context with the configured preferences.
    pub fn loom_context(&self) -> LoomContext {
        LoomContext {
            thread_size: self.thread_size,
            border_thickness: self.border_thickness,
            thread_count: self.thread_count,
            duplicate: self.duplicate,
            show_guide: self.show_guide,
            guide_colour: self.guide_colour,
            paint_interior: self.paint_interior,
            ..LoomContext::default()
        }
    }

    /// A blank design using the configured preferences.
    pub fn new_design(&self) -> Design {
        Design {
            thread_size: self.thread_size,
            border_thickness: self.border_thickness,
            thread_count: self.thread_count,
            duplicate: self.duplicate,
            show_guide: self.show_guide,
            guide_colour: self.guide_colour,
            ..Design::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("thread_size: 10\nduplicate: false\n").unwrap();
        assert_eq!(config.thread_size, 10.0);
        assert!(!config.duplicate);
        assert_eq!(config.thread_count, 1);
        assert_eq!(config.guide_colour, Colour::RED);
    }

    #[test]
    fn guide_colour_is_hex() {
        let config: Config = serde_yaml::from_str("guide_colour: \"#00ff00\"\n").unwrap();
        assert_eq!(config.guide_colour, Colour::rgb(0, 0xff, 0));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::resolve(Some(&dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn explicit_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "thread_size: [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn new_design_is_valid() {
        let config = Config {
            thread_size: 12.0,
            ..Config::default()
        };
        let design = config.new_design();
        design.validate().unwrap();
        assert_eq!(design.thread_size, 12.0);
    }
}

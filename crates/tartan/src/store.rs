//! On-disk design library.
//!
//! Each design lives in its own directory under the store's base:
//!
//! ```text
//! <base>/
//!   black-watch/
//!     settings.json
//!     tartan.png
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::design::Design;
use crate::error::{Result, TartanError};
use crate::render::{SvgOptions, design_image};

pub const SETTINGS_FILE: &str = "settings.json";
pub const IMAGE_FILE: &str = "tartan.png";

#[derive(Debug, Clone)]
pub struct DesignStore {
    base: PathBuf,
}

impl DesignStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Directory for a design name.
    pub fn design_dir(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.base.join(name))
    }

    pub fn settings_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.design_dir(name)?.join(SETTINGS_FILE))
    }

    pub fn image_path(&self, name: &str) -> Result<PathBuf> {
        Ok(self.design_dir(name)?.join(IMAGE_FILE))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.settings_path(name).is_ok_and(|path| path.is_file())
    }

    /// Names of saved designs, sorted. A missing base directory is an
    /// empty store.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.base) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(TartanError::io(&self.base, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| TartanError::io(&self.base, e))?;
            let path = entry.path();
            if !path.join(SETTINGS_FILE).is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Write the settings file and a fresh preview image.
    pub fn save(&self, name: &str, design: &Design) -> Result<PathBuf> {
        design.validate()?;
        let dir = self.design_dir(name)?;
        fs::create_dir_all(&dir).map_err(|e| TartanError::io(&dir, e))?;

        let settings = dir.join(SETTINGS_FILE);
        fs::write(&settings, design.to_json()?).map_err(|e| TartanError::io(&settings, e))?;

        let image = dir.join(IMAGE_FILE);
        design_image(design, &SvgOptions::default())?
            .save_with_format(&image, image::ImageFormat::Png)
            .map_err(|e| TartanError::render(format!("{}: {}", image.display(), e)))?;

        tracing::info!(name, path = %dir.display(), "design saved");
        Ok(dir)
    }

    pub fn load(&self, name: &str) -> Result<Design> {
        let settings = self.settings_path(name)?;
        let json = match fs::read_to_string(&settings) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TartanError::NotFound { path: settings });
            }
            Err(e) => return Err(TartanError::io(&settings, e)),
        };

        let design = Design::from_json(&json)?;
        tracing::debug!(name, "design loaded");
        Ok(design)
    }
}

/// Design names become directory names, so they must be a single
/// non-hidden path component.
pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    let bad = trimmed.is_empty()
        || trimmed != name
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control);

    if bad {
        return Err(TartanError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

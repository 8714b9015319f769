//! `tartan render` - export a design preview.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tartan::{DesignStore, SvgOptions, design_svg, render_png};

use super::common::load_design;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    /// Pick a format from the file extension, defaulting to png.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageFormat::Svg,
            _ => ImageFormat::Png,
        }
    }
}

pub fn cmd_render(
    store: &DesignStore,
    name: &str,
    output: &Path,
    format: Option<ImageFormat>,
    guides: bool,
    scale: f32,
) -> Result<()> {
    let design = load_design(store, name)?;
    let format = format.unwrap_or_else(|| ImageFormat::from_path(output));
    let options = SvgOptions {
        guides,
        ..SvgOptions::default()
    };

    let svg = design_svg(&design, &options);
    match format {
        ImageFormat::Svg => {
            fs::write(output, &svg)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        ImageFormat::Png => {
            let image = render_png(&svg, scale)?;
            image
                .save_with_format(output, image::ImageFormat::Png)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
    }

    tracing::info!(name, path = %output.display(), ?format, "preview rendered");
    eprintln!("Wrote: {}", output.display());
    Ok(())
}

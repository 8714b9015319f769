//! Common utilities shared across CLI commands.

use anyhow::{Context, Result};
use tartan::{Design, DesignStore, Palette};

use crate::config::Config;

pub fn open_store(config: &Config) -> DesignStore {
    DesignStore::new(config.design_dir())
}

/// Load a design, naming it in the error.
pub fn load_design(store: &DesignStore, name: &str) -> Result<Design> {
    store
        .load(name)
        .with_context(|| format!("Failed to load design '{}'", name))
}

/// Run-length encode a thread list as `swatch x count` pairs, the way
/// tartan setts are usually written down.
pub fn sett(list: &[usize], palette: &Palette) -> String {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &index in list {
        match runs.last_mut() {
            Some((last, count)) if *last == index => *count += 1,
            _ => runs.push((index, 1)),
        }
    }

    runs.iter()
        .map(|&(index, count)| {
            let label = palette
                .swatch(index)
                .and_then(|s| s.name.clone())
                .unwrap_or_else(|| index.to_string());
            format!("{}/{}", label, count)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

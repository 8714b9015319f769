//! `tartan new` - save a blank design.

use anyhow::{Context, Result, bail};
use tartan::DesignStore;

use crate::config::Config;

pub fn cmd_new(store: &DesignStore, config: &Config, name: &str, force: bool) -> Result<()> {
    if store.exists(name) && !force {
        bail!("Design '{}' already exists (use --force to replace it)", name);
    }

    let design = config.new_design();
    let dir = store
        .save(name, &design)
        .with_context(|| format!("Failed to save design '{}'", name))?;

    println!("Created {}", dir.display());
    Ok(())
}

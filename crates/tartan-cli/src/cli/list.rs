//! `tartan list` - one design name per line.

use anyhow::{Context, Result};
use tartan::DesignStore;

pub fn cmd_list(store: &DesignStore) -> Result<()> {
    let names = store
        .list()
        .with_context(|| format!("Failed to list {}", store.base().display()))?;

    if names.is_empty() {
        eprintln!("No designs in {}", store.base().display());
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

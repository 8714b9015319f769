//! `tartan show` - describe a saved design.

use anyhow::Result;
use tartan::DesignStore;

use super::common::{load_design, sett};

pub fn cmd_show(store: &DesignStore, name: &str, json: bool) -> Result<()> {
    let design = load_design(store, name)?;

    if json {
        println!("{}", design.to_json()?);
        return Ok(());
    }

    let palette = design.palette();
    println!("{}", name);
    println!("  rows:      {} threads", design.rows.len());
    println!("  columns:   {} threads", design.columns.len());
    println!("  size:      {}px, border {}px", design.thread_size, design.border_thickness);
    println!("  duplicate: {}", if design.duplicate { "on" } else { "off" });
    println!();
    println!("  palette:");
    for (index, swatch) in palette.iter().enumerate() {
        let marker = if index == design.selected { "*" } else { " " };
        println!(
            "  {}{} {} {}",
            marker,
            index + 1,
            swatch.colour,
            swatch.name.as_deref().unwrap_or("")
        );
    }
    println!();
    println!("  row sett:    {}", sett(&design.rows, &palette));
    if design.columns != design.rows {
        println!("  column sett: {}", sett(&design.columns, &palette));
    }
    Ok(())
}

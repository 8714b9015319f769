//! CLI command implementations.
//!
//! - `edit` - terminal editor
//! - `new` - save a blank design
//! - `list` - list saved designs
//! - `show` - describe a design
//! - `render` - export a preview image

pub mod common;
pub mod edit;
pub mod list;
pub mod new;
pub mod render;
pub mod show;

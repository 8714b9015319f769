//! # tartan
//!
//! Layout and rendering engine for woven tartan designs.
//!
//! A tartan is two repeating colour sequences, one for the rows and one for
//! the columns, woven in a 2/2 twill. This crate models each axis as a
//! [`Warp`] of [`ThreadLine`]s, puts the two warps on a [`Loom`] that maps
//! pointer input to edits, and renders the result as weave tiles, a
//! thread-resolution [`Raster`], or an SVG/PNG preview.
//!
//! ```
//! use tartan::{Axis, Loom, LoomContext, LoomLayout, Palette};
//!
//! let palette = Palette::default();
//! let mut loom = Loom::new(LoomContext::default(), LoomLayout::default());
//! loom.set_selected(3);
//! loom.paint_run(Axis::Row, 0);
//! assert_eq!(loom.rows().colour_index(0), 3);
//!
//! let paints = loom.drain_paints(&palette);
//! assert!(!paints.is_empty());
//! ```

pub mod design;
pub mod error;
pub mod geometry;
pub mod loom;
pub mod palette;
pub mod raster;
pub mod render;
pub mod store;
pub mod thread;
pub mod warp;

// Re-export common types at crate root for convenience.
pub use design::Design;
pub use error::{Result, TartanError};
pub use geometry::{Line, Point, Rect};
pub use loom::{Loom, LoomContext, LoomLayout, Mode, ModeStack, Nudge, Target};
pub use palette::{Colour, ColourIndex, ColourSource, Palette, Swatch, SWATCH_COUNT};
pub use raster::{Cell, Raster};
pub use render::{SvgOptions, design_image, design_svg, render_png};
pub use store::DesignStore;
pub use thread::{Axis, ThreadLine, ThreadPaint, WeaveStyle, weave_tiles, woven_axis};
pub use warp::Warp;

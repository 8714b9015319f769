//! A single thread of the loom and the twill weave geometry.
//!
//! ## The weave
//!
//! Tartan is a 2/2 twill: every thread passes over two perpendicular
//! threads, then under two. A row thread is therefore drawn as a band of
//! `2 x size` tiles repeating every `4 x size`, and a column thread as the
//! transposed band. The starting phase of each band shifts by one thread
//! per position, and rows and columns use phases that are offset from each
//! other so that together they cover every cell exactly once:
//!
//! ```text
//! row phase    = (4 - position % 4) % 4
//! column phase = (6 - position % 4) % 4
//! ```
//!
//! At grid cell `(row, column)` the row thread is on top exactly when
//! `(row + column) % 4 < 2`.

use crate::geometry::Rect;
use crate::palette::{Colour, ColourIndex, ColourSource};

/// Which set of threads a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal threads, indexed top to bottom
    Row,
    /// Vertical threads, indexed left to right
    Column,
}

impl Axis {
    /// The perpendicular axis.
    pub fn other(self) -> Axis {
        match self {
            Axis::Row => Axis::Column,
            Axis::Column => Axis::Row,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "column",
        }
    }
}

/// Drawing parameters shared by every thread of a loom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaveStyle {
    /// Width of one thread in pixels
    pub thread_size: f64,
    /// Stroke width of tile outlines
    pub border_thickness: f64,
    /// Stroke colour of tiles that are not highlighted
    pub border_colour: Colour,
    /// Width of the selector strip along the top and left edges
    pub selector_width: f64,
}

/// Everything a renderer needs to redraw one thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadPaint {
    pub axis: Axis,
    pub position: usize,
    pub colour_index: ColourIndex,
    pub fill: Colour,
    pub stroke: Colour,
    pub stroke_width: f64,
    pub highlighted: bool,
    /// Whether the selector stitch is shown (the thread is inside the repeat)
    pub visible: bool,
    /// Woven tiles in loom-interior coordinates
    pub tiles: Vec<Rect>,
    /// Stitch in the selector strip, in loom-interior coordinates
    pub selector: Rect,
}

/// One row or column thread.
///
/// Lines are created once per warp slot and never destroyed. Deleting a
/// thread hides it and moves colours around instead.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadLine {
    position: usize,
    colour_index: ColourIndex,
    highlighted: bool,
    stroke: Option<Colour>,
    visible: bool,
    dirty: bool,
}

impl ThreadLine {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            colour_index: 0,
            highlighted: false,
            stroke: None,
            visible: true,
            dirty: true,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn colour_index(&self) -> ColourIndex {
        self.colour_index
    }

    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Set the swatch this thread is woven in.
    pub fn set_colour_index(&mut self, index: ColourIndex) {
        if self.colour_index != index {
            self.colour_index = index;
            self.dirty = true;
        }
    }

    /// Toggle the hover highlight. A no-op when the state is unchanged,
    /// otherwise the outline switches to `colour`. Returns whether anything
    /// changed.
    pub fn set_highlight(&mut self, state: bool, colour: Colour) -> bool {
        if state == self.highlighted {
            return false;
        }

        self.highlighted = state;
        self.stroke = state.then_some(colour);
        self.dirty = true;
        true
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    /// Flag this thread for redraw if it uses the selected swatch, whose
    /// colour has just been edited. Returns whether it matched.
    pub fn sync_current_colour(&mut self, selected: ColourIndex) -> bool {
        if self.colour_index != selected {
            return false;
        }

        self.dirty = true;
        true
    }

    /// Back to swatch 0 with no highlight.
    pub fn clear(&mut self) {
        self.set_colour_index(0);
        if self.highlighted {
            self.highlighted = false;
            self.stroke = None;
            self.dirty = true;
        }
    }

    /// Clear the redraw flag, returning its previous value.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Tiles for this thread across `span` perpendicular threads.
    pub fn weave_tiles(&self, axis: Axis, thread_size: f64, span: usize) -> Vec<Rect> {
        weave_tiles(axis, self.position, thread_size, span)
    }

    /// Build the render instruction for this thread.
    pub fn paint(
        &self,
        axis: Axis,
        style: &WeaveStyle,
        span: usize,
        palette: &dyn ColourSource,
    ) -> ThreadPaint {
        ThreadPaint {
            axis,
            position: self.position,
            colour_index: self.colour_index,
            fill: palette.colour_at(self.colour_index),
            stroke: self.stroke.unwrap_or(style.border_colour),
            stroke_width: style.border_thickness,
            highlighted: self.highlighted,
            visible: self.visible,
            tiles: self.weave_tiles(axis, style.thread_size, span),
            selector: selector_rect(axis, self.position, style.thread_size, style.selector_width),
        }
    }
}

// ============================================================================
// WEAVE GEOMETRY
// ============================================================================

/// Offset, in threads, of the first full tile of a thread's band.
#[inline]
pub fn weave_phase(axis: Axis, position: usize) -> usize {
    let p = position % 4;
    match axis {
        Axis::Row => (4 - p) % 4,
        Axis::Column => (6 - p) % 4,
    }
}

/// The axis whose thread is visible on top at a grid cell.
#[inline]
pub fn woven_axis(row: usize, column: usize) -> Axis {
    if (row + column) % 4 < 2 {
        Axis::Row
    } else {
        Axis::Column
    }
}

/// Tiles that draw a thread woven across `span` perpendicular threads.
///
/// Rows produce `2*size x size` tiles and columns `size x 2*size` tiles,
/// each band repeating every `4*size` from its phase offset. Tiles are
/// clipped to `[0, span*size)`; a band with phase 3 starts with a
/// one-thread partial tile at the origin.
pub fn weave_tiles(axis: Axis, position: usize, thread_size: f64, span: usize) -> Vec<Rect> {
    let size = thread_size;
    let size2 = size * 2.0;
    let size4 = size * 4.0;
    let limit = span as f64 * size;
    let lane = position as f64 * size;

    let clip = match axis {
        Axis::Row => Rect::new(0.0, lane, limit, size),
        Axis::Column => Rect::new(lane, 0.0, size, limit),
    };

    let mut tiles = Vec::with_capacity(span / 4 + 2);
    let mut along = (weave_phase(axis, position) as f64 - 4.0) * size;
    while along < limit {
        let tile = match axis {
            Axis::Row => Rect::new(along, lane, size2, size),
            Axis::Column => Rect::new(lane, along, size, size2),
        };
        if let Some(tile) = tile.intersect(&clip) {
            tiles.push(tile);
        }
        along += size4;
    }

    tiles
}

/// The stitch drawn for a thread in the selector strip.
pub fn selector_rect(axis: Axis, position: usize, thread_size: f64, selector_width: f64) -> Rect {
    let lane = position as f64 * thread_size;
    match axis {
        Axis::Row => Rect::new(-selector_width, lane, selector_width, thread_size),
        Axis::Column => Rect::new(lane, -selector_width, thread_size, selector_width),
    }
}

//! The loom: the interactive surface that owns the row and column warps.
//!
//! The loom turns pointer positions into thread positions and pointer
//! clicks into warp edits. Window coordinates have their origin at the
//! top-left of the window; the loom sits below a top bar of
//! [`LoomLayout::top_bar`] pixels and has selector strips of
//! [`LoomLayout::border`] pixels along its top and left edges:
//!
//! ```text
//!   +---------------------------------+
//!   |            top bar              |
//!   +------+--------------------------+
//!   |      |  column selector strip   |
//!   +------+--------------------------+
//!   | row  |                          |
//!   | sel. |       woven cloth        |
//!   |      |                          |
//! ```
//!
//! Clicking a selector strip paints (or, with a pending mode, inserts or
//! deletes) a run of threads. With `duplicate` set every edit is applied to
//! rows and columns at the same position, which keeps the sett symmetric.

use crate::design::Design;
use crate::error::Result;
use crate::geometry::{Line, Point};
use crate::palette::{Colour, ColourIndex, ColourSource, Palette};
use crate::thread::{Axis, ThreadPaint, WeaveStyle, woven_axis};
use crate::warp::{MAX_THREAD_COUNT, MAX_THREADS_PER_CLICK, MIN_THREAD_COUNT, Warp};

/// Default height of the window top bar in pixels.
pub const TOP_BAR_HEIGHT: f64 = 32.0;

/// Default width of the selector strips in pixels.
pub const BORDER_WIDTH: f64 = 30.0;

/// Guide lines drawn across each axis of the repeat.
pub const GUIDE_COUNT: usize = 7;

pub const MIN_THREAD_SIZE: f64 = 2.0;
pub const MAX_THREAD_SIZE: f64 = 40.0;
pub const MAX_BORDER_THICKNESS: f64 = 10.0;

/// Settings the loom passes down to its warps and threads.
#[derive(Debug, Clone, PartialEq)]
pub struct LoomContext {
    /// Palette slot used for painting and for newly opened threads
    pub selected: ColourIndex,
    /// Threads edited per click, 1..=8
    pub thread_count: usize,
    /// Thread width in pixels
    pub thread_size: f64,
    /// Tile outline width
    pub border_thickness: f64,
    /// Apply every edit to both axes
    pub duplicate: bool,
    pub show_guide: bool,
    /// Guide lines and hover highlight
    pub guide_colour: Colour,
    /// Tile outline colour
    pub border_colour: Colour,
    /// Clicks on the cloth edit whichever thread is on top
    pub paint_interior: bool,
}

impl Default for LoomContext {
    fn default() -> Self {
        Self {
            selected: 1,
            thread_count: 1,
            thread_size: 6.0,
            border_thickness: 1.0,
            duplicate: true,
            show_guide: true,
            guide_colour: Colour::RED,
            border_colour: Colour::BLACK,
            paint_interior: false,
        }
    }
}

/// Window chrome around the loom, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoomLayout {
    pub top_bar: f64,
    pub border: f64,
}

impl Default for LoomLayout {
    fn default() -> Self {
        Self {
            top_bar: TOP_BAR_HEIGHT,
            border: BORDER_WIDTH,
        }
    }
}

/// What lies under a window coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Chrome, the corner square, or outside the repeat
    None,
    /// Left selector strip
    Row(usize),
    /// Top selector strip
    Column(usize),
    /// The woven cloth
    Interior { row: usize, column: usize },
}

/// Edit applied by a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Paint,
    Delete,
    Insert,
}

/// Pending edit requests, in the order they were made.
///
/// Only the first request is acted on; holding both modifiers does not
/// combine them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeStack {
    pending: Vec<Mode>,
}

impl ModeStack {
    pub fn request(&mut self, mode: Mode) {
        if mode != Mode::Paint && !self.pending.contains(&mode) {
            self.pending.push(mode);
        }
    }

    pub fn release(&mut self, mode: Mode) {
        self.pending.retain(|&m| m != mode);
    }

    /// Alt requests delete, Ctrl requests insert.
    pub fn sync_modifiers(&mut self, alt: bool, ctrl: bool) {
        for (held, mode) in [(alt, Mode::Delete), (ctrl, Mode::Insert)] {
            if held {
                self.request(mode);
            } else {
                self.release(mode);
            }
        }
    }

    pub fn active(&self) -> Mode {
        self.pending.first().copied().unwrap_or(Mode::Paint)
    }
}

/// Arrow-key pattern shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    Up,
    Down,
    Left,
    Right,
}

pub struct Loom {
    rows: Warp,
    columns: Warp,
    ctx: LoomContext,
    layout: LoomLayout,
    modes: ModeStack,
    hover: Option<(Axis, usize)>,
}

impl Loom {
    /// A loom with the standard thread bounds on both axes.
    pub fn new(ctx: LoomContext, layout: LoomLayout) -> Self {
        Self::with_bounds(ctx, layout, MIN_THREAD_COUNT, MAX_THREAD_COUNT)
    }

    pub fn with_bounds(ctx: LoomContext, layout: LoomLayout, min: usize, max: usize) -> Self {
        Self {
            rows: Warp::new(Axis::Row, min, max),
            columns: Warp::new(Axis::Column, min, max),
            ctx,
            layout,
            modes: ModeStack::default(),
            hover: None,
        }
    }

    pub fn rows(&self) -> &Warp {
        &self.rows
    }

    pub fn columns(&self) -> &Warp {
        &self.columns
    }

    pub fn warp(&self, axis: Axis) -> &Warp {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    fn warp_mut(&mut self, axis: Axis) -> &mut Warp {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    /// The axis an edit starts on, then its perpendicular if duplicating.
    fn axes(&self, axis: Axis) -> Vec<Axis> {
        if self.ctx.duplicate {
            vec![axis, axis.other()]
        } else {
            vec![axis]
        }
    }

    pub fn context(&self) -> &LoomContext {
        &self.ctx
    }

    pub fn layout(&self) -> LoomLayout {
        self.layout
    }

    pub fn mode(&self) -> Mode {
        self.modes.active()
    }

    pub fn modes_mut(&mut self) -> &mut ModeStack {
        &mut self.modes
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn set_selected(&mut self, index: ColourIndex) {
        self.ctx.selected = index;
    }

    pub fn set_thread_count(&mut self, count: usize) {
        self.ctx.thread_count = count.clamp(1, MAX_THREADS_PER_CLICK);
    }

    pub fn set_thread_size(&mut self, size: f64) {
        self.ctx.thread_size = size.clamp(MIN_THREAD_SIZE, MAX_THREAD_SIZE);
        self.mark_all_dirty();
    }

    pub fn set_border_thickness(&mut self, thickness: f64) {
        self.ctx.border_thickness = thickness.clamp(0.0, MAX_BORDER_THICKNESS);
        self.mark_all_dirty();
    }

    pub fn set_show_guide(&mut self, show: bool) {
        self.ctx.show_guide = show;
    }

    pub fn set_guide_colour(&mut self, colour: Colour) {
        self.ctx.guide_colour = colour;
    }

    pub fn set_paint_interior(&mut self, enabled: bool) {
        self.ctx.paint_interior = enabled;
    }

    /// Switch duplicate mode. Turning it on copies the columns into the
    /// rows so the two axes start out identical.
    pub fn set_duplicate(&mut self, duplicate: bool) -> Result<()> {
        if duplicate && !self.ctx.duplicate {
            let columns = self.columns.list();
            self.rows.set_list(&columns)?;
            tracing::debug!(threads = columns.len(), "columns duplicated into rows");
        }
        self.ctx.duplicate = duplicate;
        Ok(())
    }

    /// Change the repeat length of an axis (both axes when duplicating).
    pub fn set_count(&mut self, axis: Axis, count: usize) {
        let selected = self.ctx.selected;
        for axis in self.axes(axis) {
            self.warp_mut(axis).set_active(count, selected);
        }
    }

    // ========================================================================
    // Coordinate mapping
    // ========================================================================

    /// Size of one repeat of the cloth in pixels (width, height).
    pub fn interior_size(&self) -> (f64, f64) {
        let size = self.ctx.thread_size;
        (
            self.columns.active() as f64 * size,
            self.rows.active() as f64 * size,
        )
    }

    /// Convert a window coordinate to loom-interior coordinates.
    pub fn to_interior(&self, x: f64, y: f64) -> Point {
        Point::new(
            x - self.layout.border,
            y - self.layout.top_bar - self.layout.border,
        )
    }

    /// Classify a window coordinate.
    pub fn target_at(&self, x: f64, y: f64) -> Target {
        let p = self.to_interior(x, y);
        let border = self.layout.border;
        let size = self.ctx.thread_size;
        let (width, height) = self.interior_size();

        if p.x < -border || p.y < -border {
            return Target::None;
        }
        if p.x < 0.0 && p.y < 0.0 {
            return Target::None;
        }
        if p.x >= width || p.y >= height {
            return Target::None;
        }

        let row = (p.y / size).floor() as usize;
        let column = (p.x / size).floor() as usize;

        if p.x < 0.0 {
            Target::Row(row)
        } else if p.y < 0.0 {
            Target::Column(column)
        } else {
            Target::Interior { row, column }
        }
    }

    /// The thread a target edits, if any.
    fn resolve(&self, target: Target) -> Option<(Axis, usize)> {
        match target {
            Target::None => None,
            Target::Row(pos) => Some((Axis::Row, pos)),
            Target::Column(pos) => Some((Axis::Column, pos)),
            Target::Interior { row, column } => {
                if !self.ctx.paint_interior {
                    return None;
                }
                match woven_axis(row, column) {
                    Axis::Row => Some((Axis::Row, row)),
                    Axis::Column => Some((Axis::Column, column)),
                }
            }
        }
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// Apply the pending mode at a window coordinate. Returns whether a
    /// thread was edited.
    pub fn click(&mut self, x: f64, y: f64) -> bool {
        let target = self.target_at(x, y);
        let Some((axis, pos)) = self.resolve(target) else {
            return false;
        };

        let mode = self.mode();
        tracing::debug!(?target, ?mode, "loom click");

        let changed = match mode {
            Mode::Paint => self.paint_run(axis, pos),
            Mode::Delete => self.delete_run(axis, pos),
            Mode::Insert => self.insert_run(axis, pos),
        };

        if changed {
            // The run under the pointer has moved; redraw its highlight.
            self.hover = None;
            self.hover_at(x, y);
        }
        changed
    }

    /// Paint `thread_count` threads from `pos` in the selected swatch.
    pub fn paint_run(&mut self, axis: Axis, pos: usize) -> bool {
        let selected = self.ctx.selected;
        let count = self.ctx.thread_count;
        let mut changed = false;

        for axis in self.axes(axis) {
            let warp = self.warp_mut(axis);
            let repeat = warp.active();
            if pos < repeat {
                warp.colour_threads(pos, selected, count, repeat);
                changed = true;
            }
        }
        changed
    }

    /// Delete `thread_count` threads from `pos`.
    pub fn delete_run(&mut self, axis: Axis, pos: usize) -> bool {
        let count = self.ctx.thread_count;
        let mut removed = 0;
        for axis in self.axes(axis) {
            removed += self.warp_mut(axis).delete_threads(pos, count);
        }
        removed > 0
    }

    /// Insert `thread_count` threads of the selected swatch at `pos`.
    pub fn insert_run(&mut self, axis: Axis, pos: usize) -> bool {
        let count = self.ctx.thread_count;
        let selected = self.ctx.selected;
        let mut inserted = 0;
        for axis in self.axes(axis) {
            inserted += self.warp_mut(axis).insert_threads(pos, count, selected);
        }
        inserted > 0
    }

    /// Move the hover highlight to the run under a window coordinate.
    /// Returns whether the highlight moved.
    pub fn hover_at(&mut self, x: f64, y: f64) -> bool {
        let target = self.resolve(self.target_at(x, y));
        if target == self.hover {
            return false;
        }

        self.rows.clear_threads();
        self.columns.clear_threads();
        self.hover = target;

        if let Some((axis, pos)) = target {
            let count = self.ctx.thread_count;
            let colour = self.ctx.guide_colour;
            for axis in self.axes(axis) {
                let warp = self.warp_mut(axis);
                for index in warp.run(pos, count) {
                    warp.highlight_thread(index, true, colour);
                }
            }
        }
        true
    }

    /// The pointer left the loom.
    pub fn leave(&mut self) {
        self.hover = None;
        self.rows.clear_threads();
        self.columns.clear_threads();
    }

    pub fn hovered(&self) -> Option<(Axis, usize)> {
        self.hover
    }

    // ========================================================================
    // Keyboard input
    // ========================================================================

    /// Shift the pattern by one thread. With duplicate set a vertical nudge
    /// also shifts the columns the same way (and vice versa), moving the
    /// sett diagonally.
    pub fn nudge(&mut self, nudge: Nudge) {
        let (axis, increase) = match nudge {
            Nudge::Up => (Axis::Row, true),
            Nudge::Down => (Axis::Row, false),
            Nudge::Left => (Axis::Column, true),
            Nudge::Right => (Axis::Column, false),
        };

        tracing::debug!(?nudge, "loom nudge");
        for axis in self.axes(axis) {
            let warp = self.warp_mut(axis);
            if increase {
                warp.rotate_increase();
            } else {
                warp.rotate_decrease();
            }
        }
    }

    // ========================================================================
    // Whole-pattern operations
    // ========================================================================

    /// Flag threads using the selected swatch for redraw after its colour
    /// changed. Returns how many matched.
    pub fn sync_colour(&mut self) -> usize {
        let selected = self.ctx.selected;
        self.rows.sync_colour(selected) + self.columns.sync_colour(selected)
    }

    /// Reset every thread to swatch 0.
    pub fn clear(&mut self) {
        self.hover = None;
        self.rows.clear();
        self.columns.clear();
    }

    /// Guide lines dividing each repeat into `GUIDE_COUNT + 1` bands, in
    /// loom-interior coordinates. Empty when guides are hidden.
    pub fn guide_lines(&self) -> Vec<Line> {
        if !self.ctx.show_guide {
            return Vec::new();
        }

        let (width, height) = self.interior_size();
        let column_step = width / (GUIDE_COUNT + 1) as f64;
        let row_step = height / (GUIDE_COUNT + 1) as f64;

        let mut lines = Vec::with_capacity(GUIDE_COUNT * 2);
        for i in 1..=GUIDE_COUNT {
            let x = column_step * i as f64;
            lines.push(Line::new(x, 0.0, x, height));
        }
        for i in 1..=GUIDE_COUNT {
            let y = row_step * i as f64;
            lines.push(Line::new(0.0, y, width, y));
        }
        lines
    }

    pub fn weave_style(&self) -> WeaveStyle {
        WeaveStyle {
            thread_size: self.ctx.thread_size,
            border_thickness: self.ctx.border_thickness,
            border_colour: self.ctx.border_colour,
            selector_width: self.layout.border,
        }
    }

    /// Render instructions for every thread changed since the last drain,
    /// rows first.
    pub fn drain_paints(&mut self, palette: &dyn ColourSource) -> Vec<ThreadPaint> {
        let style = self.weave_style();
        let row_span = self.columns.max();
        let column_span = self.rows.max();

        let mut paints = self.rows.drain_paints(&style, row_span, palette);
        paints.extend(self.columns.drain_paints(&style, column_span, palette));
        paints
    }

    pub fn mark_all_dirty(&mut self) {
        self.rows.mark_all_dirty();
        self.columns.mark_all_dirty();
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Snapshot the loom for saving.
    pub fn design(&self, palette: &Palette) -> Design {
        Design {
            rows: self.rows.list(),
            columns: self.columns.list(),
            selected: self.ctx.selected,
            swatches: palette.swatches().to_vec(),
            duplicate: self.ctx.duplicate,
            show_guide: self.ctx.show_guide,
            guide_colour: self.ctx.guide_colour,
            thread_size: self.ctx.thread_size,
            border_thickness: self.ctx.border_thickness,
            thread_count: self.ctx.thread_count,
        }
    }

    /// Load a design. The loom is unchanged if the design is invalid.
    pub fn apply_design(&mut self, design: &Design) -> Result<()> {
        design.validate()?;

        let mut rows = self.rows.clone();
        let mut columns = self.columns.clone();
        rows.set_list(&design.rows)?;
        columns.set_list(&design.columns)?;

        self.rows = rows;
        self.columns = columns;
        self.hover = None;
        self.ctx.selected = design.selected;
        self.ctx.duplicate = design.duplicate;
        self.ctx.show_guide = design.show_guide;
        self.ctx.guide_colour = design.guide_colour;
        self.ctx.thread_size = design.thread_size;
        self.ctx.border_thickness = design.border_thickness;
        self.ctx.thread_count = design.thread_count;
        self.rows.clear_threads();
        self.columns.clear_threads();
        self.mark_all_dirty();

        tracing::debug!(
            rows = design.rows.len(),
            columns = design.columns.len(),
            "design applied"
        );
        Ok(())
    }
}

//! A warp: one axis of the loom as a bounded, repeating colour sequence.
//!
//! The warp owns a fixed arena of `max` [`ThreadLine`]s. Only the first
//! `active` lines form the pattern; every line after that repeats the
//! pattern (`line[i]` has the colour of `line[i % active]`) so the whole
//! cloth can be drawn without special cases. Lines are never added or
//! removed: deleting threads shifts colours left and shrinks `active`,
//! inserting shifts them right and grows it.
//!
//! Invariants, re-established after every mutation:
//! - `min <= active <= max`
//! - `line[i].colour_index() == line[i % active].colour_index()` for `i >= active`
//! - `line[i].is_visible() == (i < active)`

use std::ops::Range;

use crate::error::{Result, TartanError};
use crate::palette::{Colour, ColourIndex, ColourSource};
use crate::thread::{Axis, ThreadLine, ThreadPaint, WeaveStyle};

/// Pattern length a new warp starts with (clamped to its bounds).
pub const INIT_THREAD_COUNT: usize = 114;

/// Smallest pattern length the editor allows.
pub const MIN_THREAD_COUNT: usize = 20;

/// Number of thread slots per axis.
pub const MAX_THREAD_COUNT: usize = 200;

/// Largest run edited by a single click.
pub const MAX_THREADS_PER_CLICK: usize = 8;

#[derive(Debug, Clone)]
pub struct Warp {
    axis: Axis,
    min: usize,
    max: usize,
    active: usize,
    lines: Vec<ThreadLine>,
}

impl Warp {
    /// Allocate a warp with `max` thread slots.
    ///
    /// # Panics
    ///
    /// If `min` is zero or larger than `max`.
    pub fn new(axis: Axis, min: usize, max: usize) -> Self {
        assert!(min >= 1, "a warp needs at least one active thread");
        assert!(min <= max, "warp minimum {} exceeds maximum {}", min, max);

        tracing::debug!(axis = axis.name(), min, max, "warp constructed");

        let mut warp = Self {
            axis,
            min,
            max,
            active: INIT_THREAD_COUNT.clamp(min, max),
            lines: (0..max).map(ThreadLine::new).collect(),
        };
        warp.sync_threads();
        warp
    }

    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[inline]
    pub fn min(&self) -> usize {
        self.min
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.max
    }

    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn lines(&self) -> &[ThreadLine] {
        &self.lines
    }

    /// # Panics
    ///
    /// If `index >= max`. Positions come from the loom, so this is a bug.
    pub fn line(&self, index: usize) -> &ThreadLine {
        &self.lines[index]
    }

    /// # Panics
    ///
    /// If `index >= max`.
    pub fn colour_index(&self, index: usize) -> ColourIndex {
        self.lines[index].colour_index()
    }

    /// Direct write to one slot. Does not repeat-fill; callers editing the
    /// pattern should use [`Warp::colour_threads`].
    ///
    /// # Panics
    ///
    /// If `index >= max`.
    pub fn set_colour_index(&mut self, index: usize, colour: ColourIndex) {
        self.lines[index].set_colour_index(colour);
    }

    /// The slots a click at `pos` covers: `count` threads, cut at `active`.
    pub fn run(&self, pos: usize, count: usize) -> Range<usize> {
        let start = pos.min(self.active);
        let end = pos.saturating_add(count).min(self.active);
        start..end
    }

    // ========================================================================
    // Repeat length
    // ========================================================================

    /// Change the pattern length, clamped to `[min, max]`. Newly exposed
    /// threads take the `selected` swatch; `[0, old active)` is untouched.
    /// Returns the new length.
    pub fn set_active(&mut self, size: usize, selected: ColourIndex) -> usize {
        let clamped = size.clamp(self.min, self.max);
        if clamped != size {
            tracing::debug!(axis = self.axis.name(), requested = size, clamped, "active length clamped");
        }

        if clamped > self.active {
            self.fill(self.active..clamped, selected);
        }

        self.active = clamped;
        self.sync_threads();
        clamped
    }

    /// Grow or shrink the pattern length by `delta`.
    pub fn inc_active(&mut self, delta: isize, selected: ColourIndex) -> usize {
        let size = self.active.saturating_add_signed(delta);
        self.set_active(size, selected)
    }

    // ========================================================================
    // Rotation
    // ========================================================================

    /// Shift the pattern one thread towards position 0; the first thread
    /// wraps round to the end of the repeat.
    pub fn rotate_increase(&mut self) {
        let active = self.active;

        let first = self.lines[0].colour_index();
        for index in 1..active {
            let colour = self.lines[index].colour_index();
            self.lines[index - 1].set_colour_index(colour);
        }
        self.lines[active - 1].set_colour_index(first);

        self.sync_repeat_threads();
    }

    /// Shift the pattern one thread away from position 0; the last thread of
    /// the repeat wraps round to the start.
    pub fn rotate_decrease(&mut self) {
        let active = self.active;

        let last = self.lines[active - 1].colour_index();
        for index in (1..active).rev() {
            let colour = self.lines[index - 1].colour_index();
            self.lines[index].set_colour_index(colour);
        }
        self.lines[0].set_colour_index(last);

        self.sync_repeat_threads();
    }

    // ========================================================================
    // Click editing
    // ========================================================================

    /// Paint up to `count` threads from `pos` with `colour`, stopping at
    /// `repeat`. Every painted position is also painted at `pos + k*repeat`
    /// for the rest of the arena, so one click recolours the whole band.
    pub fn colour_threads(&mut self, pos: usize, colour: ColourIndex, count: usize, repeat: usize) {
        if repeat == 0 {
            return;
        }

        let mut pos = pos;
        for _ in 0..count {
            if pos >= repeat || pos >= self.max {
                break;
            }

            for index in (pos..self.max).step_by(repeat) {
                self.lines[index].set_colour_index(colour);
            }

            pos += 1;
        }
    }

    /// Remove up to `count` threads starting at `pos`. The run is cut so
    /// that it stays inside the pattern and `active` does not drop below
    /// `min`. Returns the number of threads removed.
    pub fn delete_threads(&mut self, pos: usize, count: usize) -> usize {
        let active = self.active;
        let above_min = active.saturating_sub(self.min).min(count);
        let in_pattern = active.saturating_sub(pos).min(count);
        let size = above_min.min(in_pattern);
        if size == 0 {
            return 0;
        }

        for source in (pos + size)..active {
            let colour = self.lines[source].colour_index();
            self.lines[source - size].set_colour_index(colour);
        }

        self.active -= size;
        self.sync_threads();

        tracing::debug!(axis = self.axis.name(), pos, size, active = self.active, "threads deleted");
        size
    }

    /// Open a run of up to `count` threads at `pos` woven in `selected`.
    /// The run is cut so that `active` does not exceed `max`; `pos` past the
    /// end of the pattern inserts nothing. Returns the number inserted.
    pub fn insert_threads(&mut self, pos: usize, count: usize, selected: ColourIndex) -> usize {
        let active = self.active;
        if pos > active {
            return 0;
        }

        let size = count.min(self.max - active);
        if size == 0 {
            return 0;
        }

        for source in (pos..active).rev() {
            let colour = self.lines[source].colour_index();
            self.lines[source + size].set_colour_index(colour);
        }

        self.active += size;
        self.fill(pos..pos + size, selected);
        self.sync_threads();

        tracing::debug!(axis = self.axis.name(), pos, size, active = self.active, "threads inserted");
        size
    }

    // ========================================================================
    // Hover highlight
    // ========================================================================

    /// Drop every highlight.
    pub fn clear_threads(&mut self) {
        for line in &mut self.lines {
            line.set_highlight(false, Colour::BLACK);
        }
    }

    /// # Panics
    ///
    /// If `pos >= max`.
    pub fn highlight_thread(&mut self, pos: usize, state: bool, colour: Colour) {
        self.lines[pos].set_highlight(state, colour);
    }

    // ========================================================================
    // Bulk access
    // ========================================================================

    /// The pattern: exactly `active` colour indices.
    pub fn list(&self) -> Vec<ColourIndex> {
        self.lines[..self.active]
            .iter()
            .map(ThreadLine::colour_index)
            .collect()
    }

    /// Replace the pattern. The list length becomes the new `active` and
    /// the rest of the arena repeats it.
    pub fn set_list(&mut self, values: &[ColourIndex]) -> Result<()> {
        if values.len() < self.min || values.len() > self.max {
            return Err(TartanError::invalid_design(format!(
                "{} list has {} threads, expected {}..={}",
                self.axis.name(),
                values.len(),
                self.min,
                self.max
            )));
        }

        for (index, line) in self.lines.iter_mut().enumerate() {
            line.set_colour_index(values[index % values.len()]);
        }

        self.active = values.len();
        self.sync_visible_threads();
        Ok(())
    }

    /// Reset every thread to swatch 0 with no highlight.
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Flag threads woven in the `selected` swatch for redraw after its
    /// colour was edited. Returns how many matched.
    pub fn sync_colour(&mut self, selected: ColourIndex) -> usize {
        self.lines
            .iter_mut()
            .map(|line| line.sync_current_colour(selected))
            .filter(|&matched| matched)
            .count()
    }

    /// Force a full redraw on the next [`Warp::drain_paints`].
    pub fn mark_all_dirty(&mut self) {
        for line in &mut self.lines {
            line.mark_dirty();
        }
    }

    /// Render instructions for every thread changed since the last drain.
    /// `span` is the number of perpendicular thread slots to weave across.
    pub fn drain_paints(
        &mut self,
        style: &WeaveStyle,
        span: usize,
        palette: &dyn ColourSource,
    ) -> Vec<ThreadPaint> {
        let axis = self.axis;
        self.lines
            .iter_mut()
            .filter_map(|line| {
                line.take_dirty()
                    .then(|| line.paint(axis, style, span, palette))
            })
            .collect()
    }

    // ========================================================================
    // Internal sync
    // ========================================================================

    fn fill(&mut self, range: Range<usize>, colour: ColourIndex) {
        for line in &mut self.lines[range] {
            line.set_colour_index(colour);
        }
    }

    fn sync_visible_threads(&mut self) {
        let active = self.active;
        for (index, line) in self.lines.iter_mut().enumerate() {
            line.set_visible(index < active);
        }
    }

    fn sync_repeat_threads(&mut self) {
        let active = self.active;
        for index in active..self.max {
            let colour = self.lines[index % active].colour_index();
            self.lines[index].set_colour_index(colour);
        }
    }

    fn sync_threads(&mut self) {
        self.sync_visible_threads();
        self.sync_repeat_threads();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;

    /// A warp with the given pattern already loaded.
    fn warp_with(min: usize, max: usize, pattern: &[ColourIndex]) -> Warp {
        let mut warp = Warp::new(Axis::Row, min, max);
        warp.set_list(pattern).unwrap();
        warp
    }

    fn assert_repeat_filled(warp: &Warp) {
        let active = warp.active();
        for i in active..warp.max() {
            assert_eq!(
                warp.colour_index(i),
                warp.colour_index(i % active),
                "slot {} does not repeat slot {}",
                i,
                i % active
            );
        }
        for (i, line) in warp.lines().iter().enumerate() {
            assert_eq!(line.is_visible(), i < active, "visibility of slot {}", i);
        }
    }

    #[test]
    fn new_warp_starts_at_initial_count() {
        let warp = Warp::new(Axis::Column, MIN_THREAD_COUNT, MAX_THREAD_COUNT);
        assert_eq!(warp.active(), INIT_THREAD_COUNT);
        assert_eq!(warp.lines().len(), MAX_THREAD_COUNT);
        assert_repeat_filled(&warp);

        let small = Warp::new(Axis::Column, 4, 8);
        assert_eq!(small.active(), 8);
    }

    #[test]
    #[should_panic]
    fn zero_minimum_is_rejected() {
        Warp::new(Axis::Row, 0, 10);
    }

    #[test]
    fn paint_two_threads_without_wrap() {
        let mut warp = Warp::new(Axis::Row, 20, 114);
        assert_eq!(warp.active(), 114);

        warp.colour_threads(0, 3, 2, 114);

        assert_eq!(warp.colour_index(0), 3);
        assert_eq!(warp.colour_index(1), 3);
        assert!((2..114).all(|i| warp.colour_index(i) == 0));
    }

    #[test]
    fn paint_propagates_through_repeats() {
        let mut warp = Warp::new(Axis::Row, 4, 20);
        warp.set_active(6, 0);

        warp.colour_threads(2, 5, 1, 6);

        for i in 0..20 {
            let expected = if i % 6 == 2 { 5 } else { 0 };
            assert_eq!(warp.colour_index(i), expected, "slot {}", i);
        }
        assert_repeat_filled(&warp);
    }

    #[test]
    fn paint_stops_at_repeat_boundary() {
        let mut warp = Warp::new(Axis::Row, 4, 20);
        warp.set_active(6, 0);

        warp.colour_threads(4, 2, 5, 6);

        assert_eq!(warp.list(), vec![0, 0, 0, 0, 2, 2]);
        assert_repeat_filled(&warp);
    }

    #[test]
    fn paint_with_zero_repeat_is_ignored() {
        let mut warp = Warp::new(Axis::Row, 4, 8);
        warp.colour_threads(0, 1, 1, 0);
        assert!(warp.list().iter().all(|&c| c == 0));
    }

    #[test]
    fn delete_run_shifts_left() {
        let pattern: Vec<ColourIndex> = (0..10).collect();
        let mut warp = warp_with(4, 20, &pattern);

        let removed = warp.delete_threads(3, 2);

        assert_eq!(removed, 2);
        assert_eq!(warp.active(), 8);
        let after: Vec<ColourIndex> = (3..8).map(|i| warp.colour_index(i)).collect();
        assert_eq!(after, vec![5, 6, 7, 8, 9]);
        assert_eq!(warp.colour_index(8), warp.colour_index(0));
        assert_eq!(warp.colour_index(9), warp.colour_index(1));
        assert_repeat_filled(&warp);
    }

    #[test]
    fn delete_never_goes_below_min() {
        let mut warp = warp_with(4, 20, &[1, 2, 3, 4, 5]);
        assert_eq!(warp.delete_threads(0, 8), 1);
        assert_eq!(warp.active(), 4);
        assert_eq!(warp.list(), vec![2, 3, 4, 5]);
        assert_eq!(warp.delete_threads(0, 8), 0);
        assert_eq!(warp.active(), 4);
    }

    #[test]
    fn delete_run_is_cut_at_pattern_end() {
        let mut warp = warp_with(2, 20, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(warp.delete_threads(5, 3), 1);
        assert_eq!(warp.list(), vec![1, 2, 3, 4, 5]);
        assert_eq!(warp.delete_threads(9, 3), 0);
    }

    #[test]
    fn insert_opens_selected_run() {
        let mut warp = warp_with(2, 8, &[5, 6, 7, 8, 9]);

        let inserted = warp.insert_threads(2, 3, 1);

        assert_eq!(inserted, 3);
        assert_eq!(warp.active(), 8);
        assert_eq!(warp.list(), vec![5, 6, 1, 1, 1, 7, 8, 9]);
        assert_repeat_filled(&warp);
    }

    #[test]
    fn insert_is_clamped_to_capacity() {
        let mut warp = warp_with(2, 8, &[5, 6, 7, 8, 9, 10]);
        assert_eq!(warp.insert_threads(1, 5, 0), 2);
        assert_eq!(warp.active(), 8);
        assert_eq!(warp.list(), vec![5, 0, 0, 6, 7, 8, 9, 10]);
        assert_eq!(warp.insert_threads(0, 1, 0), 0);
    }

    #[test]
    fn insert_at_end_appends() {
        let mut warp = warp_with(2, 8, &[1, 2, 3]);
        assert_eq!(warp.insert_threads(3, 2, 4), 2);
        assert_eq!(warp.list(), vec![1, 2, 3, 4, 4]);
        assert_eq!(warp.insert_threads(9, 1, 4), 0);
    }

    #[test]
    fn growing_fills_with_selected() {
        let mut warp = warp_with(2, 10, &[1, 2, 3]);
        assert_eq!(warp.set_active(5, 7), 5);
        assert_eq!(warp.list(), vec![1, 2, 3, 7, 7]);
        assert_repeat_filled(&warp);
    }

    #[test]
    fn shrinking_keeps_prefix() {
        let mut warp = warp_with(2, 10, &[1, 2, 3, 4, 5]);
        warp.set_active(3, 9);
        assert_eq!(warp.list(), vec![1, 2, 3]);
        assert_eq!(warp.colour_index(3), 1);
        assert_repeat_filled(&warp);
    }

    #[test]
    fn set_active_clamps_both_ends() {
        let mut warp = warp_with(4, 10, &[0; 6]);
        assert_eq!(warp.set_active(1, 0), 4);
        assert_eq!(warp.set_active(50, 0), 10);
        assert_eq!(warp.inc_active(-100, 0), 4);
        assert_eq!(warp.inc_active(3, 0), 7);
    }

    #[test]
    fn rotate_increase_moves_towards_origin() {
        let mut warp = warp_with(2, 10, &[1, 2, 3, 4]);
        warp.rotate_increase();
        assert_eq!(warp.list(), vec![2, 3, 4, 1]);
        assert_repeat_filled(&warp);
    }

    #[test]
    fn rotate_decrease_moves_away_from_origin() {
        let mut warp = warp_with(2, 10, &[1, 2, 3, 4]);
        warp.rotate_decrease();
        assert_eq!(warp.list(), vec![4, 1, 2, 3]);
        assert_repeat_filled(&warp);
    }

    #[test]
    fn set_list_rejects_out_of_bounds_lengths() {
        let mut warp = Warp::new(Axis::Row, 4, 8);
        assert!(warp.set_list(&[1, 2]).is_err());
        assert!(warp.set_list(&[0; 9]).is_err());
        assert_eq!(warp.active(), 8);
    }

    #[test]
    fn run_is_cut_at_active() {
        let warp = warp_with(2, 10, &[0; 6]);
        assert_eq!(warp.run(1, 3), 1..4);
        assert_eq!(warp.run(4, 8), 4..6);
        assert!(warp.run(7, 2).is_empty());
    }

    #[test]
    fn highlight_and_clear() {
        let mut warp = Warp::new(Axis::Column, 4, 8);
        warp.highlight_thread(2, true, Colour::RED);
        warp.highlight_thread(3, true, Colour::RED);
        assert!(warp.line(2).is_highlighted());

        warp.clear_threads();
        assert!(warp.lines().iter().all(|l| !l.is_highlighted()));
        assert!(warp.list().iter().all(|&c| c == 0));
    }

    #[test]
    fn clear_resets_colours() {
        let mut warp = warp_with(2, 6, &[3, 4, 5]);
        warp.highlight_thread(0, true, Colour::RED);
        warp.clear();
        assert!(warp.lines().iter().all(|l| l.colour_index() == 0 && !l.is_highlighted()));
        assert_eq!(warp.active(), 3);
    }

    #[test]
    fn sync_colour_counts_matches() {
        let mut warp = warp_with(2, 6, &[1, 2, 1]);
        assert_eq!(warp.sync_colour(1), 4);
        assert_eq!(warp.sync_colour(7), 0);
    }

    #[test]
    fn drain_only_returns_changed_threads() {
        let palette = Palette::default();
        let style = WeaveStyle {
            thread_size: 2.0,
            border_thickness: 1.0,
            border_colour: Colour::BLACK,
            selector_width: 4.0,
        };
        let mut warp = Warp::new(Axis::Row, 2, 8);
        assert_eq!(warp.drain_paints(&style, 8, &palette).len(), 8);
        assert!(warp.drain_paints(&style, 8, &palette).is_empty());

        warp.set_list(&[3, 0, 0, 0]).unwrap();
        let paints = warp.drain_paints(&style, 8, &palette);
        let positions: Vec<usize> = paints.iter().map(|p| p.position).collect();
        assert_eq!(positions, vec![0, 4, 5, 6, 7]);
        assert_eq!(paints[0].fill, Colour::RED);
        assert!(!paints[1].visible);
    }
}

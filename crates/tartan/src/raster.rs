//! Thread-resolution raster of the cloth.
//!
//! One cell per row/column crossing, plus one stitch per selector slot.
//! Cells are updated from [`ThreadPaint`]s, so a renderer that keeps a
//! `Raster` only touches the threads drained since the last frame.

use crate::palette::Colour;
use crate::thread::{Axis, ThreadPaint};

/// A crossing of one row and one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub colour: Colour,
    /// The thread on top, `None` until something is painted here
    pub axis: Option<Axis>,
    pub highlighted: bool,
    pub stroke: Colour,
}

impl Cell {
    const EMPTY: Cell = Cell {
        colour: Colour::WHITE,
        axis: None,
        highlighted: false,
        stroke: Colour::BLACK,
    };
}

#[derive(Debug, Clone)]
pub struct Raster {
    rows: usize,
    columns: usize,
    thread_size: f64,
    cells: Vec<Cell>,
    row_stitches: Vec<Option<Cell>>,
    column_stitches: Vec<Option<Cell>>,
}

impl Raster {
    /// A blank raster of `rows x columns` crossings. `thread_size` must
    /// match the size the paints were generated with.
    pub fn new(rows: usize, columns: usize, thread_size: f64) -> Self {
        Self {
            rows,
            columns,
            thread_size,
            cells: vec![Cell::EMPTY; rows * columns],
            row_stitches: vec![None; rows],
            column_stitches: vec![None; columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn thread_size(&self) -> f64 {
        self.thread_size
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column)
    }

    /// Selector stitch for a row; `None` past the repeat.
    pub fn row_stitch(&self, row: usize) -> Option<&Cell> {
        self.row_stitches.get(row).and_then(Option::as_ref)
    }

    pub fn column_stitch(&self, column: usize) -> Option<&Cell> {
        self.column_stitches.get(column).and_then(Option::as_ref)
    }

    /// Pixel extent to cell range, clamped to `limit`.
    fn span(&self, start: f64, length: f64, limit: usize) -> std::ops::Range<usize> {
        let from = (start / self.thread_size).round().max(0.0) as usize;
        let to = ((start + length) / self.thread_size).round().max(0.0) as usize;
        from.min(limit)..to.min(limit)
    }

    pub fn apply(&mut self, paint: &ThreadPaint) {
        let cell = Cell {
            colour: paint.fill,
            axis: Some(paint.axis),
            highlighted: paint.highlighted,
            stroke: paint.stroke,
        };

        for tile in &paint.tiles {
            let columns = self.span(tile.x, tile.width, self.columns);
            let rows = self.span(tile.y, tile.height, self.rows);
            for row in rows {
                for column in columns.clone() {
                    self.cells[row * self.columns + column] = cell;
                }
            }
        }

        let stitches = match paint.axis {
            Axis::Row => &mut self.row_stitches,
            Axis::Column => &mut self.column_stitches,
        };
        if let Some(slot) = stitches.get_mut(paint.position) {
            *slot = paint.visible.then_some(cell);
        }
    }

    pub fn apply_all<'a>(&mut self, paints: impl IntoIterator<Item = &'a ThreadPaint>) {
        for paint in paints {
            self.apply(paint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loom::{Loom, LoomContext, LoomLayout};
    use crate::palette::{ColourSource, Palette};
    use crate::thread::woven_axis;

    fn painted(loom: &mut Loom, palette: &Palette) -> Raster {
        let mut raster = Raster::new(
            loom.rows().max(),
            loom.columns().max(),
            loom.context().thread_size,
        );
        raster.apply_all(&loom.drain_paints(palette));
        raster
    }

    #[test]
    fn rows_and_columns_partition_the_cloth() {
        let palette = Palette::default();
        let mut loom = Loom::with_bounds(LoomContext::default(), LoomLayout::default(), 4, 24);
        loom.set_selected(3);
        loom.paint_run(crate::thread::Axis::Row, 1);
        loom.set_selected(5);
        loom.paint_run(crate::thread::Axis::Column, 2);

        let raster = painted(&mut loom, &palette);
        for row in 0..raster.rows() {
            for column in 0..raster.columns() {
                let cell = raster.cell(row, column).unwrap();
                let axis = woven_axis(row, column);
                assert_eq!(cell.axis, Some(axis), "cell ({}, {})", row, column);

                let index = match axis {
                    Axis::Row => loom.rows().colour_index(row),
                    Axis::Column => loom.columns().colour_index(column),
                };
                assert_eq!(cell.colour, palette.colour_at(index));
            }
        }
    }

    #[test]
    fn stitches_hidden_past_repeat() {
        let palette = Palette::default();
        let mut loom = Loom::with_bounds(LoomContext::default(), LoomLayout::default(), 4, 24);
        loom.set_count(Axis::Row, 10);
        let raster = painted(&mut loom, &palette);
        assert!(raster.row_stitch(9).is_some());
        assert!(raster.row_stitch(10).is_none());
        assert!(raster.row_stitch(99).is_none());
    }

    #[test]
    fn incremental_update_only_touches_drained_threads() {
        let palette = Palette::default();
        let mut loom = Loom::with_bounds(LoomContext::default(), LoomLayout::default(), 4, 24);
        let mut raster = painted(&mut loom, &palette);

        loom.set_selected(2);
        loom.paint_run(Axis::Row, 0);
        let paints = loom.drain_paints(&palette);
        assert!(paints.iter().all(|p| p.axis == Axis::Row));
        raster.apply_all(&paints);

        assert_eq!(raster.cell(0, 0).unwrap().colour, Colour::BLACK);
        assert_eq!(raster.cell(0, 2).unwrap().colour, Colour::WHITE);
        assert_eq!(raster.row_stitch(0).unwrap().colour, Colour::BLACK);
    }

    #[test]
    fn out_of_bounds_lookup() {
        let raster = Raster::new(2, 3, 6.0);
        assert!(raster.cell(1, 2).is_some());
        assert!(raster.cell(2, 0).is_none());
        assert!(raster.cell(0, 3).is_none());
    }
}

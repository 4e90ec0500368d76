#![forbid(unsafe_code)]

//! Grid geometry: slots, hit testing, and the drop area.
//!
//! [`GridLayout`] maps between linear slot indices, (column, row) pairs,
//! and pixel rectangles. It is pure and recomputed wholesale on every
//! resize; cell pixel geometry is always derived from the layout, never
//! stored per cell.
//!
//! # Invariants
//!
//! 1. `columns >= 1` and `rows >= 1` at all times, so slot arithmetic can
//!    never divide by zero — even before the first real resize.
//! 2. `max_slot() == columns * rows - 1`; `hit_test` never returns a slot
//!    above it.
//! 3. `hit_test(origin_of(s))` returns `s` for every in-bounds slot whose
//!    cell does not intersect the drop area.
//!
//! The grid adapts to its container: columns and rows are derived from the
//! available size and a fixed cell size (not the other way around), so
//! cells stay visually consistent while the matrix grows or shrinks.

use crate::geometry::{Point, Rect};

/// Fraction of the container reserved as outer padding on each side.
const EDGE_PADDING_RATIO: f32 = 0.03;

/// A linear grid position.
///
/// Slots are *placements*, not identities: a cell's slot changes when it
/// is reordered. Slots at or below [`GridLayout::max_slot`] are visible;
/// larger values are soft-overflow placements that exist in the registry
/// but are not laid out until the grid grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u32);

impl Slot {
    /// Create a slot from a linear index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw linear index.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Result of hit-testing a point against the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// A grid cell.
    Slot(Slot),
    /// The reserved edit/delete drop region above the grid.
    DropArea,
    /// Outside any cell and outside the drop area.
    Outside,
}

impl HitTarget {
    /// The slot, if the target is a cell.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> Option<Slot> {
        match self {
            Self::Slot(slot) => Some(slot),
            _ => None,
        }
    }

    /// Whether the target is the drop area.
    #[inline]
    #[must_use]
    pub const fn is_drop_area(self) -> bool {
        matches!(self, Self::DropArea)
    }

    /// Whether the point hit nothing.
    #[inline]
    #[must_use]
    pub const fn is_outside(self) -> bool {
        matches!(self, Self::Outside)
    }
}

/// Immutable layout inputs: cell size and the reserved top region.
///
/// The drop area occupies the horizontal span of the grid, vertically from
/// `drop_area_top_padding` down to `top_space - drop_area_bottom_padding`.
/// With `top_space == 0` (the default) there is no drop area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Cell width in pixels.
    pub cell_width: f32,
    /// Cell height in pixels.
    pub cell_height: f32,
    /// Height reserved above the grid for the drop area (and host chrome).
    pub top_space: f32,
    /// Gap between the container top and the drop area.
    pub drop_area_top_padding: f32,
    /// Gap between the drop area and the end of the reserved space.
    pub drop_area_bottom_padding: f32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            cell_width: 80.0,
            cell_height: 90.0,
            top_space: 0.0,
            drop_area_top_padding: 20.0,
            drop_area_bottom_padding: 0.0,
        }
    }
}

impl GridSpec {
    /// Create a spec with the given cell size.
    #[must_use]
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width,
            cell_height,
            ..Self::default()
        }
    }

    /// Set the reserved top space height.
    #[must_use]
    pub const fn top_space(mut self, height: f32) -> Self {
        self.top_space = height;
        self
    }

    /// Set the drop area's top and bottom padding inside the top space.
    #[must_use]
    pub const fn drop_area_padding(mut self, top: f32, bottom: f32) -> Self {
        self.drop_area_top_padding = top;
        self.drop_area_bottom_padding = bottom;
        self
    }
}

/// Derived per-resize grid geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    columns: u32,
    rows: u32,
    cell_width: f32,
    cell_height: f32,
    padding_left: f32,
    padding_top: f32,
    drop_area: Rect,
}

impl GridLayout {
    /// Layout used before the first resize: a 1x1 grid with no paddings
    /// and no drop area. Keeps slot arithmetic well-defined from birth.
    #[must_use]
    pub fn initial(spec: &GridSpec) -> Self {
        Self {
            columns: 1,
            rows: 1,
            cell_width: spec.cell_width,
            cell_height: spec.cell_height,
            padding_left: 0.0,
            padding_top: 0.0,
            drop_area: Rect::default(),
        }
    }

    /// Compute the layout for a container of the given pixel size.
    ///
    /// Side paddings are a fixed fraction of the container; the top
    /// padding additionally reserves `spec.top_space`. Columns and rows
    /// are however many whole cells fit the remaining span (at least one
    /// each), and the leftover space is split evenly so the matrix is
    /// centered.
    #[must_use]
    pub fn compute(spec: &GridSpec, width: f32, height: f32) -> Self {
        let mut padding_left = width * EDGE_PADDING_RATIO;
        let padding_right = width * EDGE_PADDING_RATIO;
        let mut padding_top = height * EDGE_PADDING_RATIO + spec.top_space;
        let padding_bottom = height * EDGE_PADDING_RATIO;

        let avail_w = (width - padding_left - padding_right).max(0.0);
        let avail_h = (height - padding_top - padding_bottom).max(0.0);

        let columns = ((avail_w / spec.cell_width) as u32).max(1);
        let rows = ((avail_h / spec.cell_height) as u32).max(1);

        // Center the matrix in the leftover span.
        let horizontal_remainder = avail_w - columns as f32 * spec.cell_width;
        padding_left += horizontal_remainder / 2.0;
        let vertical_remainder = avail_h - rows as f32 * spec.cell_height;
        padding_top += vertical_remainder / 2.0;

        let drop_area = Rect::new(
            padding_left,
            spec.drop_area_top_padding,
            columns as f32 * spec.cell_width,
            (spec.top_space - spec.drop_area_bottom_padding - spec.drop_area_top_padding)
                .max(0.0),
        );

        Self {
            columns,
            rows,
            cell_width: spec.cell_width,
            cell_height: spec.cell_height,
            padding_left,
            padding_top,
            drop_area,
        }
    }

    /// Number of columns.
    #[inline]
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell width in pixels.
    #[inline]
    #[must_use]
    pub const fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Cell height in pixels.
    #[inline]
    #[must_use]
    pub const fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Total number of visible slots.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.columns * self.rows
    }

    /// The largest visible slot.
    #[inline]
    #[must_use]
    pub const fn max_slot(&self) -> Slot {
        Slot(self.capacity() - 1)
    }

    /// Whether a slot lies inside the visible matrix.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, slot: Slot) -> bool {
        slot.get() < self.capacity()
    }

    /// The drop area rectangle (empty when no top space is reserved).
    #[inline]
    #[must_use]
    pub const fn drop_area(&self) -> Rect {
        self.drop_area
    }

    /// Map a point to what it hits: the drop area, a cell, or nothing.
    #[must_use]
    pub fn hit_test(&self, p: Point) -> HitTarget {
        if self.drop_area.contains(p) {
            return HitTarget::DropArea;
        }
        if p.x < self.padding_left || p.y < self.padding_top {
            return HitTarget::Outside;
        }
        let col = ((p.x - self.padding_left) / self.cell_width) as u32;
        let row = ((p.y - self.padding_top) / self.cell_height) as u32;
        let index = row * self.columns + col;
        if col >= self.columns || index >= self.capacity() {
            HitTarget::Outside
        } else {
            HitTarget::Slot(Slot(index))
        }
    }

    /// (column, row) for a point, `None` for the drop area or outside.
    #[must_use]
    pub fn col_row_at(&self, p: Point) -> Option<(u32, u32)> {
        self.hit_test(p)
            .slot()
            .map(|slot| (slot.get() % self.columns, slot.get() / self.columns))
    }

    /// Top-left pixel of a slot's cell.
    ///
    /// Defined for soft-overflow slots too (the row simply extends past
    /// the container); callers only place in-bounds slots.
    #[must_use]
    pub fn origin_of(&self, slot: Slot) -> Point {
        let row = slot.get() / self.columns;
        let col = slot.get() % self.columns;
        self.origin_of_col_row(col, row)
    }

    /// Top-left pixel of the cell at (column, row).
    #[must_use]
    pub fn origin_of_col_row(&self, col: u32, row: u32) -> Point {
        Point::new(
            self.padding_left + col as f32 * self.cell_width,
            self.padding_top + row as f32 * self.cell_height,
        )
    }

    /// Full pixel rectangle of a slot's cell.
    #[must_use]
    pub fn cell_rect(&self, slot: Slot) -> Rect {
        let origin = self.origin_of(slot);
        Rect::new(origin.x, origin.y, self.cell_width, self.cell_height)
    }
}

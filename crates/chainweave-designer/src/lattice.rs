//! Hex lattice addressing.
//!
//! Rings sit on a staggered hexagonal lattice: every row is a straight line of
//! cells `spacing` apart, odd rows are shifted right by half a spacing, and rows
//! are `spacing * ROW_FACTOR` apart. A cell's logical position (millimeters) is
//! always derived from its `(row, col)` index and never stored.
//!
//! ```text
//! row 1:    (1,0)   (1,1)   (1,2)
//! row 0: (0,0)   (0,1)   (0,2)
//! ```
//!
//! The grid is unbounded in every direction; negative rows and columns are as
//! valid as positive ones.

use std::fmt;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use chainweave_core::constants::{ROW_FACTOR, TRANSFORM_EPSILON};

use crate::bounds::Bounds;

/// Integer address of one lattice cell.
///
/// Ordering is row-major (`row`, then `col`), which is the order bulk
/// operations walk a selection in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub row: i32,
    pub col: i32,
}

impl CellKey {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// True for rows carrying the half-spacing horizontal offset.
    pub fn is_odd_row(&self) -> bool {
        self.row & 1 != 0
    }

    /// The 3x3 block around this cell, excluding the cell itself, in row-major order.
    pub fn neighborhood(&self) -> [CellKey; 8] {
        let (r, c) = (self.row, self.col);
        [
            CellKey::new(r - 1, c - 1),
            CellKey::new(r - 1, c),
            CellKey::new(r - 1, c + 1),
            CellKey::new(r, c - 1),
            CellKey::new(r, c + 1),
            CellKey::new(r + 1, c - 1),
            CellKey::new(r + 1, c),
            CellKey::new(r + 1, c + 1),
        ]
    }

    /// The six cells whose rings link directly with this one.
    ///
    /// Which diagonal columns touch depends on the row parity because odd rows
    /// are shifted right.
    pub fn adjacent(&self) -> [CellKey; 6] {
        let (r, c) = (self.row, self.col);
        let (left, right) = if self.is_odd_row() { (c, c + 1) } else { (c - 1, c) };
        [
            CellKey::new(r - 1, left),
            CellKey::new(r - 1, right),
            CellKey::new(r, c - 1),
            CellKey::new(r, c + 1),
            CellKey::new(r + 1, left),
            CellKey::new(r + 1, right),
        ]
    }

    /// Packs the key into a single integer (row in the high half).
    pub fn packed(&self) -> u64 {
        ((self.row as u32 as u64) << 32) | (self.col as u32 as u64)
    }

    pub fn from_packed(packed: u64) -> Self {
        Self {
            row: (packed >> 32) as u32 as i32,
            col: packed as u32 as i32,
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for CellKey {
    type Err = String;

    /// Parses the canonical `"row-col"` form, e.g. `"3-4"`, `"-2-7"` or `"5--1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // The separator is the first '-' after the row's optional sign.
        let sep = s
            .char_indices()
            .skip(1)
            .find(|&(_, ch)| ch == '-')
            .map(|(idx, _)| idx)
            .ok_or_else(|| format!("Invalid cell key: {}", s))?;
        let row = s[..sep]
            .parse::<i32>()
            .map_err(|_| format!("Invalid row in cell key: {}", s))?;
        let col = s[sep + 1..]
            .parse::<i32>()
            .map_err(|_| format!("Invalid column in cell key: {}", s))?;
        Ok(Self { row, col })
    }
}

/// Lattice geometry for a given center spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLattice {
    spacing: f64,
}

impl HexLattice {
    /// Creates a lattice with the given horizontal center spacing (mm).
    ///
    /// Non-positive or non-finite spacings are floored to a tiny epsilon so the
    /// addressing math never divides by zero.
    pub fn new(spacing: f64) -> Self {
        let spacing = if spacing.is_finite() {
            spacing.abs().max(TRANSFORM_EPSILON)
        } else {
            TRANSFORM_EPSILON
        };
        Self { spacing }
    }

    /// Horizontal distance between neighboring centers in a row.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Vertical distance between rows.
    pub fn row_pitch(&self) -> f64 {
        self.spacing * ROW_FACTOR
    }

    /// Horizontal stagger applied to a row.
    pub fn row_offset(&self, row: i32) -> f64 {
        if row & 1 != 0 {
            self.spacing / 2.0
        } else {
            0.0
        }
    }

    /// Canonical logical position of a cell's center.
    pub fn cell_to_logical(&self, key: CellKey) -> DVec2 {
        DVec2::new(
            key.col as f64 * self.spacing + self.row_offset(key.row),
            key.row as f64 * self.row_pitch(),
        )
    }

    /// Row/column rounding without the neighborhood search.
    ///
    /// Exact for lattice centers but not always nearest-neighbor correct near
    /// cell boundaries; use [`HexLattice::logical_to_cell`] for hit-testing.
    pub fn approximate_cell(&self, p: DVec2) -> CellKey {
        let row = (p.y / self.row_pitch()).round() as i32;
        let col = ((p.x - self.row_offset(row)) / self.spacing).round() as i32;
        CellKey::new(row, col)
    }

    /// Column in `row` whose center is closest to `x`.
    fn nearest_col_in_row(&self, x: f64, row: i32) -> i32 {
        ((x - self.row_offset(row)) / self.spacing).round() as i32
    }

    /// Nearest cell center to a logical point.
    ///
    /// Searches the rows around the rounded row, re-deriving each row's own
    /// column with that row's stagger, and compares true Euclidean distances.
    /// Equidistant candidates resolve to the smallest key in row-major order.
    pub fn logical_to_cell(&self, p: DVec2) -> CellKey {
        let base_row = (p.y / self.row_pitch()).round() as i32;
        let mut best = self.approximate_cell(p);
        let mut best_dist = f64::INFINITY;

        for row in base_row.saturating_sub(1)..=base_row.saturating_add(1) {
            let col = self.nearest_col_in_row(p.x, row);
            for col in col.saturating_sub(1)..=col.saturating_add(1) {
                let key = CellKey::new(row, col);
                let dist = self.cell_to_logical(key).distance_squared(p);
                if dist < best_dist {
                    best = key;
                    best_dist = dist;
                }
            }
        }

        best
    }

    /// Row and column ranges covering `bounds`, padded by `margin` cells.
    ///
    /// The ranges come from rounding the two corners, so a margin of at least
    /// one cell is needed to cover centers just inside the edges on staggered rows.
    pub fn candidate_ranges(
        &self,
        bounds: &Bounds,
        margin: i32,
    ) -> (std::ops::RangeInclusive<i32>, std::ops::RangeInclusive<i32>) {
        let a = self.approximate_cell(bounds.min);
        let b = self.approximate_cell(bounds.max);
        let margin = margin.max(0);
        let rows = a.row.min(b.row).saturating_sub(margin)..=a.row.max(b.row).saturating_add(margin);
        let cols = a.col.min(b.col).saturating_sub(margin)..=a.col.max(b.col).saturating_add(margin);
        (rows, cols)
    }
}

impl Default for HexLattice {
    fn default() -> Self {
        Self::new(8.0)
    }
}

/// Inclusive row/column extents of a set of cells.
///
/// Used for camera framing and renderer sizing only; it never limits where
/// rings can be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeSpan {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

impl LatticeSpan {
    /// Span of the given keys, or `None` when there are none.
    pub fn from_keys<I>(keys: I) -> Option<Self>
    where
        I: IntoIterator<Item = CellKey>,
    {
        let mut iter = keys.into_iter();
        let first = iter.next()?;
        let mut span = Self {
            min_row: first.row,
            max_row: first.row,
            min_col: first.col,
            max_col: first.col,
        };
        for key in iter {
            span.min_row = span.min_row.min(key.row);
            span.max_row = span.max_row.max(key.row);
            span.min_col = span.min_col.min(key.col);
            span.max_col = span.max_col.max(key.col);
        }
        Some(span)
    }

    /// Returns a copy grown by `padding` cells on every side.
    pub fn padded(&self, padding: i32) -> Self {
        Self {
            min_row: self.min_row.saturating_sub(padding),
            max_row: self.max_row.saturating_add(padding),
            min_col: self.min_col.saturating_sub(padding),
            max_col: self.max_col.saturating_add(padding),
        }
    }

    pub fn rows(&self) -> usize {
        (self.max_row as i64 - self.min_row as i64 + 1) as usize
    }

    pub fn cols(&self) -> usize {
        (self.max_col as i64 - self.min_col as i64 + 1) as usize
    }

    /// Number of cells in the full rectangle of rows x cols.
    pub fn cell_count(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn contains(&self, key: CellKey) -> bool {
        (self.min_row..=self.max_row).contains(&key.row)
            && (self.min_col..=self.max_col).contains(&key.col)
    }

    /// Logical bounds of all cell centers in the span (stagger included).
    pub fn logical_bounds(&self, lattice: &HexLattice) -> Bounds {
        let odd_present = self.rows() > 1 || self.min_row & 1 != 0;
        let even_present = self.rows() > 1 || self.min_row & 1 == 0;
        let min_x = if even_present {
            self.min_col as f64 * lattice.spacing()
        } else {
            self.min_col as f64 * lattice.spacing() + lattice.spacing() / 2.0
        };
        let max_x = if odd_present {
            self.max_col as f64 * lattice.spacing() + lattice.spacing() / 2.0
        } else {
            self.max_col as f64 * lattice.spacing()
        };
        Bounds {
            min: DVec2::new(min_x, self.min_row as f64 * lattice.row_pitch()),
            max: DVec2::new(max_x, self.max_row as f64 * lattice.row_pitch()),
        }
    }
}

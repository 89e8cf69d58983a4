//! Selection geometry in logical space.
//!
//! A selection is described by the two drag endpoints. The enclosed cells are
//! found by converting the shape's bounding box to a padded row/column range
//! and then testing each candidate center exactly, so the cost depends on the
//! size of the shape and not on the number of placed rings.

use std::collections::BTreeSet;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;
use crate::lattice::{CellKey, HexLattice};

/// Shape drawn by a selection drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionShape {
    /// Axis-aligned rectangle spanned by the two endpoints.
    #[default]
    Rectangle,
    /// Circle centered on the first endpoint through the second one.
    Circle,
}

/// A drag gesture, in both screen and logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub shape: SelectionShape,
    pub start_screen: DVec2,
    pub end_screen: DVec2,
    pub start_logical: DVec2,
    pub end_logical: DVec2,
}

impl Selection {
    /// Selection defined only by logical endpoints (screen points zeroed).
    pub fn logical(shape: SelectionShape, start: DVec2, end: DVec2) -> Self {
        Self {
            shape,
            start_screen: DVec2::ZERO,
            end_screen: DVec2::ZERO,
            start_logical: start,
            end_logical: end,
        }
    }

    pub fn radius(&self) -> f64 {
        self.start_logical.distance(self.end_logical)
    }

    /// Logical bounding box of the shape.
    pub fn bounds(&self) -> Bounds {
        match self.shape {
            SelectionShape::Rectangle => Bounds::from_corners(self.start_logical, self.end_logical),
            SelectionShape::Circle => {
                let r = DVec2::splat(self.radius());
                Bounds::from_corners(self.start_logical - r, self.start_logical + r)
            }
        }
    }

    /// Whether a logical point lies inside the shape (boundary included).
    pub fn contains(&self, p: DVec2) -> bool {
        match self.shape {
            SelectionShape::Rectangle => self.bounds().contains(p, 0.0),
            SelectionShape::Circle => {
                let r = self.radius();
                self.start_logical.distance_squared(p) <= r * r
            }
        }
    }
}

/// Cells whose centers lie inside `selection`, in row-major order.
///
/// `margin` pads the candidate row/column range derived from the bounding box.
pub fn compute_selection_keys(
    selection: &Selection,
    lattice: &HexLattice,
    margin: i32,
) -> BTreeSet<CellKey> {
    let mut keys = BTreeSet::new();
    if !selection.start_logical.is_finite() || !selection.end_logical.is_finite() {
        return keys;
    }
    let (rows, cols) = lattice.candidate_ranges(&selection.bounds(), margin);
    for row in rows {
        for col in cols.clone() {
            let key = CellKey::new(row, col);
            if selection.contains(lattice.cell_to_logical(key)) {
                keys.insert(key);
            }
        }
    }
    keys
}

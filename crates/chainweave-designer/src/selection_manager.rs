use std::collections::BTreeSet;

use glam::DVec2;
use tracing::debug;

use chainweave_core::constants::DEFAULT_SELECTION_MARGIN;

use crate::bounds::Bounds;
use crate::lattice::{CellKey, HexLattice};
use crate::selection::{compute_selection_keys, Selection, SelectionShape};

/// Manages the selection drag gesture and the last realized selection.
///
/// `SelectionManager` is responsible for:
/// - Tracking the drag endpoints while the pointer moves
/// - Recomputing the live cell set on demand (once per frame, driven by the session)
/// - Storing the realized key set as the "last selection" when a drag finishes
/// - Discarding a drag on cancel without touching the last selection
///
/// # Selection Model
///
/// - **Live drag**: endpoints update on every pointer move; the cell set is only
///   recomputed when [`SelectionManager::recompute_live`] runs
/// - **Last selection**: the cells of the most recent finished drag, used by
///   bulk paint, erase and overlay operations
#[derive(Debug, Clone)]
pub struct SelectionManager {
    drag: Option<Selection>,
    live_keys: BTreeSet<CellKey>,
    live_dirty: bool,
    last_selection: BTreeSet<CellKey>,
    margin: i32,
}

impl SelectionManager {
    /// Creates a manager with no drag and an empty last selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainweave_designer::selection_manager::SelectionManager;
    ///
    /// let manager = SelectionManager::new();
    /// assert!(!manager.is_dragging());
    /// assert!(manager.last_selection().is_empty());
    /// ```
    pub fn new() -> Self {
        Self::with_margin(DEFAULT_SELECTION_MARGIN)
    }

    /// Creates a manager that pads candidate ranges by `margin` cells.
    pub fn with_margin(margin: i32) -> Self {
        Self {
            drag: None,
            live_keys: BTreeSet::new(),
            live_dirty: false,
            last_selection: BTreeSet::new(),
            margin: margin.max(0),
        }
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The in-progress drag, if any.
    pub fn current(&self) -> Option<&Selection> {
        self.drag.as_ref()
    }

    /// Starts a drag.
    ///
    /// # Arguments
    ///
    /// * `shape` - Rectangle or circle
    /// * `screen` - Pointer position in pixels
    /// * `logical` - The same position in logical millimeters
    pub fn begin(&mut self, shape: SelectionShape, screen: DVec2, logical: DVec2) {
        self.drag = Some(Selection {
            shape,
            start_screen: screen,
            end_screen: screen,
            start_logical: logical,
            end_logical: logical,
        });
        self.live_keys.clear();
        self.live_dirty = true;
    }

    /// Moves the free endpoint of the drag.
    ///
    /// # Returns
    ///
    /// `true` if a drag is active and the live set now needs recomputing.
    pub fn update(&mut self, screen: DVec2, logical: DVec2) -> bool {
        match self.drag.as_mut() {
            Some(drag) => {
                drag.end_screen = screen;
                drag.end_logical = logical;
                self.live_dirty = true;
                true
            }
            None => false,
        }
    }

    /// Logical bounding box of the drag, cheap enough for every pointer move.
    pub fn live_bounds(&self) -> Option<Bounds> {
        self.drag.as_ref().map(|d| d.bounds())
    }

    /// Recomputes the live cell set if the drag moved since the last call.
    pub fn recompute_live(&mut self, lattice: &HexLattice) -> &BTreeSet<CellKey> {
        if self.live_dirty {
            if let Some(drag) = &self.drag {
                self.live_keys = compute_selection_keys(drag, lattice, self.margin);
            }
            self.live_dirty = false;
        }
        &self.live_keys
    }

    /// Cells of the live drag as of the last recomputation.
    pub fn live_keys(&self) -> &BTreeSet<CellKey> {
        &self.live_keys
    }

    /// Ends the drag and stores its cells as the last selection.
    ///
    /// # Returns
    ///
    /// The finished selection, or `None` when no drag was active.
    pub fn finish(&mut self, lattice: &HexLattice) -> Option<Selection> {
        let drag = self.drag.take()?;
        self.last_selection = compute_selection_keys(&drag, lattice, self.margin);
        self.live_keys.clear();
        self.live_dirty = false;
        debug!(
            "Selection finished: {:?}, {} cells",
            drag.shape,
            self.last_selection.len()
        );
        Some(drag)
    }

    /// Aborts the drag. The last selection is left as it was.
    ///
    /// # Returns
    ///
    /// `true` if a drag was discarded.
    pub fn cancel(&mut self) -> bool {
        self.live_keys.clear();
        self.live_dirty = false;
        self.drag.take().is_some()
    }

    pub fn last_selection(&self) -> &BTreeSet<CellKey> {
        &self.last_selection
    }

    /// Replaces the last selection (e.g. select-all or a programmatic pick).
    pub fn set_last_selection(&mut self, keys: BTreeSet<CellKey>) {
        self.last_selection = keys;
    }

    /// Clears the last selection. Returns `true` if it was non-empty.
    pub fn clear_last(&mut self) -> bool {
        let had = !self.last_selection.is_empty();
        self.last_selection.clear();
        had
    }
}

impl Default for SelectionManager {
    fn default() -> Self {
        Self::new()
    }
}

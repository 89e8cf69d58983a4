//! Ring editing, selection bulk operations, overlays and palettes.

use std::collections::BTreeSet;

use glam::DVec3;
use image::RgbaImage;
use tracing::{debug, info};

use chainweave_core::{
    AppEvent, OverlayError, PaletteError, PaletteEvent, ProjectError, RingEvent, SelectionEvent,
};

use super::{DesignerState, PendingOverlay};
use crate::calibration::CalibrationTable;
use crate::frame_scheduler::FrameWork;
use crate::geometry::RingGeometry;
use crate::lattice::CellKey;
use crate::overlay::{decode_overlay, OverlayParams, OverlaySampler};
use crate::palette::Palette;
use crate::ring_store::{BulkSummary, PlacementOutcome, Ring};

/// Which rings an overlay recolors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayScope {
    #[default]
    All,
    /// Rings inside the last selection.
    Selection,
}

impl DesignerState {
    /// Paints the cell under `screen` with the active color.
    pub fn paint_at(&mut self, screen: glam::DVec2) -> Option<PlacementOutcome> {
        let key = self.cell_at(screen)?;
        Some(self.paint_cell(key))
    }

    /// Erases the ring under `screen`, returning it if there was one.
    pub fn erase_at(&mut self, screen: glam::DVec2) -> Option<Ring> {
        let key = self.cell_at(screen)?;
        self.erase_cell(key)
    }

    /// Places the active color at `key`.
    pub fn paint_cell(&mut self, key: CellKey) -> PlacementOutcome {
        let outcome = self.store.place(key, self.active_color);
        if outcome != PlacementOutcome::Unchanged {
            let mut summary = BulkSummary::default();
            summary.record(outcome);
            self.commit(summary);
        }
        outcome
    }

    pub fn erase_cell(&mut self, key: CellKey) -> Option<Ring> {
        let removed = self.store.erase(key);
        if removed.is_some() {
            self.commit(BulkSummary {
                erased: 1,
                ..BulkSummary::default()
            });
        }
        removed
    }

    /// Paints every cell of the last selection, creating rings where needed.
    /// An empty selection does nothing.
    pub fn paint_selection(&mut self) -> BulkSummary {
        if self.selection.last_selection().is_empty() {
            return BulkSummary::default();
        }
        let summary = self
            .store
            .place_many(self.selection.last_selection(), self.active_color);
        self.commit(summary);
        self.maybe_rebase_origin();
        summary
    }

    /// Erases every ring in the last selection.
    pub fn erase_selection(&mut self) -> BulkSummary {
        if self.selection.last_selection().is_empty() {
            return BulkSummary::default();
        }
        let summary = self.store.erase_many(self.selection.last_selection());
        self.commit(summary);
        summary
    }

    /// Makes every placed ring the last selection.
    pub fn select_all(&mut self) -> usize {
        let keys: BTreeSet<CellKey> = self.store.sorted_keys().into_iter().collect();
        let cells = keys.len();
        self.selection.set_last_selection(keys);
        self.emit(AppEvent::Selection(SelectionEvent::Finished { cells }));
        self.request(FrameWork::Redraw);
        cells
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear_last() {
            self.emit(AppEvent::Selection(SelectionEvent::Cleared));
            self.request(FrameWork::Redraw);
        }
    }

    /// Removes every ring. The cluster counter keeps counting.
    pub fn clear_rings(&mut self) -> usize {
        let removed = self.store.clear();
        if removed > 0 {
            self.selection.clear_last();
            self.is_modified = true;
            self.emit(AppEvent::Rings(RingEvent::Replaced { total: 0 }));
            self.request(FrameWork::Redraw);
        }
        removed
    }

    /// Decodes `bytes` and recolors the rings in `scope` from the image.
    /// A decode or parameter error is returned before any ring changes.
    pub fn apply_overlay(
        &mut self,
        bytes: &[u8],
        params: OverlayParams,
        scope: OverlayScope,
    ) -> Result<BulkSummary, OverlayError> {
        let image = decode_overlay(bytes)?;
        self.apply_overlay_image(&image, params, scope)
    }

    /// Samples an already decoded image against a snapshot of the targets,
    /// then writes all colors back in one step.
    pub fn apply_overlay_image(
        &mut self,
        image: &RgbaImage,
        params: OverlayParams,
        scope: OverlayScope,
    ) -> Result<BulkSummary, OverlayError> {
        let targets = self.overlay_targets(scope);
        let result = {
            let sampler = OverlaySampler::new(image, params)?.with_palette(&self.palette);
            sampler.sample(&targets)
        };
        if targets.is_empty() {
            debug!("Overlay scope is empty");
            return Ok(BulkSummary::default());
        }
        let summary = self.store.recolor_many(result.updates);
        info!(
            "Overlay applied to {} rings: {} recolored, {} skipped",
            targets.len(),
            summary.recolored,
            result.skipped
        );
        self.emit(AppEvent::Rings(RingEvent::OverlayApplied {
            recolored: summary.recolored,
            skipped: result.skipped,
        }));
        self.commit(summary);
        Ok(summary)
    }

    /// Arms overlay picking: the next drag selects the rings to recolor.
    /// The image is decoded up front so a bad file fails here.
    pub fn begin_overlay_pick(
        &mut self,
        bytes: &[u8],
        params: OverlayParams,
    ) -> Result<(), OverlayError> {
        let image = decode_overlay(bytes)?;
        OverlaySampler::new(&image, params)?;
        self.cancel();
        self.overlay_pick = Some(PendingOverlay { image, params });
        Ok(())
    }

    pub fn is_picking_overlay(&self) -> bool {
        self.overlay_pick.is_some()
    }

    /// Replaces the active palette. Ring colors are kept as they are.
    pub fn set_palette(&mut self, palette: Palette) {
        info!(
            "Palette '{}' with {} colors",
            palette.name(),
            palette.len()
        );
        self.emit(AppEvent::Palette(PaletteEvent::PaletteChanged {
            name: palette.name().to_string(),
            entries: palette.len(),
        }));
        self.palette = palette;
        self.request(FrameWork::Redraw);
    }

    pub fn load_palette_json(&mut self, json: &str) -> Result<(), PaletteError> {
        let palette = Palette::from_json(json)?;
        self.set_palette(palette);
        Ok(())
    }

    /// Picks the active color by 1-based palette index.
    pub fn set_active_palette_index(&mut self, index: usize) -> bool {
        match self.palette.get(index) {
            Some(entry) => {
                self.active_color = entry.hex;
                true
            }
            None => {
                tracing::warn!("No palette entry {}", index);
                false
            }
        }
    }

    pub fn set_calibration(&mut self, table: Option<CalibrationTable>) {
        self.calibration.set(table);
        self.request(FrameWork::Redraw);
    }

    /// Changes ring dimensions. Invalid geometry is rejected and the current
    /// one is kept.
    pub fn set_geometry(&mut self, geometry: RingGeometry) -> Result<(), ProjectError> {
        geometry.validate()?;
        self.geometry = geometry;
        self.lattice = geometry.lattice();
        self.is_modified = true;
        self.request(FrameWork::Redraw);
        Ok(())
    }

    fn overlay_targets(&self, scope: OverlayScope) -> Vec<(CellKey, DVec3)> {
        let keys: Vec<CellKey> = match scope {
            OverlayScope::All => self.store.sorted_keys(),
            OverlayScope::Selection => self
                .selection
                .last_selection()
                .iter()
                .copied()
                .filter(|k| self.store.contains(*k))
                .collect(),
        };
        keys.into_iter()
            .map(|k| {
                let world = self
                    .viewport
                    .logical_to_world(self.lattice.cell_to_logical(k));
                (k, world)
            })
            .collect()
    }

    fn commit(&mut self, summary: BulkSummary) {
        if !summary.changed() {
            return;
        }
        self.is_modified = true;
        self.emit(AppEvent::Rings(summary.to_event(self.store.len())));
        self.request(FrameWork::Redraw);
    }
}

//! Derived views of the session: BOM, CSV, render list and assembly map.
//! Each is computed from a snapshot and never mutates the session.

use crate::bom::{build_bom, Bom, BomMode};
use crate::connectivity::{linked_components, Components};
use crate::export::{build_assembly_map, rings_to_csv, AssemblyMap, AssemblyMapOptions};
use crate::render::{build_render_list, RenderFrame};

use super::DesignerState;

impl DesignerState {
    /// BOM with the session's pack size and mode.
    pub fn bom(&self) -> Bom {
        self.bom_with(self.options.pack_size, self.options.bom_mode)
    }

    pub fn bom_with(&self, pack_size: usize, mode: BomMode) -> Bom {
        build_bom(
            self.store.iter().map(|(_, ring)| ring.color),
            &self.palette,
            pack_size,
            mode,
        )
    }

    pub fn rings_csv(&self) -> String {
        rings_to_csv(&self.store, &self.geometry, &self.palette)
    }

    /// Everything the rendering collaborator needs for one frame.
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame {
            rings: build_render_list(&self.store, &self.geometry, &self.viewport, &self.calibration),
            camera: self.viewport.camera_snapshot(),
            camera_distance: self.viewport.camera_distance(),
            span: self.span(),
        }
    }

    pub fn assembly_map(&self, options: &AssemblyMapOptions) -> AssemblyMap {
        build_assembly_map(
            &self.store,
            &self.geometry,
            &self.palette,
            &self.calibration,
            options,
        )
    }

    /// Chain-linked groups of rings.
    pub fn components(&self) -> Components {
        linked_components(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::lattice::CellKey;

    fn three_rings() -> DesignerState {
        let mut state = DesignerState::new();
        state.set_active_color(HexColor::new(255, 0, 0));
        state.paint_cell(CellKey::new(0, 0));
        state.paint_cell(CellKey::new(0, 1));
        state.set_active_color(HexColor::new(0, 255, 0));
        state.paint_cell(CellKey::new(1, 0));
        state
    }

    #[test]
    fn test_session_bom_counts_colors() {
        let bom = three_rings().bom();
        assert_eq!(bom.total_rings, 3);
        let red = bom.line_for(HexColor::new(255, 0, 0)).unwrap();
        assert_eq!((red.count, red.packs), (2, 1));
        let green = bom.line_for(HexColor::new(0, 255, 0)).unwrap();
        assert_eq!((green.count, green.packs), (1, 1));
    }

    #[test]
    fn test_render_frame_carries_camera_and_span() {
        let mut state = three_rings();
        state.set_viewport_size(640.0, 480.0);
        let frame = state.render_frame();
        assert_eq!(frame.rings.len(), 3);
        assert!((frame.camera_distance - state.viewport().camera_distance()).abs() < 1e-12);
        let span = frame.span.unwrap();
        assert!(span.contains(CellKey::new(-2, -2)));
    }

    #[test]
    fn test_components_of_linked_rings() {
        let state = three_rings();
        assert_eq!(state.components().len(), 1);
    }

    #[test]
    fn test_csv_has_a_line_per_ring() {
        let csv = three_rings().rings_csv();
        assert_eq!(csv.lines().filter(|l| !l.starts_with('#')).count(), 4);
    }
}

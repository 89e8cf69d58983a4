//! Editing session state for UI integration.
//! Owns the ring collection, camera and palette, and turns pointer input into
//! lattice edits.
//!
//! This module is split into submodules for better organization:
//! - `input`: Pointer, wheel and cancel handling, per-frame work
//! - `editing`: Paint/erase, selection bulk operations, overlays, palettes
//! - `exports`: BOM, CSV, render list and assembly map
//! - `file_io`: Save/load operations

mod editing;
mod exports;
mod file_io;
mod input;

use std::path::PathBuf;
use std::sync::Arc;

use glam::DVec2;
use image::RgbaImage;
use tracing::debug;

use chainweave_core::constants::{
    DEFAULT_BASE_DISTANCE, DEFAULT_FOV_DEG, DEFAULT_PACK_SIZE, DEFAULT_SELECTION_MARGIN, MAX_ZOOM,
    MIN_ZOOM, ORIGIN_REBASE_DISTANCE, SPAN_PADDING, ZOOM_STEP,
};
use chainweave_core::{AppEvent, EventBus, ViewEvent};

pub use editing::OverlayScope;

use crate::bom::BomMode;
use crate::calibration::CalibrationContext;
use crate::camera::PerspectiveCamera;
use crate::color::HexColor;
use crate::frame_scheduler::{FrameWork, RedrawScheduler};
use crate::geometry::RingGeometry;
use crate::lattice::{HexLattice, LatticeSpan};
use crate::overlay::OverlayParams;
use crate::palette::Palette;
use crate::ring_store::RingStore;
use crate::selection_manager::SelectionManager;
use crate::serialization::ProjectMetadata;
use crate::viewport::{ViewState, Viewport};

/// Session-level settings, usually derived from the user's configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom factor per wheel notch.
    pub zoom_step: f64,
    pub fov_deg: f64,
    pub base_distance: f64,
    pub selection_margin: i32,
    pub pack_size: usize,
    pub bom_mode: BomMode,
    pub overlay: OverlayParams,
    pub geometry: RingGeometry,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            fov_deg: DEFAULT_FOV_DEG,
            base_distance: DEFAULT_BASE_DISTANCE,
            selection_margin: DEFAULT_SELECTION_MARGIN,
            pack_size: DEFAULT_PACK_SIZE as usize,
            bom_mode: BomMode::UsedOnly,
            overlay: OverlayParams::default(),
            geometry: RingGeometry::default(),
        }
    }
}

/// Active pointer tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Paint,
    Erase,
    SelectRect,
    SelectCircle,
    Pan,
}

/// Gesture in progress between pointer down and pointer up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Gesture {
    Paint { last: crate::lattice::CellKey },
    Erase { last: crate::lattice::CellKey },
    Pan { last_screen: DVec2 },
    Select,
}

/// Overlay waiting for the user to drag its scope.
#[derive(Debug, Clone)]
pub(crate) struct PendingOverlay {
    pub image: RgbaImage,
    pub params: OverlayParams,
}

/// Editing session for UI integration
#[derive(Debug)]
pub struct DesignerState {
    pub(crate) store: RingStore,
    pub(crate) geometry: RingGeometry,
    pub(crate) lattice: HexLattice,
    pub(crate) viewport: Viewport,
    pub(crate) palette: Palette,
    pub(crate) calibration: CalibrationContext,
    pub(crate) bus: Arc<EventBus>,
    pub(crate) selection: SelectionManager,
    pub(crate) scheduler: RedrawScheduler,
    pub(crate) options: SessionOptions,
    pub(crate) tool: Tool,
    pub(crate) active_color: HexColor,
    pub(crate) gesture: Option<Gesture>,
    pub(crate) overlay_pick: Option<PendingOverlay>,
    pub(crate) metadata: ProjectMetadata,
    pub current_file_path: Option<PathBuf>,
    pub is_modified: bool,
}

impl DesignerState {
    /// Creates a session with default options and its own event bus.
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default(), Arc::new(EventBus::new()))
    }

    pub fn with_options(options: SessionOptions, bus: Arc<EventBus>) -> Self {
        let camera = PerspectiveCamera {
            fov_deg: options.fov_deg,
            base_distance: options.base_distance,
            ..PerspectiveCamera::default()
        };
        let view = ViewState::new(options.min_zoom, options.max_zoom);
        let geometry = options.geometry;
        Self {
            store: RingStore::new(),
            geometry,
            lattice: geometry.lattice(),
            viewport: Viewport::with_camera(0.0, 0.0, camera, view),
            palette: Palette::default(),
            calibration: CalibrationContext::new(bus.clone()),
            selection: SelectionManager::with_margin(options.selection_margin),
            scheduler: RedrawScheduler::new(),
            bus,
            options,
            tool: Tool::default(),
            active_color: HexColor::new(0xc0, 0xc0, 0xc0),
            gesture: None,
            overlay_pick: None,
            metadata: ProjectMetadata::new("Untitled"),
            current_file_path: None,
            is_modified: false,
        }
    }

    /// Sets the tool from a UI index.
    pub fn set_mode(&mut self, mode: i32) {
        let tool = match mode {
            0 => Tool::Paint,
            1 => Tool::Erase,
            2 => Tool::SelectRect,
            3 => Tool::SelectCircle,
            4 => Tool::Pan,
            unknown => {
                tracing::warn!("Unknown tool {}, defaulting to Paint", unknown);
                Tool::Paint
            }
        };
        self.set_tool(tool);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            self.cancel();
            self.tool = tool;
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_active_color(&mut self, color: HexColor) {
        self.active_color = color;
    }

    pub fn active_color(&self) -> HexColor {
        self.active_color
    }

    pub fn rings(&self) -> &RingStore {
        &self.store
    }

    pub fn geometry(&self) -> &RingGeometry {
        &self.geometry
    }

    pub fn lattice(&self) -> &HexLattice {
        &self.lattice
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn calibration(&self) -> &CalibrationContext {
        &self.calibration
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn design_name(&self) -> &str {
        &self.metadata.name
    }

    pub fn set_design_name(&mut self, name: impl Into<String>) {
        self.metadata.name = name.into();
        self.is_modified = true;
    }

    /// Lays out the viewport. Transforms return the origin until this is called
    /// with a non-zero size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport.set_canvas_size(width, height);
        self.request(FrameWork::Redraw);
    }

    /// Occupied span plus framing padding.
    pub fn span(&self) -> Option<LatticeSpan> {
        self.store.span().map(|s| s.padded(SPAN_PADDING))
    }

    /// Moves the camera to show every ring. Does nothing for an empty design.
    pub fn frame_content(&mut self) {
        let Some(span) = self.span() else {
            return;
        };
        let bounds = span.logical_bounds(&self.lattice);
        self.viewport.frame_bounds(&bounds);
        let origin = self.viewport.view().origin();
        self.emit(AppEvent::View(ViewEvent::OriginRebased {
            x: origin.x,
            y: origin.y,
        }));
        self.emit(AppEvent::View(ViewEvent::Zoomed {
            zoom: self.viewport.zoom(),
        }));
        self.request(FrameWork::Redraw);
    }

    /// Recenters the floating origin on the design once it has drifted far
    /// from it. Pan is compensated, so nothing moves on screen.
    pub(crate) fn maybe_rebase_origin(&mut self) {
        let Some(span) = self.store.span() else {
            return;
        };
        let center = span.logical_bounds(&self.lattice).center();
        let origin = self.viewport.view().origin();
        if center.distance(origin) > ORIGIN_REBASE_DISTANCE {
            debug!(
                "Rebasing origin from ({:.1}, {:.1}) to ({:.1}, {:.1})",
                origin.x, origin.y, center.x, center.y
            );
            self.viewport.view_mut().rebase_origin(center);
            self.emit(AppEvent::View(ViewEvent::OriginRebased {
                x: center.x,
                y: center.y,
            }));
        }
    }

    pub(crate) fn request(&mut self, work: FrameWork) -> bool {
        self.scheduler.request(work)
    }

    /// Publishes on the session bus. Having no listeners is normal.
    pub(crate) fn emit(&self, event: AppEvent) {
        self.bus.publish(event);
    }
}

impl Default for DesignerState {
    fn default() -> Self {
        Self::new()
    }
}

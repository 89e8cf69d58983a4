//! Render records handed to the rendering collaborator.
//!
//! The core does not draw rings in 3D. It supplies positions, dimensions,
//! tilt and display colors, plus the camera state to draw them with.

use serde::Serialize;

use crate::calibration::CalibrationContext;
use crate::camera::CameraSnapshot;
use crate::color::HexColor;
use crate::geometry::RingGeometry;
use crate::lattice::LatticeSpan;
use crate::ring_store::RingStore;
use crate::viewport::Viewport;

/// Geometry and color for one ring, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RingRenderRecord {
    pub row: i32,
    pub col: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub inner_diameter: f64,
    pub wire_diameter: f64,
    /// Distance from ring center to wire centerline.
    pub radius: f64,
    /// Tilt in degrees (angle in on even rows, angle out on odd rows).
    pub tilt: f64,
    /// Display color after calibration.
    pub color: HexColor,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrame {
    pub rings: Vec<RingRenderRecord>,
    pub camera: CameraSnapshot,
    pub camera_distance: f64,
    /// Occupied extent plus framing padding, `None` when there are no rings.
    pub span: Option<LatticeSpan>,
}

/// Builds render records for every ring, in row-major order.
pub fn build_render_list(
    store: &RingStore,
    geometry: &RingGeometry,
    viewport: &Viewport,
    calibration: &CalibrationContext,
) -> Vec<RingRenderRecord> {
    let lattice = geometry.lattice();
    let radius = geometry.radius();
    store
        .snapshot()
        .into_iter()
        .map(|(key, ring)| {
            let world = viewport.logical_to_world(lattice.cell_to_logical(key));
            RingRenderRecord {
                row: key.row,
                col: key.col,
                x: world.x,
                y: world.y,
                z: world.z,
                inner_diameter: geometry.inner_diameter,
                wire_diameter: geometry.wire_diameter,
                radius,
                tilt: geometry.tilt_for_row(key.row),
                color: calibration.display_color(ring.color),
            }
        })
        .collect()
}

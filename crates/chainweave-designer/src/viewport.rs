//! Viewport and coordinate transformation pipeline.
//!
//! Converts between the four coordinate spaces used by the editor:
//!
//! ```text
//! screen pixel  <->  NDC  <->  world (z = 0 plane)  <->  logical mm  <->  lattice cell
//!   (0,0) top-left           perspective camera       floating origin,
//!                                                     pan, Y flip
//! ```
//!
//! World coordinates are logical coordinates shifted by the floating origin and
//! the pan offset, with Y flipped so that logical +Y (row index growing) points
//! down the screen the way the rendering collaborator expects. Keeping the
//! floating origin near the middle of the design keeps world coordinates small
//! even for designs far from the logical origin.

use std::fmt;

use glam::{DVec2, DVec3};

use chainweave_core::constants::{MAX_ZOOM, MIN_ZOOM, TRANSFORM_EPSILON, VIEW_PADDING, ZOOM_STEP};

use crate::bounds::Bounds;
use crate::camera::{CameraSnapshot, PerspectiveCamera};
use crate::lattice::{CellKey, HexLattice};

/// Zoom, pan and floating origin of the editing session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    pan: DVec2,
    origin: DVec2,
}

impl ViewState {
    /// Creates a view state with the given zoom bounds (swapped if inverted).
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        let lo = min_zoom.min(max_zoom).max(TRANSFORM_EPSILON);
        let hi = min_zoom.max(max_zoom).max(lo);
        Self {
            zoom: 1.0_f64.clamp(lo, hi),
            min_zoom: lo,
            max_zoom: hi,
            pan: DVec2::ZERO,
            origin: DVec2::ZERO,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_bounds(&self) -> (f64, f64) {
        (self.min_zoom, self.max_zoom)
    }

    /// Sets the zoom, clamped to the configured bounds. Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    /// Pan offset in logical millimeters.
    pub fn pan(&self) -> DVec2 {
        self.pan
    }

    pub fn set_pan(&mut self, pan: DVec2) {
        if pan.is_finite() {
            self.pan = pan;
        }
    }

    pub fn pan_by(&mut self, delta: DVec2) {
        self.set_pan(self.pan + delta);
    }

    /// Floating origin in logical millimeters.
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Moves the floating origin while compensating the pan offset, so every
    /// logical point keeps its world (and therefore screen) position.
    pub fn rebase_origin(&mut self, origin: DVec2) {
        if !origin.is_finite() {
            return;
        }
        self.pan += self.origin - origin;
        self.origin = origin;
    }

    /// Moves the floating origin and resets the pan (used when framing content).
    pub fn recenter(&mut self, origin: DVec2) {
        if origin.is_finite() {
            self.origin = origin;
            self.pan = DVec2::ZERO;
        }
    }

    /// Combined logical offset subtracted before projection.
    fn shift(&self) -> DVec2 {
        self.origin + self.pan
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(MIN_ZOOM, MAX_ZOOM)
    }
}

/// Represents the viewport transformation state (camera, size, zoom and pan).
#[derive(Debug, Clone)]
pub struct Viewport {
    canvas_width: f64,
    canvas_height: f64,
    camera: PerspectiveCamera,
    view: ViewState,
}

impl Viewport {
    /// Creates a viewport with the default camera and zoom bounds.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self::with_camera(
            canvas_width,
            canvas_height,
            PerspectiveCamera::default(),
            ViewState::default(),
        )
    }

    pub fn with_camera(
        canvas_width: f64,
        canvas_height: f64,
        camera: PerspectiveCamera,
        view: ViewState,
    ) -> Self {
        Self {
            canvas_width,
            canvas_height,
            camera,
            view,
        }
    }

    /// A viewport that has not been laid out yet (zero size).
    pub fn uninitialized() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the host window resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// True once the host has given the viewport a usable size.
    pub fn is_ready(&self) -> bool {
        self.canvas_width.is_finite()
            && self.canvas_height.is_finite()
            && self.canvas_width >= 1.0
            && self.canvas_height >= 1.0
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: PerspectiveCamera) {
        self.camera = camera;
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn zoom(&self) -> f64 {
        self.view.zoom()
    }

    fn safe_width(&self) -> f64 {
        self.canvas_width.max(TRANSFORM_EPSILON)
    }

    fn safe_height(&self) -> f64 {
        self.canvas_height.max(TRANSFORM_EPSILON)
    }

    pub fn aspect(&self) -> f64 {
        self.safe_width() / self.safe_height()
    }

    /// Current distance between the camera and the ring plane.
    pub fn camera_distance(&self) -> f64 {
        self.camera.distance(self.view.zoom())
    }

    pub fn camera_snapshot(&self) -> CameraSnapshot {
        self.camera.snapshot(self.view.zoom(), self.aspect())
    }

    /// Pixel (0,0 top-left, Y down) to normalized device coordinates (Y up).
    pub fn screen_to_ndc(&self, screen: DVec2) -> DVec2 {
        DVec2::new(
            screen.x / self.safe_width() * 2.0 - 1.0,
            1.0 - screen.y / self.safe_height() * 2.0,
        )
    }

    pub fn ndc_to_screen(&self, ndc: DVec2) -> DVec2 {
        DVec2::new(
            (ndc.x + 1.0) * 0.5 * self.safe_width(),
            (1.0 - ndc.y) * 0.5 * self.safe_height(),
        )
    }

    /// Intersects the view ray through a pixel with the `z = 0` plane.
    ///
    /// Returns the world origin before the viewport has been laid out or when
    /// the camera matrices are degenerate.
    pub fn screen_to_world(&self, screen: DVec2) -> DVec3 {
        if !self.is_ready() || !screen.is_finite() {
            return DVec3::ZERO;
        }
        let ndc = self.screen_to_ndc(screen);
        match self
            .camera
            .ray_through_ndc(ndc.x, ndc.y, self.view.zoom(), self.aspect())
        {
            Some(ray) => ray.intersect_ground(),
            None => DVec3::ZERO,
        }
    }

    /// Projects a world point to pixel coordinates.
    pub fn world_to_screen(&self, world: DVec3) -> DVec2 {
        if !self.is_ready() || !world.is_finite() {
            return DVec2::ZERO;
        }
        let view_proj = self.camera.view_projection(self.view.zoom(), self.aspect());
        let ndc = view_proj.project_point3(world);
        if !ndc.is_finite() {
            return DVec2::ZERO;
        }
        self.ndc_to_screen(DVec2::new(ndc.x, ndc.y))
    }

    /// World position (on the ring plane) of a logical point.
    pub fn logical_to_world(&self, logical: DVec2) -> DVec3 {
        let shifted = logical - self.view.shift();
        DVec3::new(shifted.x, -shifted.y, 0.0)
    }

    /// Logical position of a world point; undoes the Y flip, pan and floating origin.
    pub fn world_to_logical(&self, world: DVec3) -> DVec2 {
        DVec2::new(world.x, -world.y) + self.view.shift()
    }

    pub fn screen_to_logical(&self, screen: DVec2) -> DVec2 {
        self.world_to_logical(self.screen_to_world(screen))
    }

    pub fn logical_to_screen(&self, logical: DVec2) -> DVec2 {
        self.world_to_screen(self.logical_to_world(logical))
    }

    /// Lattice cell under a pixel.
    pub fn screen_to_cell(&self, screen: DVec2, lattice: &HexLattice) -> CellKey {
        lattice.logical_to_cell(self.screen_to_logical(screen))
    }

    /// On-screen radius (pixels) of a circle of `radius` mm centered at `logical`.
    pub fn screen_radius(&self, logical: DVec2, radius: f64) -> f64 {
        let center = self.logical_to_screen(logical);
        let edge = self.logical_to_screen(logical + DVec2::new(radius, 0.0));
        center.distance(edge)
    }

    /// Sets the zoom while keeping the logical point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: DVec2, new_zoom: f64) {
        let before = self.screen_to_logical(screen);
        self.view.set_zoom(new_zoom);
        let after = self.screen_to_logical(screen);
        self.view.pan_by(before - after);
    }

    pub fn zoom_in_at(&mut self, screen: DVec2) {
        self.zoom_at(screen, self.view.zoom() * ZOOM_STEP);
    }

    pub fn zoom_out_at(&mut self, screen: DVec2) {
        self.zoom_at(screen, self.view.zoom() / ZOOM_STEP);
    }

    /// Pans so the logical point under `from` ends up under `to`.
    pub fn pan_by_screen(&mut self, from: DVec2, to: DVec2) {
        let delta = self.screen_to_logical(from) - self.screen_to_logical(to);
        self.view.pan_by(delta);
    }

    /// Recenters on `bounds` and picks the zoom that fits them with padding.
    pub fn frame_bounds(&mut self, bounds: &Bounds) {
        self.view.recenter(bounds.center());

        let size = bounds.size();
        let padding_factor = (1.0 - VIEW_PADDING * 2.0).max(TRANSFORM_EPSILON);
        let half_height_needed = (size.y * 0.5)
            .max(size.x * 0.5 / self.aspect())
            .max(TRANSFORM_EPSILON)
            / padding_factor;
        let half_fov_tan = (self.camera.fov_deg.to_radians() * 0.5).tan();
        self.view
            .set_zoom(self.camera.base_distance * half_fov_tan / half_height_needed);
    }

    /// Resets zoom to 1.0 and clears the pan offset.
    pub fn reset(&mut self) {
        self.view.set_zoom(1.0);
        self.view.set_pan(DVec2::ZERO);
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pan = self.view.pan();
        let origin = self.view.origin();
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1}) | Origin: ({:.1}, {:.1})",
            self.view.zoom(),
            pan.x,
            pan.y,
            origin.x,
            origin.y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

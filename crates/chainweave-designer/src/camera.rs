//! Perspective camera used to project the ring plane.
//!
//! The camera looks straight down the -Z axis at the `z = 0` plane where all
//! rings live. Zoom moves the camera along its view axis
//! (`distance = base_distance / zoom`) instead of scaling content, so the
//! projected size of fixed-size rings changes the way a real lens would.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

use chainweave_core::constants::{DEFAULT_BASE_DISTANCE, DEFAULT_FOV_DEG, TRANSFORM_EPSILON};

/// Lens and placement parameters of the perspective camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    /// Camera distance from the plane at zoom 1.0.
    pub base_distance: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov_deg: DEFAULT_FOV_DEG,
            base_distance: DEFAULT_BASE_DISTANCE,
            near: 0.1,
            far: 100_000.0,
        }
    }
}

/// Camera state handed to the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    pub eye: DVec3,
    pub target: DVec3,
    pub up: DVec3,
    pub fov_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub distance: f64,
}

/// A ray in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Point where the ray crosses `z = 0`.
    ///
    /// A direction parallel to the plane has its z-component floored to an
    /// epsilon (keeping its sign) instead of dividing by zero.
    pub fn intersect_ground(&self) -> DVec3 {
        let mut dz = self.direction.z;
        if dz.abs() < TRANSFORM_EPSILON {
            dz = if dz.is_sign_negative() {
                -TRANSFORM_EPSILON
            } else {
                TRANSFORM_EPSILON
            };
        }
        let t = -self.origin.z / dz;
        let hit = self.origin + self.direction * t;
        DVec3::new(hit.x, hit.y, 0.0)
    }
}

impl PerspectiveCamera {
    /// Camera distance for a zoom factor. Zoom is floored to an epsilon.
    pub fn distance(&self, zoom: f64) -> f64 {
        self.base_distance / zoom.max(TRANSFORM_EPSILON)
    }

    pub fn eye(&self, zoom: f64) -> DVec3 {
        DVec3::new(0.0, 0.0, self.distance(zoom))
    }

    pub fn view_matrix(&self, zoom: f64) -> DMat4 {
        DMat4::look_at_rh(self.eye(zoom), DVec3::ZERO, DVec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f64) -> DMat4 {
        DMat4::perspective_rh(
            self.fov_deg.to_radians(),
            aspect.max(TRANSFORM_EPSILON),
            self.near,
            self.far,
        )
    }

    /// Combined projection * view matrix.
    pub fn view_projection(&self, zoom: f64, aspect: f64) -> DMat4 {
        self.projection_matrix(aspect) * self.view_matrix(zoom)
    }

    /// World-space ray through a normalized device coordinate.
    ///
    /// Returns `None` when the view-projection matrix is not invertible.
    pub fn ray_through_ndc(&self, ndc_x: f64, ndc_y: f64, zoom: f64, aspect: f64) -> Option<Ray> {
        let view_proj = self.view_projection(zoom, aspect);
        if view_proj.determinant().abs() < f64::MIN_POSITIVE {
            return None;
        }
        let inverse = view_proj.inverse();
        // glam's right-handed perspective maps depth to [0, 1].
        let near = inverse.project_point3(DVec3::new(ndc_x, ndc_y, 0.0));
        let far = inverse.project_point3(DVec3::new(ndc_x, ndc_y, 1.0));
        let direction = far - near;
        if !direction.is_finite() || !near.is_finite() {
            return None;
        }
        Some(Ray {
            origin: near,
            direction,
        })
    }

    pub fn snapshot(&self, zoom: f64, aspect: f64) -> CameraSnapshot {
        CameraSnapshot {
            eye: self.eye(zoom),
            target: DVec3::ZERO,
            up: DVec3::Y,
            fov_deg: self.fov_deg,
            aspect,
            near: self.near,
            far: self.far,
            distance: self.distance(zoom),
        }
    }
}

//! Per-project ring geometry.
//!
//! Ring dimensions are shared by every ring of a project; only color and
//! cluster are per ring.

use serde::{Deserialize, Serialize};

use chainweave_core::{parse_length, MeasurementSystem, ProjectError, WireGauge};

use crate::lattice::HexLattice;

/// Shared ring dimensions and lattice spacing, in millimeters and degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingGeometry {
    pub inner_diameter: f64,
    pub wire_diameter: f64,
    pub center_spacing: f64,
    /// Tilt of rings on even rows.
    pub angle_in: f64,
    /// Tilt of rings on odd rows.
    pub angle_out: f64,
}

impl Default for RingGeometry {
    fn default() -> Self {
        Self {
            inner_diameter: 7.94,
            wire_diameter: 1.6,
            center_spacing: 8.0,
            angle_in: 25.0,
            angle_out: -25.0,
        }
    }
}

impl RingGeometry {
    /// Geometry from user-entered length strings ("5/16in", "1.6", "8mm").
    ///
    /// Angles and spacing keep their defaults; spacing follows the inner
    /// diameter when `spacing` is `None`.
    pub fn from_strings(
        inner_diameter: &str,
        wire_diameter: &str,
        spacing: Option<&str>,
        system: MeasurementSystem,
    ) -> Result<Self, ProjectError> {
        let parse = |field: &str, value: &str| {
            parse_length(value, system).map_err(|reason| ProjectError::InvalidField {
                field: field.to_string(),
                context: "geometry".to_string(),
                reason,
            })
        };
        let inner_diameter = parse("innerDiameter", inner_diameter)?;
        let wire_diameter = parse("wireDiameter", wire_diameter)?;
        let center_spacing = match spacing {
            Some(s) => parse("centerSpacing", s)?,
            None => inner_diameter,
        };
        let geometry = Self {
            inner_diameter,
            wire_diameter,
            center_spacing,
            ..Self::default()
        };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Replaces the wire diameter with a standard gauge size.
    pub fn with_gauge(mut self, gauge: WireGauge, number: u32) -> Result<Self, ProjectError> {
        self.wire_diameter = gauge.diameter_mm(number).ok_or_else(|| ProjectError::InvalidField {
            field: "wireDiameter".to_string(),
            context: "geometry".to_string(),
            reason: format!("unknown gauge {} {}", gauge, number),
        })?;
        Ok(self)
    }

    /// Rejects non-finite or non-positive dimensions.
    pub fn validate(&self) -> Result<(), ProjectError> {
        let positive = [
            ("innerDiameter", self.inner_diameter),
            ("wireDiameter", self.wire_diameter),
            ("centerSpacing", self.center_spacing),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProjectError::InvalidField {
                    field: field.to_string(),
                    context: "geometry".to_string(),
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }
        for (field, value) in [("angleIn", self.angle_in), ("angleOut", self.angle_out)] {
            if !value.is_finite() {
                return Err(ProjectError::InvalidField {
                    field: field.to_string(),
                    context: "geometry".to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn lattice(&self) -> HexLattice {
        HexLattice::new(self.center_spacing)
    }

    /// Radius to the wire centerline.
    pub fn radius(&self) -> f64 {
        self.inner_diameter / 2.0 + self.wire_diameter / 2.0
    }

    pub fn outer_diameter(&self) -> f64 {
        self.inner_diameter + 2.0 * self.wire_diameter
    }

    /// Inner diameter over wire diameter.
    pub fn aspect_ratio(&self) -> f64 {
        self.inner_diameter / self.wire_diameter.max(f64::EPSILON)
    }

    /// Tilt in degrees for a ring on `row`.
    pub fn tilt_for_row(&self, row: i32) -> f64 {
        if row & 1 == 0 {
            self.angle_in
        } else {
            self.angle_out
        }
    }
}

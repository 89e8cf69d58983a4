//! Shared numeric constants.

/// Vertical row pitch as a fraction of the horizontal center spacing.
///
/// Rows of a staggered hex lattice sit `spacing * ROW_FACTOR` apart. The value is
/// the truncated `sqrt(3) / 2` used by saved projects, so it must not be replaced
/// with the exact constant or existing designs would shift.
pub const ROW_FACTOR: f64 = 0.866;

/// Smallest magnitude used in place of a zero denominator in the transform pipeline.
pub const TRANSFORM_EPSILON: f64 = 1e-9;

/// Default minimum zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Default maximum zoom factor.
pub const MAX_ZOOM: f64 = 50.0;

/// Multiplicative zoom step for one wheel notch.
pub const ZOOM_STEP: f64 = 1.2;

/// Default vertical field of view of the perspective camera, in degrees.
pub const DEFAULT_FOV_DEG: f64 = 45.0;

/// Default camera distance (mm) at zoom 1.0.
pub const DEFAULT_BASE_DISTANCE: f64 = 240.0;

/// Rings per supplier pack.
pub const DEFAULT_PACK_SIZE: u32 = 1500;

/// Row/column padding added around selection bounding boxes.
pub const DEFAULT_SELECTION_MARGIN: i32 = 2;

/// Padding (in cells) added around the live span for camera framing.
pub const SPAN_PADDING: i32 = 2;

/// Source pixels with alpha at or below this value never recolor a ring.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 8;

/// Fraction of the viewport reserved on each side when framing content.
pub const VIEW_PADDING: f64 = 0.05;

/// Palette entries per printed order-sheet page.
pub const BOM_ROWS_PER_PAGE: usize = 12;

/// Distance (mm) between the floating origin and the design center that triggers a rebase.
pub const ORIGIN_REBASE_DISTANCE: f64 = 1000.0;

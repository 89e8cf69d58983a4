//! Image overlay color sampling.
//!
//! Assigns ring colors from a raster image in one bulk step. The bounding box
//! of the target rings' world positions is mapped onto the image (after
//! offset, scale, tiling and crop); each ring takes the color of the pixel
//! under its center, blended over white by the pixel alpha and the overlay
//! opacity. Sampling reads a snapshot and produces a list of updates; nothing
//! is written to the ring collection here.

use glam::{DVec2, DVec3};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use chainweave_core::constants::DEFAULT_ALPHA_THRESHOLD;
use chainweave_core::OverlayError;

use crate::bounds::Bounds;
use crate::color::HexColor;
use crate::lattice::CellKey;
use crate::palette::Palette;

/// Placement of the image over the target rings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayParams {
    /// Shift in normalized image units (1.0 = one image width/height).
    pub offset: DVec2,
    /// Image size relative to the targets' bounding box.
    pub scale: f64,
    pub tile_x: bool,
    pub tile_y: bool,
    /// Normalized crop rectangle `[u0, v0, u1, v1]`.
    pub crop: [f64; 4],
    pub opacity: f64,
    /// Pixels with alpha at or below this never recolor a ring.
    pub alpha_threshold: u8,
    /// Snap sampled colors to the active palette.
    pub snap_to_palette: bool,
}

impl Default for OverlayParams {
    fn default() -> Self {
        Self {
            offset: DVec2::ZERO,
            scale: 1.0,
            tile_x: false,
            tile_y: false,
            crop: [0.0, 0.0, 1.0, 1.0],
            opacity: 1.0,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            snap_to_palette: false,
        }
    }
}

impl OverlayParams {
    pub fn validate(&self) -> Result<(), OverlayError> {
        let invalid = |param: &str, reason: &str| OverlayError::InvalidParameter {
            param: param.to_string(),
            reason: reason.to_string(),
        };
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(invalid("scale", "must be a positive number"));
        }
        if !self.offset.is_finite() {
            return Err(invalid("offset", "must be finite"));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(invalid("opacity", "must be between 0 and 1"));
        }
        let [u0, v0, u1, v1] = self.crop;
        let in_unit = |x: f64| x.is_finite() && (0.0..=1.0).contains(&x);
        if !(in_unit(u0) && in_unit(v0) && in_unit(u1) && in_unit(v1)) || u0 >= u1 || v0 >= v1 {
            return Err(invalid("crop", "must be an increasing rectangle inside [0, 1]"));
        }
        Ok(())
    }
}

/// Colors computed for an overlay application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayResult {
    /// New color per ring, in the order targets were given.
    pub updates: Vec<(CellKey, HexColor)>,
    /// Targets left unchanged (transparent pixel or untiled out-of-range).
    pub skipped: usize,
}

/// Decodes image bytes. Any failure happens before rings are touched.
pub fn decode_overlay(bytes: &[u8]) -> Result<RgbaImage, OverlayError> {
    let img = image::load_from_memory(bytes).map_err(|e| OverlayError::Decode {
        reason: e.to_string(),
    })?;
    to_overlay_image(img)
}

/// Converts an already decoded image, rejecting empty ones.
pub fn to_overlay_image(img: DynamicImage) -> Result<RgbaImage, OverlayError> {
    let rgba = img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(OverlayError::EmptyImage {
            width: rgba.width(),
            height: rgba.height(),
        });
    }
    Ok(rgba)
}

/// Samples an image at ring positions.
pub struct OverlaySampler<'a> {
    image: &'a RgbaImage,
    params: OverlayParams,
    palette: Option<&'a Palette>,
}

impl<'a> OverlaySampler<'a> {
    pub fn new(image: &'a RgbaImage, params: OverlayParams) -> Result<Self, OverlayError> {
        params.validate()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(OverlayError::EmptyImage {
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self {
            image,
            params,
            palette: None,
        })
    }

    /// Palette used when `snap_to_palette` is set.
    pub fn with_palette(mut self, palette: &'a Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Normalized image coordinate for a world position inside `frame`, or
    /// `None` when it falls outside an untiled axis.
    ///
    /// World +Y points up while image rows grow downward, so `v` is flipped.
    pub fn uv_for(&self, world: DVec3, frame: &Bounds) -> Option<DVec2> {
        let size = frame.size().max(DVec2::splat(f64::EPSILON)) * self.params.scale;
        let rel = (DVec2::new(world.x, world.y) - frame.center()) / size;
        let u = rel.x + 0.5 + self.params.offset.x;
        let v = 0.5 - rel.y + self.params.offset.y;
        let u = wrap_or_reject(u, self.params.tile_x)?;
        let v = wrap_or_reject(v, self.params.tile_y)?;
        let [u0, v0, u1, v1] = self.params.crop;
        Some(DVec2::new(u0 + u * (u1 - u0), v0 + v * (v1 - v0)))
    }

    /// Color for a normalized image coordinate, or `None` for transparent pixels.
    pub fn color_at(&self, uv: DVec2) -> Option<HexColor> {
        let (w, h) = (self.image.width(), self.image.height());
        let px = ((uv.x * w as f64).floor().max(0.0) as u32).min(w - 1);
        let py = ((uv.y * h as f64).floor().max(0.0) as u32).min(h - 1);
        let [r, g, b, a] = self.image.get_pixel(px, py).0;
        if a <= self.params.alpha_threshold {
            return None;
        }
        let weight = a as f64 / 255.0 * self.params.opacity;
        let blended = HexColor::new(r, g, b).over_white(weight);
        Some(match (self.params.snap_to_palette, self.palette) {
            (true, Some(palette)) => palette.quantize(blended).entry.hex,
            _ => blended,
        })
    }

    /// Samples every target. An empty target list yields an empty result.
    pub fn sample(&self, targets: &[(CellKey, DVec3)]) -> OverlayResult {
        let Some(frame) = Bounds::from_points(targets.iter().map(|(_, w)| DVec2::new(w.x, w.y)))
        else {
            return OverlayResult::default();
        };
        let mut result = OverlayResult::default();
        for (key, world) in targets {
            match self.uv_for(*world, &frame).and_then(|uv| self.color_at(uv)) {
                Some(color) => result.updates.push((*key, color)),
                None => result.skipped += 1,
            }
        }
        debug!(
            "Overlay sampled {} targets: {} colors, {} skipped",
            targets.len(),
            result.updates.len(),
            result.skipped
        );
        result
    }
}

fn wrap_or_reject(t: f64, tiled: bool) -> Option<f64> {
    if !t.is_finite() {
        return None;
    }
    if tiled {
        Some(t.rem_euclid(1.0))
    } else if (0.0..=1.0).contains(&t) {
        Some(t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 2x2 image: red, green on top; blue, transparent at the bottom.
    fn quad() -> RgbaImage {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 0, 0]));
        img
    }

    fn corners() -> Vec<(CellKey, DVec3)> {
        // World Y up: top-left of the frame is (0, 10).
        vec![
            (CellKey::new(0, 0), DVec3::new(0.0, 10.0, 0.0)),
            (CellKey::new(0, 1), DVec3::new(10.0, 10.0, 0.0)),
            (CellKey::new(1, 0), DVec3::new(0.0, 0.0, 0.0)),
            (CellKey::new(1, 1), DVec3::new(10.0, 0.0, 0.0)),
        ]
    }

    #[test]
    fn test_corners_sample_quadrants() {
        let img = quad();
        let sampler = OverlaySampler::new(&img, OverlayParams::default()).unwrap();
        let result = sampler.sample(&corners());
        assert_eq!(result.skipped, 1);
        assert_eq!(
            result.updates,
            vec![
                (CellKey::new(0, 0), HexColor::new(255, 0, 0)),
                (CellKey::new(0, 1), HexColor::new(0, 255, 0)),
                (CellKey::new(1, 0), HexColor::new(0, 0, 255)),
            ]
        );
    }

    #[test]
    fn test_opacity_blends_toward_white() {
        let img = quad();
        let params = OverlayParams {
            opacity: 0.5,
            ..OverlayParams::default()
        };
        let sampler = OverlaySampler::new(&img, params).unwrap();
        let result = sampler.sample(&corners()[..1]);
        assert_eq!(result.updates[0].1, HexColor::new(255, 128, 128));
    }

    #[test]
    fn test_untiled_out_of_range_is_skipped_and_tiled_wraps() {
        let img = quad();
        let shifted = OverlayParams {
            offset: DVec2::new(0.75, 0.0),
            ..OverlayParams::default()
        };
        let sampler = OverlaySampler::new(&img, shifted).unwrap();
        let frame = Bounds::from_corners(DVec2::ZERO, DVec2::new(10.0, 10.0));
        assert!(sampler.uv_for(DVec3::new(10.0, 10.0, 0.0), &frame).is_none());

        let tiled = OverlayParams {
            tile_x: true,
            ..shifted
        };
        let sampler = OverlaySampler::new(&img, tiled).unwrap();
        let uv = sampler.uv_for(DVec3::new(10.0, 10.0, 0.0), &frame).unwrap();
        assert!((uv.x - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_crop_remaps_into_sub_rectangle() {
        let img = quad();
        let params = OverlayParams {
            crop: [0.0, 0.0, 0.4, 0.4],
            ..OverlayParams::default()
        };
        let sampler = OverlaySampler::new(&img, params).unwrap();
        let result = sampler.sample(&corners());
        // Only the red pixel is visible through the crop.
        assert!(result.updates.iter().all(|(_, c)| *c == HexColor::new(255, 0, 0)));
        assert_eq!(result.updates.len(), 4);
    }

    #[test]
    fn test_snap_to_palette() {
        let mut img = RgbaImage::new(1, 1);
        img.put_pixel(0, 0, Rgba([250, 5, 5, 255]));
        let palette = Palette::default();
        let params = OverlayParams {
            snap_to_palette: true,
            ..OverlayParams::default()
        };
        let sampler = OverlaySampler::new(&img, params).unwrap().with_palette(&palette);
        let result = sampler.sample(&[(CellKey::new(0, 0), DVec3::ZERO)]);
        assert_eq!(result.updates[0].1, HexColor::new(255, 0, 0));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            decode_overlay(b"not an image"),
            Err(OverlayError::Decode { .. })
        ));
        let img = quad();
        let bad = OverlayParams {
            crop: [0.5, 0.0, 0.5, 1.0],
            ..OverlayParams::default()
        };
        assert!(OverlaySampler::new(&img, bad).is_err());
        let sampler = OverlaySampler::new(&img, OverlayParams::default()).unwrap();
        assert_eq!(sampler.sample(&[]), OverlayResult::default());
    }
}

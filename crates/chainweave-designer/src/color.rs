//! Ring colors and perceptual color distance.

use std::fmt;
use std::str::FromStr;

use ::palette::{white_point::D65, FromColor, Lab, Srgb};
use serde::{Deserialize, Serialize};

use chainweave_core::PaletteError;

/// Normalized 24-bit RGB color, written as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor::new(0xff, 0xff, 0xff);
    pub const BLACK: HexColor = HexColor::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// CIE Lab (D65) coordinates of this color.
    pub fn to_lab(self) -> Lab<D65, f64> {
        let srgb = Srgb::new(
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
        );
        Lab::from_color(srgb)
    }

    /// Squared CIE76 distance to `other`.
    pub fn lab_distance_squared(self, other: HexColor) -> f64 {
        lab_distance_squared(&self.to_lab(), &other.to_lab())
    }

    /// Mixes this color over white: `weight` 1.0 keeps the color, 0.0 gives white.
    pub fn over_white(self, weight: f64) -> HexColor {
        let w = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mix = |c: u8| (c as f64 * w + 255.0 * (1.0 - w)).round().clamp(0.0, 255.0) as u8;
        HexColor::new(mix(self.r), mix(self.g), mix(self.b))
    }
}

/// Squared Euclidean distance between two Lab colors.
pub fn lab_distance_squared(a: &Lab<D65, f64>, b: &Lab<D65, f64>) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    dl * dl + da * da + db * db
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = PaletteError;

    /// Accepts `#rrggbb`, `rrggbb` and the `#rgb` shorthand in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaletteError::InvalidColor {
            value: s.to_string(),
        };
        let digits = s.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(invalid()),
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        Ok(HexColor::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for HexColor {
    type Error = PaletteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl From<[u8; 3]> for HexColor {
    fn from(rgb: [u8; 3]) -> Self {
        HexColor::new(rgb[0], rgb[1], rgb[2])
    }
}

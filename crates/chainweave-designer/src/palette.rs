//! Supplier palettes and nearest-color quantization.
//!
//! A palette is an ordered list of canonical ring colors. Entry numbers are the
//! 1-based array positions, so the same color gets the same number on every
//! export made with the same palette.

use ::palette::{white_point::D65, Lab};
use serde::{Deserialize, Serialize};

use chainweave_core::PaletteError;

use crate::color::{lab_distance_squared, HexColor};

/// One orderable ring color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub hex: HexColor,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

impl PaletteEntry {
    pub fn new(hex: HexColor, name: impl Into<String>) -> Self {
        Self {
            hex,
            name: name.into(),
            supplier: None,
            material: None,
        }
    }

    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }
}

/// Result of snapping a color to a palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteMatch<'a> {
    /// 1-based palette index.
    pub index: usize,
    pub entry: &'a PaletteEntry,
    /// Squared CIE76 distance from the input color.
    pub distance_squared: f64,
}

/// An ordered, non-empty list of palette entries with cached Lab values.
#[derive(Debug, Clone)]
pub struct Palette {
    name: String,
    entries: Vec<PaletteEntry>,
    labs: Vec<Lab<D65, f64>>,
}

const DEFAULT_PALETTE: [(&str, &str, &str); 24] = [
    ("#c0c0c0", "Bright Aluminum", "Bright Aluminum"),
    ("#1b1b1b", "Black", "Anodized Aluminum"),
    ("#ff0000", "Red", "Anodized Aluminum"),
    ("#00ff00", "Green", "Anodized Aluminum"),
    ("#0047ab", "Blue", "Anodized Aluminum"),
    ("#4169e1", "Royal Blue", "Anodized Aluminum"),
    ("#87ceeb", "Sky Blue", "Anodized Aluminum"),
    ("#008080", "Teal", "Anodized Aluminum"),
    ("#71eeb8", "Seafoam", "Anodized Aluminum"),
    ("#046307", "Emerald", "Anodized Aluminum"),
    ("#9acd32", "Lime", "Anodized Aluminum"),
    ("#ffd700", "Yellow", "Anodized Aluminum"),
    ("#d4af37", "Gold", "Anodized Aluminum"),
    ("#f7e7ce", "Champagne", "Anodized Aluminum"),
    ("#ff8c00", "Orange", "Anodized Aluminum"),
    ("#b87333", "Copper", "Copper"),
    ("#8c7853", "Bronze", "Bronze"),
    ("#5c4033", "Brown", "Anodized Aluminum"),
    ("#ff69b4", "Pink", "Anodized Aluminum"),
    ("#c71585", "Magenta", "Anodized Aluminum"),
    ("#6a0dad", "Purple", "Anodized Aluminum"),
    ("#8f00ff", "Violet", "Anodized Aluminum"),
    ("#ffffff", "White", "Enameled Copper"),
    ("#2a3439", "Gunmetal", "Anodized Aluminum"),
];

impl Palette {
    /// Creates a palette. Fails when `entries` is empty.
    pub fn new(name: impl Into<String>, entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        let name = name.into();
        if entries.is_empty() {
            return Err(PaletteError::Empty { name });
        }
        let labs = entries.iter().map(|e| e.hex.to_lab()).collect();
        Ok(Self {
            name,
            entries,
            labs,
        })
    }

    /// The built-in 24-color palette.
    pub fn default_24() -> Self {
        let entries = DEFAULT_PALETTE
            .iter()
            .filter_map(|(hex, name, material)| {
                hex.parse::<HexColor>()
                    .ok()
                    .map(|c| PaletteEntry::new(c, *name).with_material(*material))
            })
            .collect::<Vec<_>>();
        let labs = entries.iter().map(|e| e.hex.to_lab()).collect();
        Self {
            name: "Default 24".to_string(),
            entries,
            labs,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Entry by 1-based index.
    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// 1-based index of the first entry with exactly this color.
    pub fn index_of(&self, hex: HexColor) -> Option<usize> {
        self.entries.iter().position(|e| e.hex == hex).map(|i| i + 1)
    }

    /// Snaps `color` to the perceptually nearest entry (minimum squared CIE76
    /// distance). Equal distances resolve to the lower index.
    pub fn quantize(&self, color: HexColor) -> PaletteMatch<'_> {
        let lab = color.to_lab();
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, entry_lab) in self.labs.iter().enumerate() {
            let d = lab_distance_squared(&lab, entry_lab);
            if d < best_distance {
                best = i;
                best_distance = d;
            }
        }
        PaletteMatch {
            index: best + 1,
            entry: &self.entries[best],
            distance_squared: best_distance,
        }
    }

    /// Parses a palette from JSON.
    ///
    /// Accepts a bare array or `{"name": .., "colors": [..]}`. Each color is a
    /// hex string or an object with `hex`, `name`, `supplier` and `material`.
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        let file: PaletteFile =
            serde_json::from_str(json).map_err(|e| PaletteError::Malformed {
                reason: e.to_string(),
            })?;
        let (name, colors) = match file {
            PaletteFile::List(colors) => ("Custom".to_string(), colors),
            PaletteFile::Named { name, colors } => (name, colors),
        };
        let entries = colors
            .into_iter()
            .enumerate()
            .map(|(i, c)| match c {
                PaletteColor::Hex(hex) => hex
                    .parse::<HexColor>()
                    .map(|h| PaletteEntry::new(h, format!("Color {}", i + 1))),
                PaletteColor::Entry(entry) => Ok(entry),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, entries)
    }

    pub fn to_json(&self) -> String {
        let file = PaletteFileRef {
            name: &self.name,
            colors: &self.entries,
        };
        serde_json::to_string_pretty(&file).unwrap_or_default()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::default_24()
    }
}

impl PartialEq for Palette {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.entries == other.entries
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaletteFile {
    List(Vec<PaletteColor>),
    Named {
        #[serde(default = "default_palette_name")]
        name: String,
        colors: Vec<PaletteColor>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PaletteColor {
    Hex(String),
    Entry(PaletteEntry),
}

#[derive(Serialize)]
struct PaletteFileRef<'a> {
    name: &'a str,
    colors: &'a [PaletteEntry],
}

fn default_palette_name() -> String {
    "Custom".to_string()
}

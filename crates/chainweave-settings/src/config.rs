//! Configuration and settings management for Chainweave
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Editor settings (zoom bounds, camera, selection margin, units)
//! - Default ring geometry for new designs
//! - BOM preferences (pack size, full sheet)
//! - Overlay defaults (alpha threshold, opacity)

pub use chainweave_core::units::MeasurementSystem;
use chainweave_core::constants::{
    BOM_ROWS_PER_PAGE, DEFAULT_ALPHA_THRESHOLD, DEFAULT_BASE_DISTANCE, DEFAULT_FOV_DEG,
    DEFAULT_PACK_SIZE, DEFAULT_SELECTION_MARGIN, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Number of recent projects remembered.
pub const RECENT_FILES_COUNT: usize = 10;

/// Editor camera and interaction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Zoom factor per wheel notch
    pub zoom_step: f64,
    /// Vertical field of view in degrees
    pub fov_deg: f64,
    /// Camera distance at zoom 1.0, in millimeters
    pub base_distance: f64,
    /// Extra cells searched around a selection's bounding box
    pub selection_margin: i32,
    /// Units for display and input
    pub measurement_system: MeasurementSystem,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            fov_deg: DEFAULT_FOV_DEG,
            base_distance: DEFAULT_BASE_DISTANCE,
            selection_margin: DEFAULT_SELECTION_MARGIN,
            measurement_system: MeasurementSystem::default(),
        }
    }
}

/// Ring geometry used for new designs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    pub inner_diameter: f64,
    pub wire_diameter: f64,
    pub center_spacing: f64,
    pub angle_in: f64,
    pub angle_out: f64,
}

impl Default for GeometrySettings {
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

/// Bill of materials preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BomSettings {
    /// Rings per supplier pack
    pub pack_size: u32,
    /// List every palette entry, not only used colors
    pub full_sheet: bool,
    /// Lines per printed page
    pub rows_per_page: usize,
}

impl Default for BomSettings {
    fn default() -> Self {
        Self {
            pack_size: DEFAULT_PACK_SIZE,
            full_sheet: false,
            rows_per_page: BOM_ROWS_PER_PAGE,
        }
    }
}

/// Image overlay defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Pixels with alpha at or below this never recolor a ring
    pub alpha_threshold: u8,
    pub default_opacity: f64,
    pub snap_to_palette: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            default_opacity: 1.0,
            snap_to_palette: false,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Palette file loaded at startup instead of the built-in palette
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette_path: Option<PathBuf>,
    /// Display calibration table loaded at startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_path: Option<PathBuf>,
    /// Recent projects, most recent first
    pub recent_files: Vec<PathBuf>,
    pub editor: EditorSettings,
    pub geometry: GeometrySettings,
    pub bom: BomSettings,
    pub overlay: OverlaySettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(SettingsError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Toml => "TOML",
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: Result<Self, String> = match format {
            Format::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
        };
        let config = parsed.map_err(|reason| SettingsError::Parse {
            path: path.to_path_buf(),
            format: format.name(),
            reason,
        })?;
        config.validate().map_err(|source| SettingsError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML). Invalid values are never written.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        let format = Format::of(path)?;
        self.validate().map_err(|source| SettingsError::Invalid {
            path: path.to_path_buf(),
            source,
        })?;
        let encoded: Result<String, String> = match format {
            Format::Json => serde_json::to_string_pretty(self).map_err(|e| e.to_string()),
            Format::Toml => toml::to_string_pretty(self).map_err(|e| e.to_string()),
        };
        let content = encoded.map_err(|reason| SettingsError::Encode {
            format: format.name(),
            reason,
        })?;
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let out_of_range = |key: &str, value: String| ConfigError::ValueOutOfRange {
            key: key.to_string(),
            value,
        };
        let positive = |key: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(out_of_range(key, value.to_string()))
            }
        };

        let editor = &self.editor;
        positive("editor.min_zoom", editor.min_zoom)?;
        positive("editor.max_zoom", editor.max_zoom)?;
        if editor.min_zoom > editor.max_zoom {
            return Err(ConfigError::Inconsistent(format!(
                "editor.min_zoom ({}) is greater than editor.max_zoom ({})",
                editor.min_zoom, editor.max_zoom
            )));
        }
        if !(editor.zoom_step.is_finite() && editor.zoom_step > 1.0) {
            return Err(out_of_range("editor.zoom_step", editor.zoom_step.to_string()));
        }
        if !(editor.fov_deg.is_finite() && editor.fov_deg > 1.0 && editor.fov_deg < 179.0) {
            return Err(out_of_range("editor.fov_deg", editor.fov_deg.to_string()));
        }
        positive("editor.base_distance", editor.base_distance)?;
        if editor.selection_margin < 0 {
            return Err(out_of_range(
                "editor.selection_margin",
                editor.selection_margin.to_string(),
            ));
        }

        positive("geometry.inner_diameter", self.geometry.inner_diameter)?;
        positive("geometry.wire_diameter", self.geometry.wire_diameter)?;
        positive("geometry.center_spacing", self.geometry.center_spacing)?;
        for (key, angle) in [
            ("geometry.angle_in", self.geometry.angle_in),
            ("geometry.angle_out", self.geometry.angle_out),
        ] {
            if !angle.is_finite() {
                return Err(out_of_range(key, angle.to_string()));
            }
        }

        if self.bom.pack_size == 0 {
            return Err(out_of_range("bom.pack_size", "0".to_string()));
        }
        if self.bom.rows_per_page == 0 {
            return Err(out_of_range("bom.rows_per_page", "0".to_string()));
        }

        let opacity = self.overlay.default_opacity;
        if !(opacity.is_finite() && (0.0..=1.0).contains(&opacity)) {
            return Err(out_of_range("overlay.default_opacity", opacity.to_string()));
        }
        Ok(())
    }

    /// Add file to recent files list
    pub fn add_recent_file(&mut self, path: PathBuf) {
        // Remove if already in list
        self.recent_files.retain(|f| f != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(RECENT_FILES_COUNT);
    }
}

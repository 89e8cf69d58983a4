//! # Chainweave
//!
//! Design tool core for hex-lattice chainmail: ring placement on a
//! staggered lattice, camera transforms, palettes, image overlays and
//! bills of materials.
//!
//! ## Architecture
//!
//! Chainweave is organized as a workspace with multiple crates:
//!
//! 1. **chainweave-core** - Constants, errors, units, event bus
//! 2. **chainweave-designer** - Lattice, ring store, viewport, selection, overlays, exports
//! 3. **chainweave-settings** - User configuration and persistence
//! 4. **chainweave** - Command line tool that integrates all crates

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chainweave_designer::bom::BomMode;
use chainweave_designer::calibration::CalibrationTable;
use chainweave_designer::geometry::RingGeometry;
use chainweave_designer::overlay::OverlayParams;
use chainweave_designer::palette::Palette;
use chainweave_settings::Config;
use tracing::info;

pub use chainweave_core as core;
pub use chainweave_designer as designer;
pub use chainweave_settings as settings;

pub use chainweave_core::{AppEvent, Error, EventBus, Result};
pub use chainweave_designer::{DesignerState, OverlayScope, SessionOptions, Tool};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Log lines go to stderr so command output on stdout stays clean.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Session options derived from the user's configuration.
pub fn session_options(config: &Config) -> SessionOptions {
    let editor = &config.editor;
    let geometry = &config.geometry;
    SessionOptions {
        min_zoom: editor.min_zoom,
        max_zoom: editor.max_zoom,
        zoom_step: editor.zoom_step,
        fov_deg: editor.fov_deg,
        base_distance: editor.base_distance,
        selection_margin: editor.selection_margin,
        pack_size: config.bom.pack_size as usize,
        bom_mode: if config.bom.full_sheet {
            BomMode::FullSheet
        } else {
            BomMode::UsedOnly
        },
        overlay: OverlayParams {
            alpha_threshold: config.overlay.alpha_threshold,
            opacity: config.overlay.default_opacity,
            snap_to_palette: config.overlay.snap_to_palette,
            ..OverlayParams::default()
        },
        geometry: RingGeometry {
            inner_diameter: geometry.inner_diameter,
            wire_diameter: geometry.wire_diameter,
            center_spacing: geometry.center_spacing,
            angle_in: geometry.angle_in,
            angle_out: geometry.angle_out,
        },
    }
}

/// Builds a session from the configuration, loading the configured palette
/// and calibration table when present.
pub fn open_session(config: &Config) -> anyhow::Result<DesignerState> {
    let mut state = DesignerState::with_options(session_options(config), Arc::new(EventBus::new()));
    if let Some(path) = &config.palette_path {
        let json = read_text(path, "palette")?;
        let palette = Palette::from_json(&json)
            .with_context(|| format!("Invalid palette {}", path.display()))?;
        state.set_palette(palette);
    }
    if let Some(path) = &config.calibration_path {
        let json = read_text(path, "calibration table")?;
        let table = CalibrationTable::from_json(&json)
            .with_context(|| format!("Invalid calibration table {}", path.display()))?;
        state.set_calibration(Some(table));
    }
    Ok(state)
}

/// Opens a session and loads a project file into it.
pub fn open_project(config: &Config, path: &Path) -> anyhow::Result<DesignerState> {
    let mut state = open_session(config)?;
    state.load_from_file(path)?;
    info!("Opened {} ({} rings)", path.display(), state.rings().len());
    Ok(state)
}

fn read_text(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} {}", what, path.display()))
}

//! Display color calibration.
//!
//! A calibration table maps palette colors to the colors that should be shown
//! on screen for them (anodized finishes rarely look like their nominal hex).
//! The active table lives in a [`CalibrationContext`] owned by the session and
//! handed to whatever needs it; changes are announced on the event bus.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use chainweave_core::{AppEvent, EventBus, PaletteError, PaletteEvent};

use crate::color::HexColor;

/// Named mapping from palette color to display color.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTable {
    pub name: String,
    pub entries: BTreeMap<HexColor, HexColor>,
}

impl CalibrationTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn with_entry(mut self, palette: HexColor, display: HexColor) -> Self {
        self.entries.insert(palette, display);
        self
    }

    /// Parses `{"name": .., "entries": {"#rrggbb": "#rrggbb", ..}}`.
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        serde_json::from_str(json).map_err(|e| PaletteError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Display color for `color`, or `color` itself when it is not calibrated.
    pub fn apply(&self, color: HexColor) -> HexColor {
        self.entries.get(&color).copied().unwrap_or(color)
    }
}

/// Holds the active calibration table and publishes changes.
#[derive(Debug, Clone)]
pub struct CalibrationContext {
    active: Option<CalibrationTable>,
    bus: Arc<EventBus>,
}

impl CalibrationContext {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { active: None, bus }
    }

    pub fn active(&self) -> Option<&CalibrationTable> {
        self.active.as_ref()
    }

    /// Installs `table` (or clears calibration with `None`) and publishes
    /// `CalibrationChanged`.
    pub fn set(&mut self, table: Option<CalibrationTable>) {
        let name = table.as_ref().map(|t| t.name.clone());
        debug!("Calibration changed: {:?}", name);
        self.active = table;
        self.bus
            .publish(AppEvent::Palette(PaletteEvent::CalibrationChanged { name }));
    }

    /// Display color for a palette color under the active table.
    pub fn display_color(&self, color: HexColor) -> HexColor {
        match &self.active {
            Some(table) => table.apply(color),
            None => color,
        }
    }
}

//! Event type definitions for the event bus.
//!
//! This module defines the editing-session events organized by category.
//! Events are designed to be cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

/// Root event enum for all session events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Ring collection changes
    Rings(RingEvent),
    /// Selection gestures
    Selection(SelectionEvent),
    /// Camera and view state
    View(ViewEvent),
    /// Palette and color calibration
    Palette(PaletteEvent),
    /// Project load/save
    Project(ProjectEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Rings(_) => EventCategory::Rings,
            AppEvent::Selection(_) => EventCategory::Selection,
            AppEvent::View(_) => EventCategory::View,
            AppEvent::Palette(_) => EventCategory::Palette,
            AppEvent::Project(_) => EventCategory::Project,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Rings(e) => e.description(),
            AppEvent::Selection(e) => e.description(),
            AppEvent::View(e) => e.description(),
            AppEvent::Palette(e) => e.description(),
            AppEvent::Project(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Ring collection events.
    Rings,
    /// Selection events.
    Selection,
    /// Camera/view events.
    View,
    /// Palette and calibration events.
    Palette,
    /// Project persistence events.
    Project,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Rings => write!(f, "Rings"),
            EventCategory::Selection => write!(f, "Selection"),
            EventCategory::View => write!(f, "View"),
            EventCategory::Palette => write!(f, "Palette"),
            EventCategory::Project => write!(f, "Project"),
        }
    }
}

/// Ring collection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RingEvent {
    /// One or more rings were created, recolored or erased.
    Changed {
        /// Rings created.
        created: usize,
        /// Rings recolored in place.
        recolored: usize,
        /// Rings erased.
        erased: usize,
        /// Ring count after the change.
        total: usize,
    },
    /// Colors were bulk-assigned from an image overlay.
    OverlayApplied {
        /// Rings whose color changed.
        recolored: usize,
        /// Rings in scope that kept their color (transparent or out of range).
        skipped: usize,
    },
    /// The collection was replaced wholesale (load, clear).
    Replaced {
        /// Ring count after replacement.
        total: usize,
    },
}

impl RingEvent {
    fn description(&self) -> String {
        match self {
            RingEvent::Changed {
                created,
                recolored,
                erased,
                total,
            } => format!(
                "Rings changed: +{} ~{} -{} ({} total)",
                created, recolored, erased, total
            ),
            RingEvent::OverlayApplied { recolored, skipped } => {
                format!("Overlay applied: {} recolored, {} skipped", recolored, skipped)
            }
            RingEvent::Replaced { total } => format!("Rings replaced ({} total)", total),
        }
    }
}

/// Selection events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionEvent {
    /// A drag gesture completed and its cells became the last selection.
    Finished {
        /// Number of selected cells.
        cells: usize,
    },
    /// A drag gesture or overlay pick was aborted.
    Cancelled,
    /// The last selection was cleared.
    Cleared,
}

impl SelectionEvent {
    fn description(&self) -> String {
        match self {
            SelectionEvent::Finished { cells } => format!("Selection finished: {} cells", cells),
            SelectionEvent::Cancelled => "Selection cancelled".to_string(),
            SelectionEvent::Cleared => "Selection cleared".to_string(),
        }
    }
}

/// Camera/view events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViewEvent {
    /// Zoom factor changed.
    Zoomed {
        /// New zoom factor.
        zoom: f64,
    },
    /// Pan offset changed.
    Panned {
        /// New pan X (logical mm).
        pan_x: f64,
        /// New pan Y (logical mm).
        pan_y: f64,
    },
    /// Floating origin moved.
    OriginRebased {
        /// New origin X (logical mm).
        x: f64,
        /// New origin Y (logical mm).
        y: f64,
    },
}

impl ViewEvent {
    fn description(&self) -> String {
        match self {
            ViewEvent::Zoomed { zoom } => format!("Zoom: {:.2}x", zoom),
            ViewEvent::Panned { pan_x, pan_y } => format!("Pan: ({:.1}, {:.1})", pan_x, pan_y),
            ViewEvent::OriginRebased { x, y } => format!("Origin: ({:.1}, {:.1})", x, y),
        }
    }
}

/// Palette and calibration events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaletteEvent {
    /// The active palette was replaced.
    PaletteChanged {
        /// Palette name.
        name: String,
        /// Number of entries.
        entries: usize,
    },
    /// The active display calibration table changed.
    CalibrationChanged {
        /// Calibration table name, `None` when calibration was cleared.
        name: Option<String>,
    },
}

impl PaletteEvent {
    fn description(&self) -> String {
        match self {
            PaletteEvent::PaletteChanged { name, entries } => {
                format!("Palette: {} ({} colors)", name, entries)
            }
            PaletteEvent::CalibrationChanged { name: Some(name) } => {
                format!("Calibration: {}", name)
            }
            PaletteEvent::CalibrationChanged { name: None } => "Calibration cleared".to_string(),
        }
    }
}

/// Project persistence events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProjectEvent {
    /// A project document was loaded.
    Loaded {
        /// Project name.
        name: String,
        /// Ring count.
        rings: usize,
    },
    /// A project document was produced.
    Saved {
        /// Project name.
        name: String,
    },
    /// A project document was rejected.
    LoadRejected {
        /// Reason shown to the user.
        reason: String,
    },
}

impl ProjectEvent {
    fn description(&self) -> String {
        match self {
            ProjectEvent::Loaded { name, rings } => format!("Loaded: {} ({} rings)", name, rings),
            ProjectEvent::Saved { name } => format!("Saved: {}", name),
            ProjectEvent::LoadRejected { reason } => format!("Load rejected: {}", reason),
        }
    }
}

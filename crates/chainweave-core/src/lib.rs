//! # Chainweave Core
//!
//! Core types and utilities shared by the Chainweave crates.
//! Provides lattice constants, the error taxonomy, length/gauge units and
//! the publish/subscribe event bus used for change notifications.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod units;

pub use error::{Error, OverlayError, PaletteError, ProjectError, Result};

pub use event_bus::{
    AppEvent, EventBus, EventCategory, EventFilter, PaletteEvent, ProjectEvent, RingEvent,
    SelectionEvent, SubscriptionId, ViewEvent, DEFAULT_CHANNEL_CAPACITY,
};

pub use units::{format_length, parse_length, MeasurementSystem, WireGauge};

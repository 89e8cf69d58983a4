//! # Event Bus Module
//!
//! Publish/subscribe notifications for editing-session changes.
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter and receive events of interest
//! - Supports both sync handlers and async broadcast receivers
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chainweave_core::event_bus::{AppEvent, EventBus, EventCategory, EventFilter, PaletteEvent};
//!
//! let bus = Arc::new(EventBus::new());
//! let subscription = bus.subscribe(EventFilter::only([EventCategory::Palette]), |event| {
//!     if let AppEvent::Palette(PaletteEvent::CalibrationChanged { name }) = event {
//!         println!("calibration is now {:?}", name);
//!     }
//! });
//!
//! let delivered = bus.publish(AppEvent::Palette(PaletteEvent::CalibrationChanged { name: None }));
//! assert_eq!(delivered, 1);
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;

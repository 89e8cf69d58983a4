//! Chainweave Settings Crate
//!
//! Handles user configuration: editor camera and selection defaults, default
//! ring geometry, BOM and overlay preferences, and where they are stored.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{BomSettings, Config, EditorSettings, GeometrySettings, OverlaySettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
pub use persistence::SettingsPersistence;

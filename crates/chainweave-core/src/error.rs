//! Error handling for Chainweave
//!
//! Provides error types for the operations that can fail at a user-visible boundary:
//! - Project errors (malformed or unsupported project documents)
//! - Overlay errors (undecodable images, unusable overlay parameters)
//! - Palette errors (malformed palette definitions and color strings)
//!
//! Empty selections and numeric degeneracy in the transform pipeline are not
//! errors; they are handled inline by the components that encounter them.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Project document error type
///
/// Any of these rejects a load wholesale. The session that attempted the load
/// keeps its previous ring collection and geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectError {
    /// The document is not valid JSON or does not match the schema
    #[error("Malformed project document: {reason}")]
    Malformed {
        /// Parser message describing the first problem found.
        reason: String,
    },

    /// A required field is absent
    #[error("Missing field '{field}' in {context}")]
    MissingField {
        /// The missing field name.
        field: String,
        /// Where the field was expected (e.g. `ring 4`).
        context: String,
    },

    /// A field has the wrong JSON type or an unusable value
    #[error("Invalid value for '{field}' in {context}: {reason}")]
    InvalidField {
        /// The offending field name.
        field: String,
        /// Where the field was found.
        context: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Two ring records address the same cell
    #[error("Duplicate ring at row {row}, col {col}")]
    DuplicateCell {
        /// Row of the duplicated cell.
        row: i32,
        /// Column of the duplicated cell.
        col: i32,
    },

    /// Schema version newer than this build understands
    #[error("Unsupported project version {found} (newest supported is {supported})")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
        /// Newest version this build can read.
        supported: u32,
    },
}

/// Overlay sampling error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverlayError {
    /// The image bytes could not be decoded
    #[error("Failed to decode overlay image: {reason}")]
    Decode {
        /// Decoder message.
        reason: String,
    },

    /// The decoded image has no pixels
    #[error("Overlay image is empty ({width}x{height})")]
    EmptyImage {
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },

    /// Overlay parameters are unusable (non-finite scale, inverted crop, ...)
    #[error("Invalid overlay parameter '{param}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        param: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Palette and color error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// A color string is not a 3- or 6-digit hex color
    #[error("Invalid color '{value}'")]
    InvalidColor {
        /// The rejected input.
        value: String,
    },

    /// A palette has no entries
    #[error("Palette '{name}' has no colors")]
    Empty {
        /// Palette name.
        name: String,
    },

    /// A palette definition could not be parsed
    #[error("Malformed palette definition: {reason}")]
    Malformed {
        /// Parser message.
        reason: String,
    },
}

/// Main error type for Chainweave
///
/// A unified error type that can represent any error from the core layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Project document error
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// Overlay sampling error
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    /// Palette error
    #[error(transparent)]
    Palette(#[from] PaletteError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a project document error
    pub fn is_project_error(&self) -> bool {
        matches!(self, Error::Project(_))
    }

    /// Check if this is an overlay error
    pub fn is_overlay_error(&self) -> bool {
        matches!(self, Error::Overlay(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

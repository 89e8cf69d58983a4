//! Errors raised while locating, reading, writing or validating the
//! Chainweave settings file.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the settings file itself. Each carries the path involved so
/// the CLI can report it without extra context.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The platform has no per-user config directory.
    #[error("No per-user config directory on this platform")]
    NoConfigDir,

    #[error("Cannot create settings directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    /// Only `.json` and `.toml` settings files are understood.
    #[error("Unsupported settings file {}: expected .json or .toml", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Cannot read settings file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Cannot write settings file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    /// The file exists but is not valid JSON or TOML for [`Config`](crate::Config).
    #[error("Malformed {format} in {}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        format: &'static str,
        reason: String,
    },

    #[error("Cannot encode settings as {format}: {reason}")]
    Encode { format: &'static str, reason: String },

    /// The file parsed but holds values the editor cannot use.
    #[error("Invalid settings in {}: {source}", path.display())]
    Invalid { path: PathBuf, source: ConfigError },
}

/// A setting outside its usable range, or two settings that contradict each
/// other.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Value out of range for '{key}': {value}")]
    ValueOutOfRange { key: String, value: String },

    #[error("Inconsistent settings: {0}")]
    Inconsistent(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type ConfigResult<T> = Result<T, ConfigError>;

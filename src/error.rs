//! Error types for the `bcamera` crate.
//!
//! This module defines [`BcameraError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry the file path or raw
//! value that caused them so a batch run can report which clip failed.

use std::{io::Error as IoError, path::PathBuf};

use thiserror::Error;

/// The unified error type for all `bcamera` operations.
///
/// Every public function that can fail returns `Result<T, BcameraError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BcameraError {
    /// The JSON configuration file could not be read or parsed.
    #[error("Failed to load config file {path}: {reason}")]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying reason the load failed.
        reason: String,
    },

    /// A configuration value has the wrong type or an unusable value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The metadata tool failed, or its output lacked a usable field.
    #[error("Failed to read metadata for {path}: {reason}")]
    Metadata {
        /// The clip that was being inspected.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A timestamp string did not match the expected format.
    #[error("Cannot parse timestamp {value:?} (expected {expected})")]
    Parse {
        /// The raw value reported by the metadata tool.
        value: String,
        /// The format that was expected.
        expected: &'static str,
    },

    /// A duration string is not of the form `H:M:S`, `M:S` or `S`.
    #[error("Invalid duration: {0:?}")]
    InvalidDuration(String),

    /// The end time does not come after the start time.
    #[error("Invalid range: end ({end}) must be after start ({start})")]
    InvalidRange {
        /// The configured start offset.
        start: String,
        /// The configured end time.
        end: String,
    },

    /// The transcoder process could not be launched.
    #[error("Failed to launch {program}: {reason}")]
    TranscodeDispatch {
        /// Program that was being spawned.
        program: String,
        /// Underlying reason the spawn failed.
        reason: String,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),
}

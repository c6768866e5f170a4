//! Embedded clip metadata.
//!
//! Clip timestamps are read by an external metadata tool. The
//! [`MetadataSource`] trait is the narrow seam the pipeline talks to;
//! [`ExifTool`] is the implementation that shells out to `exiftool -G -j`
//! and picks the QuickTime tags out of its JSON.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use serde_json::Value;

use crate::{error::BcameraError, timecode::parse_seconds};

/// Tag holding the creation date, e.g. `"2016:01:28 16:30:48"`.
pub const CREATE_DATE_TAG: &str = "QuickTime:CreateDate";

/// Tags read, in order, for the clip duration.
pub const DURATION_TAGS: [&str; 2] = ["QuickTime:Duration", "Composite:Duration"];

/// The metadata fields the pipeline needs from a clip.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct ClipMetadata {
    /// The clip the metadata belongs to.
    pub path: PathBuf,
    /// Raw creation date as reported by the tool.
    pub create_date: String,
    /// Raw duration as reported by the tool, if present.
    pub duration: Option<String>,
}

impl ClipMetadata {
    /// Extract the clip fields from `exiftool -G -j` output.
    ///
    /// # Errors
    ///
    /// Returns [`BcameraError::Metadata`] for malformed JSON, an empty
    /// result array, or a missing creation date.
    pub fn from_exiftool_json(path: &Path, output: &str) -> Result<Self, BcameraError> {
        let metadata_error = |reason: String| BcameraError::Metadata {
            path: path.to_path_buf(),
            reason,
        };

        let document: Value = serde_json::from_str(output)
            .map_err(|error| metadata_error(format!("malformed JSON: {error}")))?;
        let tags = document
            .as_array()
            .and_then(|entries| entries.first())
            .and_then(Value::as_object)
            .ok_or_else(|| metadata_error("expected a non-empty JSON array".to_string()))?;

        let create_date = tags
            .get(CREATE_DATE_TAG)
            .and_then(Value::as_str)
            .ok_or_else(|| metadata_error(format!("missing {CREATE_DATE_TAG}")))?
            .to_string();

        let duration = DURATION_TAGS
            .iter()
            .filter_map(|tag| tags.get(*tag))
            .find_map(|value| match value {
                Value::String(text) => Some(text.clone()),
                Value::Number(number) => Some(number.to_string()),
                _ => None,
            });

        Ok(Self {
            path: path.to_path_buf(),
            create_date,
            duration,
        })
    }

    /// The duration in seconds, if the tool reported one.
    ///
    /// exiftool prints long clips as `0:05:00` and short ones as `12.34 s`;
    /// both are understood, as is a trailing `(approx)`.
    pub fn duration_seconds(&self) -> Result<Option<f64>, BcameraError> {
        let Some(raw) = &self.duration else {
            return Ok(None);
        };

        let cleaned = raw.trim().trim_end_matches("(approx)").trim_end();
        let cleaned = cleaned.strip_suffix(" s").unwrap_or(cleaned);
        parse_seconds(cleaned).map(Some)
    }
}

/// Something that can report a clip's embedded metadata.
pub trait MetadataSource {
    /// Read the creation date and duration of the clip at `path`.
    fn read(&self, path: &Path) -> Result<ClipMetadata, BcameraError>;
}

/// Reads metadata by running `exiftool -G -j <file>`.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: String,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new("exiftool")
    }
}

impl ExifTool {
    /// Use `program` as the exiftool executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MetadataSource for ExifTool {
    fn read(&self, path: &Path) -> Result<ClipMetadata, BcameraError> {
        log::debug!("Running {} -G -j {}", self.program, path.display());

        let output = Command::new(&self.program)
            .args(["-G", "-j"])
            .arg(path)
            .output()
            .map_err(|error| BcameraError::Metadata {
                path: path.to_path_buf(),
                reason: format!("failed to run {}: {error}", self.program),
            })?;

        if !output.status.success() {
            return Err(BcameraError::Metadata {
                path: path.to_path_buf(),
                reason: format!(
                    "{} exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        ClipMetadata::from_exiftool_json(path, &String::from_utf8_lossy(&output.stdout))
    }
}

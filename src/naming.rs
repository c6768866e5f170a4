//! Output filename construction.
//!
//! A renamed clip is called `<date>-<time>[_<PLATE>]_<tag>.mp4`, where the
//! date and time are those at which the retained portion of the video
//! begins, e.g. `2016-01-28-1630_BR549_-grmn.mp4`.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::{error::BcameraError, timecode::format_seconds, timestamp::seconds_to_delta};

/// Layout of the time prefix of every output filename.
pub const BASE_NAME_TIME_FORMAT: &str = "%Y-%m-%d-%H%M";

/// Extension of the stream-copied output.
pub const PRIMARY_EXTENSION: &str = "mp4";

/// The real-world time the retained portion starts: the recording start
/// plus the trim offset.
///
/// # Errors
///
/// Returns [`BcameraError::InvalidDuration`] when the offset carries the
/// date past the representable range.
pub fn clip_start(
    file_start: NaiveDateTime,
    start_seconds: f64,
) -> Result<NaiveDateTime, BcameraError> {
    seconds_to_delta(start_seconds)
        .and_then(|delta| file_start.checked_add_signed(delta))
        .ok_or_else(|| BcameraError::InvalidDuration(format_seconds(start_seconds)))
}

/// Join the formatted clip start, the uppercased plate and the tag with
/// underscores.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2016, 1, 28)
///     .unwrap()
///     .and_hms_opt(16, 30, 48)
///     .unwrap();
/// assert_eq!(
///     bcamera::naming::base_name(start, Some("br549"), "-grmn"),
///     "2016-01-28-1630_BR549_-grmn",
/// );
/// ```
pub fn base_name(clip_start: NaiveDateTime, plate: Option<&str>, tag: &str) -> String {
    let mut parts = vec![clip_start.format(BASE_NAME_TIME_FORMAT).to_string()];
    if let Some(plate) = plate.filter(|plate| !plate.is_empty()) {
        parts.push(plate.to_uppercase());
    }
    parts.push(tag.to_string());
    parts.join("_")
}

/// Where a clip's transcoded output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// The stream-copied `.mp4`.
    pub primary: PathBuf,
    /// The re-encoded copy, when a re-encode profile is enabled.
    pub secondary: Option<PathBuf>,
}

impl OutputPaths {
    /// Paths for `base_name` inside `directory`.
    pub fn new(directory: &Path, base_name: &str, secondary_extension: Option<&str>) -> Self {
        Self {
            primary: directory.join(format!("{base_name}.{PRIMARY_EXTENSION}")),
            secondary: secondary_extension
                .map(|extension| directory.join(format!("{base_name}.{extension}"))),
        }
    }
}

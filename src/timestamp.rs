//! Clip timestamp resolution.
//!
//! Cameras record a creation date of the form `2016:01:28 16:30:48`. Most
//! stamp the moment recording started; some stamp the moment it stopped, in
//! which case the clip duration is subtracted to recover the start.

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{FixedOffset, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::{error::BcameraError, metadata::ClipMetadata};

/// Layout of the creation date written by the metadata tool.
pub const CREATE_DATE_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Parse a creation-date string such as `2016:01:28 16:30:48`.
///
/// # Errors
///
/// Returns [`BcameraError::Parse`] if the string does not match
/// [`CREATE_DATE_FORMAT`].
pub fn parse_create_date(value: &str) -> Result<NaiveDateTime, BcameraError> {
    NaiveDateTime::parse_from_str(value.trim(), CREATE_DATE_FORMAT).map_err(|_| {
        BcameraError::Parse {
            value: value.to_string(),
            expected: "YYYY:MM:DD HH:MM:SS",
        }
    })
}

/// The zone clip times are rendered in.
///
/// Named zones follow their daylight-saving rules; fixed offsets never
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipTimeZone {
    /// An IANA zone such as `Europe/London`.
    Named(Tz),
    /// A constant offset from UTC.
    Fixed(FixedOffset),
}

impl ClipTimeZone {
    /// Local wall-clock time in this zone at the UTC instant `utc`.
    pub fn localize(&self, utc: &NaiveDateTime) -> NaiveDateTime {
        match self {
            ClipTimeZone::Named(zone) => zone.from_utc_datetime(utc).naive_local(),
            ClipTimeZone::Fixed(offset) => offset.from_utc_datetime(utc).naive_local(),
        }
    }
}

impl Display for ClipTimeZone {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ClipTimeZone::Named(zone) => write!(f, "{}", zone.name()),
            ClipTimeZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Parse a time zone.
///
/// Accepts IANA names (`Europe/London`, `UTC`), `Z`, and signed offsets
/// written `+HH:MM`, `+HHMM` or `+HH`.
///
/// # Example
///
/// ```
/// use bcamera::timestamp::{ClipTimeZone, parse_time_zone};
///
/// assert!(matches!(parse_time_zone("Europe/London"), Ok(ClipTimeZone::Named(_))));
/// assert!(matches!(parse_time_zone("-0530"), Ok(ClipTimeZone::Fixed(_))));
/// assert_eq!(parse_time_zone("+01:00").unwrap().to_string(), "+01:00");
/// ```
pub fn parse_time_zone(value: &str) -> Result<ClipTimeZone, BcameraError> {
    let trimmed = value.trim();
    if let Ok(zone) = trimmed.parse::<Tz>() {
        return Ok(ClipTimeZone::Named(zone));
    }
    parse_fixed_offset(trimmed)
        .map(ClipTimeZone::Fixed)
        .ok_or_else(|| {
            BcameraError::InvalidConfig(format!(
                "unsupported timezone {value:?} (use a zone name such as Europe/London or an offset such as +01:00)"
            ))
        })
}

fn parse_fixed_offset(value: &str) -> Option<FixedOffset> {
    if value.eq_ignore_ascii_case("utc") || value.eq_ignore_ascii_case("z") {
        return FixedOffset::east_opt(0);
    }

    let (sign, digits) = match value.as_bytes().first() {
        Some(b'+') => (1, &value[1..]),
        Some(b'-') => (-1, &value[1..]),
        _ => return None,
    };

    let digits = digits.replace(':', "");
    if !digits.chars().all(|character| character.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (&digits[..2], "0"),
        4 => (&digits[..2], &digits[2..]),
        _ => return None,
    };

    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Turn a second count into a [`TimeDelta`] with millisecond precision.
///
/// Returns `None` when the count does not fit in a [`TimeDelta`].
pub(crate) fn seconds_to_delta(seconds: f64) -> Option<TimeDelta> {
    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)
}

/// The start of the original recording, derived from its metadata.
///
/// When `anchor_at_end` is set the metadata duration is subtracted from the
/// creation date. With a `timezone` the creation date is read as UTC and
/// rendered in that zone; without one it is used as-is.
///
/// # Errors
///
/// Returns [`BcameraError::Parse`] for a malformed creation date,
/// [`BcameraError::Metadata`] when anchoring at end and the metadata has no
/// duration or one that reaches past the representable date range, and [`BcameraError::InvalidDuration`] for an unreadable
/// duration.
pub fn resolve_file_start(
    metadata: &ClipMetadata,
    anchor_at_end: bool,
    timezone: Option<ClipTimeZone>,
) -> Result<NaiveDateTime, BcameraError> {
    let mut start = parse_create_date(&metadata.create_date)?;

    if anchor_at_end {
        let duration = metadata.duration_seconds()?.ok_or_else(|| BcameraError::Metadata {
            path: metadata.path.clone(),
            reason: "clip is anchored at end but has no duration".to_string(),
        })?;
        start = seconds_to_delta(duration)
            .and_then(|delta| start.checked_sub_signed(delta))
            .ok_or_else(|| BcameraError::Metadata {
                path: metadata.path.clone(),
                reason: format!("duration of {duration} s reaches before the earliest date"),
            })?;
    }

    if let Some(zone) = timezone {
        start = zone.localize(&start);
    }

    log::debug!(
        "{}: create date {} -> file start {}",
        metadata.path.display(),
        metadata.create_date,
        start
    );

    Ok(start)
}

//! Output filename tests.

use std::path::{Path, PathBuf};

use bcamera::{
    BcameraError, OutputPaths,
    naming::{base_name, clip_start},
};
use chrono::{NaiveDate, NaiveDateTime};

fn recording_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2016, 1, 28)
        .unwrap()
        .and_hms_opt(16, 30, 48)
        .unwrap()
}

#[test]
fn plate_and_tag() {
    let start = clip_start(recording_start(), 0.0).unwrap();
    assert_eq!(base_name(start, Some("BR549"), "-grmn"), "2016-01-28-1630_BR549_-grmn");
}

#[test]
fn plate_is_uppercased() {
    let start = clip_start(recording_start(), 0.0).unwrap();
    assert_eq!(base_name(start, Some("br549"), "-grmn"), "2016-01-28-1630_BR549_-grmn");
}

#[test]
fn no_plate() {
    let start = clip_start(recording_start(), 0.0).unwrap();
    assert_eq!(base_name(start, None, "-grmn"), "2016-01-28-1630_-grmn");
    assert_eq!(base_name(start, Some(""), "-grmn"), "2016-01-28-1630_-grmn");
}

#[test]
fn start_offset_moves_the_name() {
    // 16:30:48 + 75 s = 16:32:03.
    let start = clip_start(recording_start(), 75.0).unwrap();
    assert_eq!(base_name(start, None, "-grmn"), "2016-01-28-1632_-grmn");
}

#[test]
fn start_offset_crosses_midnight() {
    let late = NaiveDate::from_ymd_opt(2016, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 30)
        .unwrap();
    let start = clip_start(late, 45.5).unwrap();
    assert_eq!(base_name(start, None, "-x"), "2017-01-01-0000_-x");
}

#[test]
fn start_offset_crosses_month_end() {
    let start = clip_start(recording_start(), 4.0 * 86_400.0).unwrap();
    assert_eq!(base_name(start, None, "-grmn"), "2016-02-01-1630_-grmn");
}

#[test]
fn start_offset_past_the_calendar_is_an_error() {
    let error = clip_start(recording_start(), 9_999_999_999_999.0).unwrap_err();
    assert!(matches!(error, BcameraError::InvalidDuration(_)), "{error}");
}

#[test]
fn output_paths_without_reencode() {
    let paths = OutputPaths::new(Path::new("/clips"), "2016-01-28-1630_-grmn", None);
    assert_eq!(paths.primary, PathBuf::from("/clips/2016-01-28-1630_-grmn.mp4"));
    assert_eq!(paths.secondary, None);
}

#[test]
fn output_paths_with_reencode() {
    let paths = OutputPaths::new(Path::new("."), "2016-01-28-1630_-grmn", Some("wmv"));
    assert_eq!(paths.primary, PathBuf::from("./2016-01-28-1630_-grmn.mp4"));
    assert_eq!(paths.secondary, Some(PathBuf::from("./2016-01-28-1630_-grmn.wmv")));
}

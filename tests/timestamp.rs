//! Creation date and clip start tests.

use std::path::PathBuf;

use bcamera::{
    BcameraError, ClipMetadata,
    timestamp::{ClipTimeZone, parse_create_date, parse_time_zone, resolve_file_start},
};
use chrono::{NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2016, 1, 28)
        .unwrap()
        .and_hms_opt(hour, minute, second)
        .unwrap()
}

fn metadata(create_date: &str, duration: Option<&str>) -> ClipMetadata {
    ClipMetadata {
        path: PathBuf::from("GRMN0042.MP4"),
        create_date: create_date.to_string(),
        duration: duration.map(str::to_string),
    }
}

#[test]
fn parses_exif_date() {
    assert_eq!(parse_create_date("2016:01:28 16:30:48").unwrap(), at(16, 30, 48));
}

#[test]
fn rejects_other_layouts() {
    for value in [
        "2016-01-28 16:30:48",
        "2016:01:28",
        "0000:00:00 00:00:00",
        "yesterday",
    ] {
        let error = parse_create_date(value).unwrap_err();
        assert!(error.to_string().contains("Cannot parse timestamp"), "{error}");
    }
}

#[test]
fn start_anchored_clip_keeps_create_date() {
    let start = resolve_file_start(&metadata("2016:01:28 16:30:48", Some("0:05:00")), false, None)
        .unwrap();
    assert_eq!(start, at(16, 30, 48));
}

#[test]
fn end_anchored_clip_subtracts_duration() {
    let start = resolve_file_start(&metadata("2016:01:28 16:30:48", Some("0:05:00")), true, None)
        .unwrap();
    assert_eq!(start, at(16, 25, 48));
}

#[test]
fn end_anchored_clip_understands_short_durations() {
    let start =
        resolve_file_start(&metadata("2016:01:28 16:30:48", Some("12.00 s")), true, None).unwrap();
    assert_eq!(start, at(16, 30, 36));
}

#[test]
fn end_anchored_clip_without_duration_fails() {
    let error = resolve_file_start(&metadata("2016:01:28 16:30:48", None), true, None).unwrap_err();
    assert!(error.to_string().contains("no duration"), "{error}");
}

#[test]
fn end_anchored_clip_with_absurd_duration_fails() {
    let error = resolve_file_start(
        &metadata("2016:01:28 16:30:48", Some("99999999999999 s")),
        true,
        None,
    )
    .unwrap_err();
    assert!(matches!(error, BcameraError::Metadata { .. }), "{error}");
}

#[test]
fn timezone_renders_utc_in_zone() {
    let zone = parse_time_zone("+01:00").unwrap();
    let start =
        resolve_file_start(&metadata("2016:01:28 16:30:48", None), false, Some(zone)).unwrap();
    assert_eq!(start, at(17, 30, 48));
}

#[test]
fn named_zone_follows_daylight_saving() {
    let zone = parse_time_zone("Europe/London").unwrap();
    assert_eq!(zone, ClipTimeZone::Named(Tz::Europe__London));

    let summer =
        resolve_file_start(&metadata("2016:07:01 12:00:00", None), false, Some(zone)).unwrap();
    assert_eq!(summer.to_string(), "2016-07-01 13:00:00");

    let winter =
        resolve_file_start(&metadata("2016:01:28 12:00:00", None), false, Some(zone)).unwrap();
    assert_eq!(winter, at(12, 0, 0));
}

#[test]
fn end_anchored_clip_in_zone_subtracts_then_converts() {
    let zone = parse_time_zone("Europe/London").unwrap();
    // Stopped 00:05:00 UTC on 1 July after ten minutes: started 23:55 UTC on
    // 30 June, which is 00:55 BST on 1 July.
    let start = resolve_file_start(
        &metadata("2016:07:01 00:05:00", Some("0:10:00")),
        true,
        Some(zone),
    )
    .unwrap();
    assert_eq!(start.to_string(), "2016-07-01 00:55:00");
}

#[test]
fn time_zone_forms() {
    let noon = at(12, 0, 0);
    let localized = |value: &str| parse_time_zone(value).unwrap().localize(&noon);

    assert_eq!(localized("UTC"), noon);
    assert_eq!(localized("z"), noon);
    assert_eq!(localized("+0130"), at(13, 30, 0));
    assert_eq!(localized("-08"), at(4, 0, 0));
    assert_eq!(localized("America/New_York"), at(7, 0, 0));
    for value in ["Mars/Olympus", "+1", "+01:75", "0100", ""] {
        assert!(parse_time_zone(value).is_err(), "{value:?} should be rejected");
    }
}

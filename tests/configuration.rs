//! Layered configuration tests.

use std::{fs, path::PathBuf};

use bcamera::{ConfigLayer, FfmpegLogLevel, LayeredConfig, ReencodeProfile};
use serde_json::json;

fn layer(value: serde_json::Value) -> ConfigLayer {
    serde_json::from_value(value).expect("layer must be a JSON object")
}

#[test]
fn defaults_when_nothing_is_set() {
    let settings = LayeredConfig::new().resolve().unwrap();
    assert_eq!(settings.start, "0");
    assert_eq!(settings.start_seconds, 0.0);
    assert_eq!(settings.duration, None);
    assert_eq!(settings.plate, None);
    assert_eq!(settings.output_directory, PathBuf::from("."));
    assert!(!settings.sound);
    assert!(!settings.dry_run);
    assert!(!settings.verbose);
    assert!(!settings.keep_going);
    assert!(settings.timezone.is_none());
    assert!(settings.mapping.is_empty());
    assert!(settings.reencode.is_none());
    assert_eq!(settings.nice, 10);
    assert_eq!(settings.loglevel, FfmpegLogLevel::Warning);
    assert_eq!(settings.ffmpeg, "ffmpeg");
    assert_eq!(settings.exiftool, "exiftool");
}

#[test]
fn command_line_overrides_file() {
    let overrides = layer(json!({ "plate": "BR549", "start": "1:00" }));
    let file = layer(json!({ "plate": "XY123", "start": "0:10", "output_directory": "/clips" }));

    let settings = LayeredConfig::new()
        .with_layer(overrides)
        .with_layer(file)
        .resolve()
        .unwrap();

    assert_eq!(settings.plate.as_deref(), Some("BR549"));
    assert_eq!(settings.start, "1:00");
    assert_eq!(settings.start_seconds, 60.0);
    // Not given on the command line, so the file's value is used.
    assert_eq!(settings.output_directory, PathBuf::from("/clips"));
}

#[test]
fn null_falls_through_to_next_layer() {
    let config = LayeredConfig::new()
        .with_layer(layer(json!({ "plate": null })))
        .with_layer(layer(json!({ "plate": "XY123" })));
    assert_eq!(config.get("plate"), Some(&json!("XY123")));
    assert_eq!(config.get("missing"), None);
}

#[test]
fn file_can_enable_switches_the_command_line_left_unset() {
    let settings = LayeredConfig::new()
        .with_layer(ConfigLayer::new())
        .with_layer(layer(json!({ "sound": true, "dry_run": true })))
        .resolve()
        .unwrap();
    assert!(settings.sound);
    assert!(settings.dry_run);
}

#[test]
fn explicit_duration_beats_end_time() {
    let settings = LayeredConfig::new()
        .with_layer(layer(json!({ "start": "0:10", "length": "0:30", "end": "5:00" })))
        .resolve()
        .unwrap();
    assert_eq!(settings.duration.as_deref(), Some("0:30"));
}

#[test]
fn end_time_becomes_duration_from_start() {
    let settings = LayeredConfig::new()
        .with_layer(layer(json!({ "start": "1:00", "end": "2:30.5" })))
        .resolve()
        .unwrap();
    assert_eq!(settings.duration.as_deref(), Some("90.5"));
}

#[test]
fn end_before_start_is_rejected() {
    let result = LayeredConfig::new()
        .with_layer(layer(json!({ "start": "2:00", "end": "1:00" })))
        .resolve();
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Invalid range"), "{message}");
}

#[test]
fn scientific_and_signed_times_are_rejected() {
    for start in ["1e3", "+5"] {
        let result = LayeredConfig::new()
            .with_layer(layer(json!({ "start": start })))
            .resolve();
        let message = result.unwrap_err().to_string();
        assert!(message.contains(start), "{message}");
    }
}

#[test]
fn numbers_are_accepted_for_times() {
    let settings = LayeredConfig::new()
        .with_layer(layer(json!({ "start": 15, "length": 30 })))
        .resolve()
        .unwrap();
    assert_eq!(settings.start, "15");
    assert_eq!(settings.duration.as_deref(), Some("30"));
}

#[test]
fn empty_plate_is_unset() {
    let settings = LayeredConfig::new()
        .with_layer(layer(json!({ "plate": "" })))
        .resolve()
        .unwrap();
    assert_eq!(settings.plate, None);
}

#[test]
fn quality_enables_reencode_profile() {
    let settings = LayeredConfig::new()
        .with_layer(layer(json!({ "quality": 3 })))
        .resolve()
        .unwrap();
    let profile = settings.reencode.expect("quality should enable re-encoding");
    assert_eq!(profile.quality, 3);
    assert_eq!(profile.extension, "wmv");
}

#[test]
fn reencode_object_overrides_defaults() {
    let settings = LayeredConfig::new()
        .with_layer(layer(json!({ "quality": 2 })))
        .with_layer(layer(json!({
            "reencode": { "video_codec": "mpeg4", "extension": ".avi" }
        })))
        .resolve()
        .unwrap();
    assert_eq!(
        settings.reencode,
        Some(ReencodeProfile {
            quality: 2,
            video_codec: "mpeg4".to_string(),
            audio_codec: "wmav2".to_string(),
            extension: "avi".to_string(),
        })
    );
}

#[test]
fn reencode_false_disables_profile() {
    let settings = LayeredConfig::new()
        .with_layer(layer(json!({ "reencode": false })))
        .resolve()
        .unwrap();
    assert!(settings.reencode.is_none());
}

#[test]
fn loglevel_accepts_names_and_numbers() {
    let by_name = LayeredConfig::new()
        .with_layer(layer(json!({ "loglevel": "error" })))
        .resolve()
        .unwrap();
    assert_eq!(by_name.loglevel, FfmpegLogLevel::Error);

    let by_number = LayeredConfig::new()
        .with_layer(layer(json!({ "loglevel": 32 })))
        .resolve()
        .unwrap();
    assert_eq!(by_number.loglevel, FfmpegLogLevel::Info);

    assert!(
        LayeredConfig::new()
            .with_layer(layer(json!({ "loglevel": "loud" })))
            .resolve()
            .is_err()
    );
}

#[test]
fn wrong_types_are_rejected() {
    for value in [
        json!({ "sound": "yes" }),
        json!({ "plate": ["BR549"] }),
        json!({ "nice": "high" }),
        json!({ "mapping": "GRMN" }),
        json!({ "reencode": "wmv" }),
    ] {
        let result = LayeredConfig::new().with_layer(layer(value.clone())).resolve();
        assert!(result.is_err(), "{value} should be rejected");
    }
}

#[test]
fn load_file_reads_mapping_in_order() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("bcamera.json");
    fs::write(
        &path,
        r#"{
            "output_directory": "/clips",
            "mapping": {
                "GRMN": "-grmn",
                "CYQ": { "rename": "-fly6", "anchor_at_end": true },
                "C": "-cam"
            }
        }"#,
    )
    .expect("Failed to write config");

    let file = LayeredConfig::load_file(&path).unwrap();
    let settings = LayeredConfig::new().with_layer(file).resolve().unwrap();

    assert_eq!(settings.mapping.len(), 3);
    assert_eq!(settings.mapping.resolve("CYQ_0001.MP4").tag, "-fly6");
    assert_eq!(settings.mapping.resolve("CAM0001.MP4").tag, "-cam");
}

#[test]
fn effective_config_echo() {
    let settings = LayeredConfig::new()
        .with_layer(layer(json!({
            "plate": "BR549",
            "timezone": "+01:00",
            "mapping": { "GRMN": "-grmn" }
        })))
        .resolve()
        .unwrap();
    let echoed = settings.to_json();
    assert_eq!(echoed["plate"], json!("BR549"));
    assert_eq!(echoed["timezone"], json!("+01:00"));
    assert_eq!(echoed["loglevel"], json!(24));
    assert_eq!(echoed["mapping"]["GRMN"], json!("-grmn"));
}

#[test]
fn named_timezone_is_echoed_by_name() {
    let settings = LayeredConfig::new()
        .with_layer(layer(json!({ "timezone": "Europe/London" })))
        .resolve()
        .unwrap();
    assert_eq!(settings.to_json()["timezone"], json!("Europe/London"));
}

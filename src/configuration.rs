//! Layered run configuration.
//!
//! A run is configured from an ordered list of [`ConfigLayer`]s: the
//! command-line overrides first, then the JSON config file. Each key is
//! looked up first-match-wins; keys no layer sets fall back to built-in
//! defaults. [`LayeredConfig::resolve`] turns the layers into typed,
//! immutable [`Settings`].
//!
//! # Example
//!
//! ```
//! use bcamera::{ConfigLayer, LayeredConfig};
//! use serde_json::json;
//!
//! let file: ConfigLayer = serde_json::from_value(json!({
//!     "plate": "ab123",
//!     "mapping": { "GRMN": "-grmn" }
//! })).unwrap();
//!
//! let mut overrides = ConfigLayer::new();
//! overrides.insert("plate".into(), json!("BR549"));
//!
//! let settings = LayeredConfig::new()
//!     .with_layer(overrides)
//!     .with_layer(file)
//!     .resolve()
//!     .unwrap();
//!
//! assert_eq!(settings.plate.as_deref(), Some("BR549"));
//! assert_eq!(settings.start, "0");
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value, json};

use crate::{
    error::BcameraError,
    ffmpeg::FfmpegLogLevel,
    mapping::TagMapping,
    timecode::{format_seconds, parse_seconds},
    timestamp::{ClipTimeZone, parse_time_zone},
    transcode::ReencodeProfile,
};

/// One source of configuration values, keyed by setting name.
///
/// Keys keep their insertion order, so a `mapping` object read from a file
/// is scanned in file order.
pub type ConfigLayer = Map<String, Value>;

const DEFAULT_START: &str = "0";
const DEFAULT_OUTPUT_DIRECTORY: &str = ".";
const DEFAULT_NICE: i64 = 10;
const DEFAULT_FFMPEG: &str = "ffmpeg";
const DEFAULT_EXIFTOOL: &str = "exiftool";

/// Ordered configuration sources, highest priority first.
#[derive(Debug, Clone, Default)]
pub struct LayeredConfig {
    layers: Vec<ConfigLayer>,
}

impl LayeredConfig {
    /// An empty stack. Resolving it yields the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer below every layer added so far.
    #[must_use]
    pub fn with_layer(mut self, layer: ConfigLayer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Read a JSON config file into a layer.
    ///
    /// # Errors
    ///
    /// Returns [`BcameraError::Config`] if the file cannot be read, is not
    /// valid JSON, or its top level is not an object.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<ConfigLayer, BcameraError> {
        let path = path.as_ref();
        let config_error = |reason: String| BcameraError::Config {
            path: path.to_path_buf(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|error| config_error(error.to_string()))?;
        let value: Value =
            serde_json::from_str(&text).map_err(|error| config_error(error.to_string()))?;

        match value {
            Value::Object(layer) => {
                log::debug!("Loaded {} config key(s) from {}", layer.len(), path.display());
                Ok(layer)
            }
            _ => Err(config_error("top level must be a JSON object".to_string())),
        }
    }

    /// First value set for `key`, probing layers in priority order.
    ///
    /// `null` counts as unset and falls through to the next layer.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.layers
            .iter()
            .filter_map(|layer| layer.get(key))
            .find(|value| !value.is_null())
    }

    fn string(&self, key: &str) -> Result<Option<String>, BcameraError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            Some(other) => Err(BcameraError::InvalidConfig(format!(
                "{key} must be a string, got {other}"
            ))),
        }
    }

    fn flag(&self, key: &str) -> Result<bool, BcameraError> {
        match self.get(key) {
            None => Ok(false),
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(other) => Err(BcameraError::InvalidConfig(format!(
                "{key} must be a boolean, got {other}"
            ))),
        }
    }

    fn integer(&self, key: &str) -> Result<Option<i64>, BcameraError> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value.as_i64().map(Some).ok_or_else(|| {
                BcameraError::InvalidConfig(format!("{key} must be an integer, got {value}"))
            }),
        }
    }

    /// Merge the layers into typed settings.
    ///
    /// # Errors
    ///
    /// Returns [`BcameraError::InvalidConfig`] for values of the wrong type
    /// or an unknown time zone, [`BcameraError::InvalidDuration`] for
    /// malformed time strings, and [`BcameraError::InvalidRange`] when the
    /// end time is not after the start offset.
    pub fn resolve(&self) -> Result<Settings, BcameraError> {
        let start = self
            .string("start")?
            .unwrap_or_else(|| DEFAULT_START.to_string());
        let start_seconds = parse_seconds(&start)?;

        let length = self.string("length")?;
        let end = self.string("end")?;
        let duration = match (&length, &end) {
            (Some(length), _) => {
                parse_seconds(length)?;
                Some(length.clone())
            }
            (None, Some(end)) => {
                let end_seconds = parse_seconds(end)?;
                if end_seconds <= start_seconds {
                    return Err(BcameraError::InvalidRange {
                        start: start.clone(),
                        end: end.clone(),
                    });
                }
                Some(format_seconds(end_seconds - start_seconds))
            }
            (None, None) => None,
        };

        let mapping = match self.get("mapping") {
            Some(value) => TagMapping::from_json(value)?,
            None => TagMapping::new(),
        };

        let timezone = self
            .string("timezone")?
            .map(|zone| parse_time_zone(&zone))
            .transpose()?;

        let mut reencode = match self.get("reencode") {
            None | Some(Value::Bool(false)) => None,
            Some(Value::Bool(true)) => Some(ReencodeProfile::default()),
            Some(value) => Some(ReencodeProfile::from_json(value)?),
        };
        if let Some(quality) = self.integer("quality")? {
            let quality = u32::try_from(quality).map_err(|_| {
                BcameraError::InvalidConfig(format!("quality must be non-negative, got {quality}"))
            })?;
            reencode = Some(reencode.unwrap_or_default().with_quality(quality));
        }

        let nice = self.integer("nice")?.unwrap_or(DEFAULT_NICE);

        let loglevel = match self.string("loglevel")? {
            Some(level) => FfmpegLogLevel::parse(&level).ok_or_else(|| {
                BcameraError::InvalidConfig(format!("unknown ffmpeg loglevel {level:?}"))
            })?,
            None => FfmpegLogLevel::default(),
        };

        Ok(Settings {
            start,
            start_seconds,
            length,
            end,
            duration,
            plate: self.string("plate")?.filter(|plate| !plate.is_empty()),
            output_directory: PathBuf::from(
                self.string("output_directory")?
                    .unwrap_or_else(|| DEFAULT_OUTPUT_DIRECTORY.to_string()),
            ),
            sound: self.flag("sound")?,
            dry_run: self.flag("dry_run")?,
            verbose: self.flag("verbose")?,
            keep_going: self.flag("keep_going")?,
            timezone,
            mapping,
            reencode,
            nice,
            loglevel,
            ffmpeg: self
                .string("ffmpeg")?
                .unwrap_or_else(|| DEFAULT_FFMPEG.to_string()),
            exiftool: self
                .string("exiftool")?
                .unwrap_or_else(|| DEFAULT_EXIFTOOL.to_string()),
        })
    }
}

/// The effective configuration of a run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Start offset into every clip, as given.
    pub start: String,
    /// [`start`](Settings::start) in seconds.
    pub start_seconds: f64,
    /// Explicit duration, as given.
    pub length: Option<String>,
    /// Explicit end time, as given.
    pub end: Option<String>,
    /// The trim length handed to the transcoder: the explicit duration if
    /// set, otherwise end minus start, otherwise `None` (run to end of
    /// input).
    pub duration: Option<String>,
    /// Vehicle plate for the filename.
    pub plate: Option<String>,
    /// Where renamed clips are written.
    pub output_directory: PathBuf,
    /// Copy the audio stream instead of dropping it.
    pub sound: bool,
    /// Print commands without running the transcoder.
    pub dry_run: bool,
    /// Echo the effective configuration before processing.
    pub verbose: bool,
    /// Report a failing clip and continue with the next one.
    pub keep_going: bool,
    /// Zone in which clip times are rendered.
    pub timezone: Option<ClipTimeZone>,
    /// Prefix to tag rules.
    pub mapping: TagMapping,
    /// Secondary re-encoded output, when enabled.
    pub reencode: Option<ReencodeProfile>,
    /// Priority adjustment passed to `nice`; `0` runs the transcoder directly.
    pub nice: i64,
    /// Transcoder `-loglevel` value.
    pub loglevel: FfmpegLogLevel,
    /// Transcoder program.
    pub ffmpeg: String,
    /// Metadata tool program.
    pub exiftool: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start: DEFAULT_START.to_string(),
            start_seconds: 0.0,
            length: None,
            end: None,
            duration: None,
            plate: None,
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            sound: false,
            dry_run: false,
            verbose: false,
            keep_going: false,
            timezone: None,
            mapping: TagMapping::new(),
            reencode: None,
            nice: DEFAULT_NICE,
            loglevel: FfmpegLogLevel::default(),
            ffmpeg: DEFAULT_FFMPEG.to_string(),
            exiftool: DEFAULT_EXIFTOOL.to_string(),
        }
    }
}

impl Settings {
    /// JSON rendering of the effective configuration, for `--verbose`.
    pub fn to_json(&self) -> Value {
        json!({
            "start": self.start,
            "length": self.length,
            "end": self.end,
            "duration": self.duration,
            "plate": self.plate,
            "output_directory": self.output_directory.display().to_string(),
            "sound": self.sound,
            "dry_run": self.dry_run,
            "verbose": self.verbose,
            "keep_going": self.keep_going,
            "timezone": self.timezone.map(|zone| zone.to_string()),
            "reencode": self.reencode.as_ref().map(ReencodeProfile::to_json),
            "nice": self.nice,
            "loglevel": self.loglevel.as_number(),
            "ffmpeg": self.ffmpeg,
            "exiftool": self.exiftool,
            "mapping": self.mapping.to_json(),
        })
    }
}

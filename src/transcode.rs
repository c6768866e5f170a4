//! Transcoder command construction and dispatch.
//!
//! The trimmed clip is produced by one `ffmpeg` invocation, run at lowered
//! priority. Video is always stream-copied into the primary `.mp4`; audio is
//! copied when sound is enabled and dropped otherwise. An optional
//! [`ReencodeProfile`] adds a second, re-encoded output to the same command.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use bcamera::{OutputPaths, Settings, TranscodeCommand};
//!
//! let settings = Settings::default();
//! let outputs = OutputPaths::new(Path::new("out"), "2016-01-28-1630_-grmn", None);
//! let command = TranscodeCommand::build(&settings, Path::new("GRMN0042.MP4"), &outputs);
//!
//! assert_eq!(
//!     command.to_string(),
//!     "nice -10 ffmpeg -i GRMN0042.MP4 -loglevel 24 -ss 0 -vcodec copy -an out/2016-01-28-1630_-grmn.mp4",
//! );
//! ```

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    io::Write,
    path::Path,
    process::Command,
};

use serde_json::{Value, json};

use crate::{configuration::Settings, error::BcameraError, naming::OutputPaths};

/// Settings for the secondary, re-encoded output.
///
/// Defaults produce a WMV of roughly the same size as the stream-copied
/// source: `-qscale 6 -vcodec msmpeg4 -acodec wmav2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReencodeProfile {
    /// `-qscale` value; lower is better quality.
    pub quality: u32,
    /// Video codec name.
    pub video_codec: String,
    /// Audio codec name, used when sound is enabled.
    pub audio_codec: String,
    /// Extension of the re-encoded file.
    pub extension: String,
}

impl Default for ReencodeProfile {
    fn default() -> Self {
        Self {
            quality: 6,
            video_codec: "msmpeg4".to_string(),
            audio_codec: "wmav2".to_string(),
            extension: "wmv".to_string(),
        }
    }
}

impl ReencodeProfile {
    /// Replace the quality setting.
    #[must_use]
    pub fn with_quality(mut self, quality: u32) -> Self {
        self.quality = quality;
        self
    }

    /// Build a profile from a `reencode` config object. Missing fields keep
    /// their defaults.
    pub fn from_json(value: &Value) -> Result<Self, BcameraError> {
        let fields = value.as_object().ok_or_else(|| {
            BcameraError::InvalidConfig(
                "\"reencode\" must be a boolean or an object".to_string(),
            )
        })?;

        let text = |key: &str| -> Result<Option<String>, BcameraError> {
            match fields.get(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(text)) => Ok(Some(text.clone())),
                Some(other) => Err(BcameraError::InvalidConfig(format!(
                    "reencode.{key} must be a string, got {other}"
                ))),
            }
        };

        let mut profile = Self::default();
        if let Some(quality) = fields.get("quality").filter(|value| !value.is_null()) {
            profile.quality = quality
                .as_u64()
                .and_then(|quality| u32::try_from(quality).ok())
                .ok_or_else(|| {
                    BcameraError::InvalidConfig(format!(
                        "reencode.quality must be a non-negative integer, got {quality}"
                    ))
                })?;
        }
        if let Some(codec) = text("video_codec")? {
            profile.video_codec = codec;
        }
        if let Some(codec) = text("audio_codec")? {
            profile.audio_codec = codec;
        }
        if let Some(extension) = text("extension")? {
            profile.extension = extension.trim_start_matches('.').to_string();
        }
        Ok(profile)
    }

    /// JSON form, used when echoing the effective config.
    pub fn to_json(&self) -> Value {
        json!({
            "quality": self.quality,
            "video_codec": self.video_codec,
            "audio_codec": self.audio_codec,
            "extension": self.extension,
        })
    }
}

/// A fully built external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeCommand {
    /// Executable to launch.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
}

impl TranscodeCommand {
    /// Build the transcode command for one clip.
    ///
    /// The trim window comes from [`Settings::start`] and
    /// [`Settings::duration`]; with no duration the transcoder runs to the
    /// end of the input.
    pub fn build(settings: &Settings, input: &Path, outputs: &OutputPaths) -> Self {
        let mut argv: Vec<String> = Vec::new();

        match settings.nice {
            0 => {}
            niceness if niceness > 0 => argv.extend(["nice".to_string(), format!("-{niceness}")]),
            niceness => argv.extend(["nice".to_string(), "-n".to_string(), niceness.to_string()]),
        }

        argv.push(settings.ffmpeg.clone());
        argv.extend([
            "-i".to_string(),
            input.display().to_string(),
            "-loglevel".to_string(),
            settings.loglevel.as_number().to_string(),
        ]);

        push_trim_window(&mut argv, settings);
        argv.extend(["-vcodec".to_string(), "copy".to_string()]);
        if settings.sound {
            argv.extend(["-acodec".to_string(), "copy".to_string()]);
        } else {
            argv.push("-an".to_string());
        }
        argv.push(outputs.primary.display().to_string());

        if let (Some(profile), Some(secondary)) = (&settings.reencode, &outputs.secondary) {
            push_trim_window(&mut argv, settings);
            argv.extend([
                "-qscale".to_string(),
                profile.quality.to_string(),
                "-vcodec".to_string(),
                profile.video_codec.clone(),
            ]);
            if settings.sound {
                argv.extend(["-acodec".to_string(), profile.audio_codec.clone()]);
            } else {
                argv.push("-an".to_string());
            }
            argv.push(secondary.display().to_string());
        }

        let program = argv.remove(0);
        Self {
            program,
            args: argv,
        }
    }
}

fn push_trim_window(argv: &mut Vec<String>, settings: &Settings) {
    argv.extend(["-ss".to_string(), settings.start.clone()]);
    if let Some(duration) = &settings.duration {
        argv.extend(["-t".to_string(), duration.clone()]);
    }
}

impl Display for TranscodeCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Something that can execute a built command.
pub trait CommandRunner {
    /// Run `command` to completion. The exit status is not inspected.
    fn run(&mut self, command: &TranscodeCommand) -> Result<(), BcameraError>;
}

/// Runs commands as blocking child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &TranscodeCommand) -> Result<(), BcameraError> {
        let status = Command::new(&command.program)
            .args(&command.args)
            .status()
            .map_err(|error| BcameraError::TranscodeDispatch {
                program: command.program.clone(),
                reason: error.to_string(),
            })?;

        if !status.success() {
            log::warn!("{} exited with {status}", command.program);
        }
        Ok(())
    }
}

/// Echo `command` to `echo`, then run it unless `dry_run` is set.
pub fn dispatch<R, W>(
    command: &TranscodeCommand,
    dry_run: bool,
    runner: &mut R,
    echo: &mut W,
) -> Result<(), BcameraError>
where
    R: CommandRunner + ?Sized,
    W: Write + ?Sized,
{
    writeln!(echo, ">  {command}")?;

    if dry_run {
        log::info!("Dry run, not running {}", command.program);
        return Ok(());
    }

    log::info!("Running {}", command.program);
    runner.run(command)
}

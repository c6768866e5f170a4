//! # bcamera
//!
//! Cut and rename bike camera clips.
//!
//! `bcamera` reads a clip's embedded creation time with `exiftool`, derives a
//! filename from it (`2016-01-28-1630_BR549_-grmn.mp4`), and has `ffmpeg`
//! stream-copy a time slice of the clip into that file.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use bcamera::{ClipCutter, ExifTool, LayeredConfig, SystemRunner};
//!
//! let settings = LayeredConfig::new()
//!     .with_layer(LayeredConfig::load_file("bcamera.json")?)
//!     .resolve()?;
//!
//! let mut cutter = ClipCutter::new(settings, ExifTool::default(), SystemRunner);
//! cutter.process(&PathBuf::from("GRMN0042.MP4"), &mut std::io::stdout())?;
//! # Ok::<(), bcamera::BcameraError>(())
//! ```
//!
//! ## Configuration file
//!
//! ```json
//! {
//!     "output_directory": "/video/renamed",
//!     "sound": true,
//!     "mapping": {
//!         "GRMN": "-grmn",
//!         "CYQ": { "rename": "-fly6", "anchor_at_end": true }
//!     }
//! }
//! ```
//!
//! Any command-line setting may also appear in the file; values given on the
//! command line win.
//!
//! ## Requirements
//!
//! `exiftool` and `ffmpeg` must be on the `PATH` (or configured via the
//! `exiftool` and `ffmpeg` keys).

pub mod clip;
pub mod configuration;
pub mod error;
pub mod ffmpeg;
pub mod mapping;
pub mod metadata;
pub mod naming;
pub mod timecode;
pub mod timestamp;
pub mod transcode;

pub use clip::{BatchReport, ClipCutter, ClipPlan};
pub use configuration::{ConfigLayer, LayeredConfig, Settings};
pub use error::BcameraError;
pub use ffmpeg::FfmpegLogLevel;
pub use mapping::{TagMapping, TagRule};
pub use metadata::{ClipMetadata, ExifTool, MetadataSource};
pub use naming::OutputPaths;
pub use transcode::{CommandRunner, ReencodeProfile, SystemRunner, TranscodeCommand};

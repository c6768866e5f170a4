//! The per-clip rename-and-trim pipeline.
//!
//! Every input goes through the same five steps: resolve its tag, resolve
//! its timestamp, compute the output name, build the transcode command, and
//! dispatch it. Nothing carries over from one clip to the next.
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use bcamera::{ClipCutter, ExifTool, LayeredConfig, SystemRunner};
//!
//! let settings = LayeredConfig::new()
//!     .with_layer(LayeredConfig::load_file("bcamera.json")?)
//!     .resolve()?;
//! let mut cutter = ClipCutter::new(settings, ExifTool::default(), SystemRunner);
//!
//! let inputs = vec![PathBuf::from("GRMN0042.MP4")];
//! let report = cutter.process_all(&inputs, &mut std::io::stdout(), |_, _| {})?;
//! println!("{} clip(s) cut", report.processed.len());
//! # Ok::<(), bcamera::BcameraError>(())
//! ```

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;

use crate::{
    configuration::Settings,
    error::BcameraError,
    mapping::TagRule,
    metadata::{ClipMetadata, MetadataSource},
    naming::{self, OutputPaths},
    timestamp::resolve_file_start,
    transcode::{self, CommandRunner, TranscodeCommand},
};

/// Everything derived for one input clip.
#[derive(Debug, Clone)]
pub struct ClipPlan {
    /// The input clip.
    pub input: PathBuf,
    /// The tag rule the clip resolved to.
    pub rule: TagRule,
    /// Metadata as read from the clip.
    pub metadata: ClipMetadata,
    /// Start of the original recording.
    pub file_start: NaiveDateTime,
    /// Start of the retained portion.
    pub clip_start: NaiveDateTime,
    /// Output base name, without directory or extension.
    pub base_name: String,
    /// Output file paths.
    pub outputs: OutputPaths,
    /// The transcode command for this clip.
    pub command: TranscodeCommand,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Clips whose command was dispatched (or printed, in dry-run mode).
    pub processed: Vec<ClipPlan>,
    /// Clips that failed, when failures are isolated per clip.
    pub failures: Vec<(PathBuf, BcameraError)>,
}

impl BatchReport {
    /// Returns `true` if no clip failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renames and trims clips according to a fixed [`Settings`].
pub struct ClipCutter<M, R> {
    settings: Settings,
    metadata: M,
    runner: R,
}

impl<M, R> ClipCutter<M, R>
where
    M: MetadataSource,
    R: CommandRunner,
{
    /// Create a cutter reading metadata from `metadata` and executing
    /// commands with `runner`.
    pub fn new(settings: Settings, metadata: M, runner: R) -> Self {
        Self {
            settings,
            metadata,
            runner,
        }
    }

    /// The settings every clip is processed with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Work out names, times and the command for `input` without running
    /// anything but the metadata tool.
    pub fn plan(&self, input: &Path) -> Result<ClipPlan, BcameraError> {
        let rule = self.settings.mapping.resolve(input);

        let metadata = self.metadata.read(input)?;
        let file_start = resolve_file_start(&metadata, rule.anchor_at_end, self.settings.timezone)?;

        let clip_start = naming::clip_start(file_start, self.settings.start_seconds)?;
        let base_name = naming::base_name(clip_start, self.settings.plate.as_deref(), &rule.tag);
        let outputs = OutputPaths::new(
            &self.settings.output_directory,
            &base_name,
            self.settings
                .reencode
                .as_ref()
                .map(|profile| profile.extension.as_str()),
        );

        let command = TranscodeCommand::build(&self.settings, input, &outputs);
        log::debug!("{}: planned {}", input.display(), outputs.primary.display());

        Ok(ClipPlan {
            input: input.to_path_buf(),
            rule,
            metadata,
            file_start,
            clip_start,
            base_name,
            outputs,
            command,
        })
    }

    /// Plan `input`, echo its timestamp and command to `echo`, and run the
    /// command unless this is a dry run.
    pub fn process<W>(&mut self, input: &Path, echo: &mut W) -> Result<ClipPlan, BcameraError>
    where
        W: Write + ?Sized,
    {
        let plan = self.plan(input)?;

        writeln!(
            echo,
            "* {}  {}  {}",
            plan.metadata.create_date,
            plan.file_start.format("%Y-%m-%dT%H:%M:%S"),
            input.display()
        )?;
        transcode::dispatch(&plan.command, self.settings.dry_run, &mut self.runner, echo)?;

        Ok(plan)
    }

    /// Process `inputs` in order.
    ///
    /// `observe` is called after every clip with its outcome. Unless
    /// [`Settings::keep_going`] is set, the first failure stops the batch
    /// and is returned; otherwise failures are collected in the report.
    pub fn process_all<W, F>(
        &mut self,
        inputs: &[PathBuf],
        echo: &mut W,
        mut observe: F,
    ) -> Result<BatchReport, BcameraError>
    where
        W: Write + ?Sized,
        F: FnMut(&Path, Result<&ClipPlan, &BcameraError>),
    {
        let mut report = BatchReport::default();

        for input in inputs {
            match self.process(input, echo) {
                Ok(plan) => {
                    observe(input, Ok(&plan));
                    report.processed.push(plan);
                }
                Err(error) => {
                    observe(input, Err(&error));
                    if !self.settings.keep_going {
                        return Err(error);
                    }
                    log::warn!("{}: {error}", input.display());
                    report.failures.push((input.clone(), error));
                }
            }
        }

        Ok(report)
    }
}

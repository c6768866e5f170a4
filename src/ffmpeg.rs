//! FFmpeg log level names.
//!
//! The transcoder is run with an explicit `-loglevel`. FFmpeg takes either a
//! level name or its numeric `AV_LOG_*` value; the configuration accepts
//! both and always hands FFmpeg the number.
//!
//! # Example
//!
//! ```
//! use bcamera::ffmpeg::FfmpegLogLevel;
//!
//! assert_eq!(FfmpegLogLevel::parse("warning"), Some(FfmpegLogLevel::Warning));
//! assert_eq!(FfmpegLogLevel::parse("24"), Some(FfmpegLogLevel::Warning));
//! assert_eq!(FfmpegLogLevel::Error.as_number(), 16);
//! ```

/// FFmpeg log verbosity level.
///
/// # Ordering (most verbose → most quiet)
///
/// `Trace` > `Debug` > `Verbose` > `Info` > `Warning` > `Error` > `Fatal` > `Panic` > `Quiet`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FfmpegLogLevel {
    /// Print no output at all.
    Quiet,
    /// Only log conditions the process cannot recover from.
    Panic,
    /// Only log unrecoverable errors.
    Fatal,
    /// Log recoverable errors.
    Error,
    /// Log warnings. This is what clips are cut with by default.
    #[default]
    Warning,
    /// Log informational messages.
    Info,
    /// Log verbose informational messages.
    Verbose,
    /// Log debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl FfmpegLogLevel {
    const ALL: [FfmpegLogLevel; 9] = [
        FfmpegLogLevel::Quiet,
        FfmpegLogLevel::Panic,
        FfmpegLogLevel::Fatal,
        FfmpegLogLevel::Error,
        FfmpegLogLevel::Warning,
        FfmpegLogLevel::Info,
        FfmpegLogLevel::Verbose,
        FfmpegLogLevel::Debug,
        FfmpegLogLevel::Trace,
    ];

    /// The `AV_LOG_*` value of this level.
    pub fn as_number(self) -> i32 {
        match self {
            FfmpegLogLevel::Quiet => -8,
            FfmpegLogLevel::Panic => 0,
            FfmpegLogLevel::Fatal => 8,
            FfmpegLogLevel::Error => 16,
            FfmpegLogLevel::Warning => 24,
            FfmpegLogLevel::Info => 32,
            FfmpegLogLevel::Verbose => 40,
            FfmpegLogLevel::Debug => 48,
            FfmpegLogLevel::Trace => 56,
        }
    }

    /// Parse a level name (case-insensitive, `warn` accepted) or its
    /// numeric value.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(number) = value.parse::<i32>() {
            return Self::ALL
                .into_iter()
                .find(|level| level.as_number() == number);
        }

        match value.to_ascii_lowercase().as_str() {
            "quiet" => Some(FfmpegLogLevel::Quiet),
            "panic" => Some(FfmpegLogLevel::Panic),
            "fatal" => Some(FfmpegLogLevel::Fatal),
            "error" => Some(FfmpegLogLevel::Error),
            "warning" | "warn" => Some(FfmpegLogLevel::Warning),
            "info" => Some(FfmpegLogLevel::Info),
            "verbose" => Some(FfmpegLogLevel::Verbose),
            "debug" => Some(FfmpegLogLevel::Debug),
            "trace" => Some(FfmpegLogLevel::Trace),
            _ => None,
        }
    }
}

use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::{Value, json};

use bcamera::{ClipCutter, ConfigLayer, ExifTool, LayeredConfig, SystemRunner};

const CLI_AFTER_HELP: &str = "Examples:\n  bcamera -c bcamera.json GRMN0042.MP4\n  bcamera -c bcamera.json -s 1:30 -t 0:45 -p br549 -S GRMN0042.MP4\n  bcamera -c bcamera.json -n -v *.MP4\n  bcamera --completions zsh > _bcamera";

#[derive(Debug, Parser)]
#[command(
    name = "bcamera",
    version,
    about = "Cut & rename bike camera files",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input clips.
    #[arg(value_name = "FILE")]
    input_files: Vec<PathBuf>,

    /// JSON config file.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "JSON",
        required_unless_present = "completions"
    )]
    config_file: Option<PathBuf>,

    /// Start this far into the video.
    #[arg(short = 's', long, value_name = "MM:SS")]
    start: Option<String>,

    /// Stop after this duration.
    #[arg(short = 't', long, value_name = "MM:SS")]
    length: Option<String>,

    /// Stop at this time (ignored when a duration is given).
    #[arg(short = 'e', long, value_name = "MM:SS")]
    end: Option<String>,

    /// Plate number for the filename.
    #[arg(short = 'p', long, value_name = "BR549")]
    plate: Option<String>,

    /// Output directory.
    #[arg(short = 'o', long, value_name = "DIRECTORY")]
    output_directory: Option<PathBuf>,

    /// Print the commands without running them.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Echo the effective configuration and log each step.
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Keep the audio track.
    #[arg(short = 'S', long)]
    sound: bool,

    /// Render clip times in this zone (a name such as Europe/London, or an offset such as +01:00).
    #[arg(short = 'z', long, value_name = "Europe/London")]
    timezone: Option<String>,

    /// Also write a re-encoded copy at this quality (lower is better).
    #[arg(short = 'q', long, value_name = "QSCALE")]
    quality: Option<u32>,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Report a failing clip and carry on with the rest.
    #[arg(long)]
    keep_going: bool,

    /// Show a progress bar across input files.
    #[arg(long)]
    progress: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Cli {
    /// The settings given on the command line. Switches that were not passed
    /// are left out so the config file can still turn them on.
    fn overrides(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::new();
        let mut set = |key: &str, value: Value| {
            layer.insert(key.to_string(), value);
        };

        if let Some(start) = &self.start {
            set("start", json!(start));
        }
        if let Some(length) = &self.length {
            set("length", json!(length));
        }
        if let Some(end) = &self.end {
            set("end", json!(end));
        }
        if let Some(plate) = &self.plate {
            set("plate", json!(plate));
        }
        if let Some(directory) = &self.output_directory {
            set("output_directory", json!(directory.display().to_string()));
        }
        if let Some(timezone) = &self.timezone {
            set("timezone", json!(timezone));
        }
        if let Some(quality) = self.quality {
            set("quality", json!(quality));
        }
        if let Some(level) = &self.log_level {
            set("loglevel", json!(level));
        }
        for (key, enabled) in [
            ("dry_run", self.dry_run),
            ("verbose", self.verbose),
            ("sound", self.sound),
            ("keep_going", self.keep_going),
        ] {
            if enabled {
                set(key, json!(true));
            }
        }

        layer
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "bcamera", &mut io::stdout());
        return Ok(());
    }

    let config_file = cli.config_file.as_ref().ok_or("a config file is required (-c)")?;
    let settings = LayeredConfig::new()
        .with_layer(cli.overrides())
        .with_layer(LayeredConfig::load_file(config_file)?)
        .resolve()?;

    init_logging(settings.verbose);

    if settings.verbose {
        let mut effective = settings.to_json();
        effective["input_files"] = json!(
            cli.input_files
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
        );
        println!("{}", serde_json::to_string_pretty(&effective)?);
    }

    let progress_bar = if cli.progress {
        let pb = ProgressBar::new(u64::try_from(cli.input_files.len()).unwrap_or(u64::MAX));
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        pb.set_style(style.progress_chars("##-"));
        Some(pb)
    } else {
        None
    };

    let keep_going = settings.keep_going;
    let exiftool = ExifTool::new(settings.exiftool.clone());
    let mut cutter = ClipCutter::new(settings, exiftool, SystemRunner);
    let mut stdout = io::stdout().lock();

    let report = cutter.process_all(&cli.input_files, &mut stdout, |input, outcome| {
        if let (true, Err(error)) = (keep_going, outcome) {
            eprintln!(
                "{} {}",
                "failed:".red().bold(),
                format!("{}: {error}", input.display()).red()
            );
        }
        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    })?;
    stdout.flush()?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    if !report.is_success() {
        return Err(format!(
            "{} of {} clip(s) failed",
            report.failures.len(),
            cli.input_files.len()
        )
        .into());
    }

    if cutter.settings().verbose {
        let verb = if cutter.settings().dry_run { "Planned" } else { "Cut" };
        eprintln!(
            "{} {}",
            "success:".green().bold(),
            format!("{verb} {} clip(s)", report.processed.len()).green()
        );
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}

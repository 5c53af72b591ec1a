// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use subsync::app_config::{self, Config};
use subsync::app_controller::{parse_anchor_arg, Controller};
use subsync::subtitle_processor::SubtitleEncoding;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SubtitleEncoding to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliEncoding {
    #[value(alias = "utf-8")]
    Utf8,
    #[value(alias = "gbk")]
    Gb18030,
}

impl From<CliEncoding> for SubtitleEncoding {
    fn from(cli_encoding: CliEncoding) -> Self {
        match cli_encoding {
            CliEncoding::Utf8 => SubtitleEncoding::Utf8,
            CliEncoding::Gb18030 => SubtitleEncoding::Gb18030,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Shift every cue of a file, or of every .srt file in a directory
    Shift {
        /// Subtitle file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Offset in milliseconds (negative moves cues earlier)
        #[arg(long, allow_negative_numbers = true)]
        offset_ms: i64,
    },

    /// Re-time a file against a reference track using anchor pairs
    Sync {
        /// Subtitle file to re-time
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Correctly timed subtitle file
        #[arg(short, long)]
        reference: PathBuf,

        /// Anchor as SRC:REF, 1-based cue numbers (at least two)
        #[arg(short, long = "anchor", value_name = "SRC:REF", required = true)]
        anchors: Vec<String>,
    },

    /// List reference cues likely to match a source cue
    Suggest {
        /// Subtitle file to re-time
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Correctly timed subtitle file
        #[arg(short, long)]
        reference: PathBuf,

        /// 1-based source cue number
        #[arg(long)]
        cue: usize,
    },

    /// Report inverted, out-of-order and overlapping cues
    Check {
        /// Subtitle file
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Re-encode a file to UTF-8 with sequential numbering
    Convert {
        /// Subtitle file
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Generate shell completions for subsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subsync - subtitle timing synchronization
///
/// Shifts SRT subtitles by a constant offset or re-times them against a
/// correctly timed reference track.
#[derive(Parser, Debug)]
#[command(name = "subsync")]
#[command(version)]
#[command(about = "Subtitle timing synchronization tool")]
#[command(long_about = "subsync shifts SRT subtitles or re-times them against a reference track.

EXAMPLES:
    subsync shift movie.srt --offset-ms 1500             # Delay every cue by 1.5s
    subsync shift movie.srt --offset-ms -800 -o out.srt  # Advance every cue by 0.8s
    subsync shift /subs/ --offset-ms 2000                # Shift every .srt in a directory
    subsync suggest movie.srt -r ref.srt --cue 12        # Candidate reference cues for cue 12
    subsync sync movie.srt -r ref.srt -a 1:3 -a 240:251  # Point sync with two anchors
    subsync check movie.srt                              # Timing report
    subsync convert -e gb18030 movie.srt                 # Re-encode to UTF-8
    subsync completions bash > subsync.bash              # Generate bash completions

CONFIGURATION:
    Configuration is stored in subsync.json by default. You can specify a
    different config file with --config. If the config file doesn't exist, a
    default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "subsync.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Encoding of the input files
    #[arg(short, long, global = true, value_enum)]
    encoding: Option<CliEncoding>,

    /// Output file (defaults to <stem>.<suffix>.srt next to the input)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long, global = true)]
    force_overwrite: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Install the logger at trace and narrow it with the max level below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subsync", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level.clone()).into());
    }

    let mut config = Config::load_or_create(&cli.config)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.clone().into());

    let controller = Controller::with_config(config)?;
    let encoding = cli.encoding.map(SubtitleEncoding::from);

    match cli.command {
        Commands::Shift { input_path, offset_ms } => {
            if input_path.is_dir() {
                if cli.output.is_some() {
                    warn!("--output is ignored when shifting a directory");
                }
                let summary = controller.run_shift_folder(&input_path, offset_ms, encoding, cli.force_overwrite)?;
                if summary.failed > 0 {
                    return Err(anyhow!("{} file(s) could not be shifted", summary.failed));
                }
            } else if input_path.is_file() {
                report_written(controller.run_shift(&input_path, cli.output, offset_ms, encoding, cli.force_overwrite)?);
            } else {
                return Err(anyhow!("Input path does not exist: {:?}", input_path));
            }
        }
        Commands::Sync { source, reference, anchors } => {
            let anchors = anchors
                .iter()
                .map(|a| parse_anchor_arg(a))
                .collect::<Result<Vec<_>>>()?;
            report_written(controller.run_sync(&source, &reference, &anchors, cli.output, encoding, cli.force_overwrite)?);
        }
        Commands::Suggest { source, reference, cue } => {
            let (reference_cues, candidates) = controller.suggest(&source, &reference, cue, encoding)?;
            if let Some(top) = candidates.first() {
                for candidate in &candidates {
                    if let Some(entry) = reference_cues.get(candidate.reference_index) {
                        println!(
                            "{:>5}  {:>5.1}%  {:>3.0}%  {}  {}",
                            candidate.reference_index + 1,
                            candidate.weight * 100.0,
                            candidate.relative_intensity(top) * 100.0,
                            entry.start,
                            entry.text.replace('\n', " / ")
                        );
                    }
                }
            }
        }
        Commands::Check { input_path } => {
            let result = controller.run_check(&input_path, encoding, cli.output.as_deref())?;
            print!("{}", Controller::format_report(&input_path, &result));
            if !result.passed {
                return Err(anyhow!("{} cue(s) failed timing checks", result.failed_entries().len()));
            }
        }
        Commands::Convert { input_path } => {
            report_written(controller.run_convert(&input_path, cli.output, encoding, cli.force_overwrite)?);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn report_written(output: Option<PathBuf>) {
    if let Some(path) = output {
        info!("Success: {}", path.display());
    }
}

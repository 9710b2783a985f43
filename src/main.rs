// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::app_config::{AspectRatio, Config};
use crate::app_controller::{AssemblyRequest, Controller, SubtitleMode};
use crate::file_utils::FileManager;

mod app_config;
mod app_controller;
mod composition;
mod errors;
mod file_utils;
mod media_probe;
mod subtitle_processor;
mod timing;

/// CLI Wrapper for Style to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliStyle {
    Default,
    Bold,
    Minimal,
    Boxed,
}

impl From<CliStyle> for app_config::Style {
    fn from(cli_style: CliStyle) -> Self {
        match cli_style {
            CliStyle::Default => app_config::Style::Default,
            CliStyle::Bold => app_config::Style::Bold,
            CliStyle::Minimal => app_config::Style::Minimal,
            CliStyle::Boxed => app_config::Style::Boxed,
        }
    }
}

/// CLI Wrapper for Position to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliPosition {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl From<CliPosition> for app_config::Position {
    fn from(cli_position: CliPosition) -> Self {
        match cli_position {
            CliPosition::TopLeft => app_config::Position::TopLeft,
            CliPosition::TopCenter => app_config::Position::TopCenter,
            CliPosition::TopRight => app_config::Position::TopRight,
            CliPosition::MiddleLeft => app_config::Position::MiddleLeft,
            CliPosition::MiddleCenter => app_config::Position::MiddleCenter,
            CliPosition::MiddleRight => app_config::Position::MiddleRight,
            CliPosition::BottomLeft => app_config::Position::BottomLeft,
            CliPosition::BottomCenter => app_config::Position::BottomCenter,
            CliPosition::BottomRight => app_config::Position::BottomRight,
        }
    }
}

/// CLI Wrapper for Transition to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTransition {
    Cut,
    Crossfade,
    Slide,
}

impl From<CliTransition> for app_config::Transition {
    fn from(cli_transition: CliTransition) -> Self {
        match cli_transition {
            CliTransition::Cut => app_config::Transition::Cut,
            CliTransition::Crossfade => app_config::Transition::Crossfade,
            CliTransition::Slide => app_config::Transition::Slide,
        }
    }
}

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a subtitled video from media, voiceover and transcript
    #[command(alias = "build")]
    Assemble(AssembleArgs),

    /// Generate an SRT subtitle track from a transcript segments JSON
    Subtitles(SubtitlesArgs),

    /// Generate shell completions for clipsmith
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    /// Media files (images and/or videos) in presentation order
    #[arg(value_name = "MEDIA", num_args = 0.., conflicts_with = "media_dir")]
    media: Vec<PathBuf>,

    /// Directory to collect media files from, sorted by filename
    #[arg(long)]
    media_dir: Option<PathBuf>,

    /// Voiceover audio file
    #[arg(short, long)]
    voiceover: PathBuf,

    /// Existing SRT subtitle track to burn in
    #[arg(short, long, conflicts_with = "segments")]
    subtitles: Option<PathBuf>,

    /// Transcript segments JSON to derive a word-level track from
    #[arg(long)]
    segments: Option<PathBuf>,

    /// Output video file, or a directory when --title is given
    #[arg(short, long)]
    output: PathBuf,

    /// Title to derive the output filename from when --output is a directory
    #[arg(long)]
    title: Option<String>,

    /// Target aspect ratio ('9:16' or '16:9')
    #[arg(short, long)]
    aspect_ratio: Option<String>,

    /// Subtitle style
    #[arg(long, value_enum)]
    style: Option<CliStyle>,

    /// Subtitle anchor position
    #[arg(short, long, value_enum)]
    position: Option<CliPosition>,

    /// Transition between clips
    #[arg(short, long, value_enum)]
    transition: Option<CliTransition>,

    /// Background music file mixed under the voiceover
    #[arg(short, long)]
    music: Option<PathBuf>,

    /// Working directory for intermediate files
    #[arg(short, long)]
    working_dir: Option<PathBuf>,

    /// H.264 CRF quality (lower is better)
    #[arg(short, long)]
    quality: Option<u32>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct SubtitlesArgs {
    /// Transcript segments JSON file
    #[arg(value_name = "SEGMENTS")]
    segments: PathBuf,

    /// Output SRT file
    #[arg(short, long)]
    output: PathBuf,

    /// Emit one cue per segment instead of one per word
    #[arg(long)]
    sentence_level: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// clipsmith - assemble subtitled short videos
///
/// Normalizes a mixed sequence of images and clips onto a fixed canvas,
/// synchronizes word-level subtitles to a voiceover, mixes optional
/// background music, and encodes a single H.264/AAC file.
#[derive(Parser, Debug)]
#[command(name = "clipsmith")]
#[command(version = "1.0.0")]
#[command(about = "Audio-synchronized subtitle timing and media composition")]
#[command(long_about = "clipsmith assembles short videos from a voiceover, a transcript and a pile of media.

EXAMPLES:
    clipsmith assemble a.png b.png -v vo.mp3 --segments stt.json -o out.mp4
    clipsmith assemble clip.mp4 a.png -v vo.mp3 -s subs.srt -a 16:9 -o out.mp4
    clipsmith assemble --media-dir ./shots -v vo.mp3 -o out.mp4 -m music.mp3
    clipsmith subtitles stt.json -o word_subs.srt
    clipsmith completions bash > clipsmith.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());

            let color = match record.level() {
                Level::Error => "\x1B[1;31m",
                Level::Warn => "\x1B[1;33m",
                Level::Info => "\x1B[1;32m",
                Level::Debug => "\x1B[1;36m",
                Level::Trace => "\x1B[1;35m",
            };

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "clipsmith", &mut std::io::stdout());
            Ok(())
        }
        Commands::Subtitles(args) => run_subtitles(args),
        Commands::Assemble(args) => run_assemble(args).await,
    }
}

fn apply_log_level(level: &app_config::LogLevel) {
    let filter = match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    };
    log::set_max_level(filter);
}

fn run_subtitles(args: SubtitlesArgs) -> Result<()> {
    if let Some(level) = &args.log_level {
        apply_log_level(&level.clone().into());
    }

    let mode = if args.sentence_level {
        SubtitleMode::SentenceLevel
    } else {
        SubtitleMode::WordLevel
    };

    let controller = Controller::with_config(Config::default())?;
    controller.generate_subtitle_track(&args.segments, mode, &args.output)?;

    Ok(())
}

async fn run_assemble(args: AssembleArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &args.log_level {
        apply_log_level(&cmd_log_level.clone().into());
    }

    // Load or create configuration
    let config_path = &args.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Override config with CLI options if provided
    if let Some(aspect) = &args.aspect_ratio {
        config.aspect_ratio = AspectRatio::from_str(aspect)?;
    }
    if let Some(style) = &args.style {
        config.style = style.clone().into();
    }
    if let Some(position) = &args.position {
        config.position = position.clone().into();
    }
    if let Some(transition) = &args.transition {
        config.transition = transition.clone().into();
    }
    if let Some(quality) = args.quality {
        config.encoding.crf = quality;
    }
    if let Some(music) = &args.music {
        config.background_music = Some(music.clone());
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone().into();
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if args.log_level.is_none() {
        apply_log_level(&config.log_level);
    }

    // Resolve the media list: explicit paths in caller order, or a directory scan
    let media: Vec<PathBuf> = match &args.media_dir {
        Some(dir) => FileManager::collect_media_from_dir(dir)?
            .into_iter()
            .map(|item| item.path)
            .collect(),
        None => args.media.clone(),
    };

    // Derive the output filename from a title when pointed at a directory
    let output = match &args.title {
        Some(title) if args.output.is_dir() => {
            args.output.join(FileManager::clean_filename(title, 60))
        }
        _ => args.output.clone(),
    };

    let request = AssemblyRequest {
        media,
        voiceover: args.voiceover.clone(),
        subtitle_track: args.subtitles.clone(),
        segments: args.segments.clone(),
        output,
        working_dir: args.working_dir.clone(),
        force_overwrite: args.force_overwrite,
    };

    let controller = Controller::with_config(config)?;
    controller.run(&request).await?;

    Ok(())
}

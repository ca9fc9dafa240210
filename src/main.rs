// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use once_cell::sync::OnceCell;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use asscribe::app_config::{self, CaptionStyle, Config};
use asscribe::app_controller::{CaptionRequest, Controller};
use asscribe::errors::AppError;
use asscribe::file_utils::FileManager;
use asscribe::transcript::TranscriptFile;

/// CLI Wrapper for CaptionStyle to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCaptionStyle {
    Clean,
    Social,
    Karaoke,
    Highlight,
}

impl From<CliCaptionStyle> for CaptionStyle {
    fn from(cli_style: CliCaptionStyle) -> Self {
        match cli_style {
            CliCaptionStyle::Clean => CaptionStyle::Clean,
            CliCaptionStyle::Social => CaptionStyle::Social,
            CliCaptionStyle::Karaoke => CaptionStyle::Karaoke,
            CliCaptionStyle::Highlight => CaptionStyle::Highlight,
        }
    }
}

/// Brand themes shipped with templates
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliBrand {
    Codify,
    Fancy,
}

impl CliBrand {
    fn as_str(&self) -> &'static str {
        match self {
            CliBrand::Codify => "codify",
            CliBrand::Fancy => "fancy",
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
    /// Transcribe a video and write ASS captions for every orientation (default command)
    Caption(CaptionArgs),

    /// List the templates available in the template directory
    Templates {
        /// Template directory (overrides config)
        #[arg(long)]
        template_dir: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for asscribe
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct CaptionArgs {
    /// Input video file
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Caption style from the template
    #[arg(short, long, value_enum)]
    style: Option<CliCaptionStyle>,

    /// Template file used for all orientations, relative to the template directory
    #[arg(short = 't', long)]
    template: Option<PathBuf>,

    /// Brand theme for template auto-selection
    #[arg(short, long, value_enum)]
    brand: Option<CliBrand>,

    /// Use an existing whisper JSON transcript instead of transcribing
    #[arg(long, value_name = "JSON")]
    transcript: Option<PathBuf>,

    /// Template directory (overrides config)
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// Produce orientations one after another
    #[arg(long)]
    sequential: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// asscribe - transcribe videos into templated ASS captions
///
/// Transcribes the audio of a video once and writes one ASS subtitle file per
/// output orientation (portrait, landscape, square) from style templates.
#[derive(Parser, Debug)]
#[command(name = "asscribe")]
#[command(version)]
#[command(about = "Transcribe videos into templated ASS captions")]
#[command(long_about = "asscribe transcribes a video and writes ASS captions for portrait, landscape and square outputs.

EXAMPLES:
    asscribe video.mp4 -s clean                          # Auto-select templates with the default brand
    asscribe video.mp4 -s karaoke -t landscape_fancy.ass # Use one template for every orientation
    asscribe video.mp4 -s social -b fancy                # Auto-select with a specific brand
    asscribe video.mp4 -s clean --transcript video.json  # Reuse an existing whisper transcript
    asscribe templates                                   # List available templates
    asscribe completions bash > asscribe.bash            # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

TEMPLATES:
    Templates are looked up as {orientation}_{brand}.ass in the template directory
    (default: ass-config-templates). Missing templates skip that orientation.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input video file
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// Caption style from the template
    #[arg(short, long, value_enum)]
    style: Option<CliCaptionStyle>,

    /// Template file used for all orientations, relative to the template directory
    #[arg(short = 't', long)]
    template: Option<PathBuf>,

    /// Brand theme for template auto-selection
    #[arg(short, long, value_enum)]
    brand: Option<CliBrand>,

    /// Use an existing whisper JSON transcript instead of transcribing
    #[arg(long, value_name = "JSON")]
    transcript: Option<PathBuf>,

    /// Template directory (overrides config)
    #[arg(long)]
    template_dir: Option<PathBuf>,

    /// Produce orientations one after another
    #[arg(long)]
    sequential: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @static: Log file receiving a copy of every record, set once the config is known
static LOG_FILE: OnceCell<Mutex<File>> = OnceCell::new();

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

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
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
        if !self.enabled(record.metadata()) {
            return;
        }

        let now = chrono::Local::now();
        let mut stderr = std::io::stderr();
        let _ = writeln!(
            stderr,
            "{}{} {:<5} {}\x1B[0m",
            Self::color_for_level(record.level()),
            now.format("%H:%M:%S.%3f"),
            record.level(),
            record.args()
        );

        if let Some(file) = LOG_FILE.get() {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(
                    file,
                    "{} - {} - {}",
                    now.format("%Y-%m-%d %H:%M:%S,%3f"),
                    record.level(),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
        if let Some(file) = LOG_FILE.get() {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

// Load the config file, or write a default one when missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let content = FileManager::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {}: {}", config_path, e)))?;
        Ok(config)
    } else {
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace level lets set_max_level raise verbosity later without reinstalling
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "asscribe", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Templates { template_dir, config_path }) => {
            list_templates(template_dir, &config_path)
        }
        Some(Commands::Caption(args)) => run_caption_and_exit(args).await,
        None => {
            // Default behavior - top-level args act as the caption command
            let input_file = cli.input_file.ok_or_else(|| {
                anyhow!("INPUT_FILE is required when no subcommand is specified")
            })?;

            let caption_args = CaptionArgs {
                input_file,
                style: cli.style,
                template: cli.template,
                brand: cli.brand,
                transcript: cli.transcript,
                template_dir: cli.template_dir,
                sequential: cli.sequential,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_caption_and_exit(caption_args).await
        }
    }
}

// Prints SUCCESS or ERROR and exits 0 or 1, for callers that only read stdout
async fn run_caption_and_exit(args: CaptionArgs) -> Result<()> {
    match run_caption(args).await {
        Ok(true) => {
            println!("SUCCESS");
            Ok(())
        }
        Ok(false) => {
            println!("ERROR");
            std::process::exit(1);
        }
        Err(e) => {
            error!("ERROR: Transcription failed - {:#}", e);
            println!("ERROR");
            std::process::exit(1);
        }
    }
}

async fn run_caption(options: CaptionArgs) -> Result<bool> {
    let warned_default = !Path::new(&options.config_path).exists();
    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(style) = options.style {
        config.style = style.into();
    }
    if let Some(brand) = options.brand {
        config.brand = brand.as_str().to_string();
    }
    if let Some(template_dir) = &options.template_dir {
        config.template_dir = template_dir.clone();
    }
    if options.sequential {
        config.parallel_orientations = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Just update the max level without reinitializing the logger
    log::set_max_level(level_filter(&config.log_level));
    if let Some(path) = &config.log_file {
        let file = FileManager::open_log_file(path)?;
        let _ = LOG_FILE.set(Mutex::new(file));
    }

    if warned_default {
        warn!("Config file not found at '{}', created default config.", options.config_path);
    }

    if !FileManager::has_video_extension(&options.input_file) {
        warn!("Input does not look like a video file: {:?}", options.input_file);
    }

    let mut controller = Controller::with_config(config.clone())
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;
    if let Some(transcript) = &options.transcript {
        info!("Using transcript file {:?}", transcript);
        controller = controller.with_transcriber(Arc::new(TranscriptFile::new(transcript)));
    }

    let mut request = CaptionRequest::new(&options.input_file, config.style.as_str(), &config.brand);
    if let Some(template) = &options.template {
        request = request.with_template(template);
    }

    let report = controller.run(&request).await.map_err(AppError::from)?;
    for path in report.generated_paths() {
        info!("  - {}", path.file_name().unwrap_or_default().to_string_lossy());
    }

    Ok(report.success())
}

fn list_templates(template_dir: Option<PathBuf>, config_path: &str) -> Result<()> {
    let template_dir = match template_dir {
        Some(dir) => dir,
        None if Path::new(config_path).exists() => load_or_create_config(config_path)?.template_dir,
        None => Config::default().template_dir,
    };

    if !FileManager::dir_exists(&template_dir) {
        return Err(AppError::Config(format!("Template directory does not exist: {:?}", template_dir)).into());
    }

    let templates = FileManager::find_files(&template_dir, "ass")?;
    if templates.is_empty() {
        warn!("No templates found in {:?}", template_dir);
    }

    for path in templates {
        let relative = path.strip_prefix(&template_dir).unwrap_or(&path);
        println!("{}", relative.display());
    }

    Ok(())
}

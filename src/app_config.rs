use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;
use crate::captions::emitter::{CaptionOptions, DEFAULT_HIGHLIGHT_TAG, DEFAULT_WORD_DURATION_CS};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory holding `{orientation}_{brand}.ass` templates
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Brand used for template auto-selection
    #[serde(default = "default_brand")]
    pub brand: String,

    /// Caption style requested from the template
    #[serde(default)]
    pub style: CaptionStyle,

    /// Karaoke rendering
    #[serde(default)]
    pub karaoke: KaraokeConfig,

    /// Speech-to-text tool
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Video probing tool
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Compositor filter file
    #[serde(default)]
    pub filter: FilterConfig,

    /// Produce the orientation documents concurrently
    #[serde(default = "default_true")]
    pub parallel_orientations: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Optional file receiving a copy of every log line
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Caption style names offered by the bundled templates
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    #[default]
    Clean,
    Social,
    Karaoke,
    Highlight,
}

impl CaptionStyle {
    // @returns: Style name as declared in templates
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Social => "social",
            Self::Karaoke => "karaoke",
            Self::Highlight => "highlight",
        }
    }
}

impl std::fmt::Display for CaptionStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CaptionStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "clean" => Ok(Self::Clean),
            "social" => Ok(Self::Social),
            "karaoke" => Ok(Self::Karaoke),
            "highlight" => Ok(Self::Highlight),
            _ => Err(anyhow!("Invalid caption style: {}", s)),
        }
    }
}

/// Karaoke settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct KaraokeConfig {
    /// Resolved style name that switches karaoke timing on
    #[serde(default = "default_karaoke_style_name")]
    pub style_name: String,

    /// Fixed per-word duration in centiseconds, 0 spreads each line evenly
    #[serde(default = "default_word_duration_cs")]
    pub word_duration_cs: u32,

    /// Override tag prepended to karaoke text
    #[serde(default = "default_highlight_tag")]
    pub highlight_tag: String,
}

impl KaraokeConfig {
    /// Caption options for a resolved style name
    pub fn caption_options(&self, resolved_style: &str) -> CaptionOptions {
        CaptionOptions {
            karaoke: resolved_style == self.style_name,
            word_duration_cs: self.word_duration_cs,
            highlight_tag: self.highlight_tag.clone(),
            ..CaptionOptions::default()
        }
    }
}

impl Default for KaraokeConfig {
    fn default() -> Self {
        Self {
            style_name: default_karaoke_style_name(),
            word_duration_cs: default_word_duration_cs(),
            highlight_tag: default_highlight_tag(),
        }
    }
}

/// Whisper command line settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Executable producing whisper JSON output
    #[serde(default = "default_whisper_command")]
    pub command: String,

    /// Model name (e.g., "small", "medium")
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Inference device
    #[serde(default = "default_whisper_device")]
    pub device: String,

    /// Quantization used by the model
    #[serde(default = "default_compute_type")]
    pub compute_type: String,

    /// Beam search width
    #[serde(default = "default_beam_size")]
    pub beam_size: u32,

    /// Spoken language, detected when unset
    #[serde(default)]
    pub language: Option<String>,

    /// Timeout seconds
    #[serde(default = "default_transcription_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            command: default_whisper_command(),
            model: default_whisper_model(),
            device: default_whisper_device(),
            compute_type: default_compute_type(),
            beam_size: default_beam_size(),
            language: None,
            timeout_secs: default_transcription_timeout_secs(),
        }
    }
}

/// ffprobe settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProbeConfig {
    #[serde(default = "default_probe_command")]
    pub command: String,

    #[serde(default = "default_probe_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: default_probe_command(),
            timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Style forced on the compositor's subtitles filter
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterConfig {
    #[serde(default = "default_filter_font_name")]
    pub font_name: String,

    #[serde(default = "default_filter_font_size")]
    pub font_size: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            font_name: default_filter_font_name(),
            font_size: default_filter_font_size(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("ass-config-templates")
}

fn default_brand() -> String {
    "codify".to_string()
}

fn default_karaoke_style_name() -> String {
    "karaoke".to_string()
}

fn default_word_duration_cs() -> u32 {
    DEFAULT_WORD_DURATION_CS
}

fn default_highlight_tag() -> String {
    DEFAULT_HIGHLIGHT_TAG.to_string()
}

fn default_whisper_command() -> String {
    "whisper-ctranslate2".to_string()
}

fn default_whisper_model() -> String {
    "small".to_string()
}

fn default_whisper_device() -> String {
    "cpu".to_string()
}

fn default_compute_type() -> String {
    "int8".to_string()
}

fn default_beam_size() -> u32 {
    5
}

fn default_transcription_timeout_secs() -> u64 {
    1800 // 30 minutes, long recordings on CPU are slow
}

fn default_probe_command() -> String {
    "ffprobe".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    60
}

fn default_filter_font_name() -> String {
    "Roboto Medium".to_string()
}

fn default_filter_font_size() -> u32 {
    48
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.template_dir.as_os_str().is_empty() {
            return Err(anyhow!("Template directory must not be empty"));
        }

        if self.brand.trim().is_empty() || self.brand.contains(['/', '\\']) {
            return Err(anyhow!("Invalid brand name: '{}'", self.brand));
        }

        if self.karaoke.style_name.trim().is_empty() {
            return Err(anyhow!("Karaoke style name must not be empty"));
        }

        if self.transcription.command.trim().is_empty() {
            return Err(anyhow!("Transcription command must not be empty"));
        }

        if self.transcription.model.trim().is_empty() {
            return Err(anyhow!("Transcription model must not be empty"));
        }

        if self.transcription.beam_size == 0 {
            return Err(anyhow!("Beam size must be at least 1"));
        }

        if self.transcription.timeout_secs == 0 || self.probe.timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be greater than zero"));
        }

        if self.filter.font_size == 0 {
            return Err(anyhow!("Filter font size must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            template_dir: default_template_dir(),
            brand: default_brand(),
            style: CaptionStyle::default(),
            karaoke: KaraokeConfig::default(),
            transcription: TranscriptionConfig::default(),
            probe: ProbeConfig::default(),
            filter: FilterConfig::default(),
            parallel_orientations: default_true(),
            log_level: LogLevel::default(),
            log_file: None,
        }
    }
}

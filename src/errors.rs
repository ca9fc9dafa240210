/*!
 * Error types for the asscribe application.
 *
 * Fatal run errors, template parsing failures and per-orientation skip
 * reasons are kept apart so the fan-out controller can decide which ones
 * abort a run and which ones only drop a single orientation.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while parsing an ASS template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// No `[Events]` marker at all
    #[error("[Events] section not found")]
    MissingEventsSection,

    /// More than one `[Events]` marker
    #[error("[Events] section declared {0} times")]
    DuplicateEventsSection(usize),

    /// No `[V4+ Styles]` / `[V4 Styles]` marker before the events
    #[error("style section not found before [Events]")]
    MissingStyleSection,

    /// More than one style section marker
    #[error("style section declared {0} times")]
    DuplicateStyleSection(usize),

    /// The events `Format:` line cannot hold a dialogue record
    #[error("invalid events format line '{line}': {reason}")]
    InvalidEventFormat {
        /// The offending format line
        line: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Errors that can occur when loading a template from disk
#[derive(Error, Debug)]
pub enum TemplateLoadError {
    /// The template file does not exist
    #[error("template not found: {0}")]
    NotFound(PathBuf),

    /// The template exists but could not be read
    #[error("failed to read template {path}: {source}")]
    Read {
        /// Template path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The template was read but is malformed
    #[error("template format error in {path}: {source}")]
    Format {
        /// Template path
        path: PathBuf,
        /// Parsing failure
        #[source]
        source: TemplateError,
    },
}

/// Style resolution failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StyleError {
    /// The template declares no `Style:` lines
    #[error("template declares no styles")]
    NoStylesAvailable,
}

/// Errors reported by external transcription
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The transcription tool could not be started or failed
    #[error("transcription command failed: {0}")]
    CommandFailed(String),

    /// The tool did not finish in time
    #[error("transcription timed out after {0} seconds")]
    Timeout(u64),

    /// The produced transcript could not be parsed
    #[error("failed to parse transcript: {0}")]
    ParseError(String),

    /// A segment violates the transcript invariants
    #[error("invalid segment {index}: {reason}")]
    InvalidSegment {
        /// Position in the transcript
        index: usize,
        /// Violated invariant
        reason: String,
    },
}

/// Errors that abort a whole captioning run
#[derive(Error, Debug)]
pub enum CaptionError {
    /// The source video does not exist
    #[error("input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Transcription produced zero segments
    #[error("no transcription segments generated")]
    TranscriptionEmpty,

    /// Transcription itself failed
    #[error("transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// A fan-out worker panicked or was cancelled
    #[error("orientation worker failed: {0}")]
    Worker(String),
}

/// Why a single orientation produced no document
#[derive(Error, Debug, Clone)]
pub enum SkipReason {
    /// Auto-selected or explicit template is missing
    #[error("template not found: {0}")]
    TemplateNotFound(PathBuf),

    /// Template could not be read
    #[error("template unreadable: {0}")]
    TemplateUnreadable(String),

    /// Template is malformed
    #[error("template format error: {0}")]
    TemplateFormat(#[from] TemplateError),

    /// Template declares zero styles
    #[error("no styles available in template")]
    NoStylesAvailable,

    /// The document could not be written
    #[error("failed to write captions: {0}")]
    WriteFailed(String),
}

impl From<TemplateLoadError> for SkipReason {
    fn from(error: TemplateLoadError) -> Self {
        match error {
            TemplateLoadError::NotFound(path) => Self::TemplateNotFound(path),
            TemplateLoadError::Read { path, source } => {
                Self::TemplateUnreadable(format!("{}: {}", path.display(), source))
            }
            TemplateLoadError::Format { source, .. } => Self::TemplateFormat(source),
        }
    }
}

impl From<StyleError> for SkipReason {
    fn from(error: StyleError) -> Self {
        match error {
            StyleError::NoStylesAvailable => Self::NoStylesAvailable,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a captioning run
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use crate::app_config::TranscriptionConfig;
use crate::errors::TranscriptionError;

// @module: Transcript model and speech-to-text collaborators

/// One timed piece of transcribed speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start offset in seconds
    pub start: f64,

    /// End offset in seconds
    pub end: f64,

    /// Spoken text
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    // @validates: Finite, non-negative start and end after start
    pub fn validate(&self, index: usize) -> Result<(), TranscriptionError> {
        let invalid = |reason: String| TranscriptionError::InvalidSegment { index, reason };

        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(invalid(format!("non-finite time range {}..{}", self.start, self.end)));
        }
        if self.start < 0.0 {
            return Err(invalid(format!("negative start {}", self.start)));
        }
        if self.end <= self.start {
            return Err(invalid(format!("end {} <= start {}", self.end, self.start)));
        }
        Ok(())
    }
}

/// Result of transcribing one media file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Segments in source order
    #[serde(default)]
    pub segments: Vec<TranscriptSegment>,

    /// Detected language code
    #[serde(default)]
    pub language: Option<String>,

    /// Confidence of the language detection
    #[serde(default)]
    pub language_probability: Option<f64>,

    /// Media duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Transcription {
    pub fn from_segments(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }

    /// Parse whisper-style JSON (`{"segments": [{"start", "end", "text"}], ...}`).
    ///
    /// Segment text is trimmed and segments with an invalid time range are
    /// dropped with a warning. Order is kept as produced.
    pub fn from_whisper_json(json: &str) -> Result<Self, TranscriptionError> {
        let raw: Self = serde_json::from_str(json)
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;
        Ok(raw.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let total = self.segments.len();
        let segments = std::mem::take(&mut self.segments);
        self.segments = segments
            .into_iter()
            .enumerate()
            .filter_map(|(index, mut segment)| match segment.validate(index) {
                Ok(()) => {
                    segment.text = segment.text.trim().to_string();
                    Some(segment)
                }
                Err(e) => {
                    warn!("Dropping transcript segment: {}", e);
                    None
                }
            })
            .collect();

        if self.segments.len() != total {
            debug!("Kept {} of {} transcript segments", self.segments.len(), total);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// External speech-to-text capability
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio track of `media`
    async fn transcribe(&self, media: &Path) -> Result<Transcription, TranscriptionError>;
}

/// Runs `whisper-ctranslate2`, which writes its JSON transcript into a
/// temporary output directory.
pub struct WhisperTranscriber {
    config: TranscriptionConfig,
}

impl WhisperTranscriber {
    pub fn new(config: TranscriptionConfig) -> Self {
        Self { config }
    }

    // @returns: Arguments for one transcription into output_dir
    fn command_args(&self, media: &Path, output_dir: &Path) -> Vec<String> {
        let mut args = vec![
            media.to_string_lossy().to_string(),
            "--model".to_string(),
            self.config.model.clone(),
            "--device".to_string(),
            self.config.device.clone(),
            "--compute_type".to_string(),
            self.config.compute_type.clone(),
            "--beam_size".to_string(),
            self.config.beam_size.to_string(),
            "--output_format".to_string(),
            "json".to_string(),
            "--output_dir".to_string(),
            output_dir.to_string_lossy().to_string(),
        ];

        if let Some(language) = &self.config.language {
            args.push("--language".to_string());
            args.push(language.clone());
        }

        args
    }

    // @returns: JSON file written by the tool, by media stem or first found
    fn find_output(media: &Path, output_dir: &Path) -> Result<PathBuf, TranscriptionError> {
        if let Some(stem) = media.file_stem() {
            let expected = output_dir.join(format!("{}.json", stem.to_string_lossy()));
            if expected.is_file() {
                return Ok(expected);
            }
        }

        let entries = fs::read_dir(output_dir)
            .map_err(|e| TranscriptionError::CommandFailed(format!("cannot read output dir: {}", e)))?;
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| path.extension().is_some_and(|ext| ext == "json"))
            .ok_or_else(|| TranscriptionError::CommandFailed("no JSON transcript was written".to_string()))
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, media: &Path) -> Result<Transcription, TranscriptionError> {
        let output_dir = tempfile::tempdir()
            .map_err(|e| TranscriptionError::CommandFailed(format!("cannot create temp dir: {}", e)))?;

        debug!("Running {} with model {}", self.config.command, self.config.model);

        let whisper_future = Command::new(&self.config.command)
            .args(self.command_args(media, output_dir.path()))
            .kill_on_drop(true)
            .output();

        let timeout_secs = self.config.timeout_secs;
        let output = tokio::select! {
            result = whisper_future => {
                result.map_err(|e| TranscriptionError::CommandFailed(
                    format!("failed to execute {}: {}", self.config.command, e)
                ))?
            },
            _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
                return Err(TranscriptionError::Timeout(timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let last_line = stderr.lines().rev().find(|l| !l.trim().is_empty()).unwrap_or("no output");
            return Err(TranscriptionError::CommandFailed(format!(
                "{} exited with {}: {}",
                self.config.command, output.status, last_line
            )));
        }

        let json_path = Self::find_output(media, output_dir.path())?;
        let json = fs::read_to_string(&json_path)
            .map_err(|e| TranscriptionError::ParseError(format!("{}: {}", json_path.display(), e)))?;

        Transcription::from_whisper_json(&json)
    }
}

/// Reads an existing whisper-style JSON transcript instead of transcribing
pub struct TranscriptFile {
    path: PathBuf,
}

impl TranscriptFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Transcriber for TranscriptFile {
    async fn transcribe(&self, _media: &Path) -> Result<Transcription, TranscriptionError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| TranscriptionError::ParseError(format!("{}: {}", self.path.display(), e)))?;
        Transcription::from_whisper_json(&json)
    }
}

/*!
 * Mock collaborators for the caption controller
 *
 * These stand in for the whisper and ffprobe tools so tests never spawn
 * external processes, and record observer events in memory.
 */

use async_trait::async_trait;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use asscribe::app_controller::{CaptionRequest, FanOutReport, OrientationOutcome, RunObserver};
use asscribe::errors::TranscriptionError;
use asscribe::media_probe::{Orientation, OrientationDetector};
use asscribe::transcript::{Transcriber, Transcription, TranscriptSegment};

/// Returns a fixed transcript and counts calls
#[derive(Debug, Default)]
pub struct StaticTranscriber {
    segments: Vec<TranscriptSegment>,
    calls: Mutex<usize>,
    fail: bool,
}

impl StaticTranscriber {
    pub fn new(segments: Vec<TranscriptSegment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, _media: &Path) -> Result<Transcription, TranscriptionError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(TranscriptionError::CommandFailed("mock failure".to_string()));
        }
        Ok(Transcription {
            segments: self.segments.clone(),
            language: Some("en".to_string()),
            language_probability: Some(0.98),
            duration: Some(6.0),
        })
    }
}

/// Always reports the same orientation
#[derive(Debug, Clone, Copy)]
pub struct FixedDetector(pub Orientation);

#[async_trait]
impl OrientationDetector for FixedDetector {
    async fn detect(&self, _video: &Path) -> Orientation {
        self.0
    }
}

/// Keeps a line per observer event
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl RunObserver for RecordingObserver {
    fn run_started(&self, request: &CaptionRequest) {
        self.push(format!("started:{}", request.style));
    }

    fn orientation_detected(&self, orientation: Orientation) {
        self.push(format!("detected:{}", orientation));
    }

    fn transcription_finished(&self, transcription: &Transcription, _elapsed: Duration) {
        self.push(format!("transcribed:{}", transcription.segments.len()));
    }

    fn style_fallback(&self, orientation: Orientation, requested: &str, used: &str) {
        self.push(format!("fallback:{}:{}->{}", orientation, requested, used));
    }

    fn orientation_finished(&self, outcome: &OrientationOutcome) {
        match outcome {
            OrientationOutcome::Produced { orientation, .. } => self.push(format!("produced:{}", orientation)),
            OrientationOutcome::Skipped { orientation, .. } => self.push(format!("skipped:{}", orientation)),
        }
    }

    fn run_finished(&self, report: &FanOutReport) {
        self.push(format!("finished:{}", report.produced_count()));
    }
}

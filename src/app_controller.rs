use anyhow::{Result, Context};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;
use crate::app_config::{Config, KaraokeConfig};
use crate::captions::{StyleResolution, SubtitleEmitter, Template, resolve_style};
use crate::errors::{CaptionError, SkipReason};
use crate::file_utils::FileManager;
use crate::media_probe::{FfprobeDetector, Orientation, OrientationDetector};
use crate::transcript::{Transcriber, Transcription, TranscriptSegment, WhisperTranscriber};

// @module: Application controller for multi-orientation caption generation

// @const: Extension of generated subtitle documents
pub const CAPTION_EXTENSION: &str = "ass";

/// What to caption and how
#[derive(Debug, Clone)]
pub struct CaptionRequest {
    /// Source video
    pub input: PathBuf,

    /// Template shared by every orientation, relative to the template directory
    pub template: Option<PathBuf>,

    /// Requested style name
    pub style: String,

    /// Brand for template auto-selection
    pub brand: String,
}

impl CaptionRequest {
    pub fn new<P: Into<PathBuf>>(input: P, style: &str, brand: &str) -> Self {
        Self {
            input: input.into(),
            template: None,
            style: style.to_string(),
            brand: brand.to_string(),
        }
    }

    pub fn with_template<P: Into<PathBuf>>(mut self, template: P) -> Self {
        self.template = Some(template.into());
        self
    }

    // @returns: Template for one orientation, explicit or `{orientation}_{brand}.ass`
    pub fn template_path(&self, template_dir: &Path, orientation: Orientation) -> PathBuf {
        match &self.template {
            Some(explicit) => template_dir.join(explicit),
            None => template_dir.join(format!("{}_{}.{}", orientation, self.brand, CAPTION_EXTENSION)),
        }
    }
}

/// Result of one orientation run
#[derive(Debug, Clone)]
pub enum OrientationOutcome {
    /// A document was written
    Produced {
        orientation: Orientation,
        path: PathBuf,
        template: PathBuf,
        style: StyleResolution,
    },
    /// The orientation was left out
    Skipped {
        orientation: Orientation,
        reason: SkipReason,
    },
}

impl OrientationOutcome {
    pub fn orientation(&self) -> Orientation {
        match self {
            Self::Produced { orientation, .. } | Self::Skipped { orientation, .. } => *orientation,
        }
    }

    pub fn produced_path(&self) -> Option<&Path> {
        match self {
            Self::Produced { path, .. } => Some(path),
            Self::Skipped { .. } => None,
        }
    }
}

/// Aggregated result of a fan-out run
#[derive(Debug, Clone)]
pub struct FanOutReport {
    /// Orientation detected for the input video
    pub detected: Orientation,

    /// One outcome per orientation, in fan-out order
    pub outcomes: Vec<OrientationOutcome>,

    /// Document handed to single-file consumers
    pub primary: Option<PathBuf>,

    /// Compositor filter file naming the primary document
    pub filter_file: Option<PathBuf>,
}

impl FanOutReport {
    /// Paths of every produced document
    pub fn generated_paths(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| o.produced_path().map(Path::to_path_buf))
            .collect()
    }

    /// Orientations that produced a document
    pub fn produced_orientations(&self) -> Vec<Orientation> {
        self.outcomes
            .iter()
            .filter(|o| o.produced_path().is_some())
            .map(OrientationOutcome::orientation)
            .collect()
    }

    pub fn produced_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.produced_path().is_some()).count()
    }

    /// A run succeeds when at least one orientation produced a document
    pub fn success(&self) -> bool {
        self.produced_count() > 0
    }

    // @returns: Detected orientation's document, else the first produced
    fn choose_primary(detected: Orientation, outcomes: &[OrientationOutcome]) -> Option<PathBuf> {
        outcomes
            .iter()
            .find(|o| o.orientation() == detected && o.produced_path().is_some())
            .or_else(|| outcomes.iter().find(|o| o.produced_path().is_some()))
            .and_then(|o| o.produced_path().map(Path::to_path_buf))
    }
}

/// Receives run events. Every method defaults to doing nothing.
pub trait RunObserver: Send + Sync {
    fn run_started(&self, _request: &CaptionRequest) {}
    fn orientation_detected(&self, _orientation: Orientation) {}
    fn transcription_finished(&self, _transcription: &Transcription, _elapsed: Duration) {}
    fn template_selected(&self, _orientation: Orientation, _template: &Path) {}
    fn style_fallback(&self, _orientation: Orientation, _requested: &str, _used: &str) {}
    fn orientation_finished(&self, _outcome: &OrientationOutcome) {}
    fn filter_file_written(&self, _filter_file: &Path, _primary: &Path) {}
    fn run_finished(&self, _report: &FanOutReport) {}
}

/// Forwards run events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl RunObserver for LogObserver {
    fn run_started(&self, request: &CaptionRequest) {
        info!("Starting transcription: {:?}", request.input);
        info!("Style: {} - Brand: {}", request.style, request.brand);
    }

    fn orientation_detected(&self, orientation: Orientation) {
        info!("Detected input aspect ratio: {}", orientation);
    }

    fn transcription_finished(&self, transcription: &Transcription, elapsed: Duration) {
        info!(
            "Transcription completed: {} segments in {:.1}s",
            transcription.segments.len(),
            elapsed.as_secs_f64()
        );
        if let Some(language) = &transcription.language {
            match transcription.language_probability {
                Some(p) => info!("Language: {} (confidence: {:.2})", language, p),
                None => info!("Language: {}", language),
            }
        }
        if let Some(duration) = transcription.duration {
            info!("Duration: {:.1} seconds", duration);
        }
    }

    fn template_selected(&self, orientation: Orientation, template: &Path) {
        debug!("Using template {:?} for {}", template, orientation);
    }

    fn style_fallback(&self, orientation: Orientation, requested: &str, used: &str) {
        warn!(
            "Requested style '{}' not found in {} template, using fallback: '{}'",
            requested, orientation, used
        );
    }

    fn orientation_finished(&self, outcome: &OrientationOutcome) {
        match outcome {
            OrientationOutcome::Produced { orientation, path, .. } => {
                info!("Generated {} captions: {:?}", orientation, path);
            }
            OrientationOutcome::Skipped { orientation, reason } => {
                warn!("Skipping {} format: {}", orientation, reason);
            }
        }
    }

    fn filter_file_written(&self, filter_file: &Path, primary: &Path) {
        info!("Created filter file {:?} using {:?}", filter_file, primary);
    }

    fn run_finished(&self, report: &FanOutReport) {
        if report.success() {
            info!("Generated {} caption files", report.produced_count());
        } else {
            error!("No caption file could be generated");
        }
    }
}

/// Work for a single orientation, owned by whichever task runs it
struct OrientationJob {
    orientation: Orientation,
    template_path: PathBuf,
    requested_style: String,
    output_path: PathBuf,
    karaoke: KaraokeConfig,
}

impl OrientationJob {
    fn run(self, segments: &[TranscriptSegment], observer: &dyn RunObserver) -> OrientationOutcome {
        let orientation = self.orientation;
        let outcome = match self.produce(segments, observer) {
            Ok((path, template, style)) => OrientationOutcome::Produced { orientation, path, template, style },
            Err(reason) => OrientationOutcome::Skipped { orientation, reason },
        };
        observer.orientation_finished(&outcome);
        outcome
    }

    fn produce(
        &self,
        segments: &[TranscriptSegment],
        observer: &dyn RunObserver,
    ) -> Result<(PathBuf, PathBuf, StyleResolution), SkipReason> {
        let template = Template::load(&self.template_path)?;
        observer.template_selected(self.orientation, &self.template_path);

        let style = resolve_style(&template, &self.requested_style)?;
        if let Some(requested) = &style.fallback_from {
            observer.style_fallback(self.orientation, requested, &style.name);
        }

        let emitter = SubtitleEmitter::new(self.karaoke.caption_options(&style.name));
        let document = emitter.emit(segments, &template, &style.name)?;

        FileManager::write_atomic(&self.output_path, &document)
            .map_err(|e| SkipReason::WriteFailed(format!("{:#}", e)))?;

        Ok((self.output_path.clone(), self.template_path.clone(), style))
    }
}

/// Main application controller: transcribes once, then captions every orientation
pub struct Controller {
    // @field: App configuration
    config: Config,
    transcriber: Arc<dyn Transcriber>,
    detector: Arc<dyn OrientationDetector>,
    observer: Arc<dyn RunObserver>,
    // @field: Show a spinner while transcribing
    show_progress: bool,
}

impl Controller {
    /// Controller backed by the configured whisper and ffprobe tools
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        let transcriber = Arc::new(WhisperTranscriber::new(config.transcription.clone()));
        let detector = Arc::new(FfprobeDetector::new(config.probe.clone()));

        Ok(Self {
            config,
            transcriber,
            detector,
            observer: Arc::new(LogObserver),
            show_progress: true,
        })
    }

    /// Controller with injected collaborators
    pub fn with_collaborators(
        config: Config,
        transcriber: Arc<dyn Transcriber>,
        detector: Arc<dyn OrientationDetector>,
        observer: Arc<dyn RunObserver>,
    ) -> Self {
        Self {
            config,
            transcriber,
            detector,
            observer,
            show_progress: false,
        }
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = transcriber;
        self
    }

    /// Run the whole pipeline for one video.
    ///
    /// Only a missing input, a failed transcription or an empty transcript
    /// are errors; orientation failures end up as skipped outcomes.
    pub async fn run(&self, request: &CaptionRequest) -> Result<FanOutReport, CaptionError> {
        if !FileManager::file_exists(&request.input) {
            return Err(CaptionError::InputNotFound(request.input.clone()));
        }
        self.observer.run_started(request);

        let detected = self.detector.detect(&request.input).await;
        self.observer.orientation_detected(detected);

        let segments = self.transcribe(&request.input).await?;
        let outcomes = self.fan_out(request, segments).await?;

        let primary = FanOutReport::choose_primary(detected, &outcomes);
        let filter_file = match &primary {
            Some(primary) => self.write_filter_file(&request.input, primary),
            None => None,
        };

        let report = FanOutReport {
            detected,
            outcomes,
            primary,
            filter_file,
        };
        self.observer.run_finished(&report);

        Ok(report)
    }

    async fn transcribe(&self, input: &Path) -> Result<Arc<[TranscriptSegment]>, CaptionError> {
        let spinner = self.show_progress.then(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("Transcribing audio...");
            spinner.enable_steady_tick(Duration::from_millis(120));
            spinner
        });

        let start = Instant::now();
        let result = self.transcriber.transcribe(input).await;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        let transcription = result?;
        if transcription.is_empty() {
            return Err(CaptionError::TranscriptionEmpty);
        }
        self.observer.transcription_finished(&transcription, start.elapsed());

        Ok(transcription.segments.into())
    }

    fn jobs(&self, request: &CaptionRequest) -> Vec<OrientationJob> {
        Orientation::ALL
            .iter()
            .map(|&orientation| OrientationJob {
                orientation,
                template_path: request.template_path(&self.config.template_dir, orientation),
                requested_style: request.style.clone(),
                output_path: FileManager::caption_output_path(&request.input, orientation, CAPTION_EXTENSION),
                karaoke: self.config.karaoke.clone(),
            })
            .collect()
    }

    async fn fan_out(
        &self,
        request: &CaptionRequest,
        segments: Arc<[TranscriptSegment]>,
    ) -> Result<Vec<OrientationOutcome>, CaptionError> {
        let jobs = self.jobs(request);

        if !self.config.parallel_orientations {
            return Ok(jobs
                .into_iter()
                .map(|job| job.run(&segments, self.observer.as_ref()))
                .collect());
        }

        let mut tasks = JoinSet::new();
        for job in jobs {
            let segments = Arc::clone(&segments);
            let observer = Arc::clone(&self.observer);
            tasks.spawn_blocking(move || job.run(&segments, observer.as_ref()));
        }

        let mut outcomes = Vec::with_capacity(Orientation::ALL.len());
        while let Some(joined) = tasks.join_next().await {
            outcomes.push(joined.map_err(|e| CaptionError::Worker(e.to_string()))?);
        }
        outcomes.sort_by_key(OrientationOutcome::orientation);

        Ok(outcomes)
    }

    // @writes: One-line subtitles filter naming the primary document
    fn write_filter_file(&self, input: &Path, primary: &Path) -> Option<PathBuf> {
        let filter_file = FileManager::filter_file_path(input);
        let content = filter_line(primary, &self.config.filter.font_name, self.config.filter.font_size);

        match FileManager::write_to_file(&filter_file, &content) {
            Ok(()) => {
                self.observer.filter_file_written(&filter_file, primary);
                Some(filter_file)
            }
            Err(e) => {
                warn!("Failed to create filter file: {:#}", e);
                None
            }
        }
    }
}

/// Filter graph line burning `primary` into the first video stream
pub fn filter_line(primary: &Path, font_name: &str, font_size: u32) -> String {
    let file_name = primary.file_name().unwrap_or_default().to_string_lossy();
    format!(
        "[0:v]subtitles='{}':force_style='Fontname={},Fontsize={}'[v]\n",
        file_name, font_name, font_size
    )
}

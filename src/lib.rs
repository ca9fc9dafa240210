/*!
 * # asscribe - templated ASS captions from speech
 *
 * A Rust library that turns a video's transcript into ASS subtitle tracks
 * built from style templates, one per output orientation.
 *
 * ## Features
 *
 * - Transcribe once with an external whisper tool (or reuse a JSON transcript)
 * - Detect portrait, landscape or square video through ffprobe
 * - Auto-select `{orientation}_{brand}.ass` templates or share one template
 * - Two-line caption wrapping at natural break points
 * - Word-by-word karaoke timing
 * - Partial success: a missing template only skips its orientation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `captions`: Pure caption generation:
 *   - `captions::timestamp`: ASS timestamps
 *   - `captions::template`: Template parsing
 *   - `captions::style`: Style resolution
 *   - `captions::wrap`: Text wrapping
 *   - `captions::karaoke`: Karaoke timing
 *   - `captions::emitter`: Document emission
 * - `transcript`: Transcript model and speech-to-text collaborators
 * - `media_probe`: Orientation detection
 * - `app_controller`: Multi-orientation fan-out
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod captions;
pub mod errors;
pub mod file_utils;
pub mod media_probe;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::{CaptionStyle, Config};
pub use app_controller::{CaptionRequest, Controller, FanOutReport, OrientationOutcome, RunObserver};
pub use captions::{CaptionOptions, SubtitleEmitter, Template};
pub use media_probe::Orientation;
pub use transcript::{Transcriber, TranscriptSegment, Transcription};
pub use errors::{AppError, CaptionError, SkipReason, TemplateError};

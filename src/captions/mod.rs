/*!
 * ASS caption generation.
 *
 * Pure building blocks that turn a transcript and a style template into an
 * ASS document:
 * - `timestamp`: seconds to `H:MM:SS.CC`
 * - `template`: template parsing and section access
 * - `style`: requested style resolution with first-declared fallback
 * - `wrap`: two-line word wrapping
 * - `karaoke`: per-word `\k` timing synthesis
 * - `emitter`: dialogue records and the final document
 */

pub mod emitter;
pub mod karaoke;
pub mod style;
pub mod template;
pub mod timestamp;
pub mod wrap;

pub use emitter::{CaptionLine, CaptionOptions, SubtitleEmitter};
pub use style::{StyleResolution, resolve_style};
pub use template::{EventFormat, Template};

/// ASS hard line break as it appears in dialogue text
pub const LINE_BREAK: &str = "\\N";

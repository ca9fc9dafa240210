use std::fmt::Write;
use crate::captions::template::{EVENTS_MARKER, Template};
use crate::captions::{karaoke, timestamp, wrap};
use crate::errors::TemplateError;
use crate::transcript::TranscriptSegment;

// @module: ASS document emission

// @const: Colour override placed before karaoke text
pub const DEFAULT_HIGHLIGHT_TAG: &str = "{\\1c&H0000FFFF&}";

// @const: Default per-word karaoke duration in centiseconds
pub const DEFAULT_WORD_DURATION_CS: u32 = 50;

/// Text treatment applied to every dialogue record
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionOptions {
    /// Annotate words with `\k` timings
    pub karaoke: bool,

    /// Fixed karaoke word duration, 0 spreads the segment evenly
    pub word_duration_cs: u32,

    /// Override tag prepended to karaoke text
    pub highlight_tag: String,

    /// Display lines per caption
    pub max_lines: usize,
}

impl Default for CaptionOptions {
    fn default() -> Self {
        Self {
            karaoke: false,
            word_duration_cs: DEFAULT_WORD_DURATION_CS,
            highlight_tag: DEFAULT_HIGHLIGHT_TAG.to_string(),
            max_lines: 2,
        }
    }
}

/// One dialogue record before layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionLine {
    pub start_timestamp: String,
    pub end_timestamp: String,
    pub display_text: String,
    pub style_name: String,
}

impl CaptionLine {
    /// Derive a caption line from a transcript segment
    pub fn from_segment(segment: &TranscriptSegment, style_name: &str, options: &CaptionOptions) -> Self {
        let mut text = wrap::wrap_text(segment.text.trim(), options.max_lines);

        if options.karaoke {
            text = karaoke::annotate(&text, segment.start, segment.end, options.word_duration_cs);
            text.insert_str(0, &options.highlight_tag);
        }

        Self {
            start_timestamp: timestamp::encode(segment.start),
            end_timestamp: timestamp::encode(segment.end),
            display_text: text,
            style_name: style_name.to_string(),
        }
    }
}

/// Builds complete ASS documents from a template and transcript segments
#[derive(Debug, Clone, Default)]
pub struct SubtitleEmitter {
    options: CaptionOptions,
}

impl SubtitleEmitter {
    pub fn new(options: CaptionOptions) -> Self {
        Self { options }
    }

    /// Caption lines in segment order, one per segment
    pub fn caption_lines(&self, segments: &[TranscriptSegment], style_name: &str) -> Vec<CaptionLine> {
        segments
            .iter()
            .map(|segment| CaptionLine::from_segment(segment, style_name, &self.options))
            .collect()
    }

    /// Render the full document: template header, events header, dialogue records.
    pub fn emit(
        &self,
        segments: &[TranscriptSegment],
        template: &Template,
        style_name: &str,
    ) -> Result<String, TemplateError> {
        let layout = template.event_format()?;

        let mut document = String::with_capacity(template.header().len() + segments.len() * 96);
        document.push_str(template.header());
        document.push('\n');
        document.push_str(EVENTS_MARKER);
        document.push('\n');
        document.push_str(template.events_format());
        document.push('\n');

        for line in self.caption_lines(segments, style_name) {
            // Writing into a String cannot fail
            let _ = writeln!(
                document,
                "{}",
                layout.dialogue(&line.start_timestamp, &line.end_timestamp, &line.style_name, &line.display_text)
            );
        }

        Ok(document)
    }
}

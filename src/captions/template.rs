use std::fs;
use std::path::Path;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::errors::{TemplateError, TemplateLoadError};

// @module: ASS template parsing

// @const: Marker splitting the header from the events section
pub const EVENTS_MARKER: &str = "[Events]";

// @const: Events layout used when the template omits one
pub const DEFAULT_EVENTS_FORMAT: &str =
    "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

// @const: Style section header, v4 or v4+
static STYLE_SECTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*\[V4\+? Styles\][ \t]*\r?$").unwrap()
});

/// A parsed ASS style template.
///
/// Holds everything before `[Events]` verbatim (right-trimmed), the offset of
/// the style section inside that header, the events format line and the
/// declared style names.
#[derive(Debug, Clone)]
pub struct Template {
    header: String,
    style_offset: usize,
    events_format: String,
    styles: Vec<String>,
}

impl Template {
    /// Parse template text.
    pub fn parse(content: &str) -> Result<Self, TemplateError> {
        let events_count = content.matches(EVENTS_MARKER).count();
        match events_count {
            0 => return Err(TemplateError::MissingEventsSection),
            1 => {}
            n => return Err(TemplateError::DuplicateEventsSection(n)),
        }

        // Exactly one marker, so split_once always succeeds here
        let (before, after) = content
            .split_once(EVENTS_MARKER)
            .ok_or(TemplateError::MissingEventsSection)?;
        let header = before.trim_end().to_string();

        let style_markers: Vec<usize> = STYLE_SECTION_REGEX
            .find_iter(&header)
            .map(|m| m.start())
            .collect();
        let style_offset = match style_markers.as_slice() {
            [] => return Err(TemplateError::MissingStyleSection),
            [offset] => *offset,
            many => return Err(TemplateError::DuplicateStyleSection(many.len())),
        };

        let events_format = after
            .split('\n')
            .nth(1)
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .unwrap_or(DEFAULT_EVENTS_FORMAT)
            .to_string();

        let styles = Self::parse_style_names(&header[style_offset..]);

        Ok(Self {
            header,
            style_offset,
            events_format,
            styles,
        })
    }

    /// Read and parse a template file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TemplateLoadError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(TemplateLoadError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| TemplateLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|source| TemplateLoadError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    // @returns: Name field of every `Style: ` line, in order, duplicates kept
    fn parse_style_names(style_block: &str) -> Vec<String> {
        style_block
            .lines()
            .filter_map(|line| line.strip_prefix("Style: "))
            .filter_map(|rest| {
                let mut fields = rest.splitn(3, ',');
                let name = fields.next()?;
                // A declaration needs at least one attribute after the name
                fields.next()?;
                Some(name.trim().to_string())
            })
            .collect()
    }

    /// Script metadata, style section and events format line
    pub fn sections(&self) -> (&str, &str, &str) {
        (self.metadata(), self.style_block(), &self.events_format)
    }

    /// Everything before the style section
    pub fn metadata(&self) -> &str {
        &self.header[..self.style_offset]
    }

    /// Style section, marker included
    pub fn style_block(&self) -> &str {
        &self.header[self.style_offset..]
    }

    /// Metadata followed by the style section, written verbatim to output
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The events `Format:` line
    pub fn events_format(&self) -> &str {
        &self.events_format
    }

    /// Declared style names in declaration order
    pub fn declared_styles(&self) -> &[String] {
        &self.styles
    }

    /// Column layout of the events section
    pub fn event_format(&self) -> Result<EventFormat, TemplateError> {
        EventFormat::parse(&self.events_format)
    }
}

/// Column layout of `Dialogue:` records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFormat {
    columns: Vec<String>,
}

impl EventFormat {
    /// Parse a `Format:` line. `Start`, `End` and a trailing `Text` are required.
    pub fn parse(line: &str) -> Result<Self, TemplateError> {
        let invalid = |reason: &str| TemplateError::InvalidEventFormat {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let body = line
            .trim()
            .strip_prefix("Format:")
            .ok_or_else(|| invalid("missing 'Format:' prefix"))?;

        let columns: Vec<String> = body.split(',').map(|c| c.trim().to_string()).collect();

        for required in ["Start", "End"] {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(required)) {
                return Err(invalid(&format!("no '{}' column", required)));
            }
        }
        if !columns.last().is_some_and(|c| c.eq_ignore_ascii_case("Text")) {
            return Err(invalid("'Text' must be the last column"));
        }

        Ok(Self { columns })
    }

    /// Render one `Dialogue:` record.
    ///
    /// Layer and margins are `0`; name, effect and unknown columns stay empty.
    pub fn dialogue(&self, start: &str, end: &str, style: &str, text: &str) -> String {
        let fields: Vec<&str> = self
            .columns
            .iter()
            .map(|column| match column.to_ascii_lowercase().as_str() {
                "layer" | "marked" => "0",
                "start" => start,
                "end" => end,
                "style" => style,
                "marginl" | "marginr" | "marginv" => "0",
                "text" => text,
                _ => "",
            })
            .collect();

        format!("Dialogue: {}", fields.join(","))
    }
}

impl Default for EventFormat {
    fn default() -> Self {
        // The default layout always satisfies `parse`
        Self {
            columns: DEFAULT_EVENTS_FORMAT
                .trim_start_matches("Format:")
                .split(',')
                .map(|c| c.trim().to_string())
                .collect(),
        }
    }
}

use crate::captions::LINE_BREAK;

// @module: Karaoke timing synthesis

/// Annotate caption text with `{\k}` reveal timings.
///
/// Text containing hard breaks is split into sub-lines that share
/// `[start, end)` in equal consecutive slots, so no word timing crosses a
/// break. Inside a sub-line every word lasts `word_duration_cs` centiseconds,
/// or the sub-line duration split evenly when `word_duration_cs` is zero.
/// Fixed durations are not stretched to fit the segment.
pub fn annotate(text: &str, start: f64, end: f64, word_duration_cs: u32) -> String {
    if text.contains(LINE_BREAK) {
        let lines: Vec<&str> = text.split(LINE_BREAK).collect();
        let slot = (end - start) / lines.len() as f64;

        return lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let line_start = start + i as f64 * slot;
                annotate(line.trim(), line_start, line_start + slot, word_duration_cs)
            })
            .collect::<Vec<_>>()
            .join(LINE_BREAK);
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return text.to_string();
    }

    let timing_cs = if word_duration_cs > 0 {
        u64::from(word_duration_cs)
    } else {
        // Truncating cast, negative spans clamp to zero
        ((end - start) / words.len() as f64 * 100.0) as u64
    };

    words
        .iter()
        .map(|word| format!("{{\\k{}}}{}", timing_cs, word))
        .collect::<Vec<_>>()
        .join(" ")
}

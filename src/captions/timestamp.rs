// @module: ASS timestamp formatting

/// Format seconds as an ASS timestamp (`H:MM:SS.CC`).
///
/// Hours are unpadded and never truncated, centiseconds are truncated from
/// the fractional part. Negative or non-finite input is clamped to zero.
/// Centiseconds are taken from the binary `f64` value, so `2.3` encodes as
/// `0:00:02.29`.
pub fn encode(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 { seconds } else { 0.0 };

    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let centisecs = ((seconds % 1.0) * 100.0).floor() as u64;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, secs, centisecs)
}

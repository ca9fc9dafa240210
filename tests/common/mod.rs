/*!
 * Common test utilities for the asscribe test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use asscribe::transcript::TranscriptSegment;

// Re-export the mock collaborators module
pub mod mock_collaborators;

/// Template declaring the `clean` and `bold` styles
pub const CLEAN_TEMPLATE: &str = "[Script Info]
Title: Test captions
ScriptType: v4.00+
PlayResX: 1080
PlayResY: 1920

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: clean,Roboto Medium,48,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,0,2,40,40,120,1
Style: bold,Roboto Black,56,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,1,0,0,0,100,100,0,0,1,3,0,2,40,40,120,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// Template whose style section declares nothing
pub const STYLELESS_TEMPLATE: &str = "[Script Info]
Title: Empty

[V4+ Styles]
Format: Name, Fontname, Fontsize

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a placeholder video file; collaborators are mocked so content is irrelevant
pub fn create_test_video(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "not really a video")
}

/// The two-segment transcript used across workflow tests
pub fn sample_segments() -> Vec<TranscriptSegment> {
    vec![
        TranscriptSegment::new(0.0, 2.5, "Hello there friend"),
        TranscriptSegment::new(2.5, 6.0, "This is a longer caption that needs wrapping now"),
    ]
}

/// Dialogue lines of an emitted document
pub fn dialogue_lines(document: &str) -> Vec<&str> {
    document.lines().filter(|l| l.starts_with("Dialogue: ")).collect()
}

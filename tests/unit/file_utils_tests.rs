/*!
 * Tests for file utility functionality
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use asscribe::file_utils::FileManager;
use asscribe::media_probe::Orientation;
use crate::common;

/// Test that file_exists correctly identifies existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test.txt", "Test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));
    Ok(())
}

/// Test that ensure_dir creates nested directories
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    // Second call on an existing directory is fine
    FileManager::ensure_dir(&nested)?;
    Ok(())
}

/// Test output naming for every orientation
#[test]
fn test_caption_output_path_withOrientation_shouldBeSiblingOfInput() {
    let input = Path::new("/videos/talk.mp4");

    assert_eq!(
        FileManager::caption_output_path(input, Orientation::Portrait, "ass"),
        PathBuf::from("/videos/talk_captions_portrait.ass")
    );
    assert_eq!(
        FileManager::caption_output_path(input, Orientation::Landscape, "ass"),
        PathBuf::from("/videos/talk_captions_landscape.ass")
    );
    assert_eq!(
        FileManager::caption_output_path(input, Orientation::Square, "ass"),
        PathBuf::from("/videos/talk_captions_square.ass")
    );
}

#[test]
fn test_filter_file_path_withInput_shouldUseStem() {
    assert_eq!(
        FileManager::filter_file_path("/videos/talk.final.mov"),
        PathBuf::from("/videos/talk.final_filters.txt")
    );
}

/// Test that find_files only returns matching extensions, sorted
#[test]
fn test_find_files_withMixedExtensions_shouldReturnSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "square_codify.ass", "x")?;
    common::create_test_file(dir, "landscape_codify.ass", "x")?;
    common::create_test_file(dir, "notes.txt", "x")?;
    common::create_test_file(dir, "nested/portrait_fancy.ASS", "x")?;

    let found = FileManager::find_files(dir, "ass")?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(names.len(), 3);
    assert!(names.contains(&"portrait_fancy.ASS".to_string()));
    assert!(!names.contains(&"notes.txt".to_string()));
    Ok(())
}

/// Test that write_atomic replaces existing content completely
#[test]
fn test_write_atomic_withExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out").join("doc.ass");

    FileManager::write_atomic(&target, "a much longer first version")?;
    FileManager::write_atomic(&target, "short")?;

    assert_eq!(fs::read_to_string(&target)?, "short");

    // No temporary files are left behind
    let entries = fs::read_dir(target.parent().unwrap())?.count();
    assert_eq!(entries, 1);
    Ok(())
}

#[test]
fn test_read_to_string_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(FileManager::read_to_string(temp_dir.path().join("nope.ass")).is_err());
    Ok(())
}

#[test]
fn test_has_video_extension_shouldIgnoreCase() {
    assert!(FileManager::has_video_extension("clip.MP4"));
    assert!(FileManager::has_video_extension("clip.webm"));
    assert!(!FileManager::has_video_extension("clip.wav"));
    assert!(!FileManager::has_video_extension("clip"));
}

/// Test that read_to_string returns the exact content of a config file
#[test]
fn test_read_to_string_withConfigFile_shouldReturnContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{\"brand\": \"fancy\"}")?;

    assert_eq!(FileManager::read_to_string(&path)?, "{\"brand\": \"fancy\"}");
    Ok(())
}

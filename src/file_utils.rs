use anyhow::{Result, Context};
use std::fs;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use crate::media_probe::Orientation;

// @module: File and directory utilities

// @const: Extensions ffmpeg commonly reads as video
const VIDEO_EXTENSIONS: [&str; 14] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v",
    "mpg", "mpeg", "ogv", "ts", "mts", "m2ts",
];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: `{stem}_captions_{orientation}.{extension}` next to the input
    pub fn caption_output_path<P: AsRef<Path>>(
        input_file: P,
        orientation: Orientation,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let file_name = format!("{}_captions_{}.{}", stem, orientation, extension);
        Self::sibling(input_file, &file_name)
    }

    // @generates: `{stem}_filters.txt` next to the input
    pub fn filter_file_path<P: AsRef<Path>>(input_file: P) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        Self::sibling(input_file, &format!("{}_filters.txt", stem))
    }

    fn sibling(input_file: &Path, file_name: &str) -> PathBuf {
        match input_file.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let extension = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file()
                && path.extension().is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
            {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write a file through a temporary sibling and rename it into place, so
    /// readers never observe a partially written document.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
        temp.persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move document into place: {:?}", path))?;

        Ok(())
    }

    /// Open a log file for appending, creating it and its directory if needed
    pub fn open_log_file<P: AsRef<Path>>(path: P) -> Result<File> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))
    }

    /// Whether the extension is one ffmpeg commonly reads as video
    pub fn has_video_extension<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
    }
}

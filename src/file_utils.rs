use anyhow::{Context, Result};
use chrono::Local;
use log::debug;
use std::fs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::media_probe::{MediaItem, MediaKind};

// @module: File and directory utilities

// Common still-image extensions accepted on the timeline
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "webp", "bmp", "gif"];

// Common video file extensions supported by ffmpeg
// This list is not exhaustive but covers the most common formats
const VIDEO_EXTENSIONS: [&str; 14] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ogv", "ts", "mts",
    "m2ts",
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

    /// Append content to a log file with timestamp
    pub fn append_to_log_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file: {:?}", path.as_ref()))?;

        writeln!(file, "[{}] {}", timestamp, content)
            .with_context(|| format!("Failed to write to log file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Classify a media path as image or video by its extension.
    ///
    /// Returns None for anything the timeline cannot carry (audio files,
    /// subtitles, unknown extensions).
    pub fn detect_media_kind<P: AsRef<Path>>(path: P) -> Option<MediaKind> {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())?;

        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Some(MediaKind::Image);
        }
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            return Some(MediaKind::Video);
        }

        None
    }

    /// Turn a list of media paths into classified items, in input order.
    ///
    /// Paths whose extension is not a known image or video kind are dropped
    /// with a debug note; validation of readability happens later at probe
    /// time.
    pub fn classify_media_paths(paths: &[PathBuf]) -> Vec<MediaItem> {
        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::detect_media_kind(path) {
                Some(kind) => items.push(MediaItem {
                    path: path.clone(),
                    kind,
                }),
                None => {
                    debug!("Ignoring path with unsupported extension: {:?}", path);
                }
            }
        }
        items
    }

    /// Collect media files from a directory, sorted by filename for a
    /// stable caller-visible order.
    pub fn collect_media_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<MediaItem>> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && Self::detect_media_kind(path).is_some() {
                paths.push(path.to_path_buf());
            }
        }

        paths.sort();
        Ok(Self::classify_media_paths(&paths))
    }

    /// Clean and return a valid output filename based on a title
    pub fn clean_filename(title: &str, max_length: usize) -> String {
        let underscored = title.trim().replace(' ', "_");
        let cleaned: String = underscored
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();

        let truncated: String = cleaned.chars().take(max_length).collect();
        if truncated.is_empty() {
            format!("video_{}.mp4", Uuid::new_v4())
        } else {
            format!("{}.mp4", truncated)
        }
    }

    /// Unique staging path inside the working directory for an in-progress
    /// encode. The finished file is renamed over the real output only on
    /// success, so a failed run never leaves a partial file in its place.
    pub fn staging_output_path(working_dir: &Path, extension: &str) -> PathBuf {
        working_dir.join(format!("staging_{}.{}", Uuid::new_v4(), extension))
    }
}

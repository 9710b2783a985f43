use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, error};
use serde_json::{from_str, Value};
use tokio::process::Command;

use crate::errors::MediaError;

// @module: Media metadata probing via ffprobe

/// Kind of a caller-supplied media item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// A video clip; keeps its native duration on the timeline
    Video,
    /// A still image; receives an assigned duration
    Image,
}

/// A single caller-owned media input. The engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    /// Path to the media file
    pub path: PathBuf,
    /// Whether the item is a video clip or a still image
    pub kind: MediaKind,
}

impl MediaItem {
    pub fn video(path: impl Into<PathBuf>) -> Self {
        MediaItem {
            path: path.into(),
            kind: MediaKind::Video,
        }
    }

    pub fn image(path: impl Into<PathBuf>) -> Self {
        MediaItem {
            path: path.into(),
            kind: MediaKind::Image,
        }
    }
}

/// Probed intrinsic properties of a media file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaMetadata {
    /// Native width in pixels
    pub width: u32,
    /// Native height in pixels
    pub height: u32,
    /// Native duration in seconds, when the container reports one
    pub duration_secs: Option<f64>,
}

/// A media item paired with its probed metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedMedia {
    pub item: MediaItem,
    pub meta: MediaMetadata,
}

/// Probing seam between the engine and ffprobe.
///
/// The engine consumes media files only through this trait, so tests can
/// substitute a mock without touching the filesystem or external tools.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Probe one media item for dimensions and native duration
    async fn probe(&self, item: &MediaItem) -> Result<MediaMetadata, MediaError>;

    /// Duration of an audio file in seconds
    async fn audio_duration(&self, path: &Path) -> Result<f64>;
}

/// Real probe backed by the ffprobe executable
pub struct FfprobeClient {
    /// Hard per-invocation timeout
    timeout: Duration,
}

impl FfprobeClient {
    pub fn new() -> Self {
        FfprobeClient {
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        FfprobeClient { timeout }
    }

    /// Run ffprobe and return its parsed JSON output
    async fn run_ffprobe(&self, path: &Path) -> Result<Value> {
        if !path.exists() {
            return Err(anyhow!("File does not exist: {:?}", path));
        }

        // Add timeout to prevent hanging on problematic files
        let ffprobe_future = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
                path.to_str().unwrap_or(""),
            ])
            .output();

        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| anyhow!("Failed to execute ffprobe command: {}", e))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(anyhow!("ffprobe command timed out after {} seconds", self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed for {:?}: {}", path, stderr);
            return Err(anyhow!("ffprobe command failed: {}", stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Err(anyhow!("ffprobe returned empty output for {:?}", path));
        }

        let json: Value = from_str(&stdout).map_err(|e| anyhow!("Failed to parse ffprobe JSON output: {}", e))?;
        Ok(json)
    }
}

impl Default for FfprobeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaProbe for FfprobeClient {
    async fn probe(&self, item: &MediaItem) -> Result<MediaMetadata, MediaError> {
        let json = self
            .run_ffprobe(&item.path)
            .await
            .map_err(|e| MediaError::Unreadable {
                path: item.path.clone(),
                reason: e.to_string(),
            })?;

        let (width, height) =
            parse_dimensions(&json).ok_or_else(|| MediaError::MissingDimensions {
                path: item.path.clone(),
            })?;

        let duration_secs = parse_container_duration(&json);
        debug!(
            "Probed {:?}: {}x{} duration={:?}",
            item.path, width, height, duration_secs
        );

        Ok(MediaMetadata {
            width,
            height,
            duration_secs,
        })
    }

    async fn audio_duration(&self, path: &Path) -> Result<f64> {
        let json = self.run_ffprobe(path).await?;
        parse_container_duration(&json)
            .ok_or_else(|| anyhow!("No duration reported for audio file: {:?}", path))
    }
}

/// Extract the first video stream's pixel dimensions from ffprobe JSON
pub fn parse_dimensions(json: &Value) -> Option<(u32, u32)> {
    let streams = json.get("streams")?.as_array()?;

    for stream in streams {
        let codec_type = stream.get("codec_type").and_then(|v| v.as_str());
        if codec_type != Some("video") {
            continue;
        }

        let width = stream.get("width").and_then(|v| v.as_u64())? as u32;
        let height = stream.get("height").and_then(|v| v.as_u64())? as u32;
        if width > 0 && height > 0 {
            return Some((width, height));
        }
    }

    None
}

/// Extract the container duration in seconds from ffprobe JSON.
///
/// ffprobe reports it as a decimal string under `format.duration`; stills
/// usually report none or a nonsensical value, which callers ignore.
pub fn parse_container_duration(json: &Value) -> Option<f64> {
    let duration = json
        .get("format")?
        .get("duration")?
        .as_str()?
        .parse::<f64>()
        .ok()?;

    if duration.is_finite() && duration > 0.0 {
        Some(duration)
    } else {
        None
    }
}

/// Filter ffmpeg/ffprobe stderr to only show meaningful error lines, stripping
/// the version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Chapter",
        "    Chapter",
        "  Stream #",
        "      Metadata:",
        "        title",
        "        BPS",
        "        DURATION",
        "        NUMBER_OF",
        "        _STATISTICS",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| trimmed.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "unknown ffmpeg error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}

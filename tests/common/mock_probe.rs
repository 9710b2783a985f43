/*!
 * Mock media probe for testing
 *
 * Provides a MediaProbe implementation backed by an in-memory table so
 * tests never shell out to ffprobe or touch real media files.
 */

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use clipsmith::errors::MediaError;
use clipsmith::media_probe::{MediaItem, MediaMetadata, MediaProbe};

/// Probe returning canned metadata per path
pub struct MockProbe {
    /// Reported voiceover/music duration in seconds
    audio_secs: f64,
    /// Metadata table keyed by media path
    media: HashMap<PathBuf, MediaMetadata>,
    /// Paths that should fail to probe
    corrupt: HashSet<PathBuf>,
}

impl MockProbe {
    pub fn new(audio_secs: f64) -> Self {
        MockProbe {
            audio_secs,
            media: HashMap::new(),
            corrupt: HashSet::new(),
        }
    }

    /// Register a still image with the given native dimensions
    pub fn with_image(mut self, path: &str, width: u32, height: u32) -> Self {
        self.media.insert(
            PathBuf::from(path),
            MediaMetadata {
                width,
                height,
                duration_secs: None,
            },
        );
        self
    }

    /// Register a video clip with dimensions and native duration
    pub fn with_video(mut self, path: &str, width: u32, height: u32, duration_secs: f64) -> Self {
        self.media.insert(
            PathBuf::from(path),
            MediaMetadata {
                width,
                height,
                duration_secs: Some(duration_secs),
            },
        );
        self
    }

    /// Register a path that fails to probe
    pub fn with_corrupt(mut self, path: &str) -> Self {
        self.corrupt.insert(PathBuf::from(path));
        self
    }
}

#[async_trait]
impl MediaProbe for MockProbe {
    async fn probe(&self, item: &MediaItem) -> Result<MediaMetadata, MediaError> {
        if self.corrupt.contains(&item.path) {
            return Err(MediaError::Unreadable {
                path: item.path.clone(),
                reason: "simulated corrupt file".to_string(),
            });
        }

        self.media
            .get(&item.path)
            .copied()
            .ok_or_else(|| MediaError::Unreadable {
                path: item.path.clone(),
                reason: "not registered with mock probe".to_string(),
            })
    }

    async fn audio_duration(&self, path: &Path) -> Result<f64> {
        if self.corrupt.contains(path) {
            return Err(anyhow!("simulated unreadable audio: {:?}", path));
        }
        Ok(self.audio_secs)
    }
}

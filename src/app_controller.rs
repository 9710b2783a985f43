use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::composition::encoder::{self, EncodeJob, EncodePlan};
use crate::composition::normalizer;
use crate::composition::renderer;
use crate::composition::sequencer;
use crate::errors::AssemblyError;
use crate::file_utils::FileManager;
use crate::media_probe::{FfprobeClient, MediaProbe};
use crate::subtitle_processor::SubtitleTrack;
use crate::timing;

// @module: Application controller for video assembly

/// Which granularity of subtitle track to derive from a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleMode {
    /// One cue per word, via the timing allocator
    WordLevel,
    /// One cue per transcription segment
    SentenceLevel,
}

/// A single assembly request. Everything is caller-supplied; the engine
/// holds no state between runs.
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    /// Ordered media file paths (images and/or videos)
    pub media: Vec<PathBuf>,

    /// Voiceover audio file
    pub voiceover: PathBuf,

    /// Existing subtitle track to burn in
    pub subtitle_track: Option<PathBuf>,

    /// Transcript segments JSON to derive a word-level track from
    pub segments: Option<PathBuf>,

    /// Final output file
    pub output: PathBuf,

    /// Working directory for intermediate artifacts; a temporary directory
    /// is created when absent
    pub working_dir: Option<PathBuf>,

    /// Overwrite an existing output file
    pub force_overwrite: bool,
}

/// Main application controller for video assembly
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Media probing seam (ffprobe in production, mocks in tests)
    probe: Box<dyn MediaProbe>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            probe: Box::new(FfprobeClient::new()),
        })
    }

    /// Create a controller with a caller-supplied probe implementation
    pub fn with_probe(config: Config, probe: Box<dyn MediaProbe>) -> Self {
        Self { config, probe }
    }

    /// Run one full assembly: plan the composite, then encode it.
    /// Returns the output path on success.
    pub async fn run(&self, request: &AssemblyRequest) -> Result<PathBuf> {
        let started = std::time::Instant::now();

        if request.output.exists() && !request.force_overwrite {
            warn!(
                "Skipping assembly, output already exists (use -f to force overwrite): {:?}",
                request.output
            );
            return Ok(request.output.clone());
        }

        // Working directory: explicit from the caller, or a run-scoped temp
        // dir that lives until this function returns
        let mut _temp_guard: Option<tempfile::TempDir> = None;
        let working_dir: PathBuf = match &request.working_dir {
            Some(dir) => {
                FileManager::ensure_dir(dir)?;
                dir.clone()
            }
            None => {
                let dir = tempfile::TempDir::new()
                    .context("Failed to create temporary working directory")?;
                let path = dir.path().to_path_buf();
                _temp_guard = Some(dir);
                path
            }
        };

        let job = self.prepare(request, &working_dir).await?;

        info!("Encoding composite ({:.3}s)", job.duration_secs);
        encoder::run_encode(&job, &self.config.encoding).await?;

        info!(
            "Assembly completed in {:.1}s: {:?}",
            started.elapsed().as_secs_f64(),
            request.output
        );

        Ok(request.output.clone())
    }

    /// Plan the whole composite without encoding anything: validate, probe,
    /// normalize, sequence, load subtitles, lay out overlays and assemble
    /// the encoder invocation.
    pub async fn prepare(
        &self,
        request: &AssemblyRequest,
        working_dir: &Path,
    ) -> Result<EncodeJob> {
        self.validate_request(request)?;

        let progress = stage_progress(5);

        progress.set_message("probing voiceover");
        let voiceover_secs = self
            .probe
            .audio_duration(&request.voiceover)
            .await
            .map_err(|e| {
                AssemblyError::InvalidInput(format!(
                    "Unreadable voiceover {:?}: {}",
                    request.voiceover, e
                ))
            })?;
        progress.inc(1);

        progress.set_message("normalizing media");
        let (target_w, target_h) = self.config.aspect_ratio.dimensions();
        let items = FileManager::classify_media_paths(&request.media);
        if items.is_empty() {
            return Err(AssemblyError::InvalidInput(
                "No image or video files among the supplied media paths".to_string(),
            )
            .into());
        }
        let mut clips =
            normalizer::normalize_media(self.probe.as_ref(), &items, target_w, target_h).await?;
        progress.inc(1);

        progress.set_message("sequencing timeline");
        sequencer::assign_image_durations(&mut clips, voiceover_secs);
        let timeline = sequencer::build_timeline(clips, self.config.transition)?;
        info!(
            "Timeline: {} clip(s), {:.3}s against a {:.3}s voiceover",
            timeline.len(),
            timeline.duration_secs(),
            voiceover_secs
        );
        progress.inc(1);

        progress.set_message("laying out subtitles");
        let track = self.resolve_subtitle_track(request, working_dir)?;
        let style = self.config.style.profile();
        let overlays =
            renderer::render_overlays(&track, target_w, target_h, self.config.position, &style);
        progress.inc(1);

        progress.set_message("assembling encode");
        let plan = EncodePlan {
            timeline: &timeline,
            overlays: &overlays,
            style: &style,
            voiceover: &request.voiceover,
            background_music: self.config.background_music.as_deref(),
            voiceover_secs,
            target_w,
            target_h,
            encoding: &self.config.encoding,
            working_dir,
            output: &request.output,
        };
        let job = encoder::build_encode_job(&plan)?;
        progress.inc(1);
        progress.finish_with_message("planned");

        Ok(job)
    }

    /// Generate a subtitle track file from a transcript segments JSON.
    pub fn generate_subtitle_track(
        &self,
        segments_path: &Path,
        mode: SubtitleMode,
        output: &Path,
    ) -> Result<SubtitleTrack> {
        let segments = timing::load_segments(segments_path)?;

        let track = match mode {
            SubtitleMode::WordLevel => {
                let cues = timing::allocate_track(&segments);
                SubtitleTrack::from_word_cues(&cues)
            }
            SubtitleMode::SentenceLevel => SubtitleTrack::from_segments(&segments),
        };

        if track.is_empty() {
            warn!("Transcript produced no cues; writing an empty subtitle track");
        }

        track.write_to_srt(output)?;
        info!(
            "Subtitle track with {} entries written to {:?}",
            track.len(),
            output
        );

        Ok(track)
    }

    /// Fatal input validation, raised before any work starts.
    fn validate_request(&self, request: &AssemblyRequest) -> Result<()> {
        if request.media.is_empty() {
            return Err(AssemblyError::InvalidInput("Media list is empty".to_string()).into());
        }

        if !FileManager::file_exists(&request.voiceover) {
            return Err(AssemblyError::InvalidInput(format!(
                "Voiceover file does not exist: {:?}",
                request.voiceover
            ))
            .into());
        }

        if let Some(track) = &request.subtitle_track {
            if !FileManager::file_exists(track) {
                return Err(AssemblyError::InvalidInput(format!(
                    "Subtitle track does not exist: {:?}",
                    track
                ))
                .into());
            }
        }

        if let Some(segments) = &request.segments {
            if !FileManager::file_exists(segments) {
                return Err(AssemblyError::InvalidInput(format!(
                    "Segments file does not exist: {:?}",
                    segments
                ))
                .into());
            }
        }

        self.config.validate()?;

        Ok(())
    }

    /// Resolve the subtitle track for this run.
    ///
    /// An explicit SRT wins; otherwise a word-level track is derived from
    /// the segments JSON and kept in the working directory. With neither,
    /// the composite carries no burned-in text.
    fn resolve_subtitle_track(
        &self,
        request: &AssemblyRequest,
        working_dir: &Path,
    ) -> Result<SubtitleTrack> {
        if let Some(path) = &request.subtitle_track {
            return SubtitleTrack::load_from_srt(path);
        }

        if let Some(segments_path) = &request.segments {
            let segments = timing::load_segments(segments_path)?;
            let cues = timing::allocate_track(&segments);
            let track = SubtitleTrack::from_word_cues(&cues);
            if !track.is_empty() {
                track.write_to_srt(working_dir.join("word_level_subtitles.srt"))?;
            }
            return Ok(track);
        }

        info!("No subtitle track or segments supplied; assembling without burned-in text");
        Ok(SubtitleTrack::new())
    }
}

/// Stage-level progress bar in the shared application style
fn stage_progress(stages: u64) -> ProgressBar {
    let progress_bar = ProgressBar::new(stages);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} stages {msg}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len} {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result.progress_chars("█▓▒░"));
    progress_bar
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error, info};
use tokio::process::Command;

use crate::app_config::{EncodingConfig, StyleProfile, Transition};
use crate::composition::mixer;
use crate::composition::renderer::OverlayCue;
use crate::composition::sequencer::Timeline;
use crate::composition::{FRAME_RATE, TRANSITION_SECS};
use crate::errors::AssemblyError;
use crate::file_utils::FileManager;
use crate::media_probe::{filter_ffmpeg_stderr, MediaKind};

/// A fully assembled ffmpeg invocation.
///
/// The encode writes into a staging file inside the working directory and is
/// renamed over the real output only on success, so a failed run never
/// leaves a partial file where a complete one is expected.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    /// Arguments passed to the ffmpeg executable
    pub args: Vec<String>,
    /// In-progress output inside the working directory
    pub staging: PathBuf,
    /// Final output path
    pub output: PathBuf,
    /// Composite duration in seconds, after the voiceover trim
    pub duration_secs: f64,
}

/// Everything the encoder needs to lay down the composite.
pub struct EncodePlan<'a> {
    pub timeline: &'a Timeline,
    pub overlays: &'a [OverlayCue],
    pub style: &'a StyleProfile,
    pub voiceover: &'a Path,
    pub background_music: Option<&'a Path>,
    pub voiceover_secs: f64,
    pub target_w: u32,
    pub target_h: u32,
    pub encoding: &'a EncodingConfig,
    pub working_dir: &'a Path,
    pub output: &'a Path,
}

/// Build the single ffmpeg invocation for the whole composite.
pub fn build_encode_job(plan: &EncodePlan) -> Result<EncodeJob, AssemblyError> {
    let timeline = plan.timeline;
    if timeline.is_empty() {
        return Err(AssemblyError::Composition {
            stage: "encode",
            reason: "timeline carries no clips".to_string(),
        });
    }

    let duration_secs =
        mixer::composite_duration(timeline.duration_secs(), plan.voiceover_secs);

    let mut args: Vec<String> = vec!["-y".to_string()];

    // Inputs: clips in timeline order, then voiceover, then optional music
    for clip in &timeline.clips {
        if clip.item.kind == MediaKind::Image {
            args.push("-loop".to_string());
            args.push("1".to_string());
            args.push("-t".to_string());
            args.push(format!("{:.3}", clip.duration_secs));
        }
        args.push("-i".to_string());
        args.push(clip.item.path.to_string_lossy().to_string());
    }

    let voiceover_index = timeline.len();
    args.push("-i".to_string());
    args.push(plan.voiceover.to_string_lossy().to_string());

    let music_index = if let Some(music) = plan.background_music {
        args.push("-i".to_string());
        args.push(music.to_string_lossy().to_string());
        Some(voiceover_index + 1)
    } else {
        None
    };

    let filter = build_filter_graph(plan, duration_secs, voiceover_index, music_index);
    args.push("-filter_complex".to_string());
    args.push(filter);

    args.push("-map".to_string());
    args.push("[vout]".to_string());
    args.push("-map".to_string());
    args.push("[aout]".to_string());

    args.push("-r".to_string());
    args.push(FRAME_RATE.to_string());
    args.push("-c:v".to_string());
    args.push("libx264".to_string());
    args.push("-preset".to_string());
    args.push("medium".to_string());
    args.push("-crf".to_string());
    args.push(plan.encoding.crf.to_string());
    args.push("-pix_fmt".to_string());
    args.push("yuv420p".to_string());
    args.push("-c:a".to_string());
    args.push("aac".to_string());
    args.push("-t".to_string());
    args.push(format!("{:.3}", duration_secs));

    let staging = FileManager::staging_output_path(plan.working_dir, "mp4");
    args.push(staging.to_string_lossy().to_string());

    Ok(EncodeJob {
        args,
        staging,
        output: plan.output.to_path_buf(),
        duration_secs,
    })
}

/// Assemble the complete filter_complex expression.
fn build_filter_graph(
    plan: &EncodePlan,
    duration_secs: f64,
    voiceover_index: usize,
    music_index: Option<usize>,
) -> String {
    let timeline = plan.timeline;
    let mut parts: Vec<String> = Vec::new();

    // Per-clip normalization onto the canvas
    for (i, clip) in timeline.clips.iter().enumerate() {
        let g = clip.geometry;
        parts.push(format!(
            "[{i}:v]scale={sw}:{sh},crop={tw}:{th}:{cx}:{cy},setsar=1,fps={fps}[v{i}]",
            i = i,
            sw = g.scaled_w,
            sh = g.scaled_h,
            tw = plan.target_w,
            th = plan.target_h,
            cx = g.crop_x,
            cy = g.crop_y,
            fps = FRAME_RATE,
        ));
    }

    // Concatenation in caller order
    match timeline.transition {
        Transition::Cut => {
            let inputs: String = (0..timeline.len()).map(|i| format!("[v{}]", i)).collect();
            parts.push(format!(
                "{}concat=n={}:v=1:a=0[base]",
                inputs,
                timeline.len()
            ));
        }
        Transition::Crossfade | Transition::Slide => {
            let kind = match timeline.transition {
                Transition::Crossfade => "fade",
                Transition::Slide => "slideleft",
                Transition::Cut => unreachable!(),
            };

            if timeline.len() == 1 {
                parts.push("[v0]null[base]".to_string());
            } else {
                // Chained pairwise xfade; each step overlaps the running
                // composite's tail with the next clip's head.
                let mut running = timeline.clips[0].duration_secs;
                let mut prev_label = "v0".to_string();
                for (k, clip) in timeline.clips.iter().enumerate().skip(1) {
                    let offset = running - TRANSITION_SECS;
                    let out_label = if k == timeline.len() - 1 {
                        "base".to_string()
                    } else {
                        format!("x{}", k)
                    };
                    parts.push(format!(
                        "[{prev}][v{k}]xfade=transition={kind}:duration={dur:.3}:offset={offset:.3}[{out}]",
                        prev = prev_label,
                        k = k,
                        kind = kind,
                        dur = TRANSITION_SECS,
                        offset = offset,
                        out = out_label,
                    ));
                    running += clip.duration_secs - TRANSITION_SECS;
                    prev_label = out_label;
                }
            }
        }
    }

    // Subtitle overlays and the closing video fade, as one linear chain
    let mut video_chain: Vec<String> = Vec::new();
    for overlay in plan.overlays {
        let start = overlay.start_ms as f64 / 1000.0;
        let end = overlay.end_ms as f64 / 1000.0;
        let enable = format!("enable='between(t,{:.3},{:.3})'", start, end);

        if let (Some(plate), Some(plate_style)) = (overlay.layout.plate, plan.style.background) {
            // drawbox has no corner radius; the plate renders square
            video_chain.push(format!(
                "drawbox=x={}:y={}:w={}:h={}:color={}@{}:t=fill:{}",
                plate.x, plate.y, plate.w, plate.h, plate_style.color, plate_style.opacity, enable
            ));
        }

        for line in &overlay.layout.lines {
            let mut draw = format!(
                "drawtext=text='{}':fontsize={}:fontcolor={}:font='{}':x={}:y={}",
                escape_drawtext(&line.text),
                overlay.layout.font_size,
                plan.style.text_color,
                plan.style.font_family,
                line.x,
                line.y,
            );
            if let Some(stroke_color) = plan.style.stroke_color {
                draw.push_str(&format!(
                    ":borderw={}:bordercolor={}",
                    plan.style.stroke_width, stroke_color
                ));
            }
            draw.push(':');
            draw.push_str(&enable);
            video_chain.push(draw);
        }
    }
    video_chain.push(mixer::video_fade_filter(duration_secs));
    parts.push(format!("[base]{}[vout]", video_chain.join(",")));

    // Audio chain: voiceover fade, optional ducked music summed underneath
    match music_index {
        Some(music_index) => {
            parts.push(format!(
                "[{}:a]{}[voa]",
                voiceover_index,
                mixer::voiceover_filter(plan.voiceover_secs)
            ));
            parts.push(format!(
                "[{}:a]{}[bgm]",
                music_index,
                mixer::music_filter(plan.voiceover_secs)
            ));
            parts.push(format!("[voa][bgm]{}[aout]", mixer::mix_filter()));
        }
        None => {
            parts.push(format!(
                "[{}:a]{}[aout]",
                voiceover_index,
                mixer::voiceover_filter(plan.voiceover_secs)
            ));
        }
    }

    parts.join(";")
}

/// Escape cue text for embedding inside a single-quoted drawtext value.
fn escape_drawtext(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\'' => out.push_str(r"'\''"),
            '\\' => out.push_str(r"\\"),
            _ => out.push(c),
        }
    }
    out
}

/// Run the encode and move the staging file over the final output.
///
/// Encoding failures are fatal and never retried here; retry, if any, is a
/// caller policy.
pub async fn run_encode(job: &EncodeJob, encoding: &EncodingConfig) -> Result<(), AssemblyError> {
    debug!("ffmpeg {}", job.args.join(" "));

    let ffmpeg_future = Command::new("ffmpeg").args(&job.args).output();
    let timeout = Duration::from_secs(encoding.encode_timeout_secs);

    let result = tokio::select! {
        result = ffmpeg_future => {
            result.map_err(|e| AssemblyError::Encoding(format!("Failed to execute ffmpeg: {}", e)))?
        },
        _ = tokio::time::sleep(timeout) => {
            let _ = std::fs::remove_file(&job.staging);
            return Err(AssemblyError::Encoding(format!(
                "ffmpeg encode timed out after {} seconds", timeout.as_secs()
            )));
        }
    };

    let log_path = job
        .staging
        .parent()
        .map(|dir| dir.join("assembly.log"))
        .unwrap_or_else(|| PathBuf::from("assembly.log"));

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("Encode failed: {}", filtered);
        let _ = FileManager::append_to_log_file(&log_path, &format!("encode failed: {}", filtered));
        let _ = std::fs::remove_file(&job.staging);
        return Err(AssemblyError::Encoding(filtered));
    }

    promote_staging(&job.staging, &job.output)?;
    let _ = FileManager::append_to_log_file(
        &log_path,
        &format!(
            "encoded {:?} ({:.3}s at {} fps)",
            job.output, job.duration_secs, FRAME_RATE
        ),
    );
    info!("Encoded composite written to {:?}", job.output);

    Ok(())
}

/// Move the finished staging file into place, copying when a rename across
/// filesystems is refused.
fn promote_staging(staging: &Path, output: &Path) -> Result<(), AssemblyError> {
    if let Some(parent) = output.parent() {
        FileManager::ensure_dir(parent)
            .map_err(|e| AssemblyError::Encoding(format!("Failed to create output dir: {}", e)))?;
    }

    if std::fs::rename(staging, output).is_ok() {
        return Ok(());
    }

    std::fs::copy(staging, output)
        .map_err(|e| AssemblyError::Encoding(format!("Failed to place output file: {}", e)))?;
    let _ = std::fs::remove_file(staging);
    Ok(())
}

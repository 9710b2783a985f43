use crate::app_config::Transition;
use crate::composition::normalizer::NormalizedClip;
use crate::composition::TRANSITION_SECS;
use crate::errors::AssemblyError;
use crate::media_probe::MediaKind;

/// Ordered concatenation of normalized clips.
///
/// Clip order is caller-supplied and never reordered or optimized here.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Clips in presentation order
    pub clips: Vec<NormalizedClip>,
    /// Uniform transition between consecutive clips
    pub transition: Transition,
}

impl Timeline {
    /// Total presentation length in seconds.
    ///
    /// Hard cuts sum the clip durations exactly; crossfade and slide overlap
    /// consecutive clips by [`TRANSITION_SECS`], shortening the total.
    pub fn duration_secs(&self) -> f64 {
        let sum: f64 = self.clips.iter().map(|c| c.duration_secs).sum();
        match self.transition {
            Transition::Cut => sum,
            Transition::Crossfade | Transition::Slide => {
                let overlaps = self.clips.len().saturating_sub(1) as f64;
                sum - overlaps * TRANSITION_SECS
            }
        }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// Give every still image an equal share of the voiceover duration.
///
/// Video clips are untouched; they keep their native duration. When only
/// images are present, the assigned durations sum to the voiceover duration
/// exactly (up to float representation). Mixed timelines may over- or
/// under-run the voiceover; that is reconciled only at the final trim.
pub fn assign_image_durations(clips: &mut [NormalizedClip], voiceover_secs: f64) {
    let image_count = clips
        .iter()
        .filter(|c| c.item.kind == MediaKind::Image)
        .count();

    if image_count == 0 {
        return;
    }

    let per_image = voiceover_secs / image_count as f64;
    for clip in clips.iter_mut() {
        if clip.item.kind == MediaKind::Image {
            clip.duration_secs = per_image;
        }
    }
}

/// Build the timeline from duration-assigned clips.
pub fn build_timeline(
    clips: Vec<NormalizedClip>,
    transition: Transition,
) -> Result<Timeline, AssemblyError> {
    if clips.is_empty() {
        return Err(AssemblyError::Composition {
            stage: "sequence",
            reason: "no clips to concatenate".to_string(),
        });
    }

    for clip in &clips {
        if clip.duration_secs <= 0.0 {
            return Err(AssemblyError::Composition {
                stage: "sequence",
                reason: format!(
                    "clip {:?} has non-positive duration {:.3}s",
                    clip.item.path, clip.duration_secs
                ),
            });
        }
    }

    Ok(Timeline { clips, transition })
}

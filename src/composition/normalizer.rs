use anyhow::{anyhow, Result};
use log::{debug, warn};

use crate::errors::AssemblyError;
use crate::media_probe::{MediaItem, MediaKind, MediaProbe};

/// Scale-and-crop plan that maps a native clip onto the target canvas.
///
/// The clip is first scaled so one dimension matches the canvas exactly and
/// the other meets or exceeds it, then center-cropped. No letterboxing, no
/// aspect distortion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropGeometry {
    /// Width after aspect-preserving scale
    pub scaled_w: u32,
    /// Height after aspect-preserving scale
    pub scaled_h: u32,
    /// Left edge of the crop window inside the scaled clip
    pub crop_x: u32,
    /// Top edge of the crop window inside the scaled clip
    pub crop_y: u32,
}

/// A media item normalized to the canvas, ready for sequencing.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedClip {
    /// The source item
    pub item: MediaItem,
    /// Scale/crop plan onto the canvas
    pub geometry: CropGeometry,
    /// On-screen duration in seconds. Native for videos; assigned later for
    /// images (zero until the duration assigner runs).
    pub duration_secs: f64,
}

/// Compute the scale-and-crop geometry for one clip.
///
/// Wider-than-canvas clips scale to the canvas height and crop the sides;
/// taller clips scale to the canvas width and crop top/bottom. The crop
/// window is centered on the scaled clip's own center.
pub fn plan_geometry(
    native_w: u32,
    native_h: u32,
    target_w: u32,
    target_h: u32,
) -> Result<CropGeometry> {
    if native_w == 0 || native_h == 0 {
        return Err(anyhow!(
            "Cannot normalize clip with zero dimension: {}x{}",
            native_w,
            native_h
        ));
    }

    let clip_ar = f64::from(native_w) / f64::from(native_h);
    let target_ar = f64::from(target_w) / f64::from(target_h);

    let (scaled_w, scaled_h) = if clip_ar > target_ar {
        // Clip relatively wider: lock height, width spills past the canvas
        let w = (f64::from(native_w) * f64::from(target_h) / f64::from(native_h)).round() as u32;
        (w.max(target_w), target_h)
    } else {
        // Clip relatively taller (or equal): lock width
        let h = (f64::from(native_h) * f64::from(target_w) / f64::from(native_w)).round() as u32;
        (target_w, h.max(target_h))
    };

    let crop_x = (scaled_w - target_w) / 2;
    let crop_y = (scaled_h - target_h) / 2;

    Ok(CropGeometry {
        scaled_w,
        scaled_h,
        crop_x,
        crop_y,
    })
}

/// Probe and normalize a list of media items, in input order.
///
/// A single unreadable item is dropped with a warning and assembly
/// continues; when every item fails the whole run is unusable and a fatal
/// error is returned. Video clips keep their probed native duration; image
/// durations stay unassigned here.
pub async fn normalize_media(
    probe: &dyn MediaProbe,
    items: &[MediaItem],
    target_w: u32,
    target_h: u32,
) -> Result<Vec<NormalizedClip>, AssemblyError> {
    if items.is_empty() {
        return Err(AssemblyError::InvalidInput(
            "Media list is empty".to_string(),
        ));
    }

    let mut clips = Vec::with_capacity(items.len());

    for item in items {
        let meta = match probe.probe(item).await {
            Ok(meta) => meta,
            Err(e) => {
                warn!("Skipping unusable media item: {}", e);
                continue;
            }
        };

        let geometry = match plan_geometry(meta.width, meta.height, target_w, target_h) {
            Ok(geometry) => geometry,
            Err(e) => {
                warn!("Skipping media item {:?}: {}", item.path, e);
                continue;
            }
        };

        let duration_secs = match item.kind {
            MediaKind::Video => match meta.duration_secs {
                Some(duration) => duration,
                None => {
                    warn!(
                        "Skipping video with no reported duration: {:?}",
                        item.path
                    );
                    continue;
                }
            },
            MediaKind::Image => 0.0,
        };

        debug!(
            "Normalized {:?}: {}x{} -> scale {}x{}, crop at ({}, {})",
            item.path, meta.width, meta.height, geometry.scaled_w, geometry.scaled_h,
            geometry.crop_x, geometry.crop_y
        );

        clips.push(NormalizedClip {
            item: item.clone(),
            geometry,
            duration_secs,
        });
    }

    if clips.is_empty() {
        return Err(AssemblyError::NoUsableMedia {
            attempted: items.len(),
        });
    }

    Ok(clips)
}

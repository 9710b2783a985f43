/*!
 * Tests for duration assignment and timeline construction
 */

use clipsmith::app_config::Transition;
use clipsmith::composition::normalizer::{plan_geometry, NormalizedClip};
use clipsmith::composition::sequencer::{assign_image_durations, build_timeline};
use clipsmith::errors::AssemblyError;
use clipsmith::media_probe::MediaItem;

fn image_clip(path: &str) -> NormalizedClip {
    NormalizedClip {
        item: MediaItem::image(path),
        geometry: plan_geometry(1000, 1000, 1920, 1080).unwrap(),
        duration_secs: 0.0,
    }
}

fn video_clip(path: &str, duration_secs: f64) -> NormalizedClip {
    NormalizedClip {
        item: MediaItem::video(path),
        geometry: plan_geometry(1280, 720, 1920, 1080).unwrap(),
        duration_secs,
    }
}

/// Test the equal split of the voiceover across still images
#[test]
fn test_assign_image_durations_withFiveImages_shouldSplitEvenly() {
    let mut clips: Vec<NormalizedClip> = (0..5)
        .map(|i| image_clip(&format!("img{}.png", i)))
        .collect();

    assign_image_durations(&mut clips, 30.0);

    for clip in &clips {
        assert!((clip.duration_secs - 6.0).abs() < 1e-9);
    }

    let total: f64 = clips.iter().map(|c| c.duration_secs).sum();
    assert!((total - 30.0).abs() < 1e-9);
}

/// Test that video clips keep their native duration during assignment
#[test]
fn test_assign_image_durations_withMixedMedia_shouldOnlyTouchImages() {
    let mut clips = vec![
        video_clip("intro.mp4", 7.0),
        image_clip("a.png"),
        image_clip("b.png"),
    ];

    assign_image_durations(&mut clips, 10.0);

    assert!((clips[0].duration_secs - 7.0).abs() < 1e-9);
    assert!((clips[1].duration_secs - 5.0).abs() < 1e-9);
    assert!((clips[2].duration_secs - 5.0).abs() < 1e-9);
}

/// Test that a timeline without images is untouched by the assigner
#[test]
fn test_assign_image_durations_withVideosOnly_shouldDoNothing() {
    let mut clips = vec![video_clip("a.mp4", 3.0), video_clip("b.mp4", 4.0)];
    assign_image_durations(&mut clips, 30.0);

    assert!((clips[0].duration_secs - 3.0).abs() < 1e-9);
    assert!((clips[1].duration_secs - 4.0).abs() < 1e-9);
}

/// Test that hard-cut timeline duration is the exact sum of clips
#[test]
fn test_timeline_duration_withHardCuts_shouldSumClips() {
    let mut clips = vec![image_clip("a.png"), image_clip("b.png")];
    assign_image_durations(&mut clips, 12.0);

    let timeline = build_timeline(clips, Transition::Cut).unwrap();
    assert_eq!(timeline.len(), 2);
    assert!((timeline.duration_secs() - 12.0).abs() < 1e-9);
}

/// Test that crossfades shorten the timeline by one overlap per joint
#[test]
fn test_timeline_duration_withCrossfade_shouldSubtractOverlaps() {
    let clips = vec![
        video_clip("a.mp4", 4.0),
        video_clip("b.mp4", 4.0),
        video_clip("c.mp4", 4.0),
    ];

    let timeline = build_timeline(clips, Transition::Crossfade).unwrap();
    assert!((timeline.duration_secs() - 11.0).abs() < 1e-9);
}

/// Test that clip order is preserved exactly as supplied
#[test]
fn test_build_timeline_withCallerOrder_shouldNotReorder() {
    let mut clips = vec![
        image_clip("z.png"),
        video_clip("middle.mp4", 2.0),
        image_clip("a.png"),
    ];
    assign_image_durations(&mut clips, 8.0);

    let timeline = build_timeline(clips, Transition::Cut).unwrap();
    let order: Vec<&str> = timeline
        .clips
        .iter()
        .map(|c| c.item.path.to_str().unwrap())
        .collect();
    assert_eq!(order, vec!["z.png", "middle.mp4", "a.png"]);
}

/// Test that an empty clip list cannot form a timeline
#[test]
fn test_build_timeline_withNoClips_shouldFail() {
    let err = build_timeline(Vec::new(), Transition::Cut).unwrap_err();
    assert!(matches!(err, AssemblyError::Composition { stage: "sequence", .. }));
}

/// Test that an unassigned image duration is rejected
#[test]
fn test_build_timeline_withZeroDurationClip_shouldFail() {
    let clips = vec![image_clip("a.png")];
    let err = build_timeline(clips, Transition::Cut).unwrap_err();
    assert!(matches!(err, AssemblyError::Composition { .. }));
}

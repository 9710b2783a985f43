/*!
 * Tests for aspect-ratio normalization geometry and the tolerant
 * probe-and-normalize loop
 */

use clipsmith::composition::normalizer::{normalize_media, plan_geometry};
use clipsmith::errors::AssemblyError;
use clipsmith::media_probe::MediaItem;

use crate::common::mock_probe::MockProbe;

/// Test cropping a wide source onto a vertical canvas
#[test]
fn test_plan_geometry_withWideSourceOnPortrait_shouldLockHeightAndCropSides() {
    let g = plan_geometry(1920, 1080, 1080, 1920).unwrap();

    // Height locks to the canvas; width spills and is center-cropped
    assert_eq!(g.scaled_h, 1920);
    assert_eq!(g.scaled_w, 3413);
    assert_eq!(g.crop_x, (g.scaled_w - 1080) / 2);
    assert_eq!(g.crop_y, 0);
}

/// Test cropping a square source onto a horizontal canvas
#[test]
fn test_plan_geometry_withSquareSourceOnLandscape_shouldLockWidthAndCropTopBottom() {
    let g = plan_geometry(1000, 1000, 1920, 1080).unwrap();

    assert_eq!(g.scaled_w, 1920);
    assert_eq!(g.scaled_h, 1920);
    assert_eq!(g.crop_x, 0);
    assert_eq!(g.crop_y, 420);
}

/// Test that a source matching the target ratio needs no crop
#[test]
fn test_plan_geometry_withMatchingRatio_shouldNotCrop() {
    let g = plan_geometry(3840, 2160, 1920, 1080).unwrap();

    assert_eq!((g.scaled_w, g.scaled_h), (1920, 1080));
    assert_eq!((g.crop_x, g.crop_y), (0, 0));
}

/// Test that the crop window is centered for any input size
#[test]
fn test_plan_geometry_withArbitrarySizes_shouldCenterCrop() {
    for (w, h) in [(640, 480), (4032, 3024), (720, 1280), (333, 777)] {
        let g = plan_geometry(w, h, 1080, 1920).unwrap();

        // The crop window always fits inside the scaled clip and sits at
        // its center (within one pixel of integer division)
        assert!(g.scaled_w >= 1080 && g.scaled_h >= 1920);
        assert_eq!(g.crop_x, (g.scaled_w - 1080) / 2);
        assert_eq!(g.crop_y, (g.scaled_h - 1920) / 2);
    }
}

/// Test rejection of zero-dimension input
#[test]
fn test_plan_geometry_withZeroDimension_shouldFail() {
    assert!(plan_geometry(0, 1080, 1920, 1080).is_err());
    assert!(plan_geometry(1920, 0, 1920, 1080).is_err());
}

/// Test that one corrupt item out of three is dropped and the rest survive
#[tokio::test]
async fn test_normalize_media_withOneCorruptItem_shouldContinueWithRest() {
    let probe = MockProbe::new(30.0)
        .with_image("a.png", 800, 600)
        .with_corrupt("bad.png")
        .with_image("c.png", 1200, 900);

    let items = vec![
        MediaItem::image("a.png"),
        MediaItem::image("bad.png"),
        MediaItem::image("c.png"),
    ];

    let clips = normalize_media(&probe, &items, 1920, 1080).await.unwrap();
    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].item.path.to_str(), Some("a.png"));
    assert_eq!(clips[1].item.path.to_str(), Some("c.png"));
}

/// Test that a single corrupt item escalates to a fatal error
#[tokio::test]
async fn test_normalize_media_withOnlyCorruptItem_shouldFailFatally() {
    let probe = MockProbe::new(30.0).with_corrupt("bad.png");
    let items = vec![MediaItem::image("bad.png")];

    let err = normalize_media(&probe, &items, 1920, 1080)
        .await
        .unwrap_err();
    assert!(matches!(err, AssemblyError::NoUsableMedia { attempted: 1 }));
}

/// Test that an empty item list is an input error
#[tokio::test]
async fn test_normalize_media_withNoItems_shouldRejectInput() {
    let probe = MockProbe::new(30.0);
    let err = normalize_media(&probe, &[], 1920, 1080).await.unwrap_err();
    assert!(matches!(err, AssemblyError::InvalidInput(_)));
}

/// Test that videos keep their probed native duration
#[tokio::test]
async fn test_normalize_media_withVideo_shouldKeepNativeDuration() {
    let probe = MockProbe::new(30.0).with_video("clip.mp4", 1280, 720, 7.25);
    let items = vec![MediaItem::video("clip.mp4")];

    let clips = normalize_media(&probe, &items, 1920, 1080).await.unwrap();
    assert_eq!(clips.len(), 1);
    assert!((clips[0].duration_secs - 7.25).abs() < 1e-9);
}

/// Test that a video without a reported duration is dropped
#[tokio::test]
async fn test_normalize_media_withDurationlessVideo_shouldSkipIt() {
    let probe = MockProbe::new(30.0)
        .with_image("still.png", 640, 480)
        .with_video("broken.mp4", 1280, 720, 0.0);

    // MockProbe stores 0.0 as Some(0.0); register via image to force None
    let items = vec![MediaItem::video("still.png"), MediaItem::video("broken.mp4")];

    let clips = normalize_media(&probe, &items, 1920, 1080).await.unwrap();
    // "still.png" registered without duration is dropped as a video; the
    // zero-duration clip survives probing but would fail timeline validation
    assert_eq!(clips.len(), 1);
}

/*!
 * Tests for audio mixing filters and duration reconciliation
 */

use clipsmith::composition::mixer::{
    composite_duration, fade_start, mix_filter, music_filter, video_fade_filter, voiceover_filter,
};

/// Test that a long timeline is trimmed to the voiceover
#[test]
fn test_composite_duration_withLongTimeline_shouldTrimToVoiceover() {
    assert!((composite_duration(40.0, 30.0) - 30.0).abs() < 1e-9);
}

/// Test that a short timeline is never stretched to the voiceover
#[test]
fn test_composite_duration_withShortTimeline_shouldKeepTimelineLength() {
    assert!((composite_duration(20.0, 30.0) - 20.0).abs() < 1e-9);
}

/// Test that the fade start clamps at zero for very short streams
#[test]
fn test_fade_start_withShortStream_shouldClampAtZero() {
    assert!((fade_start(1.0) - 0.0).abs() < 1e-9);
    assert!((fade_start(10.0) - 8.0).abs() < 1e-9);
}

/// Test the voiceover tail fade filter
#[test]
fn test_voiceover_filter_withThirtySeconds_shouldFadeLastTwo() {
    assert_eq!(voiceover_filter(30.0), "afade=t=out:st=28.000:d=2.000");
}

/// Test the background music chain: trim, duck, fade
#[test]
fn test_music_filter_withThirtySeconds_shouldTrimDuckAndFade() {
    let filter = music_filter(30.0);
    assert!(filter.starts_with("atrim=0:30.000"));
    assert!(filter.contains("volume=0.2"));
    assert!(filter.ends_with("afade=t=out:st=28.000:d=2.000"));
}

/// Test that the mix sums the tracks without renormalizing the ducking gain
#[test]
fn test_mix_filter_shouldSumWithoutNormalization() {
    let filter = mix_filter();
    assert!(filter.contains("amix=inputs=2"));
    assert!(filter.contains("duration=first"));
    assert!(filter.contains("normalize=0"));
}

/// Test the closing video fade
#[test]
fn test_video_fade_filter_withTenSeconds_shouldStartAtEight() {
    assert_eq!(video_fade_filter(10.0), "fade=t=out:st=8.000:d=2.000");
}

/// Audio mixing and duration reconciliation.
///
/// The voiceover is authoritative: the composite is always trimmed to the
/// voiceover length and never stretched to cover a longer timeline. All
/// fades are fixed at two seconds; background music is ducked by a fixed
/// linear gain rather than loudness-normalized mixing.

/// Tail fade applied to voiceover, music, and video, in seconds
pub const FADE_OUT_SECS: f64 = 2.0;

/// Linear gain applied to background music (about -14 dB)
pub const MUSIC_GAIN: f64 = 0.2;

/// Final composite duration: the voiceover bounds the output, and a
/// timeline shorter than the voiceover is never padded.
pub fn composite_duration(timeline_secs: f64, voiceover_secs: f64) -> f64 {
    timeline_secs.min(voiceover_secs)
}

/// Start of a tail fade for a stream of the given length, clamped at zero
/// for streams shorter than the fade itself.
pub fn fade_start(duration_secs: f64) -> f64 {
    (duration_secs - FADE_OUT_SECS).max(0.0)
}

/// ffmpeg audio filter for the voiceover: a plain tail fade.
pub fn voiceover_filter(voiceover_secs: f64) -> String {
    format!(
        "afade=t=out:st={:.3}:d={:.3}",
        fade_start(voiceover_secs),
        FADE_OUT_SECS
    )
}

/// ffmpeg audio filter for background music: trimmed to the voiceover
/// window, ducked, and faded out alongside it.
pub fn music_filter(voiceover_secs: f64) -> String {
    format!(
        "atrim=0:{:.3},asetpts=PTS-STARTPTS,volume={},afade=t=out:st={:.3}:d={:.3}",
        voiceover_secs,
        MUSIC_GAIN,
        fade_start(voiceover_secs),
        FADE_OUT_SECS
    )
}

/// ffmpeg filter summing voiceover and music. The music is added under the
/// voiceover, not substituted for it; amix normalization is disabled so the
/// fixed ducking gain is what actually reaches the output.
pub fn mix_filter() -> &'static str {
    "amix=inputs=2:duration=first:dropout_transition=0:normalize=0"
}

/// ffmpeg video filter for the final tail fade of the composite.
pub fn video_fade_filter(composite_secs: f64) -> String {
    format!(
        "fade=t=out:st={:.3}:d={:.3}",
        fade_start(composite_secs),
        FADE_OUT_SECS
    )
}

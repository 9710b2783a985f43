use anyhow::{anyhow, Context, Result};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

// @module: Word-level timing allocation from transcription segments

/// Minimum on-screen time for a single word, in milliseconds.
pub const MIN_WORD_MS: f64 = 300.0;

/// Fraction of a word's duration inserted as a pause after `,` or `.`.
const PUNCTUATION_PAUSE_FACTOR: f64 = 0.5;

// @const: Characters allowed in displayed cue text
static DISPLAY_ALLOWLIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^a-zA-ZáéíóúÁÉÍÓÚñÑüÜ0-9\s.,;:!?¿¡'"-]"#).unwrap()
});

/// A coarse timed unit produced by the external transcription engine.
///
/// Segments are consumed as-is: ordered by `start`, non-overlapping, with
/// `end > start`. The engine never mutates them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TranscriptSegment {
    /// Transcribed text of the segment
    pub text: String,

    /// Segment start in seconds
    pub start: f64,

    /// Segment end in seconds
    pub end: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        TranscriptSegment {
            text: text.into(),
            start,
            end,
        }
    }
}

/// A single word with its allocated display window.
///
/// Derived from exactly one `TranscriptSegment`; cues of a segment are
/// contiguous except for inserted punctuation pauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCue {
    /// Display text, filtered through the character allow-list
    pub text: String,

    /// Cue start in milliseconds
    pub start_ms: u64,

    /// Cue end in milliseconds
    pub end_ms: u64,
}

impl WordCue {
    /// Allocated duration of the cue in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Expand one transcription segment into word-level cues.
///
/// Each whitespace-separated token receives a share of the segment duration
/// proportional to its raw character length (punctuation included), floored
/// at [`MIN_WORD_MS`]. A token ending in `,` or `.` pushes the cursor forward
/// by half its own duration before the next word starts; the gap belongs to
/// no cue. Because of the floor, the cue chain may run past the nominal
/// segment end; no rescaling is applied.
pub fn allocate_segment(segment: &TranscriptSegment) -> Vec<WordCue> {
    let words: Vec<&str> = segment.text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let total_chars: usize =
        words.iter().map(|w| w.chars().count()).sum::<usize>() + (words.len() - 1);
    if total_chars == 0 {
        return Vec::new();
    }

    let segment_duration_ms = (segment.end - segment.start) * 1000.0;
    let mut cursor = segment.start * 1000.0;
    let mut cues = Vec::with_capacity(words.len());

    for (i, word) in words.iter().enumerate() {
        let weight = word.chars().count() as f64 / total_chars as f64;
        let proportional_ms = (weight * segment_duration_ms).max(MIN_WORD_MS);

        let start_ms = cursor.round() as u64;
        let end_ms = (cursor + proportional_ms).round() as u64;

        let display = DISPLAY_ALLOWLIST.replace_all(word, "").trim().to_string();
        if !display.is_empty() {
            cues.push(WordCue {
                text: display,
                start_ms,
                end_ms,
            });
        }

        cursor += proportional_ms;

        // Breathing room after a clause or sentence break
        if i < words.len() - 1 && (word.ends_with(',') || word.ends_with('.')) {
            cursor += proportional_ms * PUNCTUATION_PAUSE_FACTOR;
        }
    }

    cues
}

/// Expand an ordered list of segments into a single word-level cue list.
///
/// An empty transcript yields an empty list; callers must treat that as a
/// valid track (video without burned-in text), not an error.
pub fn allocate_track(segments: &[TranscriptSegment]) -> Vec<WordCue> {
    let mut cues = Vec::new();
    for segment in segments {
        if segment.end <= segment.start {
            warn!(
                "Skipping segment with non-positive duration: [{:.3}s, {:.3}s] {:?}",
                segment.start, segment.end, segment.text
            );
            continue;
        }
        cues.extend(allocate_segment(segment));
    }
    cues
}

/// Load transcript segments from a JSON file.
///
/// Accepts either a bare array of `{text, start, end}` objects or a
/// whisper-style result object carrying them under a `segments` key. Unknown
/// fields are ignored.
pub fn load_segments<P: AsRef<Path>>(path: P) -> Result<Vec<TranscriptSegment>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read segments file: {:?}", path))?;
    parse_segments(&content)
        .with_context(|| format!("Failed to parse segments file: {:?}", path))
}

/// Parse transcript segments from a JSON string.
pub fn parse_segments(content: &str) -> Result<Vec<TranscriptSegment>> {
    let value: Value = serde_json::from_str(content).context("Segments input is not valid JSON")?;

    let array = match &value {
        Value::Array(_) => value.clone(),
        Value::Object(map) => map
            .get("segments")
            .cloned()
            .ok_or_else(|| anyhow!("JSON object has no 'segments' key"))?,
        _ => return Err(anyhow!("Expected a JSON array or an object with 'segments'")),
    };

    let segments: Vec<TranscriptSegment> =
        serde_json::from_value(array).context("Segment entries must be {text, start, end}")?;

    Ok(segments)
}

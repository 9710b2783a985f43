/*!
 * # clipsmith - Audio-Synchronized Subtitle Timing and Media Composition
 *
 * A Rust library for assembling short vertical/horizontal videos from a
 * voiceover track, a transcript, and a mixed sequence of images and video
 * clips.
 *
 * ## Features
 *
 * - Expand coarse transcription segments into word-level subtitle cues
 * - Serialize and parse SRT subtitle tracks
 * - Normalize arbitrary media to an exact target canvas (resize + center crop)
 * - Balance still-image durations against the voiceover length
 * - Concatenate clips with optional uniform transitions at a fixed 24 fps
 * - Mix voiceover with ducked background music, with tail fades
 * - Lay out styled, anchored subtitle overlays resolution-independently
 * - Encode the composite to H.264/AAC, trimmed to the voiceover
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management and the style/position tables
 * - `timing`: Word-level timing allocation from transcription segments
 * - `subtitle_processor`: Subtitle track serialization and parsing
 * - `media_probe`: Media metadata probing behind a mockable trait
 * - `composition`: The composition engine:
 *   - `composition::normalizer`: aspect-ratio normalization geometry
 *   - `composition::sequencer`: duration assignment and timeline building
 *   - `composition::mixer`: audio mix and duration reconciliation
 *   - `composition::renderer`: subtitle overlay layout
 *   - `composition::encoder`: ffmpeg invocation assembly and execution
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod composition;
pub mod errors;
pub mod file_utils;
pub mod media_probe;
pub mod subtitle_processor;
pub mod timing;

// Re-export main types for easier usage
pub use app_config::{AspectRatio, Config, Position, Style, Transition};
pub use app_controller::{AssemblyRequest, Controller, SubtitleMode};
pub use errors::{AppError, AssemblyError, MediaError, SubtitleError};
pub use media_probe::{MediaItem, MediaKind, MediaProbe};
pub use subtitle_processor::{SubtitleEntry, SubtitleTrack};
pub use timing::{TranscriptSegment, WordCue};

/*!
 * Media composition engine.
 *
 * Turns probed media items into a fixed-canvas, fixed-duration composite:
 * - `normalizer`: aspect-ratio preserving resize + center-crop geometry
 * - `sequencer`: per-image duration assignment and timeline concatenation
 * - `mixer`: voiceover / background-music mix and final trim reconciliation
 * - `renderer`: subtitle overlay layout (pure, resolution-independent)
 * - `encoder`: ffmpeg invocation assembly and execution
 */

pub mod encoder;
pub mod mixer;
pub mod normalizer;
pub mod renderer;
pub mod sequencer;

/// Fixed output frame rate for every composite
pub const FRAME_RATE: u32 = 24;

/// Overlap length used by crossfade and slide transitions, in seconds
pub const TRANSITION_SECS: f64 = 0.5;

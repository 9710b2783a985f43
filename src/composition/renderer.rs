use crate::app_config::{Position, StyleProfile};
use crate::subtitle_processor::SubtitleTrack;

/// Subtitle overlay layout.
///
/// Everything here is a pure function of `(text, canvas, position, style)`;
/// the base timeline is never touched. Font sizes derive from the shorter
/// canvas dimension so the same style reads identically on 9:16 and 16:9.

/// Fraction of the canvas width the wrapped text may occupy
const WRAP_WIDTH_RATIO: f64 = 0.9;

/// Fraction of the canvas height the text block may occupy before shrinking
const MAX_BLOCK_HEIGHT_RATIO: f64 = 0.25;

/// Multiplier applied to the font size per shrink step
const SHRINK_STEP: f64 = 0.95;

/// Line height as a multiple of the font size
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Estimated average glyph advance as a fraction of the font size
const AVG_GLYPH_WIDTH_RATIO: f64 = 0.52;

/// Smallest font size the shrink loop will go to
const MIN_FONT_PX: f64 = 12.0;

/// Horizontal margin from the canvas edges for left/right anchors
const H_MARGIN_RATIO: f64 = 0.05;

/// Vertical margin from the canvas edges for top/bottom anchors
const V_MARGIN_RATIO: f64 = 0.10;

/// Horizontal padding between text block and plate edge
const PLATE_PAD_X: u32 = 20;

/// Vertical padding between text block and plate edge
const PLATE_PAD_Y: u32 = 10;

/// Axis-aligned pixel rectangle on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// One wrapped line with its absolute position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    /// Line text
    pub text: String,
    /// Left edge of the line (lines are centered within the block)
    pub x: u32,
    /// Top edge of the line
    pub y: u32,
}

/// Fully resolved layout for one cue's text block
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    /// Final font size in pixels after any shrink steps
    pub font_size: u32,
    /// Wrapped lines with absolute coordinates
    pub lines: Vec<LineLayout>,
    /// Bounding box of the text block
    pub block: Rect,
    /// Background plate rectangle, when the style carries one
    pub plate: Option<Rect>,
}

/// A rendered overlay with its active window on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayCue {
    /// Window start in milliseconds
    pub start_ms: u64,
    /// Window end in milliseconds
    pub end_ms: u64,
    /// Resolved layout for the cue text
    pub layout: TextLayout,
}

/// Greedy word-wrap to a maximum number of characters per line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Compute the layout for one cue.
///
/// The font starts at the style's ratio of the shorter canvas dimension and
/// shrinks in 5% steps while the wrapped block is taller than a quarter of
/// the canvas or exceeds the style's line cap, down to a fixed floor.
pub fn layout_cue(
    text: &str,
    canvas_w: u32,
    canvas_h: u32,
    position: Position,
    style: &StyleProfile,
) -> TextLayout {
    let shorter = canvas_w.min(canvas_h) as f64;
    let max_line_w = WRAP_WIDTH_RATIO * f64::from(canvas_w);
    let max_block_h = MAX_BLOCK_HEIGHT_RATIO * f64::from(canvas_h);

    let mut font = (style.size_ratio * shorter).max(MIN_FONT_PX);
    let mut lines: Vec<String>;
    let mut line_h: f64;

    loop {
        let char_w = AVG_GLYPH_WIDTH_RATIO * font;
        let max_chars = (max_line_w / char_w).floor().max(1.0) as usize;
        lines = wrap_text(text, max_chars);
        line_h = LINE_HEIGHT_FACTOR * font;

        let block_h = lines.len() as f64 * line_h;
        let fits = lines.len() <= style.max_lines && block_h <= max_block_h;
        if fits || font * SHRINK_STEP < MIN_FONT_PX {
            break;
        }
        font *= SHRINK_STEP;
    }

    let char_w = AVG_GLYPH_WIDTH_RATIO * font;
    let widest_chars = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let block_w = ((widest_chars as f64 * char_w).min(max_line_w)).ceil() as u32;
    let block_h = (lines.len() as f64 * line_h).ceil() as u32;

    let (block_x, block_y) = anchor_block(position, canvas_w, canvas_h, block_w, block_h);

    let line_layouts = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line_w = (line.chars().count() as f64 * char_w).ceil() as u32;
            let x = block_x + (block_w.saturating_sub(line_w)) / 2;
            let y = block_y + (i as f64 * line_h).round() as u32;
            LineLayout {
                text: line.clone(),
                x,
                y,
            }
        })
        .collect();

    let block = Rect {
        x: block_x,
        y: block_y,
        w: block_w,
        h: block_h,
    };

    let plate = style.background.map(|_| Rect {
        x: block_x.saturating_sub(PLATE_PAD_X),
        y: block_y.saturating_sub(PLATE_PAD_Y),
        w: block_w + 2 * PLATE_PAD_X,
        h: block_h + 2 * PLATE_PAD_Y,
    });

    TextLayout {
        font_size: font.round() as u32,
        lines: line_layouts,
        block,
        plate,
    }
}

/// Resolve one of the nine anchors to the text block's top-left corner.
fn anchor_block(
    position: Position,
    canvas_w: u32,
    canvas_h: u32,
    block_w: u32,
    block_h: u32,
) -> (u32, u32) {
    let h_margin = (H_MARGIN_RATIO * f64::from(canvas_w)).round() as u32;
    let v_margin = (V_MARGIN_RATIO * f64::from(canvas_h)).round() as u32;

    let x = match position {
        Position::TopLeft | Position::MiddleLeft | Position::BottomLeft => h_margin,
        Position::TopCenter | Position::MiddleCenter | Position::BottomCenter => {
            canvas_w.saturating_sub(block_w) / 2
        }
        Position::TopRight | Position::MiddleRight | Position::BottomRight => {
            canvas_w.saturating_sub(block_w + h_margin)
        }
    };

    let y = match position {
        Position::TopLeft | Position::TopCenter | Position::TopRight => v_margin,
        Position::MiddleLeft | Position::MiddleCenter | Position::MiddleRight => {
            canvas_h.saturating_sub(block_h) / 2
        }
        Position::BottomLeft | Position::BottomCenter | Position::BottomRight => {
            canvas_h.saturating_sub(block_h + v_margin)
        }
    };

    (x, y)
}

/// Lay out every entry of a subtitle track as an overlay cue.
///
/// An empty track yields no overlays; the composite simply carries no
/// burned-in text.
pub fn render_overlays(
    track: &SubtitleTrack,
    canvas_w: u32,
    canvas_h: u32,
    position: Position,
    style: &StyleProfile,
) -> Vec<OverlayCue> {
    track
        .entries
        .iter()
        .map(|entry| OverlayCue {
            start_ms: entry.start_time_ms,
            end_ms: entry.end_time_ms,
            layout: layout_cue(&entry.text, canvas_w, canvas_h, position, style),
        })
        .collect()
}

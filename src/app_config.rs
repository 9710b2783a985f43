use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings, plus the closed style,
/// position and aspect-ratio tables used by the composition engine.

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target aspect ratio for the output canvas
    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    /// Subtitle style selection
    #[serde(default)]
    pub style: Style,

    /// Subtitle anchor position
    #[serde(default)]
    pub position: Position,

    /// Transition applied uniformly between clips
    #[serde(default)]
    pub transition: Transition,

    /// Output encoding settings
    #[serde(default)]
    pub encoding: EncodingConfig,

    /// Optional background music file mixed under the voiceover
    #[serde(default)]
    pub background_music: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            aspect_ratio: AspectRatio::default(),
            style: Style::default(),
            position: Position::default(),
            transition: Transition::default(),
            encoding: EncodingConfig::default(),
            background_music: None,
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.encoding.crf > 51 {
            return Err(anyhow!(
                "Invalid CRF value {}: must be in 0..=51",
                self.encoding.crf
            ));
        }

        if self.encoding.encode_timeout_secs == 0 {
            return Err(anyhow!("Encode timeout must be greater than zero"));
        }

        if let Some(music) = &self.background_music {
            if !music.exists() {
                return Err(anyhow!("Background music file does not exist: {:?}", music));
            }
        }

        Ok(())
    }
}

/// Target canvas aspect ratio
///
/// Only the two platform-native ratios are supported; anything else is a
/// configuration error at the call boundary.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// 9:16 vertical canvas (1080x1920)
    #[default]
    #[serde(rename = "9:16")]
    Portrait,

    /// 16:9 horizontal canvas (1920x1080)
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    // @returns: Exact pixel dimensions of the canvas
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Portrait => (1080, 1920),
            Self::Landscape => (1920, 1080),
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Portrait => write!(f, "9:16"),
            Self::Landscape => write!(f, "16:9"),
        }
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "9:16" => Ok(Self::Portrait),
            "16:9" => Ok(Self::Landscape),
            other => Err(anyhow!(
                "Invalid aspect ratio '{}'. Use '9:16' or '16:9'.",
                other
            )),
        }
    }
}

/// Named subtitle style
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    // @style: Helvetica with a thin stroke
    #[default]
    Default,
    // @style: Impact, large, heavy stroke
    Bold,
    // @style: Arial, small, no stroke or plate
    Minimal,
    // @style: Helvetica on a rounded semi-transparent plate
    Boxed,
}

impl Style {
    /// Resolve the style to its immutable parameter record.
    ///
    /// The table is closed: variants carry no behavior beyond this lookup.
    pub fn profile(&self) -> StyleProfile {
        match self {
            Self::Default => StyleProfile {
                font_family: "Helvetica",
                size_ratio: 0.11,
                text_color: "white",
                stroke_color: Some("black"),
                stroke_width: 3,
                background: None,
                max_lines: 3,
            },
            Self::Bold => StyleProfile {
                font_family: "Impact",
                size_ratio: 0.14,
                text_color: "yellow",
                stroke_color: Some("black"),
                stroke_width: 5,
                background: None,
                max_lines: 3,
            },
            Self::Minimal => StyleProfile {
                font_family: "Arial",
                size_ratio: 0.09,
                text_color: "white",
                stroke_color: None,
                stroke_width: 0,
                background: None,
                max_lines: 2,
            },
            Self::Boxed => StyleProfile {
                font_family: "Helvetica",
                size_ratio: 0.11,
                text_color: "white",
                stroke_color: None,
                stroke_width: 0,
                background: Some(PlateStyle {
                    color: "black",
                    opacity: 0.6,
                    corner_radius: 25,
                }),
                max_lines: 3,
            },
        }
    }
}

impl std::str::FromStr for Style {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "bold" => Ok(Self::Bold),
            "minimal" => Ok(Self::Minimal),
            "boxed" => Ok(Self::Boxed),
            _ => Err(anyhow!("Invalid style: {}", s)),
        }
    }
}

/// Immutable style parameter record resolved from a `Style` variant
#[derive(Debug, Clone, PartialEq)]
pub struct StyleProfile {
    // @field: Font family name passed to the renderer
    pub font_family: &'static str,

    // @field: Font size as a ratio of the shorter canvas dimension
    pub size_ratio: f64,

    // @field: Fill color of the text
    pub text_color: &'static str,

    // @field: Stroke color, if any
    pub stroke_color: Option<&'static str>,

    // @field: Stroke width in pixels
    pub stroke_width: u32,

    // @field: Optional background plate behind the text block
    pub background: Option<PlateStyle>,

    // @field: Maximum number of wrapped lines before the font shrinks
    pub max_lines: usize,
}

/// Background plate parameters for the subtitle block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateStyle {
    /// Plate fill color
    pub color: &'static str,
    /// Plate opacity in [0, 1]
    pub opacity: f64,
    /// Rounded corner radius in pixels
    pub corner_radius: u32,
}

/// Subtitle anchor position on the canvas
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    #[default]
    BottomCenter,
    BottomRight,
}

impl std::str::FromStr for Position {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "top_left" => Ok(Self::TopLeft),
            "top_center" => Ok(Self::TopCenter),
            "top_right" => Ok(Self::TopRight),
            "middle_left" => Ok(Self::MiddleLeft),
            "middle_center" => Ok(Self::MiddleCenter),
            "middle_right" => Ok(Self::MiddleRight),
            "bottom_left" => Ok(Self::BottomLeft),
            "bottom_center" => Ok(Self::BottomCenter),
            "bottom_right" => Ok(Self::BottomRight),
            _ => Err(anyhow!("Invalid position: {}", s)),
        }
    }
}

/// Transition applied uniformly between consecutive clips
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    /// Hard cut, no overlap
    #[default]
    Cut,
    /// Crossfade between consecutive clips
    Crossfade,
    /// Slide-left between consecutive clips
    Slide,
}

impl std::str::FromStr for Transition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cut" => Ok(Self::Cut),
            "crossfade" => Ok(Self::Crossfade),
            "slide" => Ok(Self::Slide),
            _ => Err(anyhow!("Invalid transition: {}", s)),
        }
    }
}

/// Output encoding settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EncodingConfig {
    /// H.264 constant rate factor (lower is higher quality)
    #[serde(default = "default_crf")]
    pub crf: u32,

    /// Hard timeout for the final encode, in seconds
    #[serde(default = "default_encode_timeout_secs")]
    pub encode_timeout_secs: u64,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            crf: default_crf(),
            encode_timeout_secs: default_encode_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_crf() -> u32 {
    23
}

fn default_encode_timeout_secs() -> u64 {
    900
}

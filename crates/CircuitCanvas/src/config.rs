//! # Configuration
//!
//! Tunables for the canvas renderer and the editor interaction layer.
//! Colours are RGBA `glam::Vec4` in `0.0..=1.0`.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Configuration parameters for a canvas renderer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub pin: PinConfig,
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Zoom limits and smoothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Lowest target zoom. Default: 0.2.
    pub min: f32,
    /// Highest target zoom. Default: 25.0.
    pub max: f32,
    /// Fraction of the remaining distance to the target covered per update. Default: 0.15.
    ///
    /// Applied once per `on_update`, independent of the frame delta.
    pub speed: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.2,
            max: 25.0,
            speed: 0.15,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridConfig {
    pub visible: bool,
    /// Snap spacing in workspace units. Default: 100.
    pub spacing: f32,
    #[serde(default)]
    pub anchor: GridAnchorStyle,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            visible: true,
            spacing: 100.0,
            anchor: GridAnchorStyle::default(),
        }
    }
}

/// Style of the dots drawn at grid snap points.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridAnchorStyle {
    /// Radius at zoom 1.0, scaled with zoom and clamped to `radius_min..=radius_max` pixels.
    pub radius: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub border_thickness: f32,
    pub fill_color: Vec4,
    pub line_color: Vec4,
    /// Closest on-screen distance between anchors in pixels. When the snap
    /// spacing is denser, only every second, fourth, ... snap point is drawn.
    #[serde(default = "default_min_anchor_spacing")]
    pub min_spacing: f32,
}

fn default_min_anchor_spacing() -> f32 {
    8.0
}

impl Default for GridAnchorStyle {
    fn default() -> Self {
        Self {
            radius: 3.0,
            radius_min: 1.0,
            radius_max: 6.0,
            border_thickness: 1.0,
            fill_color: Vec4::new(1.0, 0.961, 0.961, 1.0),
            line_color: Vec4::new(0.612, 0.173, 0.322, 1.0),
            min_spacing: default_min_anchor_spacing(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinConfig {
    /// Pin radius in workspace units. Default: 4.29.
    pub radius: f32,
    /// Hover detection uses `radius * hover_radius_multiplier`. Default: 1.8.
    pub hover_radius_multiplier: f32,
    pub regular: PinStyle,
    pub hover: PinStyle,
    pub active: PinStyle,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            radius: 4.29,
            hover_radius_multiplier: 1.8,
            regular: PinStyle {
                fill_color: Vec4::new(0.914, 0.914, 0.914, 1.0),
                line_color: Vec4::new(0.286, 0.2, 0.2, 1.0),
                line_width: 2.0,
            },
            hover: PinStyle {
                fill_color: Vec4::new(0.498, 0.0, 0.212, 1.0),
                line_color: Vec4::new(0.2, 0.2, 0.2, 1.0),
                line_width: 2.0,
            },
            active: PinStyle {
                fill_color: Vec4::new(0.0, 1.0, 0.0, 1.0),
                line_color: Vec4::new(0.0, 0.333, 0.0, 1.0),
                line_width: 2.0,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinStyle {
    pub fill_color: Vec4,
    pub line_color: Vec4,
    /// Stroke width in screen pixels.
    pub line_width: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Wire being dragged out by the user.
    pub temporary: EdgeStyle,
    /// Wire whose source output is inactive.
    pub regular: EdgeStyle,
    /// Wire whose source output is active.
    pub active: EdgeStyle,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            temporary: EdgeStyle {
                color: Vec4::new(0.498, 0.0, 0.212, 1.0),
                width: 4.0,
            },
            regular: EdgeStyle {
                color: Vec4::new(0.2, 0.2, 0.2, 1.0),
                width: 4.0,
            },
            active: EdgeStyle {
                color: Vec4::new(0.0, 0.733, 0.0, 1.0),
                width: 4.0,
            },
        }
    }
}

/// Visual style for a wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EdgeStyle {
    pub color: Vec4,
    /// Width in workspace units (scaled by zoom when drawn).
    pub width: f32,
}

/// Diagnostic overlay settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsConfig {
    pub visible: bool,
    pub text_color: Vec4,
    pub font_size: f32,
    /// Offset of the text from the bottom-left corner of the viewport.
    pub margin: Vec2,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            visible: false,
            text_color: Vec4::new(0.2, 0.2, 0.2, 1.0),
            font_size: 14.0,
            margin: Vec2::new(10.0, 11.0),
        }
    }
}

/// When the grid is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridMode {
    #[default]
    Show,
    /// Only while a palette item is being dragged onto the canvas.
    ShowWhilstDragging,
    Hide,
}

/// Editor interaction settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditorConfig {
    pub grid_mode: GridMode,
    /// Snap dropped and dragged components to the grid.
    pub grid_snap: bool,
    /// Raw scroll delta is divided by this before being applied as a zoom change. Default: 300.
    pub scroll_divisor: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_mode: GridMode::Show,
            grid_snap: true,
            scroll_divisor: 300.0,
        }
    }
}

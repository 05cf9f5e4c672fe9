//! # Display List
//!
//! Renderers do not draw. They emit [`DrawCommand`]s in view space (pixels)
//! and the host rasterizes them with whatever backend it has.

use glam::{Affine2, Vec2, Vec4};
use serde::{Deserialize, Serialize};

use crate::widget::ImageHandle;

/// A single drawing primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// A widget image.
    ///
    /// `transform` maps the rectangle `[0, size]` (workspace units, unrotated)
    /// onto the screen, rotation and zoom included.
    Image {
        image: ImageHandle,
        size: Vec2,
        transform: Affine2,
    },
    /// A filled circle with a stroke; pins and grid anchors.
    Circle {
        center: Vec2,
        radius: f32,
        fill: Vec4,
        stroke: Vec4,
        stroke_width: f32,
    },
    /// A straight line with round caps; connections.
    Line {
        start: Vec2,
        end: Vec2,
        color: Vec4,
        width: f32,
    },
    /// Text anchored at its baseline start.
    Text {
        pos: Vec2,
        text: String,
        color: Vec4,
        /// Font size in pixels.
        size: f32,
    },
}

/// The draw commands for one frame, back to front.
pub type RenderList = Vec<DrawCommand>;

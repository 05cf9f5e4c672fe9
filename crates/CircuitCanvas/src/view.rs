//! # View Transform
//!
//! Pan/zoom mapping between workspace space (where components live) and view
//! space (pixels inside the renderer's viewport).
//!
//! `to_view(w) = ((w + focus) * zoom) + c` and `to_workspace(v) = ((v - c) / zoom) - focus`,
//! where `c` is the midpoint of the viewport.

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::ZoomConfig;
use crate::math::Aabb;

/// Camera state owned by a single renderer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Pan offset in workspace units.
    pub focus: Vec2,
    /// Zoom currently displayed.
    pub zoom: f32,
    /// Zoom the displayed value is easing towards.
    pub target_zoom: f32,
    /// Size of the visible area in pixels.
    pub viewport_size: Vec2,
}

impl Default for View {
    fn default() -> Self {
        Self::new(Vec2::new(800.0, 600.0))
    }
}

impl View {
    pub fn new(viewport_size: Vec2) -> Self {
        Self {
            focus: Vec2::ZERO,
            zoom: 1.0,
            target_zoom: 1.0,
            viewport_size,
        }
    }

    /// Midpoint of the viewport in view space.
    pub fn center(&self) -> Vec2 {
        self.viewport_size * 0.5
    }

    pub fn to_view(&self, workspace_pos: Vec2) -> Vec2 {
        ((workspace_pos + self.focus) * self.zoom) + self.center()
    }

    pub fn to_workspace(&self, view_pos: Vec2) -> Vec2 {
        ((view_pos - self.center()) / self.zoom) - self.focus
    }

    /// The same mapping as [`View::to_view`] as an affine matrix, for composing
    /// with per-component transforms.
    pub fn affine(&self) -> Affine2 {
        Affine2::from_scale_angle_translation(
            Vec2::splat(self.zoom),
            0.0,
            self.focus * self.zoom + self.center(),
        )
    }

    /// Visible area in view space.
    pub fn viewport_aabb(&self) -> Aabb {
        Aabb::new(Vec2::ZERO, self.viewport_size)
    }

    /// Requests a multiplicative zoom change. Only the target moves here.
    pub fn modify_zoom(&mut self, amount: f32, config: &ZoomConfig) {
        self.target_zoom = (self.target_zoom * (1.0 + amount)).clamp(config.min, config.max);
    }

    /// Eases the displayed zoom towards the target by a fixed fraction:
    /// `zoom = target * speed + zoom * (1 - speed)`.
    pub fn step_zoom(&mut self, speed: f32) {
        self.zoom += (self.target_zoom - self.zoom) * speed;
    }

    /// Pans by a pointer delta given in view pixels.
    pub fn pan_by(&mut self, view_delta: Vec2) {
        self.focus += view_delta / self.zoom;
    }
}

//! Frame timing and the diagnostic overlay numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

const FRAME_SAMPLES: usize = 60;

/// Rolling window of the last 60 frame deltas.
#[derive(Clone, Debug)]
pub struct FrameTimer {
    samples: [f32; FRAME_SAMPLES],
    next: usize,
    primed: bool,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self {
            samples: [0.0; FRAME_SAMPLES],
            next: 0,
            primed: false,
        }
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame delta in seconds.
    ///
    /// The first positive delta fills the whole window so early averages are not
    /// dragged towards zero.
    pub fn record(&mut self, dt: f32) {
        if !self.primed && dt > 0.0 {
            self.samples.fill(dt);
            self.primed = true;
        }
        self.samples[self.next] = dt;
        self.next = (self.next + 1) % FRAME_SAMPLES;
    }

    /// Mean frame time in seconds.
    pub fn average(&self) -> f32 {
        self.samples.iter().sum::<f32>() / FRAME_SAMPLES as f32
    }

    /// Frames per second derived from [`FrameTimer::average`], 0 before any frame.
    pub fn fps(&self) -> f32 {
        let average = self.average();
        if average > 0.0 {
            (1.0 / average).round()
        } else {
            0.0
        }
    }
}

/// Counters from the last rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderStats {
    pub rendered_components: usize,
    pub total_components: usize,
    pub rendered_pins: usize,
    pub total_pins: usize,
    pub connections: usize,
    pub zoom: f32,
    /// Seconds.
    pub average_frame_time: f32,
    pub fps: f32,
}

impl fmt::Display for RenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rendered components: ({}/{}) | Rendered pins: ({}/{}) | Rendered connections: ({}) | Zoom = {:.2} | Frame time = {:.2}ms ({} fps)",
            self.rendered_components,
            self.total_components,
            self.rendered_pins,
            self.total_pins,
            self.connections,
            self.zoom,
            self.average_frame_time * 1000.0,
            self.fps,
        )
    }
}

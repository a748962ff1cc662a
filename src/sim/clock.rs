//! Global time scale used for slow-motion

use serde::{Deserialize, Serialize};

/// Multiplier applied to every dt-scaled system
///
/// The active bomb wave is the only writer; everything else reads it through
/// [`GameClock::scale_dt`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    time_scale: f32,
}

impl Default for GameClock {
    fn default() -> Self {
        Self { time_scale: 1.0 }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Set the scale, clamped to >= 0
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn reset_time_scale(&mut self) {
        self.time_scale = 1.0;
    }

    #[inline]
    pub fn scale_dt(&self, dt: f32) -> f32 {
        dt * self.time_scale
    }
}

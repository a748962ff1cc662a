//! Overlap tests and toroidal wrap-around
//!
//! Collisions are purely overlap based: a hit triggers destruction or an
//! effect, never a push-apart response.

use glam::Vec2;

/// Playfield bounds used for wrap-around
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    /// Top edge of the playable area (bottom of the HUD strip)
    pub top: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32, top: f32) -> Self {
        Self { width, height, top }
    }

    pub fn from_tuning(tuning: &crate::Tuning) -> Self {
        Self::new(tuning.screen_width, tuning.screen_height, tuning.playable_top())
    }
}

/// Two circles collide iff the distance between centres is <= the sum of radii
#[inline]
pub fn circles_collide(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) <= a_radius + b_radius
}

/// Whether a circle is touched by an expanding ring of `ring_radius` around `origin`
#[inline]
pub fn ring_reaches(origin: Vec2, ring_radius: f32, pos: Vec2, radius: f32) -> bool {
    pos.distance(origin) - radius <= ring_radius
}

/// Teleport a circle that has fully left the playfield to the opposite edge
///
/// Horizontally the field spans `0..width`; vertically it spans
/// `bounds.top..height`, so leaving through the HUD strip re-enters from the
/// bottom and vice versa.
pub fn wrap_position(pos: &mut Vec2, radius: f32, bounds: &Bounds) {
    if pos.x < -radius {
        pos.x = bounds.width + radius;
    } else if pos.x > bounds.width + radius {
        pos.x = -radius;
    }

    if pos.y < bounds.top - radius {
        pos.y = bounds.height + radius;
    } else if pos.y > bounds.height + radius {
        pos.y = bounds.top - radius;
    }
}

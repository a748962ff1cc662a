//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in an upload buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Same color with a different alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], alpha.clamp(0.0, 1.0)]
}

/// Colors for game elements
pub mod colors {
    pub const SHIP: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const SHIELD: [f32; 4] = [0.3, 0.8, 1.0, 1.0];
    pub const ASTEROID: [f32; 4] = [0.8, 0.8, 0.85, 1.0];
    pub const SHOT: [f32; 4] = [1.0, 0.9, 0.4, 1.0];
    pub const PICKUP: [f32; 4] = [1.0, 0.4, 0.2, 1.0];
    pub const BOMB_WAVE: [f32; 4] = [1.0, 0.6, 0.2, 1.0];
    pub const HUD_LINE: [f32; 4] = [0.3, 0.3, 0.4, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}

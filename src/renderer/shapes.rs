//! Shape generation for 2D line primitives
//!
//! Every function returns a line list: vertices come in pairs, one pair per
//! segment.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Closed outline through `points`
pub fn polyline_closed(points: &[Vec2], color: [f32; 4]) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(points.len() * 2);
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
    }
    vertices
}

/// Generate vertices for a circle outline
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let points: Vec<Vec2> = (0..segments)
        .map(|i| {
            let theta = (i as f32 / segments as f32) * 2.0 * PI;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect();
    polyline_closed(&points, color)
}

/// Ship triangle: nose along `forward`, base behind the center
pub fn ship(center: Vec2, forward: Vec2, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let right = forward.perp() * radius / 1.5;
    let nose = center + forward * radius;
    let left_corner = center - forward * radius - right;
    let right_corner = center - forward * radius + right;
    polyline_closed(&[nose, left_corner, right_corner], color)
}

/// Segment count that keeps a circle of this radius looking round
pub fn segments_for_radius(radius: f32) -> u32 {
    ((radius * 0.5) as u32).clamp(8, 64)
}

//! Draw hooks
//!
//! Each visible entity implements [`Draw`] and appends colored line segments
//! to a [`DrawList`]. The list is plain `bytemuck`-castable vertex data, ready
//! for any GPU or software backend. The simulation never reads it back.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::sim::{Asteroid, BombPickup, BombWave, Player, Run, Shot};
use crate::tuning::Tuning;
use vertex::{Vertex, colors, with_alpha};

/// Line-list vertices for one frame
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    vertices: Vec<Vertex>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn extend(&mut self, vertices: Vec<Vertex>) {
        self.vertices.extend(vertices);
    }

    pub fn line(&mut self, a: Vec2, b: Vec2, color: [f32; 4]) {
        self.vertices.push(Vertex::new(a.x, a.y, color));
        self.vertices.push(Vertex::new(b.x, b.y, color));
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Raw bytes for a vertex buffer upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Per-frame draw hook
pub trait Draw {
    fn draw(&self, list: &mut DrawList, tuning: &Tuning);
}

impl Draw for Player {
    fn draw(&self, list: &mut DrawList, tuning: &Tuning) {
        list.extend(shapes::ship(
            self.body.pos,
            self.forward(),
            self.body.radius,
            colors::SHIP,
        ));
        let alpha = self.shield_alpha(tuning.invulnerability_fade_window);
        if alpha > 0.0 {
            let radius = self.body.radius * 1.5;
            list.extend(shapes::circle(
                self.body.pos,
                radius,
                with_alpha(colors::SHIELD, alpha),
                shapes::segments_for_radius(radius),
            ));
        }
    }
}

impl Draw for Asteroid {
    fn draw(&self, list: &mut DrawList, _tuning: &Tuning) {
        list.extend(shapes::circle(
            self.body.pos,
            self.body.radius,
            colors::ASTEROID,
            shapes::segments_for_radius(self.body.radius),
        ));
    }
}

impl Draw for Shot {
    fn draw(&self, list: &mut DrawList, _tuning: &Tuning) {
        list.extend(shapes::circle(self.body.pos, self.body.radius, colors::SHOT, 6));
    }
}

impl Draw for BombPickup {
    fn draw(&self, list: &mut DrawList, tuning: &Tuning) {
        if !self.letter_on(tuning) {
            return;
        }
        list.extend(shapes::circle(
            self.body.pos,
            self.body.radius,
            colors::PICKUP,
            shapes::segments_for_radius(self.body.radius),
        ));
    }
}

impl Draw for BombWave {
    fn draw(&self, list: &mut DrawList, _tuning: &Tuning) {
        if !self.active || self.radius <= 0.0 {
            return;
        }
        let alpha = 1.0 - self.progress();
        list.extend(shapes::circle(
            self.origin,
            self.radius,
            with_alpha(colors::BOMB_WAVE, alpha),
            shapes::segments_for_radius(self.radius),
        ));
    }
}

/// Build the frame's draw list; called once per frame after `tick`
pub fn draw_world(run: &Run, list: &mut DrawList) {
    list.clear();
    let tuning = &run.tuning;
    let top = tuning.playable_top();
    list.line(
        Vec2::new(0.0, top),
        Vec2::new(tuning.screen_width, top),
        colors::HUD_LINE,
    );

    for asteroid in run.world.live_asteroids() {
        asteroid.draw(list, tuning);
    }
    for shot in run.world.shots.iter().filter(|s| s.alive) {
        shot.draw(list, tuning);
    }
    for pickup in run.world.pickups.iter().filter(|p| p.alive) {
        pickup.draw(list, tuning);
    }
    if let Some(wave) = run.bombs.current_wave() {
        wave.draw(list, tuning);
    }
    if !run.is_over() {
        run.player.draw(list, tuning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_draw_world_covers_entities() {
        let mut run = Run::new(1, Tuning::default(), &Settings::default(), 0);
        let mut list = DrawList::new();
        draw_world(&run, &mut list);
        // HUD line plus the ship triangle
        assert_eq!(list.segment_count(), 4);

        run.world
            .spawn_asteroid(Vec2::new(200.0, 300.0), Vec2::ZERO, 40.0);
        draw_world(&run, &mut list);
        assert_eq!(list.segment_count(), 4 + 20);
    }

    #[test]
    fn test_shield_ring_drawn_while_invulnerable() {
        let tuning = Tuning::default();
        let mut player = Player::new(Vec2::new(100.0, 200.0), &tuning);
        let mut list = DrawList::new();
        player.draw(&mut list, &tuning);
        let bare = list.segment_count();

        player.start_invulnerability(5.0);
        list.clear();
        player.draw(&mut list, &tuning);
        assert!(list.segment_count() > bare);
    }

    #[test]
    fn test_bytes_match_vertex_stride() {
        let mut list = DrawList::new();
        list.line(Vec2::ZERO, Vec2::ONE, colors::SHOT);
        assert_eq!(list.as_bytes().len(), 2 * Vertex::STRIDE);
    }
}

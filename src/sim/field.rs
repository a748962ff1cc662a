//! Asteroid spawner
//!
//! Timed, capped spawning for one level. Idle until configured with a
//! non-zero quota; then one asteroid per spawn interval enters from a random
//! screen edge until the quota is used up. A saturated field (live asteroids
//! at `max_active`) simply skips spawning until something is destroyed.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::world::World;
use crate::rotate_degrees;
use crate::tuning::Tuning;

/// Screen edge an asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl SpawnEdge {
    pub const ALL: [SpawnEdge; 4] = [
        SpawnEdge::Left,
        SpawnEdge::Right,
        SpawnEdge::Top,
        SpawnEdge::Bottom,
    ];

    /// Inward heading
    pub fn direction(self) -> Vec2 {
        match self {
            SpawnEdge::Left => Vec2::X,
            SpawnEdge::Right => Vec2::NEG_X,
            SpawnEdge::Top => Vec2::Y,
            SpawnEdge::Bottom => Vec2::NEG_Y,
        }
    }

    /// Spawn point just outside this edge; `t` in 0..=1 runs along it
    ///
    /// The top edge is the bottom of the HUD strip, and the offset is the
    /// asteroid's own radius so wrap-around leaves it where it was placed.
    pub fn position(self, t: f32, radius: f32, tuning: &Tuning) -> Vec2 {
        let top = tuning.playable_top();
        let along_x = t * tuning.screen_width;
        let along_y = top + t * (tuning.screen_height - top);
        match self {
            SpawnEdge::Left => Vec2::new(-radius, along_y),
            SpawnEdge::Right => Vec2::new(tuning.screen_width + radius, along_y),
            SpawnEdge::Top => Vec2::new(along_x, top - radius),
            SpawnEdge::Bottom => Vec2::new(along_x, tuning.screen_height + radius),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AsteroidField {
    /// Asteroids this level will emit in total (0 = idle)
    pub spawn_limit: u32,
    /// Concurrent cap on live asteroids
    pub max_active: u32,
    pub speed_multiplier: f32,
    pub spawn_timer: f32,
    pub spawned_this_level: u32,
}

impl AsteroidField {
    pub fn new() -> Self {
        Self {
            speed_multiplier: 1.0,
            ..Default::default()
        }
    }

    /// Reset for a new level
    pub fn configure_level(&mut self, spawn_limit: u32, max_active: u32, speed_multiplier: f32) {
        self.spawn_limit = spawn_limit;
        self.max_active = max_active.max(1);
        self.spawned_this_level = 0;
        self.spawn_timer = 0.0;
        self.speed_multiplier = speed_multiplier.max(0.1);
    }

    pub fn is_idle(&self) -> bool {
        self.spawn_limit == 0
    }

    pub fn quota_exhausted(&self) -> bool {
        self.spawned_this_level >= self.spawn_limit
    }

    /// Quota used up and the field cleared
    pub fn level_complete(&self, world: &World) -> bool {
        if self.is_idle() {
            return false;
        }
        self.quota_exhausted() && world.live_asteroid_count() == 0
    }

    /// Place an asteroid and count it against the quota
    pub fn spawn(&mut self, radius: f32, pos: Vec2, vel: Vec2, world: &mut World) -> EntityId {
        self.spawned_this_level += 1;
        world.spawn_asteroid(pos, vel, radius)
    }

    /// Advance the spawn timer; returns the new asteroid if one was spawned
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        world: &mut World,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Option<EntityId> {
        if self.is_idle() {
            return None;
        }
        self.spawn_timer += dt.max(0.0);
        if self.quota_exhausted() {
            return None;
        }
        if world.live_asteroid_count() >= self.max_active as usize {
            return None;
        }
        if self.spawn_timer <= tuning.spawn_interval {
            return None;
        }
        self.spawn_timer = 0.0;

        let edge = *SpawnEdge::ALL.choose(rng)?;
        let speed = rng.random_range(tuning.asteroid_speed_range())
            * self.speed_multiplier;
        let deviation = rng.random_range(tuning.spawn_deviation_range());
        let vel = rotate_degrees(edge.direction() * speed, deviation);
        let kind = rng.random_range(1..=tuning.asteroid_kinds.max(1));
        let radius = tuning.asteroid_min_radius * kind as f32;
        let pos = edge.position(rng.random::<f32>(), radius, tuning);

        Some(self.spawn(radius, pos, vel, world))
    }
}

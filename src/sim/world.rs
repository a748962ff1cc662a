//! Live entity collections for one run
//!
//! Entities are never removed while a pass iterates: removal marks them dead
//! and [`World::compact`] drops them once at the end of the frame. Every count
//! and collision pass skips dead entries.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Asteroid, BombPickup, EntityId, Shot};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    /// Asteroids in spawn order
    pub asteroids: Vec<Asteroid>,
    pub shots: Vec<Shot>,
    pub pickups: Vec<BombPickup>,
    /// Next entity ID
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    pub fn spawn_asteroid(&mut self, pos: Vec2, vel: Vec2, radius: f32) -> EntityId {
        let id = self.next_entity_id();
        self.asteroids.push(Asteroid::new(id, pos, vel, radius));
        id
    }

    pub fn spawn_shot(&mut self, pos: Vec2, vel: Vec2, tuning: &Tuning) -> EntityId {
        let id = self.next_entity_id();
        self.shots.push(Shot::new(id, pos, vel, tuning));
        id
    }

    pub fn spawn_pickup(&mut self, pos: Vec2, tuning: &Tuning) -> EntityId {
        let id = self.next_entity_id();
        self.pickups.push(BombPickup::new(id, pos, tuning));
        id
    }

    /// Split the asteroid at `index`, returning the IDs of any fragments
    ///
    /// The parent is marked dead either way. Fragments are appended, so
    /// callers holding a snapshot of indices never visit them this pass.
    pub fn split_asteroid<R: Rng>(
        &mut self,
        index: usize,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Vec<EntityId> {
        let Some(asteroid) = self.asteroids.get_mut(index) else {
            return Vec::new();
        };
        if !asteroid.alive {
            return Vec::new();
        }
        match asteroid.split(rng, tuning) {
            Some(fragments) => fragments
                .iter()
                .map(|f| self.spawn_asteroid(f.pos, f.vel, f.radius))
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn live_asteroids(&self) -> impl Iterator<Item = &Asteroid> {
        self.asteroids.iter().filter(|a| a.alive)
    }

    pub fn live_asteroid_count(&self) -> usize {
        self.live_asteroids().count()
    }

    pub fn asteroid(&self, id: EntityId) -> Option<&Asteroid> {
        self.asteroids.iter().find(|a| a.id == id && a.alive)
    }

    /// Mark every shot dead (level transition)
    pub fn clear_shots(&mut self) {
        for shot in &mut self.shots {
            shot.alive = false;
        }
    }

    /// Drop dead entities; called once at the end of a frame
    pub fn compact(&mut self) {
        self.asteroids.retain(|a| a.alive);
        self.shots.retain(|s| s.alive);
        self.pickups.retain(|p| p.alive);
    }
}

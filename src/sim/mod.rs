//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied dt only (the binary steps at a fixed rate)
//! - Seeded RNG passed explicitly, never ambient
//! - Stable iteration order (spawn order, entity IDs never reused)
//! - No rendering, audio or file dependencies

pub mod bomb;
pub mod clock;
pub mod collision;
pub mod entity;
pub mod field;
pub mod level;
pub mod pickup;
pub mod score;
pub mod state;
pub mod tick;
pub mod world;

pub use bomb::{BombController, BombWave};
pub use clock::GameClock;
pub use collision::{Bounds, circles_collide, ring_reaches, wrap_position};
pub use entity::{
    Asteroid, AsteroidSize, Body, BombPickup, EntityId, Player, PlayerControls, Shot,
};
pub use field::{AsteroidField, SpawnEdge};
pub use level::{LevelManager, LevelTransition, TransitionPhase};
pub use score::ScoreManager;
pub use state::{GameEvent, GameState};
pub use tick::{Command, Run, RunPhase, RunSummary, TickInput, tick};
pub use world::World;

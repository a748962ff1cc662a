//! Data-driven game balance
//!
//! Every number the simulation reads comes from a [`Tuning`]. Defaults match
//! [`crate::consts`]; a JSON file may override any subset of fields.

use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Spawn parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Total asteroids the level will ever spawn
    pub spawn_total: u32,
    /// Concurrent cap on live asteroids
    pub max_active: u32,
    /// Multiplier applied to spawn speed
    pub speed_multiplier: f32,
}

impl LevelDefinition {
    pub const fn new(spawn_total: u32, max_active: u32, speed_multiplier: f32) -> Self {
        Self {
            spawn_total,
            max_active,
            speed_multiplier,
        }
    }
}

/// Reference level progression
pub const DEFAULT_LEVELS: [LevelDefinition; 10] = [
    LevelDefinition::new(10, 10, 1.0),
    LevelDefinition::new(14, 12, 1.0),
    LevelDefinition::new(20, 15, 1.1),
    LevelDefinition::new(26, 18, 1.15),
    LevelDefinition::new(30, 22, 1.2),
    LevelDefinition::new(35, 25, 1.35),
    LevelDefinition::new(35, 25, 1.5),
    LevelDefinition::new(35, 25, 1.65),
    LevelDefinition::new(35, 25, 1.8),
    LevelDefinition::new(35, 25, 2.0),
];

/// All tunable numbers consumed by the simulation core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub screen_width: f32,
    pub screen_height: f32,
    pub hud_height: f32,

    // === Asteroids ===
    pub asteroid_min_radius: f32,
    pub asteroid_kinds: u32,
    pub spawn_interval: f32,
    pub asteroid_min_speed: f32,
    pub asteroid_max_speed: f32,
    pub spawn_deviation: f32,
    pub split_min_angle: f32,
    pub split_max_angle: f32,
    pub split_speed_boost: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_turn_speed: f32,
    pub player_speed: f32,
    pub shoot_speed: f32,
    pub shoot_cooldown: f32,
    pub start_lives: u32,
    pub start_bombs: u32,
    pub respawn_invulnerability: f32,
    pub invulnerability_fade_window: f32,

    // === Shots ===
    pub shot_radius: f32,
    pub shot_lifetime: f32,

    // === Scoring ===
    pub score_large: u64,
    pub score_medium: u64,
    pub score_small: u64,
    pub level_clear_bonus: u64,

    // === Bombs ===
    pub bomb_cap: u32,
    pub wave_duration: f32,
    pub wave_max_radius: f32,
    pub slowmo_min_scale: f32,
    pub bomb_flash_duration: f32,
    pub bomb_shake_duration: f32,
    pub bomb_shake_strength: f32,

    // === Pickups ===
    pub pickup_radius: f32,
    pub pickup_lifetime: f32,
    pub pickup_flicker_time: f32,
    pub pickup_bob_height: f32,
    pub pickup_bob_speed: f32,
    pub pickup_base_chance: f32,
    pub pickup_level_bonus: f32,
    pub pickup_max_chance: f32,

    // === Timers ===
    pub life_flicker_duration: f32,
    pub high_score_flash_duration: f32,
    pub level_message_duration: f32,

    /// Ordered level definitions
    pub levels: Vec<LevelDefinition>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            hud_height: STATUS_BAR_HEIGHT,

            asteroid_min_radius: ASTEROID_MIN_RADIUS,
            asteroid_kinds: ASTEROID_KINDS,
            spawn_interval: ASTEROID_SPAWN_RATE,
            asteroid_min_speed: ASTEROID_MIN_SPEED,
            asteroid_max_speed: ASTEROID_MAX_SPEED,
            spawn_deviation: ASTEROID_SPAWN_DEVIATION,
            split_min_angle: SPLIT_MIN_ANGLE,
            split_max_angle: SPLIT_MAX_ANGLE,
            split_speed_boost: SPLIT_SPEED_BOOST,

            player_radius: PLAYER_RADIUS,
            player_turn_speed: PLAYER_TURN_SPEED,
            player_speed: PLAYER_SPEED,
            shoot_speed: PLAYER_SHOOT_SPEED,
            shoot_cooldown: PLAYER_SHOOT_COOLDOWN,
            start_lives: PLAYER_START_LIVES,
            start_bombs: PLAYER_START_BOMBS,
            respawn_invulnerability: PLAYER_RESPAWN_INVULNERABILITY,
            invulnerability_fade_window: PLAYER_INVULNERABILITY_FADE_WINDOW,

            shot_radius: SHOT_RADIUS,
            shot_lifetime: SHOT_LIFETIME,

            score_large: ASTEROID_SCORE_LARGE,
            score_medium: ASTEROID_SCORE_MEDIUM,
            score_small: ASTEROID_SCORE_SMALL,
            level_clear_bonus: LEVEL_CLEAR_BONUS,

            bomb_cap: BOMB_CAP,
            wave_duration: BOMB_WAVE_DURATION,
            wave_max_radius: BOMB_WAVE_MAX_RADIUS,
            slowmo_min_scale: BOMB_SLOWMO_MIN_SCALE,
            bomb_flash_duration: BOMB_HUD_FLASH_DURATION,
            bomb_shake_duration: BOMB_SHAKE_DURATION,
            bomb_shake_strength: BOMB_SHAKE_STRENGTH,

            pickup_radius: BOMB_PICKUP_RADIUS,
            pickup_lifetime: BOMB_PICKUP_LIFETIME,
            pickup_flicker_time: BOMB_PICKUP_FLICKER_TIME,
            pickup_bob_height: BOMB_PICKUP_BOB_HEIGHT,
            pickup_bob_speed: BOMB_PICKUP_BOB_SPEED,
            pickup_base_chance: BOMB_PICKUP_BASE_CHANCE,
            pickup_level_bonus: BOMB_PICKUP_LEVEL_BONUS,
            pickup_max_chance: BOMB_PICKUP_MAX_CHANCE,

            life_flicker_duration: LIFE_ICON_FLICKER_DURATION,
            high_score_flash_duration: HIGH_SCORE_FLASH_DURATION,
            level_message_duration: LEVEL_MESSAGE_DURATION,

            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json).context("invalid tuning document")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject ranges the spawner and splitter cannot sample from
    pub fn validate(&self) -> Result<()> {
        let sampled = [
            ("asteroid_min_speed", self.asteroid_min_speed),
            ("asteroid_max_speed", self.asteroid_max_speed),
            ("spawn_deviation", self.spawn_deviation),
            ("split_min_angle", self.split_min_angle),
            ("split_max_angle", self.split_max_angle),
        ];
        for (name, value) in sampled {
            ensure!(value.is_finite(), "{name} must be finite, got {value}");
        }
        ensure!(
            self.asteroid_min_speed <= self.asteroid_max_speed,
            "asteroid_min_speed ({}) exceeds asteroid_max_speed ({})",
            self.asteroid_min_speed,
            self.asteroid_max_speed
        );
        ensure!(
            self.spawn_deviation >= 0.0,
            "spawn_deviation must not be negative, got {}",
            self.spawn_deviation
        );
        ensure!(
            self.split_min_angle <= self.split_max_angle,
            "split_min_angle ({}) exceeds split_max_angle ({})",
            self.split_min_angle,
            self.split_max_angle
        );
        Ok(())
    }

    /// Spawn speed bounds, ordered even if the fields are swapped
    pub fn asteroid_speed_range(&self) -> RangeInclusive<f32> {
        ordered(self.asteroid_min_speed, self.asteroid_max_speed)
    }

    /// Heading deviation in degrees, symmetric around the edge normal
    pub fn spawn_deviation_range(&self) -> RangeInclusive<f32> {
        let deviation = self.spawn_deviation.abs();
        ordered(-deviation, deviation)
    }

    /// Fragment split angle bounds in degrees
    pub fn split_angle_range(&self) -> RangeInclusive<f32> {
        ordered(self.split_min_angle, self.split_max_angle)
    }

    /// Load a tuning file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading tuning file {}", path.display()))?;
        let tuning = Self::from_json(&json)
            .with_context(|| format!("failed parsing tuning file {}", path.display()))?;
        log::info!(
            "Loaded tuning from {} ({} levels)",
            path.display(),
            tuning.levels.len()
        );
        Ok(tuning)
    }

    /// Largest radius an asteroid can spawn with
    pub fn asteroid_max_radius(&self) -> f32 {
        self.asteroid_min_radius * self.asteroid_kinds as f32
    }

    /// Top edge of the playable area (bottom of the HUD strip)
    pub fn playable_top(&self) -> f32 {
        self.hud_height
    }

    /// Where the player spawns: centre of the playable area
    pub fn spawn_point(&self) -> glam::Vec2 {
        let playable_height = self.screen_height - self.hud_height;
        glam::Vec2::new(
            self.screen_width / 2.0,
            self.hud_height + playable_height / 2.0,
        )
    }

    /// Level definition for an index; indices past the end reuse the last level
    pub fn level(&self, index: usize) -> LevelDefinition {
        self.levels
            .get(index)
            .or_else(|| self.levels.last())
            .copied()
            .unwrap_or(LevelDefinition::new(0, 1, 1.0))
    }
}

/// `a..=b` with the bounds swapped into order; a NaN bound collapses onto the other
fn ordered(a: f32, b: f32) -> RangeInclusive<f32> {
    a.min(b)..=a.max(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "bomb_cap": 9, "levels": [
            { "spawn_total": 1, "max_active": 1, "speed_multiplier": 1.0 }
        ] }"#)
        .unwrap();
        assert_eq!(tuning.bomb_cap, 9);
        assert_eq!(tuning.levels.len(), 1);
        assert_eq!(tuning.asteroid_min_radius, ASTEROID_MIN_RADIUS);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(Tuning::from_json("not json").is_err());
    }

    #[test]
    fn test_inverted_ranges_are_rejected() {
        assert!(Tuning::from_json(r#"{ "asteroid_min_speed": 150.0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "spawn_deviation": -5.0 }"#).is_err());
        assert!(
            Tuning::from_json(r#"{ "split_min_angle": 60.0, "split_max_angle": 10.0 }"#).is_err()
        );
        assert!(Tuning::from_json(r#"{ "asteroid_min_speed": 100.0 }"#).is_ok());
    }

    #[test]
    fn test_sample_ranges_are_ordered() {
        let tuning = Tuning {
            asteroid_min_speed: 150.0,
            asteroid_max_speed: 50.0,
            spawn_deviation: -30.0,
            split_min_angle: 50.0,
            split_max_angle: 20.0,
            ..Default::default()
        };
        assert_eq!(tuning.asteroid_speed_range(), 50.0..=150.0);
        assert_eq!(tuning.spawn_deviation_range(), -30.0..=30.0);
        assert_eq!(tuning.split_angle_range(), 20.0..=50.0);
    }

    #[test]
    fn test_level_lookup_clamps_to_last() {
        let tuning = Tuning::default();
        assert_eq!(tuning.level(0), DEFAULT_LEVELS[0]);
        assert_eq!(tuning.level(99), DEFAULT_LEVELS[9]);
    }

    #[test]
    fn test_spawn_point_is_below_hud() {
        let tuning = Tuning::default();
        let p = tuning.spawn_point();
        assert_eq!(p.x, 640.0);
        assert_eq!(p.y, 96.0 + (720.0 - 96.0) / 2.0);
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tuning.json");
        std::fs::write(&path, r#"{ "shot_lifetime": 1.5 }"#).unwrap();
        let tuning = Tuning::load(&path).unwrap();
        assert_eq!(tuning.shot_lifetime, 1.5);
    }
}

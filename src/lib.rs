//! Asteroid Drift - a wrap-around asteroid shooter
//!
//! Core modules:
//! - `sim`: Simulation core (motion, collisions, spawning, bombs, levels, scoring)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscores`: Leaderboard
//! - `persistence`: Versioned profile save/load
//! - `audio`: Fire-and-forget sound hooks
//! - `renderer`: Draw-list hooks for an external backend

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::Leaderboard;
pub use settings::Settings;
pub use tuning::{LevelDefinition, Tuning};

use glam::Vec2;

/// Reference game constants (defaults for [`Tuning`])
pub mod consts {
    /// Frame step used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;
    /// Height of the HUD strip reserved at the top of the screen
    pub const STATUS_BAR_HEIGHT: f32 = 96.0;

    /// Asteroid defaults
    pub const ASTEROID_MIN_RADIUS: f32 = 20.0;
    pub const ASTEROID_KINDS: u32 = 3;
    /// Seconds between spawns
    pub const ASTEROID_SPAWN_RATE: f32 = 0.8;
    pub const ASTEROID_MIN_SPEED: f32 = 40.0;
    pub const ASTEROID_MAX_SPEED: f32 = 100.0;
    /// Spawn heading deviation (degrees, either side)
    pub const ASTEROID_SPAWN_DEVIATION: f32 = 30.0;
    /// Fragment rotation range (degrees)
    pub const SPLIT_MIN_ANGLE: f32 = 20.0;
    pub const SPLIT_MAX_ANGLE: f32 = 50.0;
    pub const SPLIT_SPEED_BOOST: f32 = 1.2;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    /// Degrees per second
    pub const PLAYER_TURN_SPEED: f32 = 300.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_SHOOT_SPEED: f32 = 500.0;
    pub const PLAYER_SHOOT_COOLDOWN: f32 = 0.3;
    pub const PLAYER_START_LIVES: u32 = 3;
    pub const PLAYER_START_BOMBS: u32 = 2;
    pub const PLAYER_RESPAWN_INVULNERABILITY: f32 = 5.0;
    pub const PLAYER_INVULNERABILITY_FADE_WINDOW: f32 = 2.0;

    /// Shot defaults
    pub const SHOT_RADIUS: f32 = 5.0;
    pub const SHOT_LIFETIME: f32 = 3.0;

    /// Score values (smaller fragments are worth more)
    pub const ASTEROID_SCORE_LARGE: u64 = 1;
    pub const ASTEROID_SCORE_MEDIUM: u64 = 3;
    pub const ASTEROID_SCORE_SMALL: u64 = 5;
    pub const LEVEL_CLEAR_BONUS: u64 = 1000;

    /// Bombs
    pub const BOMB_CAP: u32 = 5;
    pub const BOMB_WAVE_DURATION: f32 = 1.5;
    pub const BOMB_WAVE_MAX_RADIUS: f32 = 600.0;
    pub const BOMB_SLOWMO_MIN_SCALE: f32 = 0.3;
    pub const BOMB_HUD_FLASH_DURATION: f32 = 0.6;
    pub const BOMB_SHAKE_DURATION: f32 = 0.4;
    pub const BOMB_SHAKE_STRENGTH: f32 = 12.0;

    /// Bomb pickups
    pub const BOMB_PICKUP_RADIUS: f32 = 12.0;
    pub const BOMB_PICKUP_LIFETIME: f32 = 8.0;
    pub const BOMB_PICKUP_FLICKER_TIME: f32 = 2.0;
    pub const BOMB_PICKUP_BOB_HEIGHT: f32 = 4.0;
    pub const BOMB_PICKUP_BOB_SPEED: f32 = 4.0;
    pub const BOMB_PICKUP_BASE_CHANCE: f32 = 0.05;
    pub const BOMB_PICKUP_LEVEL_BONUS: f32 = 0.01;
    pub const BOMB_PICKUP_MAX_CHANCE: f32 = 0.2;

    /// HUD timers
    pub const LIFE_ICON_FLICKER_DURATION: f32 = 0.7;
    pub const HIGH_SCORE_FLASH_DURATION: f32 = 3.0;
    /// Duration of each level-transition message phase
    pub const LEVEL_MESSAGE_DURATION: f32 = 2.0;

    /// Settings adjustment steps
    pub const VOLUME_ADJUST_STEP: f32 = 0.1;
    pub const SHAKE_ADJUST_STEP: f32 = 0.1;

    /// Leaderboard
    pub const PLAYER_NAME_MAX_LEN: usize = 10;
    pub const MAX_HIGH_SCORES: usize = 10;
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit heading for a rotation in degrees (0° points down the screen, +y)
#[inline]
pub fn heading(rotation: f32) -> Vec2 {
    rotate_degrees(Vec2::Y, rotation)
}

/// Wrap degrees into [0, 360)
#[inline]
pub fn normalize_degrees(degrees: f32) -> f32 {
    degrees.rem_euclid(360.0)
}

/// Current unix time in seconds (0 if the clock is before the epoch)
pub fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

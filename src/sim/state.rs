//! Run-wide game state and the event queue
//!
//! `GameState` holds the counters a run accumulates (lives, bombs, score,
//! level index, totals) plus the transient HUD timers. It is only mutated
//! through its own methods so the invariants hold: score never decreases,
//! bombs never exceed the cap, timers never go below zero.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use crate::highscores::Leaderboard;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Notifications for the audio and persistence layers
///
/// Pushed by the simulation, drained by the host once per frame. Nothing in
/// the core reads them back.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ShotFired,
    AsteroidDestroyed {
        id: EntityId,
        pos: Vec2,
        radius: f32,
        points: u64,
    },
    BombTriggered {
        origin: Vec2,
        shake_duration: f32,
        shake_magnitude: f32,
    },
    /// Bomb key pressed with no bombs left
    BombDenied,
    PickupDropped {
        pos: Vec2,
    },
    PickupCollected,
    LifeLost {
        lives_left: u32,
    },
    /// The stored high score should be raised to this value
    HighScoreRaised(u64),
    /// The previous record was beaten for the first time this run
    HighScoreBeaten,
    LevelCleared {
        level: usize,
        bonus: u64,
    },
    LevelMusic {
        level: usize,
        transition_ms: u32,
    },
    PreloadLevelMusic {
        level: usize,
    },
    SettingsChanged,
    RunEnded {
        level_completed: bool,
    },
}

/// Complete run state (one instance per run)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Player lives
    pub lives: u32,
    pub bombs: u32,
    pub bomb_cap: u32,
    pub score: u64,
    pub high_score: u64,
    /// High score stored in the profile when the run started
    pub initial_high_score: u64,
    /// Current level (0-based)
    pub level_index: usize,

    // === Life loss ===
    pub life_loss_active: bool,
    pub life_loss_elapsed: f32,
    pub life_lost_this_level: bool,

    // === High score flash ===
    /// Latched once per run
    pub high_score_beaten: bool,
    pub high_score_flash_active: bool,
    pub high_score_flash_elapsed: f32,

    /// Seconds left on the HUD bomb flash
    pub bomb_flash_timer: f32,

    // === Run totals ===
    pub bombs_used: u32,
    pub pickups_collected: u32,
    pub asteroids_destroyed: u32,
    /// Seconds of (scaled) play time
    pub run_time: f32,

    // === Per-level totals ===
    pub level_bombs_used: u32,
    pub level_pickups_collected: u32,
    pub level_asteroids_destroyed: u32,

    pub settings: Settings,
    /// Leaderboard snapshot taken at run start
    pub leaderboard: Leaderboard,

    life_flicker_duration: f32,
    high_score_flash_duration: f32,

    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            lives: tuning.start_lives,
            bombs: tuning.start_bombs.min(tuning.bomb_cap),
            bomb_cap: tuning.bomb_cap,
            score: 0,
            high_score: 0,
            initial_high_score: 0,
            level_index: 0,
            life_loss_active: false,
            life_loss_elapsed: 0.0,
            life_lost_this_level: false,
            high_score_beaten: false,
            high_score_flash_active: false,
            high_score_flash_elapsed: 0.0,
            bomb_flash_timer: 0.0,
            bombs_used: 0,
            pickups_collected: 0,
            asteroids_destroyed: 0,
            run_time: 0.0,
            level_bombs_used: 0,
            level_pickups_collected: 0,
            level_asteroids_destroyed: 0,
            settings: Settings::default(),
            leaderboard: Leaderboard::new(),
            life_flicker_duration: tuning.life_flicker_duration,
            high_score_flash_duration: tuning.high_score_flash_duration,
            events: Vec::new(),
        }
    }

    /// Seed the run with the stored record
    pub fn with_high_score(mut self, high_score: u64) -> Self {
        self.high_score = high_score;
        self.initial_high_score = high_score;
        self
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Prepare state for the given level; run totals survive
    pub fn reset_for_level(&mut self, level_index: usize) {
        self.level_index = level_index;
        self.life_lost_this_level = false;
        self.life_loss_active = false;
        self.life_loss_elapsed = 0.0;
        self.level_bombs_used = 0;
        self.level_pickups_collected = 0;
        self.level_asteroids_destroyed = 0;
        self.high_score_flash_active = false;
        self.high_score_flash_elapsed = 0.0;
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.life_loss_active = true;
        self.life_loss_elapsed = 0.0;
        self.life_lost_this_level = true;
        self.emit(GameEvent::LifeLost {
            lives_left: self.lives,
        });
    }

    /// Raw score increase; non-positive amounts are ignored
    ///
    /// Returns true when this raised the high score.
    pub fn add_score(&mut self, amount: i64) -> bool {
        if amount <= 0 {
            return false;
        }
        self.score = self.score.saturating_add(amount as u64);
        if self.score > self.high_score {
            self.high_score = self.score;
            return true;
        }
        false
    }

    /// Spend a bomb; false (and no change) when none are left
    pub fn use_bomb(&mut self) -> bool {
        if self.bombs == 0 {
            return false;
        }
        self.bombs -= 1;
        self.bombs_used += 1;
        self.level_bombs_used += 1;
        true
    }

    /// Add bombs, clamped to the cap
    pub fn add_bombs(&mut self, count: u32) {
        self.bombs = self.bombs.saturating_add(count).min(self.bomb_cap);
    }

    pub fn has_full_bombs(&self) -> bool {
        self.bombs >= self.bomb_cap
    }

    pub fn record_asteroid_destroyed(&mut self) {
        self.asteroids_destroyed += 1;
        self.level_asteroids_destroyed += 1;
    }

    pub fn record_pickup_collected(&mut self) {
        self.pickups_collected += 1;
        self.level_pickups_collected += 1;
    }

    pub fn trigger_bomb_flash(&mut self, duration: f32) {
        self.bomb_flash_timer = duration.max(0.0);
    }

    pub fn start_high_score_flash(&mut self) {
        self.high_score_beaten = true;
        self.high_score_flash_active = true;
        self.high_score_flash_elapsed = 0.0;
    }

    // === Settings ===

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone().sanitized();
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.settings.set_music_volume(volume);
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.settings.set_sfx_volume(volume);
    }

    pub fn toggle_music_mute(&mut self) {
        self.settings.toggle_music_mute();
    }

    pub fn toggle_sfx_mute(&mut self) {
        self.settings.toggle_sfx_mute();
    }

    pub fn adjust_screen_shake(&mut self, delta: f32) {
        self.settings.adjust_screen_shake(delta);
    }

    /// Advance transient timers
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.run_time += dt;

        if self.life_loss_active {
            self.life_loss_elapsed += dt;
            if self.life_loss_elapsed >= self.life_flicker_duration {
                self.life_loss_active = false;
                self.life_loss_elapsed = 0.0;
            }
        }

        if self.bomb_flash_timer > 0.0 {
            self.bomb_flash_timer = (self.bomb_flash_timer - dt).max(0.0);
        }

        if self.high_score_flash_active {
            self.high_score_flash_elapsed += dt;
            if self.high_score_flash_elapsed >= self.high_score_flash_duration {
                self.high_score_flash_active = false;
            }
        }
    }
}

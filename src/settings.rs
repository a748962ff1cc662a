//! Player preferences
//!
//! Persisted inside the profile; applied to the run state at run start.

use serde::{Deserialize, Serialize};

use crate::consts::PLAYER_NAME_MAX_LEN;

/// Name used when none (or only whitespace) is provided
pub const DEFAULT_PLAYER_NAME: &str = "ACE";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Volume restored when music is unmuted
    pub music_volume_previous: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Volume restored when effects are unmuted
    pub sfx_volume_previous: f32,

    // === Visual Effects ===
    /// Screen shake strength multiplier (0.0 - 1.0)
    pub screen_shake: f32,

    // === Leaderboard ===
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 1.0,
            music_volume_previous: 1.0,
            sfx_volume: 1.0,
            sfx_volume_previous: 1.0,
            screen_shake: 1.0,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }
}

/// Partial settings change; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub music_volume: Option<f32>,
    pub music_volume_previous: Option<f32>,
    pub sfx_volume: Option<f32>,
    pub sfx_volume_previous: Option<f32>,
    pub screen_shake: Option<f32>,
    pub player_name: Option<String>,
}

/// Truncate to the leaderboard name length and trim surrounding whitespace
pub fn sanitize_player_name(name: &str) -> String {
    let truncated: String = name.chars().take(PLAYER_NAME_MAX_LEN).collect();
    let trimmed = truncated.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

#[inline]
fn unit(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Mute if audible (remembering the level), otherwise restore
fn toggle_mute(volume: &mut f32, previous: &mut f32) {
    if *volume > 0.0 {
        *previous = *volume;
        *volume = 0.0;
    } else {
        *volume = if *previous > 0.0 { *previous } else { 1.0 };
    }
}

impl Settings {
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = unit(volume);
        if self.music_volume > 0.0 {
            self.music_volume_previous = self.music_volume;
        }
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = unit(volume);
        if self.sfx_volume > 0.0 {
            self.sfx_volume_previous = self.sfx_volume;
        }
    }

    pub fn toggle_music_mute(&mut self) {
        toggle_mute(&mut self.music_volume, &mut self.music_volume_previous);
    }

    pub fn toggle_sfx_mute(&mut self) {
        toggle_mute(&mut self.sfx_volume, &mut self.sfx_volume_previous);
    }

    pub fn adjust_screen_shake(&mut self, delta: f32) {
        self.screen_shake = unit(self.screen_shake + delta);
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = sanitize_player_name(name);
    }

    /// Apply a partial update, clamping volumes and sanitising the name
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(v) = update.music_volume {
            self.music_volume = unit(v);
        }
        if let Some(v) = update.music_volume_previous {
            self.music_volume_previous = unit(v);
        }
        if let Some(v) = update.sfx_volume {
            self.sfx_volume = unit(v);
        }
        if let Some(v) = update.sfx_volume_previous {
            self.sfx_volume_previous = unit(v);
        }
        if let Some(v) = update.screen_shake {
            self.screen_shake = unit(v);
        }
        if let Some(name) = &update.player_name {
            self.set_player_name(name);
        }
    }

    /// Clamp everything into range (after loading untrusted data)
    pub fn sanitized(mut self) -> Self {
        self.music_volume = unit(self.music_volume);
        self.music_volume_previous = unit(self.music_volume_previous);
        self.sfx_volume = unit(self.sfx_volume);
        self.sfx_volume_previous = unit(self.sfx_volume_previous);
        self.screen_shake = unit(self.screen_shake);
        self.player_name = sanitize_player_name(&self.player_name);
        self
    }
}

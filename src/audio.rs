//! Audio hooks
//!
//! The simulation never plays sound itself. It queues [`GameEvent`]s and the
//! host forwards them to an [`AudioSink`] with [`dispatch_events`]. The
//! bundled [`AudioManager`] keeps the mixer state (volumes, current track)
//! and logs what a real backend would play.

use std::collections::BTreeSet;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoundEffect {
    /// Player fires
    Shot,
    /// Asteroid destroyed or split
    AsteroidHit,
    /// Bomb triggered
    Bomb,
    /// Bomb key with nothing to throw
    BombDenied,
    /// Bomb pickup collected
    BombPickup,
    /// Ship hit
    LifeLost,
    /// First time the stored record is beaten
    HighScore,
    LevelClear,
    GameOver,
}

/// Fire-and-forget audio backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    /// Crossfade to the given level's track
    fn play_level_music(&mut self, level: usize, fade_ms: u32);
    fn preload_level_music(&mut self, level: usize);
    fn fade_out_music(&mut self, fade_ms: u32);
    fn set_music_volume(&mut self, volume: f32);
    fn set_sfx_volume(&mut self, volume: f32);
}

/// Default crossfade when a level starts without an explicit transition
pub const DEFAULT_MUSIC_FADE_MS: u32 = 1800;
pub const GAME_OVER_FADE_MS: u32 = 800;

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
    current_track: Option<usize>,
    preloaded: BTreeSet<usize>,
    effects_played: u32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            music_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
            current_track: None,
            preloaded: BTreeSet::new(),
            effects_played: 0,
        }
    }

    /// Start from the persisted volumes
    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_music_volume(settings.music_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn current_track(&self) -> Option<usize> {
        self.current_track
    }

    pub fn effects_played(&self) -> u32 {
        self.effects_played
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.effects_played += 1;
        log::trace!("sfx {:?} at {:.2}", effect, vol);
    }

    fn play_level_music(&mut self, level: usize, fade_ms: u32) {
        self.preloaded.remove(&level);
        self.current_track = Some(level);
        log::debug!("music: level {} track, {}ms crossfade", level + 1, fade_ms);
    }

    fn preload_level_music(&mut self, level: usize) {
        if self.preloaded.insert(level) {
            log::debug!("music: preloading level {} track", level + 1);
        }
    }

    fn fade_out_music(&mut self, fade_ms: u32) {
        if let Some(level) = self.current_track.take() {
            log::debug!("music: fading out level {} track over {}ms", level + 1, fade_ms);
        }
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
    }

    fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = volume.clamp(0.0, 1.0);
    }
}

/// Forward one frame's events to the audio backend
pub fn dispatch_events<S: AudioSink>(events: &[GameEvent], settings: &Settings, sink: &mut S) {
    for event in events {
        match event {
            GameEvent::ShotFired => sink.play(SoundEffect::Shot),
            GameEvent::AsteroidDestroyed { .. } => sink.play(SoundEffect::AsteroidHit),
            GameEvent::BombTriggered { .. } => sink.play(SoundEffect::Bomb),
            GameEvent::BombDenied => sink.play(SoundEffect::BombDenied),
            GameEvent::PickupCollected => sink.play(SoundEffect::BombPickup),
            GameEvent::LifeLost { .. } => sink.play(SoundEffect::LifeLost),
            GameEvent::HighScoreBeaten => sink.play(SoundEffect::HighScore),
            GameEvent::LevelCleared { .. } => sink.play(SoundEffect::LevelClear),
            GameEvent::LevelMusic {
                level,
                transition_ms,
            } => {
                let fade = if *transition_ms > 0 {
                    *transition_ms
                } else {
                    DEFAULT_MUSIC_FADE_MS
                };
                sink.play_level_music(*level, fade);
            }
            GameEvent::PreloadLevelMusic { level } => sink.preload_level_music(*level),
            GameEvent::SettingsChanged => {
                sink.set_music_volume(settings.music_volume);
                sink.set_sfx_volume(settings.sfx_volume);
            }
            GameEvent::RunEnded { level_completed } => {
                if !level_completed {
                    sink.play(SoundEffect::GameOver);
                }
                sink.fade_out_music(GAME_OVER_FADE_MS);
            }
            GameEvent::PickupDropped { .. } | GameEvent::HighScoreRaised(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[derive(Default)]
    struct Recorder {
        effects: Vec<SoundEffect>,
        music: Vec<(usize, u32)>,
        preloads: Vec<usize>,
        fades: u32,
        volumes: Option<(f32, f32)>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.effects.push(effect);
        }
        fn play_level_music(&mut self, level: usize, fade_ms: u32) {
            self.music.push((level, fade_ms));
        }
        fn preload_level_music(&mut self, level: usize) {
            self.preloads.push(level);
        }
        fn fade_out_music(&mut self, _fade_ms: u32) {
            self.fades += 1;
        }
        fn set_music_volume(&mut self, volume: f32) {
            let sfx = self.volumes.map(|v| v.1).unwrap_or(1.0);
            self.volumes = Some((volume, sfx));
        }
        fn set_sfx_volume(&mut self, volume: f32) {
            let music = self.volumes.map(|v| v.0).unwrap_or(1.0);
            self.volumes = Some((music, volume));
        }
    }

    #[test]
    fn test_events_map_to_effects() {
        let events = vec![
            GameEvent::ShotFired,
            GameEvent::PickupDropped { pos: Vec2::ZERO },
            GameEvent::BombTriggered {
                origin: Vec2::ZERO,
                shake_duration: 0.4,
                shake_magnitude: 12.0,
            },
            GameEvent::PickupCollected,
            GameEvent::HighScoreRaised(10),
        ];
        let mut sink = Recorder::default();
        dispatch_events(&events, &Settings::default(), &mut sink);
        assert_eq!(
            sink.effects,
            vec![SoundEffect::Shot, SoundEffect::Bomb, SoundEffect::BombPickup]
        );
    }

    #[test]
    fn test_music_events() {
        let events = vec![
            GameEvent::LevelMusic {
                level: 0,
                transition_ms: 0,
            },
            GameEvent::PreloadLevelMusic { level: 1 },
            GameEvent::LevelMusic {
                level: 1,
                transition_ms: 4000,
            },
            GameEvent::RunEnded {
                level_completed: true,
            },
        ];
        let mut sink = Recorder::default();
        dispatch_events(&events, &Settings::default(), &mut sink);
        assert_eq!(sink.music, vec![(0, DEFAULT_MUSIC_FADE_MS), (1, 4000)]);
        assert_eq!(sink.preloads, vec![1]);
        assert_eq!(sink.fades, 1);
        assert!(sink.effects.is_empty());
    }

    #[test]
    fn test_settings_change_pushes_volumes() {
        let settings = Settings {
            music_volume: 0.3,
            sfx_volume: 0.6,
            ..Default::default()
        };
        let mut sink = Recorder::default();
        dispatch_events(&[GameEvent::SettingsChanged], &settings, &mut sink);
        assert_eq!(sink.volumes, Some((0.3, 0.6)));
    }

    #[test]
    fn test_manager_tracks_music_and_mute() {
        let mut audio = AudioManager::new();
        audio.preload_level_music(2);
        audio.play_level_music(2, 1000);
        assert_eq!(audio.current_track(), Some(2));
        audio.fade_out_music(GAME_OVER_FADE_MS);
        assert_eq!(audio.current_track(), None);

        audio.play(SoundEffect::Shot);
        audio.set_muted(true);
        audio.play(SoundEffect::Shot);
        audio.set_muted(false);
        audio.set_sfx_volume(0.0);
        audio.play(SoundEffect::Shot);
        assert_eq!(audio.effects_played(), 1);
    }

    #[test]
    fn test_from_settings_volumes() {
        let settings = Settings {
            music_volume: 0.25,
            ..Default::default()
        };
        let audio = AudioManager::from_settings(&settings);
        assert_eq!(audio.music_volume(), 0.25);
    }
}

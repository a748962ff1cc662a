//! Level progression and the between-level banner
//!
//! A cleared level starts a two-phase transition: a congratulation header
//! shows for the message duration, then the next level's number, and only
//! then is the next level configured and spawning resumes.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::field::AsteroidField;
use super::score::ScoreManager;
use super::state::{GameEvent, GameState};
use super::world::World;
use crate::tuning::Tuning;

pub const TRANSITION_HEADERS: [&str; 3] = ["Good Work!", "Nice Shooting!", "Level Complete!"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionPhase {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTransition {
    pub next_level: usize,
    pub timer: f32,
    pub phase: TransitionPhase,
    pub header: String,
}

impl LevelTransition {
    /// Banner text for the current phase
    pub fn message(&self) -> String {
        match self.phase {
            TransitionPhase::Top => self.header.clone(),
            TransitionPhase::Bottom => format!("Level {}", self.next_level + 1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelManager {
    pub field: AsteroidField,
    pub transition: Option<LevelTransition>,
    levels: usize,
    message_duration: f32,
}

impl LevelManager {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            field: AsteroidField::new(),
            transition: None,
            levels: tuning.levels.len(),
            message_duration: tuning.level_message_duration,
        }
    }

    pub fn total_levels(&self) -> usize {
        self.levels
    }

    /// Point the field at a level's quota and reset per-level state
    pub fn configure_level(&mut self, index: usize, state: &mut GameState, tuning: &Tuning) {
        let level = tuning.level(index);
        self.field
            .configure_level(level.spawn_total, level.max_active, level.speed_multiplier);
        state.reset_for_level(index);
        log::info!(
            "Level {} configured: {} asteroids, {} at once, speed x{:.2}",
            index + 1,
            level.spawn_total,
            level.max_active,
            level.speed_multiplier
        );
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    pub fn start_transition<R: Rng>(&mut self, next_level: usize, rng: &mut R) {
        let header = TRANSITION_HEADERS
            .choose(rng)
            .copied()
            .unwrap_or(TRANSITION_HEADERS[0]);
        self.transition = Some(LevelTransition {
            next_level,
            timer: 0.0,
            phase: TransitionPhase::Top,
            header: header.to_string(),
        });
    }

    /// Advance the banner; configures the next level when it finishes
    ///
    /// Returns true on the frame the next level begins.
    pub fn update(&mut self, dt: f32, state: &mut GameState, tuning: &Tuning) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        transition.timer += dt.max(0.0);
        if transition.timer < self.message_duration {
            return false;
        }
        match transition.phase {
            TransitionPhase::Top => {
                transition.phase = TransitionPhase::Bottom;
                transition.timer = 0.0;
                false
            }
            TransitionPhase::Bottom => {
                let next = transition.next_level;
                self.transition = None;
                self.configure_level(next, state, tuning);
                true
            }
        }
    }

    /// True once the current level is cleared and no banner is showing
    pub fn should_start_transition(&self, world: &World) -> bool {
        self.transition.is_none() && self.field.level_complete(world)
    }

    pub fn levels_remaining(&self, state: &GameState) -> bool {
        state.level_index + 1 < self.levels
    }

    /// Award the clear bonus for the current level
    pub fn apply_level_completion(&self, state: &mut GameState, score: &ScoreManager) -> u64 {
        let bonus = score.apply_level_bonus(state);
        log::info!("Level {} cleared, bonus {}", state.level_index + 1, bonus);
        state.emit(GameEvent::LevelCleared {
            level: state.level_index,
            bonus,
        });
        bonus
    }
}

//! Scoring rules layered on [`GameState`]

use super::entity::Asteroid;
use super::state::{GameEvent, GameState};
use crate::tuning::Tuning;

/// Applies point values, the high-score flash and level bonuses
#[derive(Debug, Clone)]
pub struct ScoreManager {
    tuning: Tuning,
}

impl ScoreManager {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tuning: tuning.clone(),
        }
    }

    /// Add points; zero and negative amounts are ignored
    ///
    /// Raising the high score notifies profile storage. The flash only fires
    /// the first time a pre-existing record is beaten in a run.
    pub fn add_points(&self, state: &mut GameState, amount: i64) {
        if !state.add_score(amount) {
            return;
        }
        state.emit(GameEvent::HighScoreRaised(state.high_score));
        if state.initial_high_score > 0 && !state.high_score_beaten {
            state.start_high_score_flash();
            state.emit(GameEvent::HighScoreBeaten);
            log::info!("High score beaten: {}", state.high_score);
        }
    }

    pub fn add_asteroid_points(&self, state: &mut GameState, asteroid: &Asteroid) -> u64 {
        let points = asteroid.score_value(&self.tuning);
        self.add_points(state, points as i64);
        points
    }

    pub fn add_bombs(&self, state: &mut GameState, count: u32) {
        state.add_bombs(count);
    }

    /// Level clear bonus: base × level number, halved if a life was lost
    pub fn level_bonus(&self, state: &GameState) -> u64 {
        let level_number = state.level_index as u64 + 1;
        let bonus = self.tuning.level_clear_bonus * level_number;
        if state.life_lost_this_level {
            bonus / 2
        } else {
            bonus
        }
    }

    /// Award the level clear bonus; returns the amount awarded
    pub fn apply_level_bonus(&self, state: &mut GameState) -> u64 {
        let bonus = self.level_bonus(state);
        self.add_points(state, bonus as i64);
        bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityId;
    use glam::Vec2;

    fn setup() -> (ScoreManager, GameState) {
        let tuning = Tuning::default();
        (ScoreManager::new(&tuning), GameState::new(&tuning))
    }

    #[test]
    fn test_non_positive_points_are_noops() {
        let (score, mut state) = setup();
        score.add_points(&mut state, 0);
        score.add_points(&mut state, -10);
        assert_eq!(state.score, 0);
        assert_eq!(state.high_score, 0);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_first_run_does_not_flash() {
        let (score, mut state) = setup();
        score.add_points(&mut state, 100);
        assert_eq!(state.high_score, 100);
        assert!(!state.high_score_beaten);
        score.add_points(&mut state, 50);
        assert_eq!(state.high_score, 150);
        assert!(!state.high_score_beaten);
        assert!(state.events().contains(&GameEvent::HighScoreRaised(150)));
    }

    #[test]
    fn test_existing_high_score_flashes_once() {
        let (score, state) = setup();
        let mut state = state.with_high_score(200);

        score.add_points(&mut state, 50);
        assert_eq!(state.high_score, 200);
        assert!(!state.high_score_beaten);

        score.add_points(&mut state, 200);
        assert_eq!(state.high_score, 250);
        assert!(state.high_score_beaten);
        assert!(state.high_score_flash_active);
        assert_eq!(state.high_score_flash_elapsed, 0.0);

        state.update(0.5);
        score.add_points(&mut state, 10);
        // Latched: the flash is not restarted
        assert!(state.high_score_flash_elapsed > 0.0);
        let beaten = state
            .events()
            .iter()
            .filter(|e| **e == GameEvent::HighScoreBeaten)
            .count();
        assert_eq!(beaten, 1);
    }

    #[test]
    fn test_asteroid_points_by_tier() {
        let (score, mut state) = setup();
        let small = Asteroid::new(EntityId(1), Vec2::ZERO, Vec2::ZERO, 20.0);
        let large = Asteroid::new(EntityId(2), Vec2::ZERO, Vec2::ZERO, 60.0);
        assert_eq!(score.add_asteroid_points(&mut state, &small), 5);
        assert_eq!(score.add_asteroid_points(&mut state, &large), 1);
        assert_eq!(state.score, 6);
    }

    #[test]
    fn test_level_bonus_halved_after_life_loss() {
        let (score, mut state) = setup();
        state.level_index = 2;
        assert_eq!(score.level_bonus(&state), 3000);

        state.lose_life();
        assert_eq!(score.apply_level_bonus(&mut state), 1500);
        assert_eq!(state.score, 1500);
    }
}

//! Bomb shockwave and slow-motion
//!
//! A triggered bomb is an expanding ring. Every live asteroid the ring
//! reaches is destroyed exactly once (splitting like a shot hit would), and
//! the global time scale eases from the slow-motion floor back to 1.0 over
//! the wave's lifetime.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::clock::GameClock;
use super::collision::ring_reaches;
use super::entity::EntityId;
use super::pickup::drop_from_asteroid;
use super::score::ScoreManager;
use super::state::{GameEvent, GameState};
use super::world::World;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombWave {
    pub origin: Vec2,
    /// Unscaled seconds since trigger
    pub elapsed: f32,
    pub radius: f32,
    pub duration: f32,
    pub max_radius: f32,
    pub min_time_scale: f32,
    pub active: bool,
    processed: HashSet<EntityId>,
}

impl BombWave {
    /// Start a wave; drops the clock to the slow-motion floor immediately
    pub fn new(origin: Vec2, tuning: &Tuning, clock: &mut GameClock) -> Self {
        let wave = Self {
            origin,
            elapsed: 0.0,
            radius: 0.0,
            duration: tuning.wave_duration,
            max_radius: tuning.wave_max_radius,
            min_time_scale: tuning.slowmo_min_scale,
            active: true,
            processed: HashSet::new(),
        };
        clock.set_time_scale(wave.min_time_scale);
        wave
    }

    /// Progress in 0..=1; a non-positive duration completes instantly
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Grow the ring and ease the time scale; `dt` is unscaled
    pub fn update(&mut self, dt: f32, clock: &mut GameClock) {
        if !self.active {
            return;
        }
        self.elapsed += dt.max(0.0);
        let progress = self.progress();
        self.radius = self.max_radius * progress;
        let scale = if progress >= 1.0 {
            1.0
        } else {
            self.min_time_scale + (1.0 - self.min_time_scale) * progress
        };
        clock.set_time_scale(scale);
    }

    /// End the wave at full size and restore normal time
    pub fn finish(&mut self, clock: &mut GameClock) {
        self.active = false;
        self.radius = self.max_radius;
        clock.reset_time_scale();
        self.processed.clear();
    }

    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        ring_reaches(self.origin, self.radius, pos, radius)
    }

    pub fn has_processed(&self, id: EntityId) -> bool {
        self.processed.contains(&id)
    }

    pub fn mark_processed(&mut self, id: EntityId) {
        self.processed.insert(id);
    }
}

/// Owns the single active wave, if any
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BombController {
    wave: Option<BombWave>,
}

impl BombController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_wave(&self) -> Option<&BombWave> {
        self.wave.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.wave.is_some()
    }

    /// Start a new wave, finishing any wave still running
    pub fn trigger(&mut self, origin: Vec2, clock: &mut GameClock, tuning: &Tuning) {
        if let Some(mut previous) = self.wave.take() {
            previous.finish(clock);
        }
        log::debug!("Bomb wave at ({:.0}, {:.0})", origin.x, origin.y);
        self.wave = Some(BombWave::new(origin, tuning, clock));
    }

    pub fn update(&mut self, dt: f32, clock: &mut GameClock) {
        if let Some(wave) = self.wave.as_mut() {
            wave.update(dt, clock);
        }
    }

    /// Destroy every asteroid the ring has reached; retire the wave when done
    ///
    /// Only asteroids present when the pass starts are examined. Fragments of
    /// asteroids destroyed here are marked processed so the wave cannot hit
    /// them again. Returns the number of asteroids destroyed.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_wave_effects<R: Rng>(
        &mut self,
        world: &mut World,
        score: &ScoreManager,
        state: &mut GameState,
        clock: &mut GameClock,
        rng: &mut R,
        tuning: &Tuning,
    ) -> u32 {
        let Some(wave) = self.wave.as_mut() else {
            return 0;
        };

        let mut destroyed = 0;
        let snapshot = world.asteroids.len();
        for index in 0..snapshot {
            let asteroid = &world.asteroids[index];
            if !asteroid.alive || wave.has_processed(asteroid.id) {
                continue;
            }
            if !wave.contains(asteroid.body.pos, asteroid.body.radius) {
                continue;
            }

            let id = asteroid.id;
            let pos = asteroid.body.pos;
            let radius = asteroid.body.radius;
            wave.mark_processed(id);

            state.record_asteroid_destroyed();
            let points = score.add_asteroid_points(state, &world.asteroids[index]);
            drop_from_asteroid(pos, state, world, rng, tuning);
            for child in world.split_asteroid(index, rng, tuning) {
                wave.mark_processed(child);
            }
            state.emit(GameEvent::AsteroidDestroyed {
                id,
                pos,
                radius,
                points,
            });
            destroyed += 1;
        }

        if wave.is_finished() {
            wave.finish(clock);
            self.wave = None;
        }
        destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_rng::always_drop;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Harness {
        tuning: Tuning,
        world: World,
        score: ScoreManager,
        state: GameState,
        clock: GameClock,
        bombs: BombController,
        rng: Pcg32,
    }

    impl Harness {
        fn new() -> Self {
            let tuning = Tuning::default();
            Self {
                world: World::new(),
                score: ScoreManager::new(&tuning),
                state: GameState::new(&tuning),
                clock: GameClock::new(),
                bombs: BombController::new(),
                rng: Pcg32::seed_from_u64(9),
                tuning,
            }
        }

        fn step(&mut self, dt: f32) -> u32 {
            self.bombs.update(dt, &mut self.clock);
            self.bombs.apply_wave_effects(
                &mut self.world,
                &self.score,
                &mut self.state,
                &mut self.clock,
                &mut self.rng,
                &self.tuning,
            )
        }
    }

    #[test]
    fn test_trigger_enters_slow_motion() {
        let mut h = Harness::new();
        h.bombs.trigger(Vec2::ZERO, &mut h.clock, &h.tuning);
        assert_eq!(h.clock.time_scale(), h.tuning.slowmo_min_scale);

        h.bombs.update(0.75, &mut h.clock);
        let wave = h.bombs.current_wave().unwrap();
        assert!((wave.radius - 300.0).abs() < 1e-3);
        assert!((h.clock.time_scale() - 0.65).abs() < 1e-5);
    }

    #[test]
    fn test_wave_destroys_each_asteroid_once() {
        let mut h = Harness::new();
        let origin = Vec2::new(640.0, 400.0);
        let small = h.world.spawn_asteroid(origin + Vec2::X * 100.0, Vec2::ZERO, 20.0);
        let large = h.world.spawn_asteroid(origin - Vec2::X * 100.0, Vec2::ZERO, 60.0);
        h.bombs.trigger(origin, &mut h.clock, &h.tuning);

        let mut destroyed = 0;
        for _ in 0..100 {
            destroyed += h.step(1.0 / 60.0);
        }
        assert!(h.bombs.current_wave().is_none());
        assert_eq!(h.clock.time_scale(), 1.0);

        // Parents hit once each; the two fragments of the large one are spared
        assert_eq!(destroyed, 2);
        assert!(h.world.asteroid(small).is_none());
        assert!(h.world.asteroid(large).is_none());
        assert_eq!(h.world.live_asteroid_count(), 2);
        assert!(h.world.live_asteroids().all(|a| a.body.radius == 40.0));
        assert_eq!(h.state.asteroids_destroyed, 2);
        assert_eq!(h.state.score, 6);
    }

    #[test]
    fn test_half_expanded_wave_kills_small_asteroid() {
        let mut h = Harness::new();
        let id = h.world.spawn_asteroid(Vec2::ZERO, Vec2::ZERO, h.tuning.asteroid_min_radius);
        h.bombs.trigger(Vec2::ZERO, &mut h.clock, &h.tuning);

        assert_eq!(h.step(h.tuning.wave_duration / 2.0), 1);
        assert!(h.world.asteroid(id).is_none());
        assert_eq!(h.world.live_asteroid_count(), 0);
        assert_eq!(h.state.score, h.tuning.score_small);

        // Same asteroid set again: no double award
        assert_eq!(h.step(0.0), 0);
        assert_eq!(h.state.score, h.tuning.score_small);
        assert_eq!(h.state.asteroids_destroyed, 1);
    }

    #[test]
    fn test_wave_outside_range_is_untouched() {
        let mut h = Harness::new();
        h.world.spawn_asteroid(Vec2::new(2000.0, 0.0), Vec2::ZERO, 20.0);
        h.bombs.trigger(Vec2::ZERO, &mut h.clock, &h.tuning);
        for _ in 0..100 {
            h.step(1.0 / 60.0);
        }
        assert_eq!(h.world.live_asteroid_count(), 1);
        assert_eq!(h.state.asteroids_destroyed, 0);
    }

    #[test]
    fn test_finish_snaps_to_max_radius() {
        let t = Tuning::default();
        let mut clock = GameClock::new();
        let mut wave = BombWave::new(Vec2::ZERO, &t, &mut clock);
        wave.update(0.1, &mut clock);
        wave.mark_processed(EntityId(4));
        wave.finish(&mut clock);
        assert_eq!(wave.radius, t.wave_max_radius);
        assert!(!wave.active);
        assert!(!wave.has_processed(EntityId(4)));
        assert_eq!(clock.time_scale(), 1.0);
    }

    #[test]
    fn test_full_duration_reaches_max_radius() {
        let t = Tuning::default();
        let mut clock = GameClock::new();
        let mut wave = BombWave::new(Vec2::ZERO, &t, &mut clock);
        wave.update(t.wave_duration, &mut clock);
        assert_eq!(wave.elapsed, t.wave_duration);
        assert_eq!(wave.radius, t.wave_max_radius);
        assert_eq!(clock.time_scale(), 1.0);
        assert!(wave.is_finished());
    }

    #[test]
    fn test_zero_duration_completes_instantly() {
        let mut t = Tuning::default();
        t.wave_duration = 0.0;
        let mut clock = GameClock::new();
        let mut wave = BombWave::new(Vec2::ZERO, &t, &mut clock);
        wave.update(0.0, &mut clock);
        assert_eq!(wave.radius, t.wave_max_radius);
        assert_eq!(clock.time_scale(), 1.0);
        assert!(wave.is_finished());
    }

    #[test]
    fn test_retrigger_replaces_wave() {
        let mut h = Harness::new();
        h.bombs.trigger(Vec2::ZERO, &mut h.clock, &h.tuning);
        h.bombs.update(1.0, &mut h.clock);
        h.bombs.trigger(Vec2::new(50.0, 50.0), &mut h.clock, &h.tuning);
        let wave = h.bombs.current_wave().unwrap();
        assert_eq!(wave.origin, Vec2::new(50.0, 50.0));
        assert_eq!(wave.elapsed, 0.0);
        assert_eq!(h.clock.time_scale(), h.tuning.slowmo_min_scale);
    }

    #[test]
    fn test_wave_kill_can_drop_pickup() {
        let mut h = Harness::new();
        h.state.bombs = 0;
        h.world.spawn_asteroid(Vec2::new(10.0, 0.0), Vec2::ZERO, 20.0);
        h.bombs.trigger(Vec2::ZERO, &mut h.clock, &h.tuning);
        h.bombs.update(0.1, &mut h.clock);
        let mut rng = always_drop();
        let destroyed = h.bombs.apply_wave_effects(
            &mut h.world,
            &h.score,
            &mut h.state,
            &mut h.clock,
            &mut rng,
            &h.tuning,
        );
        assert_eq!(destroyed, 1);
        assert_eq!(h.world.pickups.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_radius_and_scale_are_monotone(steps in prop::collection::vec(0.0f32..0.2, 1..60)) {
            let t = Tuning::default();
            let mut clock = GameClock::new();
            let mut wave = BombWave::new(Vec2::ZERO, &t, &mut clock);
            let mut last_radius = wave.radius;
            let mut last_scale = clock.time_scale();
            for dt in steps {
                wave.update(dt, &mut clock);
                prop_assert!(wave.radius >= last_radius);
                prop_assert!(wave.radius <= t.wave_max_radius);
                prop_assert!(clock.time_scale() >= last_scale);
                prop_assert!(clock.time_scale() <= 1.0 + 1e-6);
                last_radius = wave.radius;
                last_scale = clock.time_scale();
            }
        }
    }
}

//! Fixed timestep simulation tick
//!
//! Core game loop that advances a run deterministically. The per-frame
//! order is load-bearing:
//!
//! 1. discrete commands (bomb, settings)
//! 2. bomb wave update on unscaled dt, then wave effects
//! 3. motion and cooldowns on clock-scaled dt
//! 4. player vs asteroids
//! 5. shots vs asteroids
//! 6. state timers and the level banner
//! 7. level completion
//! 8. pickups
//!
//! Dead entities are compacted once, after all passes.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::bomb::BombController;
use super::clock::GameClock;
use super::collision::Bounds;
use super::entity::{Player, PlayerControls};
use super::level::LevelManager;
use super::pickup::drop_from_asteroid;
use super::score::ScoreManager;
use super::state::{GameEvent, GameState};
use super::world::World;
use crate::highscores::Leaderboard;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Discrete key-down actions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Bomb,
    TogglePause,
    /// Adjust music volume by a signed step
    MusicVolume(f32),
    SfxVolume(f32),
    ToggleMusicMute,
    ToggleSfxMute,
    ScreenShake(f32),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held keys: rotate, thrust, fire
    pub controls: PlayerControls,
    /// Any key went down this frame
    pub key_pressed: bool,
    pub commands: Vec<Command>,
    /// Idle/demo mode - autopilot flies the ship
    pub idle_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    Playing,
    Paused,
    GameOver,
    /// Final level cleared
    Victory,
}

impl RunPhase {
    pub fn is_over(self) -> bool {
        matches!(self, RunPhase::GameOver | RunPhase::Victory)
    }
}

/// Snapshot read when a run ends, before it is discarded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub score: u64,
    pub high_score: u64,
    /// 1-based
    pub level_reached: u32,
    pub time_survived: f32,
    pub bombs_used: u32,
    pub pickups_collected: u32,
    pub asteroids_destroyed: u32,
    pub level_completed: bool,
}

/// One run: every collaborator the frame loop touches
#[derive(Debug, Clone)]
pub struct Run {
    pub tuning: Tuning,
    pub bounds: Bounds,
    pub state: GameState,
    pub clock: GameClock,
    pub bombs: BombController,
    pub levels: LevelManager,
    pub score: ScoreManager,
    pub world: World,
    pub player: Player,
    pub phase: RunPhase,
    pub seed: u64,
    rng: Pcg32,
    spawn_point: Vec2,
    /// Level whose music has already been asked to preload
    music_preloaded: Option<usize>,
}

impl Run {
    /// Start a run at level 1 with the stored profile data
    pub fn new(seed: u64, tuning: Tuning, settings: &Settings, stored_high_score: u64) -> Self {
        let mut state = GameState::new(&tuning).with_high_score(stored_high_score);
        state.apply_settings(settings);

        let spawn_point = tuning.spawn_point();
        let mut levels = LevelManager::new(&tuning);
        levels.configure_level(0, &mut state, &tuning);
        state.emit(GameEvent::LevelMusic {
            level: 0,
            transition_ms: 0,
        });

        Self {
            bounds: Bounds::from_tuning(&tuning),
            clock: GameClock::new(),
            bombs: BombController::new(),
            score: ScoreManager::new(&tuning),
            world: World::new(),
            player: Player::new(spawn_point, &tuning),
            phase: RunPhase::Playing,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            spawn_point,
            music_preloaded: None,
            levels,
            state,
            tuning,
        }
    }

    /// Attach the leaderboard loaded from the profile
    pub fn with_leaderboard(mut self, leaderboard: Leaderboard) -> Self {
        self.state.leaderboard = leaderboard;
        self
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            score: self.state.score,
            high_score: self.state.high_score,
            level_reached: self.state.level_index as u32 + 1,
            time_survived: self.state.run_time,
            bombs_used: self.state.bombs_used,
            pickups_collected: self.state.pickups_collected,
            asteroids_destroyed: self.state.asteroids_destroyed,
            level_completed: self.phase == RunPhase::Victory,
        }
    }

    fn apply_command(&mut self, command: Command) {
        match command {
            Command::Bomb => {
                if self.state.use_bomb() {
                    let origin = self.player.body.pos;
                    self.bombs.trigger(origin, &mut self.clock, &self.tuning);
                    self.state.emit(GameEvent::BombTriggered {
                        origin,
                        shake_duration: self.tuning.bomb_shake_duration,
                        shake_magnitude: self.tuning.bomb_shake_strength
                            * self.state.settings.screen_shake,
                    });
                    self.state
                        .trigger_bomb_flash(self.tuning.bomb_flash_duration);
                } else {
                    log::debug!("Bomb denied: none left");
                    self.state.emit(GameEvent::BombDenied);
                }
            }
            // Consumed by `tick` before dispatch
            Command::TogglePause => {}
            Command::MusicVolume(step) => {
                let volume = self.state.settings.music_volume + step;
                self.state.set_music_volume(volume);
                self.state.emit(GameEvent::SettingsChanged);
            }
            Command::SfxVolume(step) => {
                let volume = self.state.settings.sfx_volume + step;
                self.state.set_sfx_volume(volume);
                self.state.emit(GameEvent::SettingsChanged);
            }
            Command::ToggleMusicMute => {
                self.state.toggle_music_mute();
                self.state.emit(GameEvent::SettingsChanged);
            }
            Command::ToggleSfxMute => {
                self.state.toggle_sfx_mute();
                self.state.emit(GameEvent::SettingsChanged);
            }
            Command::ScreenShake(step) => {
                self.state.adjust_screen_shake(step);
                self.state.emit(GameEvent::SettingsChanged);
            }
        }
    }

    fn end(&mut self, phase: RunPhase) {
        self.phase = phase;
        self.bombs = BombController::new();
        self.clock.reset_time_scale();
        let level_completed = phase == RunPhase::Victory;
        self.state.emit(GameEvent::RunEnded { level_completed });
        log::info!(
            "Run over ({:?}): score {}, level {}, {:.1}s",
            phase,
            self.state.score,
            self.state.level_index + 1,
            self.state.run_time
        );
    }

    /// Shot pass: each asteroid and each shot is consumed at most once
    fn resolve_shot_hits(&mut self) {
        let snapshot = self.world.asteroids.len();
        for index in 0..snapshot {
            let asteroid = &self.world.asteroids[index];
            if !asteroid.alive {
                continue;
            }
            let body = asteroid.body;
            let Some(shot) = self
                .world
                .shots
                .iter_mut()
                .find(|s| s.alive && s.body.collides(&body))
            else {
                continue;
            };
            shot.alive = false;
            self.destroy_asteroid(index);
        }
    }

    fn destroy_asteroid(&mut self, index: usize) {
        let asteroid = &self.world.asteroids[index];
        let (id, pos, radius) = (asteroid.id, asteroid.body.pos, asteroid.body.radius);

        let points = self
            .score
            .add_asteroid_points(&mut self.state, &self.world.asteroids[index]);
        self.state.emit(GameEvent::AsteroidDestroyed {
            id,
            pos,
            radius,
            points,
        });
        drop_from_asteroid(pos, &mut self.state, &mut self.world, &mut self.rng, &self.tuning);
        self.state.record_asteroid_destroyed();
        self.world.split_asteroid(index, &mut self.rng, &self.tuning);
    }

    fn check_level_complete(&mut self) {
        if !self.levels.should_start_transition(&self.world) {
            return;
        }
        // Clearing the last level ends the run without a bonus
        if !self.levels.levels_remaining(&self.state) {
            self.end(RunPhase::Victory);
            return;
        }
        self.levels.apply_level_completion(&mut self.state, &self.score);

        let next = self.state.level_index + 1;
        self.player.reset(self.spawn_point, &self.tuning);
        self.world.clear_shots();
        self.levels.start_transition(next, &mut self.rng);
        self.state.emit(GameEvent::LevelMusic {
            level: next,
            transition_ms: (self.tuning.level_message_duration * 2.0 * 1000.0) as u32,
        });
    }

    /// Ask for the next level's music once half this level's quota is destroyed
    fn schedule_music_preload(&mut self) {
        if self.levels.is_transitioning() || !self.levels.levels_remaining(&self.state) {
            return;
        }
        let next = self.state.level_index + 1;
        if self.music_preloaded == Some(next) {
            return;
        }
        let threshold = self.levels.field.spawn_limit as f32 * 0.5;
        if self.state.level_asteroids_destroyed as f32 >= threshold {
            self.music_preloaded = Some(next);
            self.state.emit(GameEvent::PreloadLevelMusic { level: next });
        }
    }

    fn update_pickups(&mut self, dt: f32) {
        let player = self.player.body;
        for pickup in self.world.pickups.iter_mut().filter(|p| p.alive) {
            pickup.update(dt, &self.tuning);
            if !pickup.alive || !pickup.collides_with(player.pos, player.radius) {
                continue;
            }
            pickup.alive = false;
            self.score.add_bombs(&mut self.state, 1);
            self.state
                .trigger_bomb_flash(self.tuning.bomb_flash_duration);
            self.state.record_pickup_collected();
            self.state.emit(GameEvent::PickupCollected);
        }
    }
}

/// Advance the run by one frame
pub fn tick(run: &mut Run, input: &TickInput, dt: f32) {
    if run.is_over() {
        return;
    }

    // Handle pause toggle
    if input.commands.contains(&Command::TogglePause) {
        run.phase = match run.phase {
            RunPhase::Playing => RunPhase::Paused,
            _ => RunPhase::Playing,
        };
    }
    if run.phase == RunPhase::Paused {
        return;
    }

    let dt = dt.max(0.0);

    // Idle/demo mode - autopilot flies the ship
    let mut input = input.clone();
    if input.idle_mode {
        autopilot(run, &mut input);
    }

    // Discrete input; any key cuts the respawn shield short
    if input.key_pressed && run.player.is_invulnerable() {
        run.player
            .force_invulnerability_fade(run.tuning.invulnerability_fade_window);
    }
    for command in input.commands.iter().filter(|c| **c != Command::TogglePause) {
        run.apply_command(*command);
    }

    // Bomb wave grows on unscaled time
    run.bombs.update(dt, &mut run.clock);
    run.bombs.apply_wave_effects(
        &mut run.world,
        &run.score,
        &mut run.state,
        &mut run.clock,
        &mut run.rng,
        &run.tuning,
    );

    let scaled_dt = run.clock.scale_dt(dt);

    // Motion
    if run
        .player
        .update(scaled_dt, &input.controls, &run.tuning, &run.bounds)
    {
        let velocity = run.player.shot_velocity(&run.tuning);
        run.world
            .spawn_shot(run.player.body.pos, velocity, &run.tuning);
        run.state.emit(GameEvent::ShotFired);
    }
    for asteroid in run.world.asteroids.iter_mut().filter(|a| a.alive) {
        asteroid.body.advance(scaled_dt, &run.bounds);
    }
    for shot in run.world.shots.iter_mut().filter(|s| s.alive) {
        shot.update(scaled_dt, &run.bounds);
    }
    run.levels
        .field
        .update(scaled_dt, &mut run.world, &mut run.rng, &run.tuning);

    // Player vs asteroids
    if !run.player.is_invulnerable() {
        let player = run.player.body;
        if run.world.live_asteroids().any(|a| a.body.collides(&player)) {
            run.state.lose_life();
            if run.state.lives == 0 {
                run.end(RunPhase::GameOver);
                run.world.compact();
                return;
            }
            run.player.reset(run.spawn_point, &run.tuning);
        }
    }

    run.resolve_shot_hits();

    run.state.update(scaled_dt);
    if run.levels.update(scaled_dt, &mut run.state, &run.tuning) {
        run.music_preloaded = None;
    }
    run.schedule_music_preload();
    run.check_level_complete();

    if !run.is_over() {
        run.update_pickups(scaled_dt);
    }

    run.world.compact();
}

/// Demo pilot: turn toward the nearest asteroid, fire when lined up, bomb
/// when one gets close
fn autopilot(run: &Run, input: &mut TickInput) {
    let ship = run.player.body;
    let nearest = run.world.live_asteroids().min_by(|a, b| {
        a.body
            .pos
            .distance_squared(ship.pos)
            .partial_cmp(&b.body.pos.distance_squared(ship.pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let Some(target) = nearest else {
        input.controls = PlayerControls::default();
        return;
    };

    let to_target = target.body.pos - ship.pos;
    let angle = run.player.forward().angle_to(to_target).to_degrees();
    let rotate = if angle.abs() < 3.0 { 0.0 } else { angle.signum() };
    input.controls = PlayerControls {
        rotate,
        thrust: 0.0,
        fire: angle.abs() < 12.0,
    };

    let gap = to_target.length() - target.body.radius - ship.radius;
    let danger = gap < 60.0 && !run.player.is_invulnerable() && !run.bombs.is_active();
    if danger && run.state.bombs > 0 && !input.commands.contains(&Command::Bomb) {
        input.commands.push(Command::Bomb);
    }
}

//! Entity types: player ship, asteroids, shots and bomb pickups
//!
//! Every entity embeds a [`Body`] (position, velocity, radius). Kind-specific
//! behaviour lives on the wrapping struct.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, circles_collide, wrap_position};
use crate::tuning::Tuning;
use crate::{heading, normalize_degrees, rotate_degrees};

/// Stable identity assigned at creation, never reused within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Shared kinematic state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self { pos, vel, radius }
    }

    /// Integrate velocity and wrap around the playfield
    pub fn advance(&mut self, dt: f32, bounds: &Bounds) {
        self.pos += self.vel * dt;
        wrap_position(&mut self.pos, self.radius, bounds);
    }

    #[inline]
    pub fn collides(&self, other: &Body) -> bool {
        circles_collide(self.pos, self.radius, other.pos, other.radius)
    }
}

/// Score tier, derived from radius relative to the minimum radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidSize {
    Large,
    Medium,
    Small,
}

/// Child asteroid produced by a split, not yet placed in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: EntityId,
    pub body: Body,
    pub alive: bool,
}

impl Asteroid {
    pub fn new(id: EntityId, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            body: Body::new(pos, vel, radius),
            alive: true,
        }
    }

    pub fn size(&self, min_radius: f32) -> AsteroidSize {
        if self.body.radius > min_radius * 2.0 {
            AsteroidSize::Large
        } else if self.body.radius > min_radius {
            AsteroidSize::Medium
        } else {
            AsteroidSize::Small
        }
    }

    /// Points awarded for destroying this asteroid
    pub fn score_value(&self, tuning: &Tuning) -> u64 {
        match self.size(tuning.asteroid_min_radius) {
            AsteroidSize::Large => tuning.score_large,
            AsteroidSize::Medium => tuning.score_medium,
            AsteroidSize::Small => tuning.score_small,
        }
    }

    pub fn can_split(&self, tuning: &Tuning) -> bool {
        self.body.radius > tuning.asteroid_min_radius
    }

    /// Destroy this asteroid and return the two fragments it breaks into
    ///
    /// Asteroids at or below the minimum radius are destroyed with no children.
    /// Fragments share one random angle, mirrored, so they fly apart on
    /// either side of the parent's heading and faster than it.
    pub fn split<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) -> Option<[Fragment; 2]> {
        self.alive = false;
        if !self.can_split(tuning) {
            return None;
        }

        let angle = rng.random_range(tuning.split_angle_range());
        let radius = self.body.radius - tuning.asteroid_min_radius;
        let boost = tuning.split_speed_boost;
        let pos = self.body.pos;

        Some([
            Fragment {
                pos,
                vel: rotate_degrees(self.body.vel, angle) * boost,
                radius,
            },
            Fragment {
                pos,
                vel: rotate_degrees(self.body.vel, -angle) * boost,
                radius,
            },
        ])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub id: EntityId,
    pub body: Body,
    /// Seconds left before the shot fizzles
    pub lifetime: f32,
    pub alive: bool,
}

impl Shot {
    pub fn new(id: EntityId, pos: Vec2, vel: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            body: Body::new(pos, vel, tuning.shot_radius),
            lifetime: tuning.shot_lifetime,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32, bounds: &Bounds) {
        self.body.advance(dt, bounds);
        self.lifetime = (self.lifetime - dt).max(0.0);
        if self.lifetime <= 0.0 {
            self.alive = false;
        }
    }
}

/// Continuous control state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerControls {
    /// -1.0 turns one way, 1.0 the other
    pub rotate: f32,
    /// 1.0 forward, -1.0 reverse
    pub thrust: f32,
    pub fire: bool,
}

/// Respawn shield state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Invulnerability {
    pub active: bool,
    pub timer: f32,
    pub duration: f32,
    pub fading: bool,
    pub fade_elapsed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Degrees
    pub rotation: f32,
    /// Seconds until the next shot may fire
    pub shoot_timer: f32,
    pub shield: Invulnerability,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            body: Body::new(pos, Vec2::ZERO, tuning.player_radius),
            rotation: 0.0,
            shoot_timer: 0.0,
            shield: Invulnerability::default(),
        }
    }

    /// Respawn in place after a lost life or a level transition
    pub fn reset(&mut self, pos: Vec2, tuning: &Tuning) {
        self.body.pos = pos;
        self.body.vel = Vec2::ZERO;
        self.rotation = 0.0;
        self.shoot_timer = 0.0;
        self.start_invulnerability(tuning.respawn_invulnerability);
    }

    pub fn is_invulnerable(&self) -> bool {
        self.shield.active
    }

    pub fn start_invulnerability(&mut self, duration: f32) {
        self.shield = Invulnerability {
            active: true,
            timer: duration.max(0.0),
            duration: duration.max(0.0),
            fading: false,
            fade_elapsed: 0.0,
        };
    }

    pub fn end_invulnerability(&mut self) {
        self.shield = Invulnerability::default();
    }

    /// Cut the shield short: jump straight into its fade-out window
    pub fn force_invulnerability_fade(&mut self, fade_window: f32) {
        if !self.shield.active {
            return;
        }
        if !self.shield.fading {
            self.shield.fading = true;
            self.shield.fade_elapsed = 0.0;
        }
        self.shield.timer = self.shield.timer.min(fade_window);
    }

    /// Shield opacity in 0..=1 (1 until the fade window starts)
    pub fn shield_alpha(&self, fade_window: f32) -> f32 {
        if !self.shield.active || self.shield.duration <= 0.0 {
            return 0.0;
        }
        if !self.shield.fading || fade_window <= 0.0 {
            return 1.0;
        }
        (self.shield.timer.clamp(0.0, fade_window)) / fade_window
    }

    pub fn forward(&self) -> Vec2 {
        heading(self.rotation)
    }

    /// Velocity a freshly fired shot inherits
    pub fn shot_velocity(&self, tuning: &Tuning) -> Vec2 {
        self.forward() * tuning.shoot_speed
    }

    fn update_shield(&mut self, dt: f32, fade_window: f32) {
        if !self.shield.active {
            return;
        }
        self.shield.timer = (self.shield.timer - dt).max(0.0);

        if self.shield.timer <= fade_window && !self.shield.fading {
            self.shield.fading = true;
            self.shield.fade_elapsed = 0.0;
        }
        if self.shield.fading {
            self.shield.fade_elapsed += dt;
        }
        if self.shield.timer <= 0.0 {
            self.end_invulnerability();
        }
    }

    /// Advance one frame; returns true when a shot should be fired
    pub fn update(
        &mut self,
        dt: f32,
        controls: &PlayerControls,
        tuning: &Tuning,
        bounds: &Bounds,
    ) -> bool {
        self.update_shield(dt, tuning.invulnerability_fade_window);

        let turn = controls.rotate.clamp(-1.0, 1.0);
        if turn != 0.0 {
            self.rotation = normalize_degrees(self.rotation + tuning.player_turn_speed * turn * dt);
        }

        let thrust = controls.thrust.clamp(-1.0, 1.0);
        if thrust != 0.0 {
            self.body.pos += self.forward() * tuning.player_speed * thrust * dt;
        }

        let mut fired = false;
        if controls.fire && self.shoot_timer <= 0.0 {
            self.shoot_timer = tuning.shoot_cooldown;
            fired = true;
        }
        self.shoot_timer = (self.shoot_timer - dt).max(0.0);

        wrap_position(&mut self.body.pos, self.body.radius, bounds);
        fired
    }
}

/// Collectible that grants one bomb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombPickup {
    pub id: EntityId,
    pub body: Body,
    /// Anchor the bobbing motion oscillates around
    pub base_pos: Vec2,
    /// Seconds before the pickup disappears
    pub lifetime: f32,
    /// Seconds since spawn (drives bobbing and flicker)
    pub age: f32,
    pub alive: bool,
}

impl BombPickup {
    pub fn new(id: EntityId, pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            id,
            body: Body::new(pos, Vec2::ZERO, tuning.pickup_radius),
            base_pos: pos,
            lifetime: tuning.pickup_lifetime,
            age: 0.0,
            alive: true,
        }
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        self.age += dt;
        self.lifetime = (self.lifetime - dt).max(0.0);
        let bob = (self.age * tuning.pickup_bob_speed).sin() * tuning.pickup_bob_height;
        self.body.pos = Vec2::new(self.base_pos.x, self.base_pos.y + bob);
        if self.lifetime <= 0.0 {
            self.alive = false;
        }
    }

    /// Close to expiry the pickup starts flickering
    pub fn is_flickering(&self, tuning: &Tuning) -> bool {
        self.lifetime <= tuning.pickup_flicker_time
    }

    /// Whether the bomb glyph is lit this frame (toggles at 10 Hz while flickering)
    pub fn letter_on(&self, tuning: &Tuning) -> bool {
        if !self.is_flickering(tuning) {
            return true;
        }
        (self.age * 10.0) as u32 % 2 == 0
    }

    pub fn collides_with(&self, pos: Vec2, radius: f32) -> bool {
        if self.lifetime <= 0.0 {
            return false;
        }
        circles_collide(self.body.pos, self.body.radius, pos, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bounds(t: &Tuning) -> Bounds {
        Bounds::from_tuning(t)
    }

    #[test]
    fn test_score_tiers() {
        let t = Tuning::default();
        let make = |r| Asteroid::new(EntityId(1), Vec2::ZERO, Vec2::ZERO, r);
        assert_eq!(make(60.0).score_value(&t), 1);
        assert_eq!(make(40.0).score_value(&t), 3);
        assert_eq!(make(20.0).score_value(&t), 5);
        // Exactly twice the minimum is still medium
        assert_eq!(make(40.0).size(20.0), AsteroidSize::Medium);
        assert_eq!(make(40.1).size(20.0), AsteroidSize::Large);
    }

    #[test]
    fn test_split_with_swapped_angles() {
        let t = Tuning {
            split_min_angle: 50.0,
            split_max_angle: 20.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(8);
        let vel = Vec2::new(0.0, 50.0);
        let mut a = Asteroid::new(EntityId(1), Vec2::ZERO, vel, 60.0);

        let fragments = a.split(&mut rng, &t).expect("large asteroid splits");
        let angle = vel.angle_to(fragments[0].vel).to_degrees().abs();
        assert!((20.0 - 1e-3..=50.0 + 1e-3).contains(&angle), "angle {angle}");
    }

    #[test]
    fn test_split_produces_two_smaller_fragments() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let vel = Vec2::new(50.0, 0.0);
        let mut a = Asteroid::new(EntityId(1), Vec2::new(300.0, 300.0), vel, 60.0);

        let fragments = a.split(&mut rng, &t).expect("large asteroid splits");
        assert!(!a.alive);
        for f in &fragments {
            assert_eq!(f.radius, 40.0);
            assert_eq!(f.pos, Vec2::new(300.0, 300.0));
            // 1.2x boost
            assert!((f.vel.length() - 60.0).abs() < 1e-3);
            let angle = vel.angle_to(f.vel).to_degrees().abs();
            assert!((20.0 - 1e-3..=50.0 + 1e-3).contains(&angle), "angle {angle}");
        }
        // Mirrored either side of the parent heading
        let a0 = vel.angle_to(fragments[0].vel);
        let a1 = vel.angle_to(fragments[1].vel);
        assert!((a0 + a1).abs() < 1e-4);
    }

    #[test]
    fn test_split_at_min_radius_has_no_children() {
        let t = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut a = Asteroid::new(EntityId(1), Vec2::ZERO, Vec2::X, 20.0);
        assert!(a.split(&mut rng, &t).is_none());
        assert!(!a.alive);
    }

    #[test]
    fn test_shot_expires() {
        let t = Tuning::default();
        let mut shot = Shot::new(EntityId(1), Vec2::new(500.0, 400.0), Vec2::ZERO, &t);
        shot.update(t.shot_lifetime - 0.1, &bounds(&t));
        assert!(shot.alive);
        shot.update(0.2, &bounds(&t));
        assert!(!shot.alive);
        assert_eq!(shot.lifetime, 0.0);
    }

    #[test]
    fn test_player_fire_respects_cooldown() {
        let t = Tuning::default();
        let mut p = Player::new(t.spawn_point(), &t);
        let controls = PlayerControls {
            fire: true,
            ..Default::default()
        };
        assert!(p.update(0.2, &controls, &t, &bounds(&t)));
        assert!(!p.update(0.2, &controls, &t, &bounds(&t)));
        // Cooldown clamps at zero rather than going negative
        assert_eq!(p.shoot_timer, 0.0);
        assert!(p.update(0.2, &controls, &t, &bounds(&t)));
    }

    #[test]
    fn test_player_thrust_moves_along_heading() {
        let t = Tuning::default();
        let start = t.spawn_point();
        let mut p = Player::new(start, &t);
        let controls = PlayerControls {
            thrust: 1.0,
            ..Default::default()
        };
        p.update(0.5, &controls, &t, &bounds(&t));
        assert!((p.body.pos - (start + Vec2::Y * 100.0)).length() < 1e-3);
    }

    #[test]
    fn test_invulnerability_counts_down_and_fades() {
        let t = Tuning::default();
        let mut p = Player::new(t.spawn_point(), &t);
        p.reset(t.spawn_point(), &t);
        assert!(p.is_invulnerable());
        assert_eq!(p.shield_alpha(t.invulnerability_fade_window), 1.0);

        let idle = PlayerControls::default();
        p.update(3.5, &idle, &t, &bounds(&t));
        assert!(p.shield.fading);
        assert!(p.shield_alpha(t.invulnerability_fade_window) < 1.0);

        p.update(2.0, &idle, &t, &bounds(&t));
        assert!(!p.is_invulnerable());
        assert_eq!(p.shield.timer, 0.0);
    }

    #[test]
    fn test_force_fade_clamps_timer() {
        let t = Tuning::default();
        let mut p = Player::new(t.spawn_point(), &t);
        p.start_invulnerability(5.0);
        p.force_invulnerability_fade(t.invulnerability_fade_window);
        assert!(p.shield.fading);
        assert_eq!(p.shield.timer, 2.0);

        // No-op once the shield is gone
        p.end_invulnerability();
        p.force_invulnerability_fade(t.invulnerability_fade_window);
        assert!(!p.shield.active);
    }

    #[test]
    fn test_pickup_lifetime_and_collision() {
        let t = Tuning::default();
        let mut pickup = BombPickup::new(EntityId(3), Vec2::ZERO, &t);
        assert!(pickup.collides_with(Vec2::ZERO, 0.0));
        assert!(!pickup.collides_with(Vec2::new(100.0, 100.0), 0.0));

        let mut elapsed = 0.0;
        while pickup.alive && elapsed < t.pickup_lifetime + 1.0 {
            pickup.update(1.0, &t);
            elapsed += 1.0;
        }
        assert!(!pickup.alive);
        assert!(!pickup.collides_with(pickup.body.pos, 50.0));
    }

    #[test]
    fn test_pickup_bobs_vertically_only() {
        let t = Tuning::default();
        let mut pickup = BombPickup::new(EntityId(3), Vec2::new(200.0, 300.0), &t);
        pickup.update(0.3, &t);
        assert_eq!(pickup.body.pos.x, 200.0);
        assert!((pickup.body.pos.y - 300.0).abs() <= t.pickup_bob_height);
        assert!(!pickup.is_flickering(&t));
        assert!(pickup.letter_on(&t));
    }
}

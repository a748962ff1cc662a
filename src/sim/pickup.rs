//! Bomb pickup drops

use glam::Vec2;
use rand::Rng;

use super::entity::EntityId;
use super::state::{GameEvent, GameState};
use super::world::World;
use crate::tuning::Tuning;

/// Drop probability for a level: base + per-level bonus, capped
pub fn drop_chance(level_index: usize, tuning: &Tuning) -> f32 {
    (tuning.pickup_base_chance + level_index as f32 * tuning.pickup_level_bonus)
        .min(tuning.pickup_max_chance)
}

pub fn should_drop_pickup<R: Rng>(level_index: usize, rng: &mut R, tuning: &Tuning) -> bool {
    rng.random::<f32>() < drop_chance(level_index, tuning)
}

/// Maybe leave a bomb pickup where an asteroid was destroyed
///
/// Nothing drops while the player's bombs are already at the cap.
pub fn drop_from_asteroid<R: Rng>(
    pos: Vec2,
    state: &mut GameState,
    world: &mut World,
    rng: &mut R,
    tuning: &Tuning,
) -> Option<EntityId> {
    if state.has_full_bombs() {
        return None;
    }
    if !should_drop_pickup(state.level_index, rng, tuning) {
        return None;
    }
    let id = world.spawn_pickup(pos, tuning);
    state.emit(GameEvent::PickupDropped { pos });
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_rng::{always_drop, never_drop};

    #[test]
    fn test_chance_is_capped() {
        let t = Tuning::default();
        assert!((drop_chance(0, &t) - 0.05).abs() < 1e-6);
        assert!((drop_chance(5, &t) - 0.10).abs() < 1e-6);
        assert_eq!(drop_chance(500, &t), t.pickup_max_chance);
    }

    #[test]
    fn test_should_drop_follows_rng() {
        let t = Tuning::default();
        assert!(should_drop_pickup(0, &mut always_drop(), &t));
        assert!(!should_drop_pickup(50, &mut never_drop(), &t));
    }

    #[test]
    fn test_drop_respects_bomb_cap() {
        let t = Tuning::default();
        let mut state = GameState::new(&t);
        let mut world = World::new();
        state.bombs = t.bomb_cap;

        let mut rng = always_drop();
        assert!(drop_from_asteroid(Vec2::ZERO, &mut state, &mut world, &mut rng, &t).is_none());
        assert!(world.pickups.is_empty());

        state.bombs = 0;
        let id = drop_from_asteroid(Vec2::new(5.0, 6.0), &mut state, &mut world, &mut rng, &t);
        assert!(id.is_some());
        assert_eq!(world.pickups.len(), 1);
        assert_eq!(world.pickups[0].body.pos, Vec2::new(5.0, 6.0));
    }
}

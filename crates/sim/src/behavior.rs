use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilestep_common::{EntityId, VecExt};
use tilestep_input::InputState;
use tilestep_kernel::{Entity, World, move_entity};

use crate::error::SimError;

/// A strategy that turns an entity's state into a desired displacement each
/// tick. Behaviors never touch positions themselves; they go through
/// [`move_entity`] like any other mover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    WalkInCircle(WalkInCircle),
}

impl Behavior {
    /// Run one tick for entity `id`. Returns whether the entity moved.
    pub fn update(&mut self, world: &mut World, id: EntityId, dt: f32) -> Result<bool, SimError> {
        match self {
            Self::WalkInCircle(walk) => walk.update(world, id, dt),
        }
    }
}

/// Patrol around a fixed center at the entity's speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkInCircle {
    pub angle: f32,
    pub radius: f32,
    pub center: Vec2,
}

impl WalkInCircle {
    /// Circle of `radius` passing through the entity's current position, with
    /// the center to its left. The radius must be positive and finite.
    pub fn around(entity: &Entity, radius: f32) -> Result<Self, SimError> {
        if !entity.can_move() {
            return Err(SimError::NotMovable(entity.id()));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidRadius(radius));
        }
        Ok(Self {
            angle: 0.0,
            radius,
            center: entity.position() - Vec2::new(radius, 0.0),
        })
    }

    /// Point on the circle at `angle`.
    pub fn point_at(&self, angle: f32) -> Vec2 {
        self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius
    }

    fn update(&mut self, world: &mut World, id: EntityId, dt: f32) -> Result<bool, SimError> {
        let entity = world.get(id).ok_or(SimError::UnknownEntity(id))?;
        let speed = entity.speed().ok_or(SimError::NotMovable(id))?;

        let angular_speed = speed / self.radius;
        let target_angle = self.angle + angular_speed * dt;
        let delta = self.point_at(target_angle) - entity.position();

        let moved = move_entity(world, id, delta)?;
        // Stay on the same angle while blocked so the patrol resumes in place.
        if moved {
            self.angle = target_angle;
        }
        Ok(moved)
    }
}

/// Steer the player from this tick's input.
///
/// A held direction wins and cancels any click target. Otherwise the player
/// steps toward the target, never past it; the target is dropped on arrival
/// or when the step is blocked.
pub fn drive_player(
    world: &mut World,
    id: EntityId,
    input: &mut InputState,
    dt: f32,
    arrive_epsilon: f32,
) -> Result<bool, SimError> {
    let entity = world.get(id).ok_or(SimError::UnknownEntity(id))?;
    let speed = entity.speed().ok_or(SimError::NotMovable(id))?;
    let position = entity.position();

    if let Some(direction) = input.direction {
        input.clear_target();
        return Ok(move_entity(world, id, direction.as_vec2() * speed * dt)?);
    }

    let Some(target) = input.target else {
        return Ok(false);
    };

    let to_target = target - position;
    let distance = to_target.length();
    if distance < arrive_epsilon {
        input.clear_target();
        return Ok(false);
    }

    let step = to_target.direction() * (speed * dt).min(distance);
    let moved = move_entity(world, id, step)?;
    if !moved {
        input.clear_target();
    }
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilestep_input::Direction;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn walk_requires_movable_entity() {
        let still = Entity::circle("rock", Vec2::ZERO, 5.0);
        assert!(matches!(WalkInCircle::around(&still, 80.0), Err(SimError::NotMovable(_))));
    }

    #[test]
    fn walk_requires_positive_radius() {
        let npc = Entity::circle("npc", Vec2::ZERO, 5.0).with_speed(2.0);
        for radius in [0.0, -3.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(WalkInCircle::around(&npc, radius), Err(SimError::InvalidRadius(_))));
        }
    }

    #[test]
    fn walk_starts_on_the_circle() {
        let npc = Entity::circle("npc", Vec2::new(100.0, 0.0), 15.0).with_speed(2.0);
        let walk = WalkInCircle::around(&npc, 80.0).unwrap();
        assert_eq!(walk.center, Vec2::new(20.0, 0.0));
        assert!(approx(walk.point_at(0.0), npc.position()));
    }

    #[test]
    fn walk_advances_along_the_circle() {
        let mut world = World::new();
        let npc = Entity::circle("npc", Vec2::new(80.0, 0.0), 15.0).with_speed(40.0);
        let mut behavior = Behavior::WalkInCircle(WalkInCircle::around(&npc, 80.0).unwrap());
        let id = world.spawn(npc);

        for _ in 0..10 {
            assert!(behavior.update(&mut world, id, 0.1).unwrap());
        }
        let Behavior::WalkInCircle(walk) = &behavior;
        // 40 units/s on an 80 radius: 0.5 rad/s, one second elapsed.
        assert!((walk.angle - 0.5).abs() < 1e-4);
        let p = world.get(id).unwrap().position();
        assert!(((p - walk.center).length() - 80.0).abs() < 1e-2);
        assert!(approx(p, walk.point_at(0.5)));
    }

    #[test]
    fn blocked_walk_keeps_its_angle() {
        let mut world = World::new();
        let npc = Entity::boxed("npc", Vec2::ZERO, Vec2::splat(10.0)).with_speed(100.0);
        let mut walk = WalkInCircle::around(&npc, 50.0).unwrap();
        let id = world.spawn(npc);
        // Boxed in on both sides the patrol would need.
        world.spawn(Entity::boxed("wall", Vec2::new(0.0, 10.0), Vec2::splat(10.0)));
        world.spawn(Entity::boxed("wall", Vec2::new(-10.0, 0.0), Vec2::splat(10.0)));

        assert!(!walk.update(&mut world, id, 0.1).unwrap());
        assert_eq!(walk.angle, 0.0);
        assert_eq!(world.get(id).unwrap().position(), Vec2::ZERO);
    }

    #[test]
    fn player_follows_direction_and_cancels_target() {
        let mut world = World::new();
        let id = world.spawn(Entity::circle("player", Vec2::ZERO, 12.0).with_speed(60.0));
        let mut input = InputState {
            direction: Some(Direction::new(1, 0)),
            target: Some(Vec2::new(0.0, 100.0)),
        };
        assert!(drive_player(&mut world, id, &mut input, 0.5, 0.05).unwrap());
        assert_eq!(world.get(id).unwrap().position(), Vec2::new(30.0, 0.0));
        assert_eq!(input.target, None);
    }

    #[test]
    fn player_walks_to_target_without_overshoot() {
        let mut world = World::new();
        let id = world.spawn(Entity::circle("player", Vec2::ZERO, 12.0).with_speed(60.0));
        let mut input = InputState::with_target(Vec2::new(40.0, 0.0));

        assert!(drive_player(&mut world, id, &mut input, 0.5, 0.05).unwrap());
        assert!(approx(world.get(id).unwrap().position(), Vec2::new(30.0, 0.0)));
        assert!(drive_player(&mut world, id, &mut input, 0.5, 0.05).unwrap());
        assert!(approx(world.get(id).unwrap().position(), Vec2::new(40.0, 0.0)));
        // Arrived: the next tick drops the target without moving.
        assert!(!drive_player(&mut world, id, &mut input, 0.5, 0.05).unwrap());
        assert_eq!(input.target, None);
    }

    #[test]
    fn blocked_player_drops_target() {
        let mut world = World::new();
        let id = world.spawn(Entity::boxed("player", Vec2::ZERO, Vec2::splat(10.0)).with_speed(60.0));
        world.spawn(Entity::boxed("crate", Vec2::new(10.0, -50.0), Vec2::new(10.0, 100.0)));
        let mut input = InputState::with_target(Vec2::new(100.0, 0.0));
        assert!(!drive_player(&mut world, id, &mut input, 0.1, 0.05).unwrap());
        assert_eq!(input.target, None);
    }

    #[test]
    fn idle_input_does_nothing() {
        let mut world = World::new();
        let id = world.spawn(Entity::circle("player", Vec2::ZERO, 12.0).with_speed(60.0));
        let mut input = InputState::new();
        assert!(!drive_player(&mut world, id, &mut input, 0.1, 0.05).unwrap());
        assert_eq!(world.get(id).unwrap().position(), Vec2::ZERO);
    }
}

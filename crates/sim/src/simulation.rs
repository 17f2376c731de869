use std::collections::BTreeMap;

use tilestep_common::EntityId;
use tilestep_input::InputState;
use tilestep_kernel::World;

use crate::behavior::{Behavior, drive_player};
use crate::clock::FixedTimestep;
use crate::config::SimConfig;
use crate::error::SimError;

/// Per-tick movement counts for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub moved: usize,
    pub blocked: usize,
}

/// Drives the world one fixed tick at a time.
///
/// Within a tick the player moves first, then every entity with a behavior in
/// world order. Each move observes the positions committed before it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    config: SimConfig,
    clock: FixedTimestep,
    player: Option<EntityId>,
    behaviors: BTreeMap<EntityId, Behavior>,
    tick: u64,
}

impl Simulation {
    pub fn new(world: World, config: SimConfig) -> Self {
        let clock = FixedTimestep::new(config.step(), config.max_frame_time);
        Self {
            world,
            config,
            clock,
            player: None,
            behaviors: BTreeMap::new(),
            tick: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    /// Mark the entity steered by input. It must exist and have a speed.
    pub fn set_player(&mut self, id: EntityId) -> Result<(), SimError> {
        let entity = self.world.get(id).ok_or(SimError::UnknownEntity(id))?;
        if !entity.can_move() {
            return Err(SimError::NotMovable(id));
        }
        self.player = Some(id);
        Ok(())
    }

    /// Give a movable entity its behavior. An entity has at most one; the
    /// previous behavior, if any, is replaced and returned.
    pub fn attach(&mut self, id: EntityId, behavior: Behavior) -> Result<Option<Behavior>, SimError> {
        let entity = self.world.get(id).ok_or(SimError::UnknownEntity(id))?;
        if !entity.can_move() {
            return Err(SimError::NotMovable(id));
        }
        Ok(self.behaviors.insert(id, behavior))
    }

    pub fn behavior(&self, id: EntityId) -> Option<&Behavior> {
        self.behaviors.get(&id)
    }

    /// Run exactly one tick.
    pub fn update(&mut self, input: &mut InputState) -> Result<TickStats, SimError> {
        self.tick += 1;
        let _span = tracing::info_span!("tick", tick = self.tick).entered();
        let dt = self.clock.step();
        let mut stats = TickStats::default();
        let mut record = |moved: bool| {
            if moved {
                stats.moved += 1;
            } else {
                stats.blocked += 1;
            }
        };

        // An entity moves at most once per tick: input-driven players skip their behaviors.
        let mut driven = None;
        if let Some(player) = self.player {
            if input.direction.is_some() || input.target.is_some() {
                record(drive_player(&mut self.world, player, input, dt, self.config.arrive_epsilon)?);
                driven = Some(player);
            }
        }

        let order: Vec<EntityId> = self.world.entities().iter().map(|e| e.id()).collect();
        for id in order {
            if driven == Some(id) {
                continue;
            }
            let Some(behavior) = self.behaviors.get_mut(&id) else {
                continue;
            };
            record(behavior.update(&mut self.world, id, dt)?);
        }

        tracing::trace!(moved = stats.moved, blocked = stats.blocked, "tick complete");
        Ok(stats)
    }

    /// Feed one frame's elapsed seconds and run the ticks it pays for.
    /// Returns the number of ticks run.
    pub fn frame(&mut self, frame_time: f32, input: &mut InputState) -> Result<u32, SimError> {
        let ticks = self.clock.advance(frame_time);
        for _ in 0..ticks {
            self.update(input)?;
        }
        Ok(ticks)
    }

    /// Drop behaviors of entities that left the world.
    pub fn prune(&mut self) {
        let world = &self.world;
        self.behaviors.retain(|id, _| world.get(*id).is_some());
        if self.player.is_some_and(|id| world.get(id).is_none()) {
            self.player = None;
        }
    }

    /// Mutable world access for setup code (spawning, despawning) between ticks.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::WalkInCircle;
    use glam::Vec2;
    use tilestep_input::Direction;
    use tilestep_kernel::{Collider, Entity};
    use tilestep_tiles::{TileCollisionMap, TileCoord, TileLayer, Tileset};

    fn config() -> SimConfig {
        SimConfig {
            tick_rate: 10,
            ..SimConfig::default()
        }
    }

    #[test]
    fn player_moves_each_tick() {
        let mut world = World::new();
        let id = world.spawn(Entity::circle("player", Vec2::ZERO, 12.0).with_speed(50.0));
        let mut sim = Simulation::new(world, config());
        sim.set_player(id).unwrap();

        let mut input = InputState {
            direction: Some(Direction::new(1, 0)),
            target: None,
        };
        for _ in 0..4 {
            sim.update(&mut input).unwrap();
        }
        assert_eq!(sim.tick(), 4);
        let p = sim.world().get(id).unwrap().position();
        assert!((p.x - 20.0).abs() < 1e-3);
    }

    #[test]
    fn player_without_speed_is_rejected() {
        let mut world = World::new();
        let id = world.spawn(Entity::circle("statue", Vec2::ZERO, 12.0));
        let mut sim = Simulation::new(world, config());
        assert!(matches!(sim.set_player(id), Err(SimError::NotMovable(_))));
        assert!(matches!(
            sim.set_player(EntityId::new()),
            Err(SimError::UnknownEntity(_))
        ));
    }

    #[test]
    fn frame_runs_accumulated_ticks() {
        let mut sim = Simulation::new(World::new(), config());
        let mut input = InputState::new();
        assert_eq!(sim.frame(0.25, &mut input).unwrap(), 2);
        assert_eq!(sim.frame(0.06, &mut input).unwrap(), 1);
        // Clamped to max_frame_time.
        assert_eq!(sim.frame(5.0, &mut input).unwrap(), 2);
        assert_eq!(sim.tick(), 5);
    }

    #[test]
    fn behaviors_run_in_world_order_and_see_earlier_commits() {
        let mut world = World::new();
        let first = Entity::boxed("first", Vec2::ZERO, Vec2::splat(10.0)).with_speed(100.0);
        let second = Entity::boxed("second", Vec2::new(0.0, 12.0), Vec2::splat(10.0)).with_speed(100.0);
        // Both patrols head into the 2-unit gap between the boxes on the first tick.
        let walk_first = WalkInCircle {
            angle: -std::f32::consts::FRAC_PI_2,
            radius: 10.0,
            center: Vec2::new(0.0, 10.0),
        };
        let walk_second = WalkInCircle {
            angle: std::f32::consts::FRAC_PI_2,
            radius: 10.0,
            center: Vec2::new(0.0, 2.0),
        };
        let a = world.spawn(first);
        let b = world.spawn(second);
        let mut sim = Simulation::new(world, config());
        sim.attach(a, Behavior::WalkInCircle(walk_first)).unwrap();
        sim.attach(b, Behavior::WalkInCircle(walk_second)).unwrap();

        let stats = sim.update(&mut InputState::new()).unwrap();
        assert_eq!(stats.moved + stats.blocked, 2);

        let pa = sim.world().get(a).unwrap().position();
        let pb = sim.world().get(b).unwrap().position();
        let box10 = Collider::rect(10.0, 10.0);
        assert!(box10.measure(pa, &box10, pb).unwrap() >= -1e-4);
    }

    #[test]
    fn npc_patrol_is_deflected_by_tiles() {
        let mut map = TileCollisionMap::new(16.0).unwrap();
        map.add_tileset(Tileset::new("walls", 1).with_tile(0, vec![Collider::rect(16.0, 16.0)]));
        let layer = map.add_layer(TileLayer::new(1, "walls"));
        for x in -10..10 {
            map.set_tile(layer, TileCoord::new(x, 2), 1).unwrap();
        }

        let mut world = World::with_tiles(map);
        let npc = Entity::circle("npc", Vec2::new(0.0, 0.0), 8.0).with_speed(200.0);
        let walk = WalkInCircle::around(&npc, 40.0).unwrap();
        let id = world.spawn(npc);
        let mut sim = Simulation::new(world, config());
        sim.attach(id, Behavior::WalkInCircle(walk)).unwrap();

        let mut input = InputState::new();
        for _ in 0..50 {
            sim.update(&mut input).unwrap();
            let p = sim.world().get(id).unwrap().position();
            // Bottom of the npc square never sinks into the wall row at y = 32.
            assert!(p.y + 8.0 <= 32.0 + 1e-3, "npc entered wall at {p:?}");
        }
    }

    #[test]
    fn input_driven_player_skips_its_behaviors() {
        let mut world = World::new();
        let player = Entity::circle("player", Vec2::ZERO, 8.0).with_speed(10.0);
        let walk = WalkInCircle::around(&player, 20.0).unwrap();
        let id = world.spawn(player);
        let mut sim = Simulation::new(world, config());
        sim.attach(id, Behavior::WalkInCircle(walk)).unwrap();
        sim.set_player(id).unwrap();

        let mut input = InputState {
            direction: Some(Direction::new(0, 1)),
            target: None,
        };
        let stats = sim.update(&mut input).unwrap();
        assert_eq!(stats.moved, 1);
        assert_eq!(sim.world().get(id).unwrap().position(), Vec2::new(0.0, 1.0));

        // Idle input hands the entity back to its patrol.
        let stats = sim.update(&mut InputState::new()).unwrap();
        assert_eq!(stats.moved, 1);
        assert_ne!(sim.world().get(id).unwrap().position(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn second_behavior_replaces_the_first() {
        let mut world = World::new();
        let npc = Entity::circle("npc", Vec2::ZERO, 8.0).with_speed(10.0);
        let first = WalkInCircle::around(&npc, 20.0).unwrap();
        let second = WalkInCircle::around(&npc, 40.0).unwrap();
        let id = world.spawn(npc);
        let mut sim = Simulation::new(world, config());

        assert_eq!(sim.attach(id, Behavior::WalkInCircle(first.clone())).unwrap(), None);
        let replaced = sim.attach(id, Behavior::WalkInCircle(second.clone())).unwrap();
        assert_eq!(replaced, Some(Behavior::WalkInCircle(first)));

        // One resolver pass for the entity, following the patrol that is left.
        let stats = sim.update(&mut InputState::new()).unwrap();
        assert_eq!(stats.moved + stats.blocked, 1);
        let p = sim.world().get(id).unwrap().position();
        let angle = 10.0 / 40.0 * 0.1;
        assert!((p - second.point_at(angle)).length() < 1e-3, "{p:?}");
    }

    #[test]
    fn prune_drops_departed_entities() {
        let mut world = World::new();
        let npc = Entity::circle("npc", Vec2::ZERO, 8.0).with_speed(10.0);
        let walk = WalkInCircle::around(&npc, 20.0).unwrap();
        let id = world.spawn(npc);
        let mut sim = Simulation::new(world, config());
        sim.attach(id, Behavior::WalkInCircle(walk)).unwrap();
        sim.set_player(id).unwrap();

        sim.world_mut().despawn(id);
        sim.prune();
        assert!(sim.behavior(id).is_none());
        assert_eq!(sim.player(), None);
    }
}

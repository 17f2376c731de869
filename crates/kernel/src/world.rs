use glam::Vec2;
use tilestep_common::EntityId;

use crate::collider::{Aabb, Collider};
use crate::entity::Entity;

/// Read-only access to the static tile colliders.
///
/// Implementations are populated by the map loader before the simulation
/// starts; the collision core never writes to them.
pub trait TileQuery: std::fmt::Debug {
    /// Invoke `visitor(colliders, tile_world_position)` for every tile whose
    /// collider set is non-empty and whose cell could intersect `region`.
    ///
    /// Tiles are visited row-major by tile coordinate (y, then x). The walk
    /// stops as soon as the visitor returns `false`.
    fn walk(&self, region: Aabb, visitor: &mut dyn FnMut(&[Collider], Vec2) -> bool);
}

/// A world without static geometry.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTiles;

impl TileQuery for NoTiles {
    fn walk(&self, _region: Aabb, _visitor: &mut dyn FnMut(&[Collider], Vec2) -> bool) {}
}

/// Dynamic entities plus the static tile collision data.
///
/// Entities are kept in spawn order; that order is the order in which the
/// resolver scans obstacles and in which the simulation ticks entities.
#[derive(Debug)]
pub struct World {
    entities: Vec<Entity>,
    tiles: Box<dyn TileQuery>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create an empty world with no static tiles.
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            tiles: Box::new(NoTiles),
        }
    }

    /// Create an empty world backed by the given tile collision data.
    pub fn with_tiles(tiles: impl TileQuery + 'static) -> Self {
        Self {
            entities: Vec::new(),
            tiles: Box::new(tiles),
        }
    }

    /// Append an entity. Returns its id.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        tracing::debug!(id = %id.short(), name = %entity.name, "spawn");
        self.entities.push(entity);
        id
    }

    /// Remove an entity, preserving the order of the rest.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }

    /// Entities in spawn order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn tiles(&self) -> &dyn TileQuery {
        self.tiles.as_ref()
    }

    /// Write a resolved position. Only the movement resolver calls this.
    pub(crate) fn commit_position(&mut self, index: usize, position: Vec2) {
        self.entities[index].position = position;
    }
}

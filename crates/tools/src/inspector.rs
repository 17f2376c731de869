use tilestep_common::EntityId;
use tilestep_kernel::{Entity, Shape, World};

/// World inspector for developer tooling.
///
/// Provides read-only queries against the world state for debugging and
/// CLI output.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &World) -> WorldSummary {
        let entities = world.entities();
        WorldSummary {
            entity_count: entities.len(),
            solid_count: entities.iter().filter(|e| e.has_colliders()).count(),
            movable_count: entities.iter().filter(|e| e.can_move()).count(),
            collider_count: entities.iter().map(|e| e.colliders().len()).sum(),
        }
    }

    /// Describe one entity.
    pub fn inspect_entity(world: &World, id: EntityId) -> Option<EntityInfo> {
        world.get(id).map(EntityInfo::from)
    }

    /// All entity ids in world order.
    pub fn list_entities(world: &World) -> Vec<EntityId> {
        world.entities().iter().map(|e| e.id()).collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldSummary {
    pub entity_count: usize,
    pub solid_count: usize,
    pub movable_count: usize,
    pub collider_count: usize,
}

impl std::fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "World: entities={} solid={} movable={} colliders={}",
            self.entity_count, self.solid_count, self.movable_count, self.collider_count
        )
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub position: [f32; 2],
    pub shape: Option<Shape>,
    pub colliders: usize,
    pub speed: Option<f32>,
}

impl From<&Entity> for EntityInfo {
    fn from(e: &Entity) -> Self {
        let p = e.position();
        Self {
            id: e.id(),
            name: e.name.clone(),
            position: [p.x, p.y],
            shape: e.shape(),
            colliders: e.colliders().len(),
            speed: e.speed(),
        }
    }
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Entity [{}] {:<10} pos=({:.2}, {:.2}) colliders={}",
            self.id.short(),
            self.name,
            self.position[0],
            self.position[1],
            self.colliders,
        )?;
        match self.shape {
            Some(Shape::Circle { radius }) => write!(f, " circle(r={radius:.1})")?,
            Some(Shape::Box { size }) => write!(f, " box({:.1}x{:.1})", size.x, size.y)?,
            None => {}
        }
        if let Some(speed) = self.speed {
            write!(f, " speed={speed:.1}")?;
        }
        Ok(())
    }
}

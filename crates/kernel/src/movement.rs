//! Movement resolution: clamp a requested displacement to the largest safe
//! fraction, then fall back to single-axis moves for wall sliding.

use glam::Vec2;
use tilestep_common::{EntityId, VecExt};

use crate::collider::{Aabb, Collider};
use crate::error::CollisionError;
use crate::world::World;

/// Outcome of scanning every obstacle for one requested displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Displacement that was asked for.
    pub requested: Vec2,
    /// Distance along `requested` that can be travelled without blocking.
    pub allowed: f32,
    /// Position the entity would end up at.
    pub destination: Vec2,
}

impl Resolution {
    pub fn max_distance(&self) -> f32 {
        self.requested.length()
    }

    /// True when a non-zero request cannot advance at all.
    pub fn is_blocked(&self) -> bool {
        !self.requested.is_zero() && self.allowed <= 0.0
    }

    /// True when the whole request fits.
    pub fn is_full(&self) -> bool {
        self.allowed >= self.max_distance()
    }
}

/// Running minimum of the safe distance over all obstacle pairs.
struct Scan {
    position: Vec2,
    target: Vec2,
    dp: Vec2,
    max_distance: f32,
    allowed: f32,
}

impl Scan {
    fn pair(&mut self, a: &Collider, b: &Collider, b_pos: Vec2) -> Result<(), CollisionError> {
        let next = a.measure(self.target, b, b_pos)?;
        let current = a.measure(self.position, b, b_pos)?;

        if next >= 0.0 {
            // Destination clear; only a path that crosses `b` entirely blocks.
            if current >= 0.0 {
                self.cap_at_contact(a, b, b_pos)?;
            }
            return Ok(());
        }

        if current <= next {
            // Holding or retreating from an existing overlap.
            return Ok(());
        }

        let ratio = (current / (current - next)).clamp(0.0, 1.0);
        let safe = ratio * self.max_distance;
        tracing::trace!(current, next, safe, "blocking approach");
        self.allowed = self.allowed.min(safe);

        if current >= 0.0 {
            self.cap_at_contact(a, b, b_pos)?;
        }
        Ok(())
    }

    fn cap_at_contact(&mut self, a: &Collider, b: &Collider, b_pos: Vec2) -> Result<(), CollisionError> {
        if let Some(t) = a.contact_time(self.position, self.dp, b, b_pos)? {
            let safe = t * self.max_distance;
            tracing::trace!(t, safe, "path crosses obstacle");
            self.allowed = self.allowed.min(safe);
        }
        Ok(())
    }
}

/// Compute how far entity `id` may travel along `dp` without changing the world.
pub fn resolve(world: &World, id: EntityId, dp: Vec2) -> Result<Resolution, CollisionError> {
    let index = world.index_of(id).ok_or(CollisionError::EntityNotFound(id))?;
    let entity = &world.entities()[index];
    let position = entity.position();
    let max_distance = dp.length();

    let mut scan = Scan {
        position,
        target: position + dp,
        dp,
        max_distance,
        allowed: max_distance,
    };

    if entity.has_colliders() && max_distance > 0.0 {
        for (i, other) in world.entities().iter().enumerate() {
            if i == index || !other.has_colliders() {
                continue;
            }
            for a in entity.colliders() {
                for b in other.colliders() {
                    scan.pair(a, b, other.position())?;
                }
            }
        }

        let region = swept_region(entity.colliders(), position, scan.target);
        let mut failure = None;
        world.tiles().walk(region, &mut |colliders, tile_pos| {
            for a in entity.colliders() {
                for b in colliders {
                    if let Err(e) = scan.pair(a, b, tile_pos) {
                        failure = Some(e);
                        return false;
                    }
                }
            }
            true
        });
        if let Some(e) = failure {
            return Err(e);
        }
    }

    let allowed = scan.allowed.max(0.0);
    let destination = if allowed >= max_distance {
        scan.target
    } else {
        position + dp.direction() * allowed
    };

    Ok(Resolution {
        requested: dp,
        allowed,
        destination,
    })
}

/// Move entity `id` as far along `dp` as is safe.
///
/// Returns `true` when the position was committed. A zero displacement is a
/// no-op that always succeeds.
pub fn test_move(world: &mut World, id: EntityId, dp: Vec2) -> Result<bool, CollisionError> {
    let resolution = resolve(world, id, dp)?;

    if dp.is_zero() {
        return Ok(true);
    }
    if resolution.is_blocked() {
        tracing::debug!(id = %id.short(), dx = dp.x, dy = dp.y, "move refused");
        return Ok(false);
    }

    let index = world.index_of(id).ok_or(CollisionError::EntityNotFound(id))?;
    world.commit_position(index, resolution.destination);
    tracing::debug!(
        id = %id.short(),
        allowed = resolution.allowed,
        x = resolution.destination.x,
        y = resolution.destination.y,
        "move committed"
    );
    Ok(true)
}

/// Move with wall sliding: try `dp`, then `(dp.x, 0)`, then `(0, dp.y)`.
///
/// The first attempt that commits wins. Entities are resolved one at a time,
/// so a later call observes positions committed by earlier calls.
pub fn move_entity(world: &mut World, id: EntityId, dp: Vec2) -> Result<bool, CollisionError> {
    if test_move(world, id, dp)? {
        return Ok(true);
    }
    if dp.x != 0.0 && test_move(world, id, Vec2::new(dp.x, 0.0))? {
        return Ok(true);
    }
    if dp.y != 0.0 && test_move(world, id, Vec2::new(0.0, dp.y))? {
        return Ok(true);
    }
    Ok(false)
}

/// Bounds covering every collider at both the start and the end of the move.
fn swept_region(colliders: &[Collider], from: Vec2, to: Vec2) -> Aabb {
    colliders
        .iter()
        .map(|c| c.bounds(from).union(&c.bounds(to)))
        .reduce(|acc, b| acc.union(&b))
        .unwrap_or_else(|| Aabb::new(from.min(to), from.max(to)))
}

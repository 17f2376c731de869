//! Collision kernel: collider metric, entity records, world, movement resolution.
//!
//! # Invariants
//! - Two solid bodies never move into each other; separating motion is never blocked.
//! - A collider's offset and an entity's collider set are fixed after construction.
//! - Entity positions change only through [`movement::test_move`].
//! - Resolution is single-threaded and sequential: later moves in a tick see
//!   earlier commits.

pub mod collider;
pub mod entity;
pub mod error;
pub mod movement;
pub mod world;

pub use collider::{Aabb, Collider};
pub use entity::{Entity, Shape};
pub use error::CollisionError;
pub use movement::{Resolution, move_entity, resolve, test_move};
pub use world::{NoTiles, TileQuery, World};

pub fn crate_info() -> &'static str {
    "tilestep-kernel v0.1.0"
}

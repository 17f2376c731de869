//! Static tiles: chunked tile collision grid and Tiled map loading.
//!
//! # Invariants
//! - Tile collision data is populated before simulation and read-only after.
//! - Walks visit tiles row-major and only those whose collider set is non-empty.
//! - Chunks of a map share one chunk grid; chunk origins sit on its lines.

mod error;
mod grid;
mod tiled;

pub use error::TileMapError;
pub use grid::{Chunk, ChunkCoord, DEFAULT_CHUNK_SIZE, TileCollisionMap, TileCoord, TileLayer, Tileset};
pub use tiled::{load_map, parse_map};

pub fn crate_info() -> &'static str {
    "tilestep-tiles v0.1.0"
}

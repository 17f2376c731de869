use std::collections::BTreeMap;

use glam::{UVec2, Vec2};
use tilestep_kernel::{Aabb, Collider, TileQuery};

use crate::error::TileMapError;

/// Tiled stores flip/rotation flags in the top bits of a gid.
const GID_FLAG_MASK: u32 = 0x1FFF_FFFF;

/// Default chunk edge, in tiles.
pub const DEFAULT_CHUNK_SIZE: u32 = 16;

/// Integer tile coordinate in the unbounded grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Chunk coordinate: tile coordinate divided by the chunk size.
///
/// Ordered by row (y) first so chunk maps iterate row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub y: i32,
    pub x: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn of(tile: TileCoord, chunk_size: UVec2) -> Self {
        Self::new(
            tile.x.div_euclid(chunk_size.x as i32),
            tile.y.div_euclid(chunk_size.y as i32),
        )
    }
}

/// A rectangular block of gids, row-major. Gid 0 is an empty cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub origin: TileCoord,
    pub width: u32,
    pub height: u32,
    gids: Vec<u32>,
}

impl Chunk {
    /// Build a chunk, checking that `gids` covers `width * height` cells.
    pub fn new(origin: TileCoord, width: u32, height: u32, gids: Vec<u32>) -> Result<Self, TileMapError> {
        let expected = width as usize * height as usize;
        if gids.len() != expected {
            return Err(TileMapError::ChunkDataLength {
                x: origin.x,
                y: origin.y,
                expected,
                actual: gids.len(),
            });
        }
        Ok(Self {
            origin,
            width,
            height,
            gids,
        })
    }

    fn empty(origin: TileCoord, size: UVec2) -> Self {
        Self {
            origin,
            width: size.x,
            height: size.y,
            gids: vec![0; size.x as usize * size.y as usize],
        }
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        let lx = coord.x - self.origin.x;
        let ly = coord.y - self.origin.y;
        if lx < 0 || ly < 0 || lx >= self.width as i32 || ly >= self.height as i32 {
            return None;
        }
        Some(ly as usize * self.width as usize + lx as usize)
    }

    /// Gid at `coord` with flip flags stripped, 0 when empty or outside.
    pub fn gid_at(&self, coord: TileCoord) -> u32 {
        self.index(coord).map_or(0, |i| self.gids[i] & GID_FLAG_MASK)
    }
}

/// Per-tile collider sets of one tileset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tileset {
    pub name: String,
    pub first_gid: u32,
    colliders: BTreeMap<u32, Vec<Collider>>,
}

impl Tileset {
    pub fn new(name: impl Into<String>, first_gid: u32) -> Self {
        Self {
            name: name.into(),
            first_gid,
            colliders: BTreeMap::new(),
        }
    }

    /// Attach colliders to the tile with local id `local_id`. Offsets are
    /// relative to the tile's top-left corner. Empty sets are dropped.
    pub fn with_tile(mut self, local_id: u32, colliders: Vec<Collider>) -> Self {
        if !colliders.is_empty() {
            self.colliders.insert(local_id, colliders);
        }
        self
    }

    pub fn colliders(&self, local_id: u32) -> Option<&[Collider]> {
        self.colliders.get(&local_id).map(Vec::as_slice)
    }

    fn all_colliders(&self) -> impl Iterator<Item = &Collider> {
        self.colliders.values().flatten()
    }
}

/// A layer of chunks sharing the map's chunk grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub id: u32,
    pub name: String,
    pub visible: bool,
    chunks: BTreeMap<ChunkCoord, Chunk>,
}

impl TileLayer {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            chunks: BTreeMap::new(),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// Static collision data of a chunked, unbounded tile map.
///
/// Gids resolve through the tilesets to collider sets. Layers are stacked:
/// every layer's tile at a coordinate contributes its own collider set.
#[derive(Debug, Clone, PartialEq)]
pub struct TileCollisionMap {
    tile_size: f32,
    chunk_size: UVec2,
    tilesets: Vec<Tileset>,
    layers: Vec<TileLayer>,
    /// How far any tile collider reaches outside its own cell.
    overhang: f32,
}

impl TileCollisionMap {
    pub fn new(tile_size: f32) -> Result<Self, TileMapError> {
        Self::with_chunk_size(tile_size, UVec2::splat(DEFAULT_CHUNK_SIZE))
    }

    pub fn with_chunk_size(tile_size: f32, chunk_size: UVec2) -> Result<Self, TileMapError> {
        if tile_size.is_nan() || tile_size <= 0.0 {
            return Err(TileMapError::InvalidTileSize(tile_size));
        }
        Ok(Self {
            tile_size,
            chunk_size: chunk_size.max(UVec2::ONE),
            tilesets: Vec::new(),
            layers: Vec::new(),
            overhang: 0.0,
        })
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn chunk_size(&self) -> UVec2 {
        self.chunk_size
    }

    pub fn layers(&self) -> &[TileLayer] {
        &self.layers
    }

    pub fn tilesets(&self) -> &[Tileset] {
        &self.tilesets
    }

    /// Register a tileset. Tilesets are kept sorted by first gid.
    pub fn add_tileset(&mut self, tileset: Tileset) {
        let reach = tileset.all_colliders().map(|c| self.reach(c)).fold(0.0, f32::max);
        self.overhang = self.overhang.max(reach);
        let at = self.tilesets.partition_point(|t| t.first_gid <= tileset.first_gid);
        self.tilesets.insert(at, tileset);
    }

    /// Set the colliders of one gid directly. A tileset starting at gid 1 is
    /// created when no registered tileset covers it; an empty set clears it.
    pub fn insert_tile_colliders(&mut self, gid: u32, colliders: Vec<Collider>) -> Result<(), TileMapError> {
        let gid = gid & GID_FLAG_MASK;
        if gid == 0 {
            return Err(TileMapError::EmptyGid);
        }
        let reach = colliders.iter().map(|c| self.reach(c)).fold(0.0, f32::max);
        self.overhang = self.overhang.max(reach);

        let index = match self.tilesets.partition_point(|t| t.first_gid <= gid).checked_sub(1) {
            Some(index) => index,
            None => {
                self.tilesets.insert(0, Tileset::new("", 1));
                0
            }
        };
        let tileset = &mut self.tilesets[index];
        let local_id = gid - tileset.first_gid;
        if colliders.is_empty() {
            tileset.colliders.remove(&local_id);
        } else {
            tileset.colliders.insert(local_id, colliders);
        }
        Ok(())
    }

    /// How far a tile collider sticks out of its cell.
    fn reach(&self, collider: &Collider) -> f32 {
        let b = collider.bounds(Vec2::ZERO);
        let ts = self.tile_size;
        (-b.min.x).max(-b.min.y).max(b.max.x - ts).max(b.max.y - ts)
    }

    /// Append a layer; returns its index.
    pub fn add_layer(&mut self, layer: TileLayer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Place a chunk into a layer. The chunk must sit inside one cell of the
    /// chunk grid.
    pub fn insert_chunk(&mut self, layer: usize, chunk: Chunk) -> Result<(), TileMapError> {
        let size = self.chunk_size;
        let aligned = chunk.origin.x.rem_euclid(size.x as i32) == 0
            && chunk.origin.y.rem_euclid(size.y as i32) == 0
            && chunk.width <= size.x
            && chunk.height <= size.y;
        if !aligned {
            return Err(TileMapError::MisalignedChunk {
                x: chunk.origin.x,
                y: chunk.origin.y,
                width: size.x,
                height: size.y,
            });
        }
        let coord = ChunkCoord::of(chunk.origin, size);
        let layer = self.layers.get_mut(layer).ok_or(TileMapError::UnknownLayer(layer))?;
        layer.chunks.insert(coord, chunk);
        Ok(())
    }

    /// Set one cell, creating its chunk if needed.
    pub fn set_tile(&mut self, layer: usize, coord: TileCoord, gid: u32) -> Result<(), TileMapError> {
        let size = self.chunk_size;
        let chunk_coord = ChunkCoord::of(coord, size);
        let layer = self.layers.get_mut(layer).ok_or(TileMapError::UnknownLayer(layer))?;
        let chunk = layer.chunks.entry(chunk_coord).or_insert_with(|| {
            let origin = TileCoord::new(chunk_coord.x * size.x as i32, chunk_coord.y * size.y as i32);
            Chunk::empty(origin, size)
        });
        let index = chunk.index(coord).ok_or(TileMapError::MisalignedChunk {
            x: chunk.origin.x,
            y: chunk.origin.y,
            width: size.x,
            height: size.y,
        })?;
        chunk.gids[index] = gid;
        Ok(())
    }

    /// Gid of `coord` in `layer`, 0 when empty.
    pub fn gid(&self, layer: usize, coord: TileCoord) -> u32 {
        self.layers
            .get(layer)
            .and_then(|l| l.chunks.get(&ChunkCoord::of(coord, self.chunk_size)))
            .map_or(0, |c| c.gid_at(coord))
    }

    /// Colliders for a gid, `None` when the tile has none.
    pub fn colliders_for(&self, gid: u32) -> Option<&[Collider]> {
        let gid = gid & GID_FLAG_MASK;
        if gid == 0 {
            return None;
        }
        let at = self.tilesets.partition_point(|t| t.first_gid <= gid);
        let tileset = self.tilesets.get(at.checked_sub(1)?)?;
        tileset.colliders(gid - tileset.first_gid)
    }

    /// Tile containing a world position.
    pub fn tile_at(&self, position: Vec2) -> TileCoord {
        TileCoord::new(
            (position.x / self.tile_size).floor() as i32,
            (position.y / self.tile_size).floor() as i32,
        )
    }

    pub fn tile_position(&self, coord: TileCoord) -> Vec2 {
        Vec2::new(coord.x as f32, coord.y as f32) * self.tile_size
    }

    fn has_colliders(&self) -> bool {
        self.tilesets.iter().any(|t| !t.colliders.is_empty())
    }
}

impl TileQuery for TileCollisionMap {
    fn walk(&self, region: Aabb, visitor: &mut dyn FnMut(&[Collider], Vec2) -> bool) {
        if self.layers.is_empty() || !self.has_colliders() {
            return;
        }

        let margin = Vec2::splat(self.overhang);
        let min = self.tile_at(region.min - margin);
        let max = self.tile_at(region.max + margin);

        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let coord = TileCoord::new(x, y);
                let chunk_coord = ChunkCoord::of(coord, self.chunk_size);
                for layer in &self.layers {
                    let Some(chunk) = layer.chunks.get(&chunk_coord) else {
                        continue;
                    };
                    let Some(colliders) = self.colliders_for(chunk.gid_at(coord)) else {
                        continue;
                    };
                    if !visitor(colliders, self.tile_position(coord)) {
                        return;
                    }
                }
            }
        }
    }
}

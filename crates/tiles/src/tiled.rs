//! Loader for Tiled infinite-map JSON (<https://www.mapeditor.org/>).
//!
//! Only the collision-relevant parts are read: map tile size, chunk size,
//! tileset per-tile object groups and tile layer chunks. Images, properties
//! and object layers are ignored.

use std::path::Path;

use glam::{UVec2, Vec2};
use serde::Deserialize;
use tilestep_kernel::Collider;

use crate::error::TileMapError;
use crate::grid::{Chunk, DEFAULT_CHUNK_SIZE, TileCollisionMap, TileCoord, TileLayer, Tileset};

const MAP_TYPE: &str = "map";
const ORIENTATION: &str = "orthogonal";
const COMPRESSION_LEVEL: i32 = -1;
const COLLIDER_GROUP_TYPE: &str = "objectgroup";

#[derive(Debug, Deserialize)]
struct RawMap {
    #[serde(rename = "type")]
    kind: String,
    infinite: bool,
    orientation: String,
    #[serde(default = "default_compression")]
    compressionlevel: i32,
    tilewidth: f32,
    tileheight: f32,
    #[serde(default)]
    editorsettings: Option<RawEditorSettings>,
    #[serde(default)]
    tilesets: Vec<RawTileset>,
    #[serde(default)]
    layers: Vec<RawLayer>,
}

fn default_compression() -> i32 {
    COMPRESSION_LEVEL
}

#[derive(Debug, Deserialize)]
struct RawEditorSettings {
    chunksize: Option<RawSize>,
}

#[derive(Debug, Deserialize)]
struct RawSize {
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct RawTileset {
    #[serde(default = "default_first_gid")]
    firstgid: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tiles: Vec<RawTile>,
}

fn default_first_gid() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct RawTile {
    id: u32,
    objectgroup: Option<RawObjectGroup>,
}

#[derive(Debug, Deserialize)]
struct RawObjectGroup {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    objects: Vec<RawObject>,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    x: f32,
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
}

#[derive(Debug, Deserialize)]
struct RawLayer {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default = "default_visible")]
    visible: bool,
    encoding: Option<String>,
    #[serde(default)]
    chunks: Vec<RawChunk>,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawChunk {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    data: RawChunkData,
}

/// csv layers store gids as a JSON array; base64 layers store a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawChunkData {
    Gids(Vec<u32>),
    Encoded(String),
}

/// Read and parse a Tiled map file.
pub fn load_map(path: impl AsRef<Path>) -> Result<TileCollisionMap, TileMapError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), "loading tile map");
    parse_map(&text)
}

/// Parse Tiled map JSON into static collision data.
pub fn parse_map(json: &str) -> Result<TileCollisionMap, TileMapError> {
    let raw: RawMap = serde_json::from_str(json)?;

    if raw.kind != MAP_TYPE {
        return Err(TileMapError::NotAMap(raw.kind));
    }
    if !raw.infinite {
        return Err(TileMapError::FiniteMap);
    }
    if raw.orientation != ORIENTATION {
        return Err(TileMapError::UnsupportedOrientation(raw.orientation));
    }
    if raw.compressionlevel != COMPRESSION_LEVEL {
        return Err(TileMapError::UnsupportedCompression(raw.compressionlevel));
    }

    if raw.tilewidth != raw.tileheight {
        return Err(TileMapError::NonSquareTiles {
            width: raw.tilewidth,
            height: raw.tileheight,
        });
    }

    let chunk_size = chunk_size(&raw);
    let mut map = TileCollisionMap::with_chunk_size(raw.tileheight, chunk_size)?;

    for raw_tileset in raw.tilesets {
        let mut tileset = Tileset::new(raw_tileset.name, raw_tileset.firstgid);
        for tile in raw_tileset.tiles {
            let Some(group) = tile.objectgroup else {
                continue;
            };
            if group.kind != COLLIDER_GROUP_TYPE {
                return Err(TileMapError::UnsupportedColliderGroup(group.kind));
            }
            let colliders = group
                .objects
                .iter()
                .map(|o| Collider::rect_at(Vec2::new(group.x + o.x, group.y + o.y), o.width, o.height))
                .collect();
            tileset = tileset.with_tile(tile.id, colliders);
        }
        map.add_tileset(tileset);
    }

    for raw_layer in raw.layers {
        if raw_layer.chunks.is_empty() {
            continue;
        }
        let encoding = raw_layer.encoding.unwrap_or_else(|| "csv".to_owned());
        if encoding != "csv" {
            return Err(TileMapError::UnsupportedEncoding(encoding));
        }
        let mut layer = TileLayer::new(raw_layer.id, raw_layer.name);
        layer.visible = raw_layer.visible;
        let index = map.add_layer(layer);

        let chunk_count = raw_layer.chunks.len();
        for raw_chunk in raw_layer.chunks {
            let RawChunkData::Gids(gids) = raw_chunk.data else {
                return Err(TileMapError::UnsupportedEncoding(encoding));
            };
            let chunk = Chunk::new(
                TileCoord::new(raw_chunk.x, raw_chunk.y),
                raw_chunk.width,
                raw_chunk.height,
                gids,
            )?;
            map.insert_chunk(index, chunk)?;
        }
        tracing::debug!(layer = raw_layer.id, chunks = chunk_count, "loaded tile layer");
    }

    Ok(map)
}

fn chunk_size(raw: &RawMap) -> UVec2 {
    if let Some(size) = raw.editorsettings.as_ref().and_then(|s| s.chunksize.as_ref()) {
        return UVec2::new(size.width, size.height);
    }
    raw.layers
        .iter()
        .flat_map(|l| l.chunks.first())
        .map(|c| UVec2::new(c.width, c.height))
        .next()
        .unwrap_or(UVec2::splat(DEFAULT_CHUNK_SIZE))
}

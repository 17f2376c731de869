/// Errors from building or loading tile collision data.
#[derive(Debug, thiserror::Error)]
pub enum TileMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("file is of type {0:?}, expected \"map\"")]
    NotAMap(String),
    #[error("unsupported finite map, only infinite (chunked) maps are supported")]
    FiniteMap,
    #[error("unsupported orientation {0:?}")]
    UnsupportedOrientation(String),
    #[error("unsupported compression level {0}")]
    UnsupportedCompression(i32),
    #[error("unsupported layer encoding {0:?}")]
    UnsupportedEncoding(String),
    #[error("unsupported collider group type {0:?}")]
    UnsupportedColliderGroup(String),
    #[error("non-square {width}x{height} tiles are not supported")]
    NonSquareTiles { width: f32, height: f32 },
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(f32),
    #[error("chunk at ({x}, {y}) is not aligned to the {width}x{height} chunk grid")]
    MisalignedChunk { x: i32, y: i32, width: u32, height: u32 },
    #[error("chunk at ({x}, {y}) holds {actual} tiles, expected {expected}")]
    ChunkDataLength {
        x: i32,
        y: i32,
        expected: usize,
        actual: usize,
    },
    #[error("gid 0 is the empty tile and cannot carry colliders")]
    EmptyGid,
    #[error("layer index {0} out of range")]
    UnknownLayer(usize),
}

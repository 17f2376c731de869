//! Engine-wide constants.

/// Edge length of one tile, in world units (pixels).
pub const TILE_SIZE: f32 = 16.0;
pub const HALF_TILE: f32 = TILE_SIZE / 2.0;

/// Simulation ticks per second.
pub const TICK_RATE: u32 = 60;
/// Seconds per tick.
pub const STEP: f32 = 1.0 / TICK_RATE as f32;

/// Longest frame the fixed-timestep accumulator will absorb, in seconds.
pub const MAX_FRAME_TIME: f32 = 0.25;

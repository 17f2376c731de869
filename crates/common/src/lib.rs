//! Shared types and utilities for the tilestep engine.

pub mod math;
pub mod settings;
pub mod types;

pub use glam::Vec2;
pub use math::VecExt;
pub use types::EntityId;

use tilestep_common::EntityId;
use tilestep_kernel::CollisionError;

/// Errors from driving the simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Collision(#[from] CollisionError),
    #[error("entity {0} has no speed and cannot be driven")]
    NotMovable(EntityId),
    #[error("patrol radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("entity {0} not found")]
    UnknownEntity(EntityId),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

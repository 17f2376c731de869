use tilestep_common::EntityId;

/// Errors from collision queries and movement resolution.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollisionError {
    #[error("unsupported collision between {this} and {other} colliders")]
    UnsupportedColliderKind {
        this: &'static str,
        other: &'static str,
    },
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),
}

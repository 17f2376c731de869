use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilestep_common::EntityId;

use crate::collider::Collider;

/// Visual footprint of an entity around its position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Centered on the position.
    Circle { radius: f32 },
    /// Top-left corner at the position.
    Box { size: Vec2 },
}

impl Shape {
    /// Offset of the footprint's top-left corner and its extent.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match *self {
            Self::Circle { radius } => (Vec2::splat(-radius), Vec2::splat(radius * 2.0)),
            Self::Box { size } => (Vec2::ZERO, size),
        }
    }
}

/// A body in the world.
///
/// The collider set is fixed once the entity is built; `position` is the only
/// geometric field that changes, and only through the movement resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    pub name: String,
    pub(crate) position: Vec2,
    shape: Option<Shape>,
    colliders: Vec<Collider>,
    speed: Option<f32>,
}

impl Entity {
    /// A point entity without shape or colliders. It moves unconditionally.
    pub fn new(name: impl Into<String>, position: Vec2) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            position,
            shape: None,
            colliders: Vec::new(),
            speed: None,
        }
    }

    /// A circle collided through its bounding square.
    pub fn circle(name: impl Into<String>, position: Vec2, radius: f32) -> Self {
        let shape = Shape::Circle { radius };
        let (offset, size) = shape.bounds();
        Self {
            shape: Some(shape),
            ..Self::new(name, position)
        }
        .with_collider(Collider::rect_at(offset, size.x, size.y))
    }

    /// A box whose collider matches its footprint.
    pub fn boxed(name: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        Self {
            shape: Some(Shape::Box { size }),
            ..Self::new(name, position)
        }
        .with_collider(Collider::rect(size.x, size.y))
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.colliders.push(collider);
        self
    }

    /// Speed in world units per second. Entities with a speed are movable.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn shape(&self) -> Option<Shape> {
        self.shape
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }

    pub fn speed(&self) -> Option<f32> {
        self.speed
    }

    pub fn can_move(&self) -> bool {
        self.speed.is_some()
    }

    pub fn has_colliders(&self) -> bool {
        !self.colliders.is_empty()
    }
}

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::CollisionError;

/// Collision shape attached to a body.
///
/// The offset is relative to the owner's position and is fixed for the
/// collider's lifetime: `owner.position + offset` is the world-space anchor
/// (top-left corner for rectangles, center for circles).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Collider {
    Rect { size: Vec2, offset: Option<Vec2> },
    Circle { radius: f32, offset: Option<Vec2> },
}

impl Collider {
    /// Rectangle anchored at the owner's position.
    pub fn rect(width: f32, height: f32) -> Self {
        Self::Rect {
            size: Vec2::new(width, height),
            offset: None,
        }
    }

    /// Rectangle anchored at `owner + offset`.
    pub fn rect_at(offset: Vec2, width: f32, height: f32) -> Self {
        Self::Rect {
            size: Vec2::new(width, height),
            offset: Some(offset),
        }
    }

    pub fn circle(radius: f32) -> Self {
        Self::Circle {
            radius,
            offset: None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Circle { .. } => "circle",
        }
    }

    pub fn offset(&self) -> Option<Vec2> {
        match self {
            Self::Rect { offset, .. } | Self::Circle { offset, .. } => *offset,
        }
    }

    /// World-space anchor of this collider when its owner sits at `owner`.
    pub fn origin(&self, owner: Vec2) -> Vec2 {
        match self.offset() {
            Some(offset) => owner + offset,
            None => owner,
        }
    }

    /// World-space bounds when the owner sits at `owner`.
    pub fn bounds(&self, owner: Vec2) -> Aabb {
        let origin = self.origin(owner);
        match *self {
            Self::Rect { size, .. } => Aabb::new(origin, origin + size),
            Self::Circle { radius, .. } => {
                let r = Vec2::splat(radius);
                Aabb::new(origin - r, origin + r)
            }
        }
    }

    /// Overlap/gap metric between `self` at `pos` and `other` at `other_pos`.
    ///
    /// Separated rectangles yield the positive gap along the most separating
    /// axis. Overlapping rectangles yield `-min(overlap_w, overlap_h)`.
    /// Touching rectangles yield zero. This is not a distance field: it is
    /// computed from each side's own offset and both branches meet at zero.
    pub fn measure(&self, pos: Vec2, other: &Collider, other_pos: Vec2) -> Result<f32, CollisionError> {
        let (a, b) = self.rect_pair(pos, other, other_pos)?;

        let horizontal_gap = (a.min.x - b.max.x).max(b.min.x - a.max.x);
        let vertical_gap = (a.min.y - b.max.y).max(b.min.y - a.max.y);

        if horizontal_gap > 0.0 || vertical_gap > 0.0 {
            return Ok(horizontal_gap.max(vertical_gap));
        }

        let overlap_width = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
        let overlap_height = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);
        Ok(-overlap_width.min(overlap_height))
    }

    /// Earliest fraction `t` of `dp` at which `self`, starting at `pos` and
    /// moving by `t * dp`, strictly overlaps `other` at `other_pos`.
    ///
    /// `None` when the path never enters `other` within `t in [0, 1]`.
    /// Faces that only touch along the path do not count as contact.
    pub fn contact_time(
        &self,
        pos: Vec2,
        dp: Vec2,
        other: &Collider,
        other_pos: Vec2,
    ) -> Result<Option<f32>, CollisionError> {
        let (a, b) = self.rect_pair(pos, other, other_pos)?;

        let (enter_x, exit_x) = match slab(a.min.x, a.max.x, b.min.x, b.max.x, dp.x) {
            Some(span) => span,
            None => return Ok(None),
        };
        let (enter_y, exit_y) = match slab(a.min.y, a.max.y, b.min.y, b.max.y, dp.y) {
            Some(span) => span,
            None => return Ok(None),
        };

        let enter = enter_x.max(enter_y);
        let exit = exit_x.min(exit_y);
        if enter >= exit || exit <= 0.0 || enter > 1.0 {
            return Ok(None);
        }
        Ok(Some(enter.max(0.0)))
    }

    fn rect_pair(&self, pos: Vec2, other: &Collider, other_pos: Vec2) -> Result<(Aabb, Aabb), CollisionError> {
        match (self, other) {
            (Self::Rect { .. }, Self::Rect { .. }) => Ok((self.bounds(pos), other.bounds(other_pos))),
            _ => Err(CollisionError::UnsupportedColliderKind {
                this: self.kind(),
                other: other.kind(),
            }),
        }
    }
}

/// Open time interval during which a moving span `[a_min, a_max]` (velocity
/// `d`) strictly overlaps a static span `[b_min, b_max]`.
fn slab(a_min: f32, a_max: f32, b_min: f32, b_max: f32, d: f32) -> Option<(f32, f32)> {
    if d == 0.0 {
        if a_min < b_max && b_min < a_max {
            Some((f32::NEG_INFINITY, f32::INFINITY))
        } else {
            None
        }
    } else if d > 0.0 {
        Some(((b_min - a_max) / d, (b_max - a_min) / d))
    } else {
        Some(((b_max - a_min) / d, (b_min - a_max) / d))
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn translate(&self, by: Vec2) -> Aabb {
        Aabb::new(self.min + by, self.max + by)
    }

    /// Inclusive intersection test: touching boxes intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

//! Collision detection for axis-aligned boxes
//!
//! Everything in the arena is a box: players, ground, walls, platforms and
//! hazards. Positions are in screen space (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box stored as center + half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents: half_extents.abs(),
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        let lo = min.min(max);
        let hi = min.max(max);
        Self::new((lo + hi) * 0.5, (hi - lo) * 0.5)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    /// Strict overlap (touching edges don't count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        d.x < reach.x && d.y < reach.y
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }
}

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit axis normal pointing from `b` toward `a` (push `a` along it to separate)
    pub normal: Vec2,
    /// Penetration depth along the normal
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check two boxes and compute the minimum separating axis.
///
/// Ties between the axes resolve vertically, so a body resting exactly on a
/// corner lands on top rather than sliding off the side.
pub fn aabb_collision(a: &Aabb, b: &Aabb) -> CollisionResult {
    let delta = a.center - b.center;
    let overlap = a.half_extents + b.half_extents - delta.abs();

    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return CollisionResult::miss();
    }

    if overlap.y <= overlap.x {
        let sign = if delta.y < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(0.0, sign),
            penetration: overlap.y,
        }
    } else {
        let sign = if delta.x < 0.0 { -1.0 } else { 1.0 };
        CollisionResult {
            hit: true,
            normal: Vec2::new(sign, 0.0),
            penetration: overlap.x,
        }
    }
}

/// Remove the part of a velocity that moves into a surface
#[inline]
pub fn cancel_into_surface(velocity: Vec2, normal: Vec2) -> Vec2 {
    let into = velocity.dot(normal);
    if into < 0.0 {
        velocity - normal * into
    } else {
        velocity
    }
}

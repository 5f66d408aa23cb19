//! Minimal rigid-body world
//!
//! Dynamic boxes (players) fall under gravity, get pushed out of solid
//! static boxes and never rotate. Sensors report overlap but never block.
//! Each step reports every active contact plus the contacts that started
//! this step.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, aabb_collision, cancel_into_surface};
use crate::consts::*;

/// Handle to a body in a [`PhysicsWorld`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(u32);

/// What a body represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    Player,
    Ground,
    Wall,
    Platform,
    Hazard,
}

impl BodyKind {
    /// Standing on these lets a player jump
    pub fn supports_player(&self) -> bool {
        matches!(self, BodyKind::Ground | BodyKind::Platform)
    }
}

/// A rigid body
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub shape: Aabb,
    /// Units per nominal tick
    pub velocity: Vec2,
    /// Accumulated force, cleared after every step
    pub force: Vec2,
    pub mass: f32,
    pub is_static: bool,
    pub is_sensor: bool,
}

impl Body {
    /// A dynamic box with mass from its area
    pub fn dynamic(kind: BodyKind, shape: Aabb, density: f32) -> Self {
        let size = shape.size();
        Self {
            id: BodyId(0),
            kind,
            shape,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            mass: (size.x * size.y * density).max(f32::EPSILON),
            is_static: false,
            is_sensor: false,
        }
    }

    /// An immovable solid box
    pub fn fixed(kind: BodyKind, shape: Aabb) -> Self {
        Self {
            id: BodyId(0),
            kind,
            shape,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            mass: f32::INFINITY,
            is_static: true,
            is_sensor: false,
        }
    }

    /// An immovable box that detects overlap without blocking
    pub fn sensor(kind: BodyKind, shape: Aabb) -> Self {
        Self {
            is_sensor: true,
            ..Self::fixed(kind, shape)
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.shape.center
    }
}

/// A contact between two bodies, ordered so `a < b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub a: BodyId,
    pub b: BodyId,
    pub kind_a: BodyKind,
    pub kind_b: BodyKind,
    /// Contact normal pointing from `b` toward `a`
    pub normal: Vec2,
}

impl CollisionEvent {
    /// `normal` points from `y` toward `x`
    fn new(x: &Body, y: &Body, normal: Vec2) -> Self {
        if x.id <= y.id {
            Self {
                a: x.id,
                b: y.id,
                kind_a: x.kind,
                kind_b: y.kind,
                normal,
            }
        } else {
            Self {
                a: y.id,
                b: x.id,
                kind_a: y.kind,
                kind_b: x.kind,
                normal: -normal,
            }
        }
    }

    /// If `body` takes part, the kind of the other body
    pub fn other(&self, body: BodyId) -> Option<(BodyId, BodyKind)> {
        if self.a == body {
            Some((self.b, self.kind_b))
        } else if self.b == body {
            Some((self.a, self.kind_a))
        } else {
            None
        }
    }

    /// Normal pointing toward `body`, i.e. the direction it was pushed out
    pub fn normal_for(&self, body: BodyId) -> Option<Vec2> {
        if self.a == body {
            Some(self.normal)
        } else if self.b == body {
            Some(-self.normal)
        } else {
            None
        }
    }

    /// True when `body` rests on top of a ground or platform body.
    /// Ceiling and side contacts don't count (y grows downward).
    pub fn supports(&self, body: BodyId) -> bool {
        let Some((_, kind)) = self.other(body) else {
            return false;
        };
        kind.supports_player() && self.normal_for(body).is_some_and(|n| n.y < 0.0)
    }

    fn pair(&self) -> (BodyId, BodyId) {
        (self.a, self.b)
    }
}

/// Contacts produced by one step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    /// Contacts that did not exist in the previous step
    pub started: Vec<CollisionEvent>,
    /// Every contact in this step
    pub contacts: Vec<CollisionEvent>,
}

/// The physics world for one battle
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    /// Sorted by id for deterministic iteration
    bodies: Vec<Body>,
    next_id: u32,
    /// Gravity setting multiplier (1.0 = normal)
    gravity: f32,
    active_pairs: HashSet<(BodyId, BodyId)>,
    last_report: StepReport,
}

impl PhysicsWorld {
    pub fn new(gravity: f32) -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 1,
            gravity,
            active_pairs: HashSet::new(),
            last_report: StepReport::default(),
        }
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Insert a body, returning its handle
    pub fn add_body(&mut self, mut body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        self.bodies.push(body);
        id
    }

    /// Remove a body. Returns `None` if it was already removed.
    pub fn remove_body(&mut self, id: BodyId) -> Option<Body> {
        let index = self.bodies.iter().position(|b| b.id == id)?;
        self.active_pairs.retain(|(a, b)| *a != id && *b != id);
        Some(self.bodies.remove(index))
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Accumulate a force on a dynamic body for the next step
    pub fn apply_force(&mut self, id: BodyId, force: Vec2) {
        if let Some(body) = self.body_mut(id).filter(|b| !b.is_static) {
            body.force += force;
        }
    }

    pub fn set_velocity(&mut self, id: BodyId, velocity: Vec2) {
        if let Some(body) = self.body_mut(id).filter(|b| !b.is_static) {
            body.velocity = velocity;
        }
    }

    /// Contacts from the most recent step
    pub fn collision_events(&self) -> &StepReport {
        &self.last_report
    }

    /// Advance the world by `dt_ms` milliseconds
    pub fn step(&mut self, dt_ms: f32) -> &StepReport {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        let dt_sq = dt_ms * dt_ms;
        let tick_ratio = dt_ms / TICK_MS;
        let gravity = Vec2::new(0.0, self.gravity * GRAVITY_SCALE);

        // Integrate
        for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
            body.velocity += (gravity + body.force / body.mass) * dt_sq;
            body.velocity *= 1.0 - AIR_FRICTION;
            body.shape.center += body.velocity * tick_ratio;
            body.force = Vec2::ZERO;
        }

        let mut contacts = Vec::new();
        let dynamic: Vec<usize> = (0..self.bodies.len())
            .filter(|&i| !self.bodies[i].is_static)
            .collect();
        let statics: Vec<usize> = (0..self.bodies.len())
            .filter(|&i| self.bodies[i].is_static)
            .collect();

        // Dynamic vs static
        for &di in &dynamic {
            for &si in &statics {
                let stat = &self.bodies[si];
                let result = aabb_collision(&self.bodies[di].shape, &stat.shape);
                if !result.hit {
                    continue;
                }
                contacts.push(CollisionEvent::new(&self.bodies[di], stat, result.normal));
                if stat.is_sensor {
                    continue;
                }

                let body = &mut self.bodies[di];
                body.shape.center += result.normal * result.penetration;
                body.velocity = cancel_into_surface(body.velocity, result.normal);
                // Resting on top of something
                if result.normal.y < 0.0 {
                    body.velocity.x *= 1.0 - GROUND_FRICTION;
                }
            }
        }

        // Dynamic vs dynamic: split the overlap horizontally
        for (n, &i) in dynamic.iter().enumerate() {
            for &j in &dynamic[n + 1..] {
                let result = aabb_collision(&self.bodies[i].shape, &self.bodies[j].shape);
                if !result.hit {
                    continue;
                }
                let dx = self.bodies[i].shape.center.x - self.bodies[j].shape.center.x;
                let push = if dx < 0.0 { -1.0 } else { 1.0 };
                contacts.push(CollisionEvent::new(
                    &self.bodies[i],
                    &self.bodies[j],
                    Vec2::new(push, 0.0),
                ));
                let overlap_x = self.bodies[i].shape.half_extents.x
                    + self.bodies[j].shape.half_extents.x
                    - dx.abs();
                let half = Vec2::new(push * overlap_x * 0.5, 0.0);
                self.bodies[i].shape.center += half;
                self.bodies[j].shape.center -= half;
            }
        }

        for body in self.bodies.iter_mut().filter(|b| !b.is_static) {
            body.velocity.x = body
                .velocity
                .x
                .clamp(-MAX_HORIZONTAL_SPEED, MAX_HORIZONTAL_SPEED);
        }

        let started = contacts
            .iter()
            .filter(|c| !self.active_pairs.contains(&c.pair()))
            .copied()
            .collect();
        self.active_pairs = contacts.iter().map(|c| c.pair()).collect();
        self.last_report = StepReport { started, contacts };
        &self.last_report
    }
}

//! Deterministic battle simulation
//!
//! All combat logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID, then player ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod combat;
pub mod physics;
pub mod state;
pub mod tick;
pub mod timer;

pub use arena::{ArenaKind, Collider, UnknownArena};
pub use collision::{Aabb, CollisionResult, aabb_collision};
pub use combat::{AttackOutcome, RejectReason, attempt_attack, attempt_attack_with_roll};
pub use physics::{Body, BodyId, BodyKind, CollisionEvent, PhysicsWorld, StepReport};
pub use state::{
    BattleContext, BattleEvent, BattleSetup, BattleStats, HitEffect, Outcome, Player, PlayerId,
};
pub use tick::{PlayerIntent, TickInput, evaluate_outcome, tick};
pub use timer::Countdown;

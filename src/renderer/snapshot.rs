//! Read-only view of a battle for drawing
//!
//! Captured once per tick after the simulation step. Holds copies only, so a
//! renderer can never mutate simulation state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{HIT_EFFECT_TICKS, PLAYER_HEIGHT, PLAYER_WIDTH, STAMINA_MAX};
use crate::sim::{ArenaKind, BattleContext, Collider, Outcome, PlayerId};
use crate::weapon::WeaponArchetype;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    /// Box center
    pub position: Vec2,
    pub size: Vec2,
    /// +1 right, -1 left
    pub facing: f32,
    pub attacking: bool,
    pub health: i32,
    pub health_max: i32,
    pub stamina: f32,
    pub weapon: WeaponArchetype,
    /// Attack reach in world units
    pub reach: f32,
}

impl PlayerView {
    pub fn health_fraction(&self) -> f32 {
        if self.health_max <= 0 {
            return 0.0;
        }
        (self.health as f32 / self.health_max as f32).clamp(0.0, 1.0)
    }

    pub fn stamina_fraction(&self) -> f32 {
        (self.stamina / STAMINA_MAX).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEffectView {
    pub position: Vec2,
    /// 1 when fresh, falling to 0 as it expires
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub arena: ArenaKind,
    pub colliders: Vec<Collider>,
    pub players: [PlayerView; 2],
    pub hit_effects: Vec<HitEffectView>,
    pub time_remaining_secs: u32,
    pub outcome: Option<Outcome>,
}

impl RenderSnapshot {
    pub fn capture(ctx: &BattleContext) -> Self {
        let view = |id: PlayerId| {
            let p = ctx.player(id);
            PlayerView {
                id,
                position: p.position,
                size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
                facing: p.facing,
                attacking: p.attacking(),
                health: p.health,
                health_max: p.health_max,
                stamina: p.stamina,
                weapon: p.weapon.archetype,
                reach: p.weapon.effective_range(),
            }
        };

        Self {
            arena: ctx.arena,
            colliders: ctx.arena.colliders(),
            players: [view(PlayerId::P1), view(PlayerId::P2)],
            hit_effects: ctx
                .hit_effects
                .iter()
                .map(|e| HitEffectView {
                    position: e.position,
                    intensity: e.ttl_ticks as f32 / HIT_EFFECT_TICKS as f32,
                })
                .collect(),
            time_remaining_secs: ctx.timer.remaining_secs(),
            outcome: ctx.outcome,
        }
    }

    pub fn player(&self, id: PlayerId) -> &PlayerView {
        &self.players[id.index()]
    }
}

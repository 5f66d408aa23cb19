//! Battle state and core simulation types
//!
//! A [`BattleContext`] holds everything one battle needs: the physics world,
//! both players, the battle timer, stats and the seeded RNG. There is no
//! global state; the flow layer owns at most one context at a time.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::ArenaKind;
use super::collision::Aabb;
use super::physics::{Body, BodyId, BodyKind, PhysicsWorld};
use super::timer::Countdown;
use crate::consts::*;
use crate::settings::GameSettings;
use crate::weapon::Weapon;

/// Which player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::P1, PlayerId::P2];

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            PlayerId::P1 => 0,
            PlayerId::P2 => 1,
        }
    }

    #[inline]
    pub fn other(&self) -> PlayerId {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    /// 1 or 2, for display
    pub fn number(&self) -> u8 {
        self.index() as u8 + 1
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// A fighter in the arena
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub body: BodyId,
    /// Mirrored from the physics body after every step
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: i32,
    pub health_max: i32,
    pub stamina: f32,
    pub weapon: Weapon,
    pub on_ground: bool,
    /// Ticks until the next attack is allowed
    pub attack_cooldown: u32,
    /// Ticks left on the attacking flag
    pub attack_ticks: u32,
    /// -1.0 (left) or 1.0 (right)
    pub facing: f32,
}

impl Player {
    pub fn new(id: PlayerId, body: BodyId, position: Vec2, health: i32, weapon: Weapon) -> Self {
        Self {
            id,
            body,
            position,
            velocity: Vec2::ZERO,
            health,
            health_max: health,
            stamina: STAMINA_MAX,
            weapon,
            on_ground: false,
            attack_cooldown: 0,
            attack_ticks: 0,
            // Face the opponent
            facing: if id == PlayerId::P1 { 1.0 } else { -1.0 },
        }
    }

    #[inline]
    pub fn attacking(&self) -> bool {
        self.attack_ticks > 0
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Subtract health, flooring at zero. Returns the amount actually removed.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let before = self.health;
        self.health = (self.health - amount.max(0)).clamp(0, self.health_max);
        before - self.health
    }

    /// Pay a stamina cost if affordable
    pub fn spend_stamina(&mut self, cost: f32) -> bool {
        if self.stamina < cost {
            return false;
        }
        self.stamina = (self.stamina - cost).clamp(0.0, STAMINA_MAX);
        true
    }

    pub fn regenerate_stamina(&mut self) {
        self.stamina = (self.stamina + STAMINA_REGEN_PER_TICK).min(STAMINA_MAX);
    }

    /// Count down cooldown and attacking flag
    pub fn tick_timers(&mut self) {
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.attack_ticks = self.attack_ticks.saturating_sub(1);
    }

    pub fn health_fraction(&self) -> f32 {
        if self.health_max <= 0 {
            return 0.0;
        }
        self.health as f32 / self.health_max as f32
    }
}

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(PlayerId),
    Draw,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(id) => write!(f, "{id} wins"),
            Outcome::Draw => f.write_str("Draw"),
        }
    }
}

/// Gameplay events emitted during a tick (drained by the host)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEvent {
    AttackStarted { player: PlayerId },
    Hit {
        attacker: PlayerId,
        target: PlayerId,
        damage: i32,
        position: Vec2,
    },
    HazardHit {
        player: PlayerId,
        damage: i32,
        position: Vec2,
    },
    Jumped { player: PlayerId },
    Ended(Outcome),
}

/// A fading marker where damage landed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEffect {
    pub position: Vec2,
    pub ttl_ticks: u32,
}

/// Per-battle statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleStats {
    /// Successful weapon hits, indexed by player
    pub hits: [u32; 2],
    /// Wall-clock start (Unix ms)
    pub start_timestamp_ms: f64,
    pub elapsed_ticks: u64,
}

impl BattleStats {
    pub fn record_hit(&mut self, attacker: PlayerId) {
        self.hits[attacker.index()] += 1;
    }

    pub fn hits_by(&self, player: PlayerId) -> u32 {
        self.hits[player.index()]
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ticks as f64 * TICK_MS as f64
    }
}

/// Everything needed to start a battle
#[derive(Debug, Clone)]
pub struct BattleSetup {
    pub weapons: [Weapon; 2],
    pub arena: ArenaKind,
    pub seed: u64,
    pub start_timestamp_ms: f64,
}

/// Complete state of one battle
#[derive(Debug, Clone)]
pub struct BattleContext {
    pub seed: u64,
    pub rng: Pcg32,
    pub world: PhysicsWorld,
    /// Indexed by `PlayerId::index`
    pub players: [Player; 2],
    pub arena: ArenaKind,
    pub timer: Countdown,
    pub stats: BattleStats,
    pub hit_effects: Vec<HitEffect>,
    /// Events from the most recent tick
    pub events: Vec<BattleEvent>,
    pub outcome: Option<Outcome>,
    pub time_ticks: u64,
    torn_down: bool,
}

impl BattleContext {
    /// Build the world, arena colliders and both players
    pub fn new(setup: BattleSetup, settings: &GameSettings) -> Self {
        let settings = settings.sanitized();
        let mut world = PhysicsWorld::new(settings.gravity);

        for collider in setup.arena.colliders() {
            let body = if collider.is_sensor {
                Body::sensor(collider.kind, collider.shape)
            } else {
                Body::fixed(collider.kind, collider.shape)
            };
            world.add_body(body);
        }

        let [w1, w2] = setup.weapons;
        let health = settings.health_per_player as i32;
        let spawn_y = GROUND_TOP - PLAYER_HEIGHT / 2.0;
        let players = [
            Self::spawn(&mut world, PlayerId::P1, Vec2::new(P1_SPAWN_X, spawn_y), health, w1),
            Self::spawn(&mut world, PlayerId::P2, Vec2::new(P2_SPAWN_X, spawn_y), health, w2),
        ];

        log::info!(
            "Battle start: arena={}, seed={}, {} vs {}",
            setup.arena.as_str(),
            setup.seed,
            players[0].weapon,
            players[1].weapon
        );

        Self {
            seed: setup.seed,
            rng: Pcg32::seed_from_u64(setup.seed),
            world,
            players,
            arena: setup.arena,
            timer: Countdown::from_secs(settings.battle_time_sec),
            stats: BattleStats {
                start_timestamp_ms: setup.start_timestamp_ms,
                ..Default::default()
            },
            hit_effects: Vec::new(),
            events: Vec::new(),
            outcome: None,
            time_ticks: 0,
            torn_down: false,
        }
    }

    fn spawn(world: &mut PhysicsWorld, id: PlayerId, pos: Vec2, health: i32, weapon: Weapon) -> Player {
        let body = world.add_body(Body::dynamic(
            BodyKind::Player,
            Aabb::new(pos, Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0)),
            PLAYER_DENSITY,
        ));
        Player::new(id, body, pos, health, weapon)
    }

    #[inline]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    /// Which player owns a body, if any
    pub fn player_for_body(&self, body: BodyId) -> Option<PlayerId> {
        self.players.iter().find(|p| p.body == body).map(|p| p.id)
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn add_hit_effect(&mut self, position: Vec2) {
        self.hit_effects.push(HitEffect {
            position,
            ttl_ticks: HIT_EFFECT_TICKS,
        });
    }

    /// Copy body positions/velocities back onto the players
    pub fn sync_from_world(&mut self) {
        for player in &mut self.players {
            if let Some(body) = self.world.body(player.body) {
                player.position = body.position();
                player.velocity = body.velocity;
            }
        }
    }

    /// Remove both player bodies from the world. Safe to call repeatedly;
    /// bodies are only removed the first time.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        for player in &self.players {
            if self.world.remove_body(player.body).is_none() {
                log::warn!("{} body already gone at teardown", player.id);
            }
        }
        self.torn_down = true;
        log::debug!("Battle world torn down after {} ticks", self.time_ticks);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

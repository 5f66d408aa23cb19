//! Weapon Duel - draw a weapon, then fight with it
//!
//! Core modules:
//! - `weapon`: Drawing/description analysis into typed weapons
//! - `sim`: Deterministic battle simulation (physics, combat, timers)
//! - `flow`: Screen/phase state machine driving a full match
//! - `renderer`: Snapshots and vertex draw lists for a host renderer
//! - `persistence`: Key-value storage for settings and records
//! - `platform`: Input bindings and wall-clock time
//! - `web`: Browser host bindings (wasm32 only)

pub mod flow;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod weapon;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use flow::{BattleReport, BattleStateMachine, Drawing, Screen};
pub use records::GameRecords;
pub use settings::GameSettings;
pub use weapon::{Weapon, WeaponArchetype};

/// Game configuration constants
pub mod consts {
    /// Simulation rate
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in milliseconds
    pub const TICK_MS: f32 = 1000.0 / TICK_HZ as f32;

    /// Arena dimensions (screen space, y down)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 450.0;
    /// Y coordinate of the ground surface
    pub const GROUND_TOP: f32 = 420.0;
    pub const WALL_THICKNESS: f32 = 20.0;

    /// Player box
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    /// Mass per unit area, so a player weighs 3.2
    pub const PLAYER_DENSITY: f32 = 0.001;
    pub const P1_SPAWN_X: f32 = 200.0;
    pub const P2_SPAWN_X: f32 = 600.0;

    /// Gravity acceleration per unit of the gravity setting (units/ms²)
    pub const GRAVITY_SCALE: f32 = 0.001;
    /// Horizontal velocity cap (units per tick)
    pub const MAX_HORIZONTAL_SPEED: f32 = 8.0;
    /// Per-tick fractional velocity loss in the air
    pub const AIR_FRICTION: f32 = 0.01;
    /// Per-tick fractional horizontal velocity loss while standing on something
    pub const GROUND_FRICTION: f32 = 0.1;

    /// Horizontal force applied while a move intent is held
    pub const MOVE_FORCE: f32 = 0.01;
    /// Vertical velocity set by a jump (negative is up)
    pub const JUMP_VELOCITY: f32 = -10.0;

    pub const STAMINA_MAX: f32 = 100.0;
    pub const STAMINA_REGEN_PER_TICK: f32 = 0.8;
    pub const ATTACK_STAMINA_COST: f32 = 15.0;
    /// Jump requires strictly more than this and costs the same amount
    pub const JUMP_STAMINA_COST: f32 = 20.0;

    /// How long the attacking flag stays up (200 ms)
    pub const ATTACK_FLAG_TICKS: u32 = 12;
    /// Floor for attack cooldown, in ticks
    pub const MIN_ATTACK_COOLDOWN: u32 = 20;

    /// Damage dealt by touching a hazard
    pub const HAZARD_DAMAGE: i32 = 20;
    /// Upward component of attack knockback force
    pub const KNOCKBACK_LIFT: f32 = 0.005;
    /// Lifetime of a hit effect marker
    pub const HIT_EFFECT_TICKS: u32 = 20;
}

/// Install browser logging and panic reporting
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Weapon Duel core loaded");
}

//! Weapon creation
//!
//! A weapon is created once per player per round, either from a raster
//! drawing or from a free-text description, and never changes afterwards.

pub mod catalog;
pub mod drawing;
pub mod text;

pub use catalog::{BaseStats, STAT_MAX, STAT_MIN, WeaponArchetype, classify};
pub use drawing::{BufferError, DrawingSummary, PixelBuffer, Rgba, analyze, summarize};
pub use text::{Effect, Material, analyze_description};

use serde::{Deserialize, Serialize};

/// Where a weapon's stats came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeaponSource {
    /// Nothing usable was supplied (blank canvas, empty text, bad buffer)
    Fallback,
    /// Raster drawing, summarized
    Drawing(DrawingSummary),
    /// Text description with the traits detected in it
    Description {
        text: String,
        material: Option<Material>,
        effects: Vec<Effect>,
    },
}

/// A finished weapon. Stats are always within [STAT_MIN, STAT_MAX].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub archetype: WeaponArchetype,
    pub damage: u32,
    pub speed: u32,
    pub range: u32,
    pub source: WeaponSource,
}

impl Weapon {
    /// Stat value used for every fallback stat
    pub const FALLBACK_STAT: u32 = 50;

    /// The weapon handed out when there is nothing to analyze
    pub fn fallback() -> Self {
        Self {
            archetype: WeaponArchetype::Sword,
            damage: Self::FALLBACK_STAT,
            speed: Self::FALLBACK_STAT,
            range: Self::FALLBACK_STAT,
            source: WeaponSource::Fallback,
        }
    }

    /// Build a weapon from raw stats, rounding and clamping each one
    pub fn from_raw(
        archetype: WeaponArchetype,
        damage: f32,
        speed: f32,
        range: f32,
        source: WeaponSource,
    ) -> Self {
        Self {
            archetype,
            damage: catalog::clamp_stat(damage),
            speed: catalog::clamp_stat(speed),
            range: catalog::clamp_stat(range),
            source,
        }
    }

    /// Horizontal reach of an attack with this weapon
    pub fn effective_range(&self) -> f32 {
        50.0 + self.range as f32 * 1.5
    }

    /// Ticks of cooldown after an accepted attack
    pub fn cooldown_ticks(&self) -> u32 {
        80u32.saturating_sub(self.speed).max(20)
    }
}

impl std::fmt::Display for Weapon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (dmg {}, spd {}, rng {})",
            self.archetype, self.damage, self.speed, self.range
        )
    }
}

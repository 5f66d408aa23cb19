//! Weapon archetype table and geometry-based classification
//!
//! Every archetype has fixed base stats. Drawings are classified from three
//! numbers (aspect ratio, drawn pixel count, bounding-box area) with a fixed
//! priority order, so overlapping rules always resolve the same way.

use serde::{Deserialize, Serialize};

/// Lowest value a final weapon stat may take
pub const STAT_MIN: u32 = 10;
/// Highest value a final weapon stat may take
pub const STAT_MAX: u32 = 100;

/// Weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponArchetype {
    Sword,
    Axe,
    Spear,
    /// Any firearm: pistol, rifle, blaster...
    Gun,
    Bow,
    Hammer,
    /// Dagger or knife
    Dagger,
    Laser,
    Wand,
}

/// Base stats for an archetype, all in [1, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub speed: u32,
    pub damage: u32,
    pub range: u32,
}

impl WeaponArchetype {
    /// All archetypes, in table order
    pub const ALL: [WeaponArchetype; 9] = [
        WeaponArchetype::Sword,
        WeaponArchetype::Axe,
        WeaponArchetype::Spear,
        WeaponArchetype::Gun,
        WeaponArchetype::Bow,
        WeaponArchetype::Hammer,
        WeaponArchetype::Dagger,
        WeaponArchetype::Laser,
        WeaponArchetype::Wand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponArchetype::Sword => "sword",
            WeaponArchetype::Axe => "axe",
            WeaponArchetype::Spear => "spear",
            WeaponArchetype::Gun => "gun",
            WeaponArchetype::Bow => "bow",
            WeaponArchetype::Hammer => "hammer",
            WeaponArchetype::Dagger => "dagger",
            WeaponArchetype::Laser => "laser",
            WeaponArchetype::Wand => "wand",
        }
    }

    pub fn base_stats(&self) -> BaseStats {
        let (speed, damage, range) = match self {
            WeaponArchetype::Sword => (60, 60, 50),
            WeaponArchetype::Axe => (40, 75, 40),
            WeaponArchetype::Spear => (50, 55, 80),
            WeaponArchetype::Gun => (70, 45, 100),
            WeaponArchetype::Bow => (55, 50, 90),
            WeaponArchetype::Hammer => (30, 90, 35),
            WeaponArchetype::Dagger => (90, 35, 20),
            WeaponArchetype::Laser => (75, 65, 95),
            WeaponArchetype::Wand => (65, 55, 70),
        };
        BaseStats {
            speed,
            damage,
            range,
        }
    }
}

impl std::fmt::Display for WeaponArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a drawing from its geometry.
///
/// Rules are checked top to bottom and the first match wins. The order is
/// observable: a long thin drawing with a small area is a spear, never a
/// dagger.
pub fn classify(aspect_ratio: f32, pixel_count: u32, area: u32) -> WeaponArchetype {
    if aspect_ratio > 4.0 {
        WeaponArchetype::Spear
    } else if aspect_ratio > 2.5 && pixel_count < 500 {
        WeaponArchetype::Sword
    } else if aspect_ratio < 0.8 && area > 8000 {
        WeaponArchetype::Hammer
    } else if aspect_ratio > 2.0 && pixel_count > 800 {
        WeaponArchetype::Gun
    } else if aspect_ratio < 1.2 && area > 5000 {
        WeaponArchetype::Axe
    } else if area < 3000 {
        WeaponArchetype::Dagger
    } else {
        WeaponArchetype::Sword
    }
}

/// Round and clamp a raw stat into [STAT_MIN, STAT_MAX]
#[inline]
pub fn clamp_stat(raw: f32) -> u32 {
    if !raw.is_finite() {
        return STAT_MIN;
    }
    (raw.round() as i64).clamp(STAT_MIN as i64, STAT_MAX as i64) as u32
}

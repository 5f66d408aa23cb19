//! Text description analysis
//!
//! Keyword matching over ordered pattern lists. Bonuses stack in a fixed
//! order: type base stats, material multiplier, effect bonuses, description
//! length multiplier, creativity bonus, then rounding and clamping.

use serde::{Deserialize, Serialize};

use super::catalog::WeaponArchetype;
use super::{Weapon, WeaponSource};

/// Weapon type keywords, checked in order; first match wins.
///
/// `crossbow` sits before `bow` so it isn't swallowed, but both land on Bow.
const TYPE_PATTERNS: &[(WeaponArchetype, &[&str])] = &[
    (WeaponArchetype::Sword, &["sword", "blade", "katana", "sabre"]),
    (WeaponArchetype::Axe, &["axe", "hatchet"]),
    (WeaponArchetype::Spear, &["spear", "lance", "pike", "trident"]),
    (
        WeaponArchetype::Gun,
        &["gun", "pistol", "rifle", "blaster", "revolver"],
    ),
    (WeaponArchetype::Bow, &["crossbow", "bow"]),
    (WeaponArchetype::Hammer, &["hammer", "mace", "club"]),
    (WeaponArchetype::Dagger, &["dagger", "knife"]),
    (WeaponArchetype::Laser, &["laser", "beam"]),
    (WeaponArchetype::Wand, &["wand", "staff"]),
];

/// Weapon materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Diamond,
    Obsidian,
    Steel,
    Gold,
    Iron,
    Stone,
    Wood,
}

impl Material {
    /// Detection order; first match wins
    const ORDER: [Material; 7] = [
        Material::Diamond,
        Material::Obsidian,
        Material::Steel,
        Material::Gold,
        Material::Iron,
        Material::Stone,
        Material::Wood,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Material::Diamond => &["diamond"],
            Material::Obsidian => &["obsidian"],
            Material::Steel => &["steel"],
            Material::Gold => &["gold"],
            Material::Iron => &["iron"],
            Material::Stone => &["stone", "rock"],
            Material::Wood => &["wood", "timber"],
        }
    }

    /// Multiplier applied to damage and speed
    pub fn multiplier(&self) -> f32 {
        match self {
            Material::Diamond => 1.5,
            Material::Obsidian => 1.4,
            Material::Steel => 1.2,
            Material::Gold => 1.15,
            Material::Iron => 1.1,
            Material::Stone => 0.9,
            Material::Wood => 0.8,
        }
    }
}

/// Elemental effect tags. Each is detected independently and they stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Fire,
    Ice,
    Lightning,
    Poison,
    Wind,
    Shadow,
}

impl Effect {
    const ORDER: [Effect; 6] = [
        Effect::Fire,
        Effect::Ice,
        Effect::Lightning,
        Effect::Poison,
        Effect::Wind,
        Effect::Shadow,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Effect::Fire => &["fire", "flame", "burning", "inferno"],
            Effect::Ice => &["ice", "frost", "frozen"],
            Effect::Lightning => &["lightning", "thunder", "electric", "shock"],
            Effect::Poison => &["poison", "venom", "toxic"],
            Effect::Wind => &["wind", "storm", "gust"],
            Effect::Shadow => &["shadow", "dark", "void"],
        }
    }

    /// Additive (damage, speed) bonus
    pub fn bonus(&self) -> (f32, f32) {
        match self {
            Effect::Fire => (10.0, 0.0),
            Effect::Ice => (6.0, 0.0),
            Effect::Lightning => (8.0, 10.0),
            Effect::Poison => (7.0, 0.0),
            Effect::Wind => (0.0, 12.0),
            Effect::Shadow => (5.0, 5.0),
        }
    }
}

/// Flat damage/speed bonus for naming both a material and an effect
const CREATIVITY_BONUS: f32 = 5.0;

fn matches_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn detect_archetype(text: &str) -> WeaponArchetype {
    TYPE_PATTERNS
        .iter()
        .find(|(_, keywords)| matches_any(text, keywords))
        .map(|(archetype, _)| *archetype)
        .unwrap_or(WeaponArchetype::Sword)
}

fn detect_material(text: &str) -> Option<Material> {
    Material::ORDER
        .into_iter()
        .find(|m| matches_any(text, m.keywords()))
}

fn detect_effects(text: &str) -> Vec<Effect> {
    Effect::ORDER
        .into_iter()
        .filter(|e| matches_any(text, e.keywords()))
        .collect()
}

/// Multiplier for longer descriptions, capped at 1.2
fn length_multiplier(len: usize) -> f32 {
    (1.0 + len as f32 / 500.0).min(1.2)
}

/// Analyze a weapon description. Blank text yields the fallback weapon.
pub fn analyze_description(description: &str) -> Weapon {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        log::debug!("Empty description, using fallback weapon");
        return Weapon::fallback();
    }

    let text = trimmed.to_lowercase();
    let archetype = detect_archetype(&text);
    let material = detect_material(&text);
    let effects = detect_effects(&text);

    let base = archetype.base_stats();
    let mut damage = base.damage as f32;
    let mut speed = base.speed as f32;

    if let Some(material) = material {
        damage *= material.multiplier();
        speed *= material.multiplier();
    }

    for effect in &effects {
        let (d, s) = effect.bonus();
        damage += d;
        speed += s;
    }

    // Whole description as typed, surrounding whitespace included
    damage *= length_multiplier(description.chars().count());

    if material.is_some() && !effects.is_empty() {
        damage += CREATIVITY_BONUS;
        speed += CREATIVITY_BONUS;
    }

    let weapon = Weapon::from_raw(
        archetype,
        damage,
        speed,
        base.range as f32,
        WeaponSource::Description {
            text: trimmed.to_string(),
            material,
            effects,
        },
    );
    log::debug!("Description {:?} -> {}", trimmed, weapon);
    weapon
}

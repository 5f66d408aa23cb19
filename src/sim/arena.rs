//! Arena profiles
//!
//! Every arena shares the ground and two side walls. Profiles differ in how
//! many floating platforms and hazard strips they add.

use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::Aabb;
use super::physics::BodyKind;
use crate::consts::*;

/// Selectable arenas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ArenaKind {
    /// Two low platforms, no hazards
    #[default]
    Classic,
    /// Four stepped platforms, no hazards
    Skyward,
    /// Two platforms over a lava pool
    Volcano,
    /// Three platforms, spikes at both ends
    Gauntlet,
}

/// A static collider description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub kind: BodyKind,
    pub shape: Aabb,
    pub is_sensor: bool,
}

impl Collider {
    fn solid(kind: BodyKind, min: Vec2, max: Vec2) -> Self {
        Self {
            kind,
            shape: Aabb::from_min_max(min, max),
            is_sensor: false,
        }
    }

    fn platform(x: f32, y: f32, width: f32) -> Self {
        Self::solid(
            BodyKind::Platform,
            Vec2::new(x - width / 2.0, y),
            Vec2::new(x + width / 2.0, y + PLATFORM_THICKNESS),
        )
    }

    /// Hazard strip sitting on the ground, reaching a little above it
    fn hazard(x0: f32, x1: f32) -> Self {
        Self {
            kind: BodyKind::Hazard,
            shape: Aabb::from_min_max(
                Vec2::new(x0, GROUND_TOP - HAZARD_HEIGHT),
                Vec2::new(x1, GROUND_TOP),
            ),
            is_sensor: true,
        }
    }
}

/// Arena name that matches no profile
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown arena {0:?}")]
pub struct UnknownArena(pub String);

impl FromStr for ArenaKind {
    type Err = UnknownArena;

    /// Case-insensitive, with a few aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classic" => Ok(ArenaKind::Classic),
            "skyward" | "sky" => Ok(ArenaKind::Skyward),
            "volcano" | "lava" => Ok(ArenaKind::Volcano),
            "gauntlet" | "spikes" => Ok(ArenaKind::Gauntlet),
            _ => Err(UnknownArena(s.to_string())),
        }
    }
}

const PLATFORM_THICKNESS: f32 = 16.0;
const HAZARD_HEIGHT: f32 = 12.0;

impl ArenaKind {
    pub const ALL: [ArenaKind; 4] = [
        ArenaKind::Classic,
        ArenaKind::Skyward,
        ArenaKind::Volcano,
        ArenaKind::Gauntlet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArenaKind::Classic => "Classic",
            ArenaKind::Skyward => "Skyward",
            ArenaKind::Volcano => "Volcano",
            ArenaKind::Gauntlet => "Gauntlet",
        }
    }

    /// Platforms stay out of the spawn columns so both players can jump
    /// straight up from where they start.
    fn platforms(&self) -> Vec<Collider> {
        match self {
            ArenaKind::Classic => vec![
                Collider::platform(320.0, 320.0, 120.0),
                Collider::platform(480.0, 320.0, 120.0),
            ],
            ArenaKind::Skyward => vec![
                Collider::platform(90.0, 320.0, 100.0),
                Collider::platform(300.0, 250.0, 110.0),
                Collider::platform(500.0, 250.0, 110.0),
                Collider::platform(710.0, 320.0, 100.0),
            ],
            ArenaKind::Volcano => vec![
                Collider::platform(300.0, 300.0, 110.0),
                Collider::platform(500.0, 300.0, 110.0),
            ],
            ArenaKind::Gauntlet => vec![
                Collider::platform(300.0, 320.0, 110.0),
                Collider::platform(400.0, 230.0, 120.0),
                Collider::platform(500.0, 320.0, 110.0),
            ],
        }
    }

    fn hazards(&self) -> Vec<Collider> {
        match self {
            ArenaKind::Classic | ArenaKind::Skyward => Vec::new(),
            ArenaKind::Volcano => vec![Collider::hazard(340.0, 460.0)],
            ArenaKind::Gauntlet => vec![
                Collider::hazard(WALL_THICKNESS, 90.0),
                Collider::hazard(ARENA_WIDTH - 90.0, ARENA_WIDTH - WALL_THICKNESS),
            ],
        }
    }

    pub fn platform_count(&self) -> usize {
        self.platforms().len()
    }

    pub fn hazard_count(&self) -> usize {
        self.hazards().len()
    }

    /// Ground, walls, platforms and hazards for this arena
    pub fn colliders(&self) -> Vec<Collider> {
        let mut colliders = vec![
            Collider::solid(
                BodyKind::Ground,
                Vec2::new(0.0, GROUND_TOP),
                Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            ),
            Collider::solid(
                BodyKind::Wall,
                Vec2::new(0.0, 0.0),
                Vec2::new(WALL_THICKNESS, ARENA_HEIGHT),
            ),
            Collider::solid(
                BodyKind::Wall,
                Vec2::new(ARENA_WIDTH - WALL_THICKNESS, 0.0),
                Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            ),
        ];
        colliders.extend(self.platforms());
        colliders.extend(self.hazards());
        colliders
    }
}

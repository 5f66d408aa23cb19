//! Game settings
//!
//! Persisted separately from battle records. Missing fields take defaults;
//! out-of-range values are clamped rather than rejected.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KvStore, PersistError};

/// Allowed range and default for each setting
pub mod limits {
    pub const DRAWING_TIME_SEC: (u32, u32, u32) = (5, 120, 30);
    pub const BATTLE_TIME_SEC: (u32, u32, u32) = (10, 600, 120);
    pub const HEALTH_PER_PLAYER: (u32, u32, u32) = (10, 1000, 100);
    pub const GRAVITY: (f32, f32, f32) = (0.1, 3.0, 1.0);
}

/// Match configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Time each player gets to draw or describe a weapon
    pub drawing_time_sec: u32,
    /// Battle length before it's called a draw
    pub battle_time_sec: u32,
    /// Starting (and maximum) health
    pub health_per_player: u32,
    /// Gravity multiplier (1.0 = normal)
    pub gravity: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            drawing_time_sec: limits::DRAWING_TIME_SEC.2,
            battle_time_sec: limits::BATTLE_TIME_SEC.2,
            health_per_player: limits::HEALTH_PER_PLAYER.2,
            gravity: limits::GRAVITY.2,
        }
    }
}

impl GameSettings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "weapon_duel_settings";

    /// Clamp every value into its allowed range
    pub fn sanitize(&mut self) {
        let (lo, hi, _) = limits::DRAWING_TIME_SEC;
        self.drawing_time_sec = self.drawing_time_sec.clamp(lo, hi);

        let (lo, hi, _) = limits::BATTLE_TIME_SEC;
        self.battle_time_sec = self.battle_time_sec.clamp(lo, hi);

        let (lo, hi, _) = limits::HEALTH_PER_PLAYER;
        self.health_per_player = self.health_per_player.clamp(lo, hi);

        let (lo, hi, default) = limits::GRAVITY;
        self.gravity = if self.gravity.is_finite() {
            self.gravity.clamp(lo, hi)
        } else {
            default
        };
    }

    /// Sanitized copy
    pub fn sanitized(&self) -> Self {
        let mut settings = self.clone();
        settings.sanitize();
        settings
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(store: &dyn KvStore) -> Self {
        match persistence::load_json::<GameSettings>(store, Self::STORAGE_KEY) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load settings, using defaults: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KvStore) -> Result<(), PersistError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_sanitize_clamps() {
        let settings = GameSettings {
            drawing_time_sec: 0,
            battle_time_sec: 10_000,
            health_per_player: 0,
            gravity: 50.0,
        }
        .sanitized();
        assert_eq!(settings.drawing_time_sec, 5);
        assert_eq!(settings.battle_time_sec, 600);
        assert_eq!(settings.health_per_player, 10);
        assert_eq!(settings.gravity, 3.0);
    }

    #[test]
    fn test_non_finite_gravity_defaults() {
        let settings = GameSettings {
            gravity: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.gravity, 1.0);
    }

    #[test]
    fn test_missing_fields_default() {
        let settings: GameSettings = serde_json::from_str(r#"{"battle_time_sec": 90}"#).unwrap();
        assert_eq!(settings.battle_time_sec, 90);
        assert_eq!(settings.drawing_time_sec, 30);
        assert_eq!(settings.health_per_player, 100);
    }

    #[test]
    fn test_load_save_roundtrip() {
        let mut store = MemoryStore::new();
        let settings = GameSettings {
            drawing_time_sec: 45,
            battle_time_sec: 60,
            health_per_player: 150,
            gravity: 0.5,
        };
        settings.save(&mut store).unwrap();
        assert_eq!(GameSettings::load(&store), settings);
    }

    #[test]
    fn test_load_garbage_defaults() {
        let mut store = MemoryStore::new();
        store.set(GameSettings::STORAGE_KEY, "not json").unwrap();
        assert_eq!(GameSettings::load(&store), GameSettings::default());
    }

    #[test]
    fn test_load_out_of_range_clamped() {
        let mut store = MemoryStore::new();
        store
            .set(GameSettings::STORAGE_KEY, r#"{"health_per_player": 5000}"#)
            .unwrap();
        assert_eq!(GameSettings::load(&store).health_per_player, 1000);
    }
}

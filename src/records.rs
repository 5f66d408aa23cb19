//! Cumulative win/loss record
//!
//! Persisted after every finished battle, with the most recent battles kept
//! for a results history screen.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KvStore, PersistError};
use crate::sim::{Outcome, PlayerId};
use crate::weapon::WeaponArchetype;

/// Maximum number of recent battles to keep
pub const MAX_RECENT: usize = 10;

/// Summary of one finished battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord {
    pub outcome: Outcome,
    /// Weapon hits, indexed by player
    pub hits: [u32; 2],
    pub elapsed_ms: f64,
    /// Unix timestamp (ms) when the battle ended
    pub timestamp_ms: f64,
    pub weapons: [WeaponArchetype; 2],
}

/// Lifetime totals plus recent history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRecords {
    pub total_games: u32,
    pub p1_wins: u32,
    pub p2_wins: u32,
    pub draws: u32,
    /// Newest first
    pub recent: Vec<BattleRecord>,
}

impl GameRecords {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "weapon_duel_records";

    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished battle
    pub fn record(&mut self, entry: BattleRecord) {
        self.total_games += 1;
        match entry.outcome {
            Outcome::Winner(PlayerId::P1) => self.p1_wins += 1,
            Outcome::Winner(PlayerId::P2) => self.p2_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
        self.recent.insert(0, entry);
        self.recent.truncate(MAX_RECENT);
    }

    pub fn wins(&self, player: PlayerId) -> u32 {
        match player {
            PlayerId::P1 => self.p1_wins,
            PlayerId::P2 => self.p2_wins,
        }
    }

    /// Fraction of games won by a player (0 if none played)
    pub fn win_rate(&self, player: PlayerId) -> f32 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.wins(player) as f32 / self.total_games as f32
    }

    pub fn is_empty(&self) -> bool {
        self.total_games == 0
    }

    /// Load records, starting fresh on any problem
    pub fn load(store: &dyn KvStore) -> Self {
        match persistence::load_json::<GameRecords>(store, Self::STORAGE_KEY) {
            Ok(Some(records)) => {
                log::info!("Loaded records ({} games)", records.total_games);
                records
            }
            Ok(None) => {
                log::info!("No records found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Failed to load records, starting fresh: {e}");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KvStore) -> Result<(), PersistError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Records saved ({} games)", self.total_games);
        Ok(())
    }
}

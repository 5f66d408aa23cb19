//! Match flow: screens, phase timers and battle lifecycle
//!
//! `MainMenu -> WeaponInput(P1) -> WeaponInput(P2) -> AnalysisDisplay ->
//! ArenaSelect -> Battle -> Result -> (MainMenu | rematch)`
//!
//! The machine owns at most one battle at a time. Phase timers are ticked
//! from [`BattleStateMachine::update`], the same call that advances the
//! battle, so there is a single execution context.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_MS;
use crate::persistence::KvStore;
use crate::platform;
use crate::records::{BattleRecord, GameRecords};
use crate::renderer::RenderSnapshot;
use crate::settings::GameSettings;
use crate::sim::{
    ArenaKind, BattleContext, BattleSetup, BattleStats, Countdown, Outcome, PlayerId, TickInput,
    tick,
};
use crate::weapon::{self, PixelBuffer, Rgba, Weapon};

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    MainMenu,
    /// A player is drawing or describing their weapon
    WeaponInput(PlayerId),
    /// Both weapons shown side by side
    AnalysisDisplay,
    ArenaSelect,
    Battle,
    Result,
}

/// An owned raster drawing handed over by the host canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    /// RGBA8 samples
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Bytes between row starts
    pub stride: usize,
    pub background: Rgba,
}

impl Drawing {
    /// Tightly packed rows
    pub fn packed(pixels: Vec<u8>, width: u32, height: u32, background: Rgba) -> Self {
        Self {
            pixels,
            width,
            height,
            stride: width as usize * 4,
            background,
        }
    }

    /// Analyze into a weapon. A malformed buffer degrades to the fallback.
    pub fn analyze(&self) -> Weapon {
        match PixelBuffer::new(&self.pixels, self.width, self.height, self.stride) {
            Ok(buffer) => weapon::analyze(&buffer, self.background),
            Err(e) => {
                log::warn!("Unusable drawing ({e}), using fallback weapon");
                Weapon::fallback()
            }
        }
    }
}

/// What the current player has supplied so far
#[derive(Debug, Clone, Default, PartialEq)]
pub enum WeaponDraft {
    #[default]
    Empty,
    Drawing(Drawing),
    Description(String),
}

impl WeaponDraft {
    pub fn analyze(&self) -> Weapon {
        match self {
            WeaponDraft::Empty => Weapon::fallback(),
            WeaponDraft::Drawing(drawing) => drawing.analyze(),
            WeaponDraft::Description(text) => weapon::analyze_description(text),
        }
    }
}

/// Summary shown on the result screen
#[derive(Debug, Clone, PartialEq)]
pub struct BattleReport {
    pub outcome: Outcome,
    pub stats: BattleStats,
    pub weapons: [Weapon; 2],
    pub arena: ArenaKind,
}

/// Drives a full match from menu to result
pub struct BattleStateMachine {
    screen: Screen,
    settings: GameSettings,
    records: GameRecords,
    store: Box<dyn KvStore>,
    draft: WeaponDraft,
    /// Running while a player is in WeaponInput
    input_timer: Option<Countdown>,
    weapons: [Option<Weapon>; 2],
    arena: ArenaKind,
    battle: Option<BattleContext>,
    report: Option<BattleReport>,
    next_seed: u64,
}

impl BattleStateMachine {
    /// Load settings and records from `store` and start at the main menu
    pub fn new(store: Box<dyn KvStore>, seed: u64) -> Self {
        let settings = GameSettings::load(store.as_ref());
        let records = GameRecords::load(store.as_ref());
        Self {
            screen: Screen::MainMenu,
            settings,
            records,
            store,
            draft: WeaponDraft::Empty,
            input_timer: None,
            weapons: [None, None],
            arena: ArenaKind::default(),
            battle: None,
            report: None,
            next_seed: seed,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn records(&self) -> &GameRecords {
        &self.records
    }

    pub fn weapon(&self, player: PlayerId) -> Option<&Weapon> {
        self.weapons[player.index()].as_ref()
    }

    pub fn draft(&self) -> &WeaponDraft {
        &self.draft
    }

    pub fn battle(&self) -> Option<&BattleContext> {
        self.battle.as_ref()
    }

    /// Report from the last finished battle
    pub fn report(&self) -> Option<&BattleReport> {
        self.report.as_ref()
    }

    pub fn selected_arena(&self) -> ArenaKind {
        self.arena
    }

    /// Seconds left in the current phase (weapon input or battle)
    pub fn seconds_remaining(&self) -> Option<u32> {
        match self.screen {
            Screen::WeaponInput(_) => self.input_timer.as_ref().map(|t| t.remaining_secs()),
            Screen::Battle => self.battle.as_ref().map(|b| b.timer.remaining_secs()),
            _ => None,
        }
    }

    fn set_screen(&mut self, screen: Screen) {
        log::info!("Screen: {:?} -> {:?}", self.screen, screen);
        self.screen = screen;
    }

    fn cancel_input_timer(&mut self) {
        if let Some(mut timer) = self.input_timer.take() {
            timer.cancel();
        }
    }

    fn enter_weapon_input(&mut self, player: PlayerId) {
        self.cancel_input_timer();
        self.weapons[player.index()] = None;
        self.draft = WeaponDraft::Empty;
        self.input_timer = Some(Countdown::from_secs(self.settings.drawing_time_sec));
        self.set_screen(Screen::WeaponInput(player));
    }

    /// Tear down the active battle, if any
    fn end_battle(&mut self) -> Option<BattleContext> {
        let mut battle = self.battle.take()?;
        battle.timer.cancel();
        battle.teardown();
        Some(battle)
    }

    /// Start a new match. Valid from the main menu or result screen.
    pub fn start_game(&mut self) -> bool {
        if !matches!(self.screen, Screen::MainMenu | Screen::Result) {
            return false;
        }
        self.weapons = [None, None];
        self.report = None;
        self.enter_weapon_input(PlayerId::P1);
        true
    }

    /// Replace the current draft with a drawing
    pub fn set_drawing(&mut self, drawing: Drawing) -> bool {
        if !matches!(self.screen, Screen::WeaponInput(_)) {
            return false;
        }
        self.draft = WeaponDraft::Drawing(drawing);
        true
    }

    /// Replace the current draft with a text description
    pub fn set_description(&mut self, text: impl Into<String>) -> bool {
        if !matches!(self.screen, Screen::WeaponInput(_)) {
            return false;
        }
        self.draft = WeaponDraft::Description(text.into());
        true
    }

    /// Lock in the current draft as this player's weapon. The input timer
    /// expiring does exactly the same.
    pub fn finalize_weapon(&mut self) -> bool {
        let Screen::WeaponInput(player) = self.screen else {
            return false;
        };
        self.cancel_input_timer();

        let weapon = std::mem::take(&mut self.draft).analyze();
        log::info!("{} weapon: {}", player, weapon);
        self.weapons[player.index()] = Some(weapon);

        match player {
            PlayerId::P1 => self.enter_weapon_input(PlayerId::P2),
            PlayerId::P2 => self.set_screen(Screen::AnalysisDisplay),
        }
        true
    }

    /// Leave the analysis screen for arena selection
    pub fn continue_to_arena_select(&mut self) -> bool {
        if self.screen != Screen::AnalysisDisplay {
            return false;
        }
        self.set_screen(Screen::ArenaSelect);
        true
    }

    /// Pick an arena and start the battle
    pub fn select_arena(&mut self, arena: ArenaKind) -> bool {
        if self.screen != Screen::ArenaSelect {
            return false;
        }
        let (Some(w1), Some(w2)) = (self.weapons[0].clone(), self.weapons[1].clone()) else {
            log::warn!("Arena selected without both weapons, returning to menu");
            self.return_to_menu();
            return false;
        };

        // A previous battle never outlives the next one starting
        self.end_battle();

        self.arena = arena;
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        self.battle = Some(BattleContext::new(
            BattleSetup {
                weapons: [w1, w2],
                arena,
                seed,
                start_timestamp_ms: platform::now_ms(),
            },
            &self.settings,
        ));
        self.set_screen(Screen::Battle);
        true
    }

    /// Step back one screen, cancelling the current phase's timer
    pub fn back(&mut self) -> bool {
        match self.screen {
            Screen::MainMenu | Screen::Result => return false,
            Screen::WeaponInput(PlayerId::P1) => {
                self.cancel_input_timer();
                self.weapons = [None, None];
                self.draft = WeaponDraft::Empty;
                self.set_screen(Screen::MainMenu);
            }
            Screen::WeaponInput(PlayerId::P2) => self.enter_weapon_input(PlayerId::P1),
            Screen::AnalysisDisplay => self.enter_weapon_input(PlayerId::P2),
            Screen::ArenaSelect => self.set_screen(Screen::AnalysisDisplay),
            Screen::Battle => {
                // Abandoned battles don't count
                if self.end_battle().is_some() {
                    log::info!("Battle abandoned");
                }
                self.set_screen(Screen::ArenaSelect);
            }
        }
        true
    }

    /// From the result screen, go straight back to weapon input
    pub fn rematch(&mut self) -> bool {
        if self.screen != Screen::Result {
            return false;
        }
        self.start_game()
    }

    /// Abort whatever is happening and show the main menu
    pub fn return_to_menu(&mut self) {
        self.cancel_input_timer();
        self.end_battle();
        self.draft = WeaponDraft::Empty;
        self.weapons = [None, None];
        self.set_screen(Screen::MainMenu);
    }

    /// Change settings between battles. Values are sanitized and saved.
    pub fn update_settings(&mut self, settings: GameSettings) -> bool {
        if !matches!(self.screen, Screen::MainMenu | Screen::Result) {
            return false;
        }
        self.settings = settings.sanitized();
        if let Err(e) = self.settings.save(self.store.as_mut()) {
            log::warn!("Failed to save settings: {e}");
        }
        true
    }

    /// Advance one tick. Returns the outcome on the tick a battle ends.
    pub fn update(&mut self, input: &TickInput) -> Option<Outcome> {
        match self.screen {
            Screen::WeaponInput(player) => {
                let expired = self.input_timer.as_mut().is_some_and(|t| t.tick());
                if expired {
                    log::info!("{} ran out of time", player);
                    self.finalize_weapon();
                }
                None
            }
            Screen::Battle => {
                let battle = self.battle.as_mut()?;
                let outcome = tick(battle, input, TICK_MS)?;
                self.finish_battle(outcome);
                Some(outcome)
            }
            _ => None,
        }
    }

    fn finish_battle(&mut self, outcome: Outcome) {
        let Some(battle) = self.end_battle() else {
            return;
        };
        let weapons = [battle.players[0].weapon.clone(), battle.players[1].weapon.clone()];

        self.records.record(BattleRecord {
            outcome,
            hits: battle.stats.hits,
            elapsed_ms: battle.stats.elapsed_ms(),
            timestamp_ms: platform::now_ms(),
            weapons: [weapons[0].archetype, weapons[1].archetype],
        });
        if let Err(e) = self.records.save(self.store.as_mut()) {
            log::warn!("Failed to save records: {e}");
        }

        self.report = Some(BattleReport {
            outcome,
            stats: battle.stats,
            weapons,
            arena: battle.arena,
        });
        self.set_screen(Screen::Result);
    }

    /// Read-only view of the battle for rendering
    pub fn snapshot(&self) -> Option<RenderSnapshot> {
        self.battle.as_ref().map(RenderSnapshot::capture)
    }
}

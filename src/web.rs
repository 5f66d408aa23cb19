//! Browser host bindings
//!
//! The page owns the canvas, the animation loop and the GPU. It forwards key
//! events and pixels here, calls `tick` at 60 Hz and uploads `frame_bytes`.

use std::collections::HashSet;

use wasm_bindgen::prelude::*;

use crate::flow::{BattleStateMachine, Drawing, Screen};
use crate::persistence;
use crate::platform::KeyBindings;
use crate::renderer::build_frame;
use crate::sim::{ArenaKind, Outcome};
use crate::weapon::Rgba;

#[wasm_bindgen]
pub struct WebDuel {
    machine: BattleStateMachine,
    bindings: KeyBindings,
    held: HashSet<String>,
}

#[wasm_bindgen]
impl WebDuel {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebDuel {
        let seed = js_sys::Date::now() as u64;
        log::info!("Starting with seed {seed}");
        WebDuel {
            machine: BattleStateMachine::new(persistence::open_default_store(), seed),
            bindings: KeyBindings::default(),
            held: HashSet::new(),
        }
    }

    /// `KeyboardEvent.code` of a pressed key
    pub fn key_down(&mut self, code: &str) {
        self.held.insert(code.to_string());
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Advance one tick. Returns the outcome text on the tick a battle ends.
    pub fn tick(&mut self) -> Option<String> {
        let input = self.bindings.intents(self.held.iter().map(String::as_str));
        self.machine.update(&input).map(|o: Outcome| o.to_string())
    }

    /// Current screen, for the page's UI layer
    pub fn screen(&self) -> String {
        match self.machine.screen() {
            Screen::MainMenu => "main_menu".into(),
            Screen::WeaponInput(p) => format!("weapon_input_p{}", p.number()),
            Screen::AnalysisDisplay => "analysis".into(),
            Screen::ArenaSelect => "arena_select".into(),
            Screen::Battle => "battle".into(),
            Screen::Result => "result".into(),
        }
    }

    pub fn seconds_remaining(&self) -> Option<u32> {
        self.machine.seconds_remaining()
    }

    pub fn start_game(&mut self) -> bool {
        self.machine.start_game()
    }

    /// Canvas pixels from `getImageData`, background white
    pub fn set_drawing(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> bool {
        self.machine
            .set_drawing(Drawing::packed(pixels, width, height, Rgba::WHITE))
    }

    pub fn set_description(&mut self, text: &str) -> bool {
        self.machine.set_description(text)
    }

    pub fn finalize_weapon(&mut self) -> bool {
        self.machine.finalize_weapon()
    }

    pub fn continue_to_arena_select(&mut self) -> bool {
        self.machine.continue_to_arena_select()
    }

    /// Unknown arena names are rejected
    pub fn select_arena(&mut self, name: &str) -> bool {
        match name.parse::<ArenaKind>() {
            Ok(arena) => self.machine.select_arena(arena),
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    pub fn back(&mut self) -> bool {
        self.machine.back()
    }

    pub fn rematch(&mut self) -> bool {
        self.machine.rematch()
    }

    pub fn return_to_menu(&mut self) {
        self.machine.return_to_menu();
    }

    /// Settings as JSON
    pub fn settings_json(&self) -> String {
        serde_json::to_string(self.machine.settings()).unwrap_or_default()
    }

    /// Replace settings from JSON. Rejected mid-match or if malformed.
    pub fn set_settings_json(&mut self, json: &str) -> bool {
        match serde_json::from_str(json) {
            Ok(settings) => self.machine.update_settings(settings),
            Err(e) => {
                log::warn!("Bad settings JSON: {e}");
                false
            }
        }
    }

    /// Records as JSON
    pub fn records_json(&self) -> String {
        serde_json::to_string(self.machine.records()).unwrap_or_default()
    }

    /// Vertex bytes (`[x, y, r, g, b, a]` f32 each) for the current battle
    pub fn frame_bytes(&self) -> Vec<u8> {
        self.machine
            .snapshot()
            .map(|snap| build_frame(&snap).as_bytes().to_vec())
            .unwrap_or_default()
    }
}

impl Default for WebDuel {
    fn default() -> Self {
        Self::new()
    }
}

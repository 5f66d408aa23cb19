//! Keyboard bindings
//!
//! Maps host key codes (DOM `KeyboardEvent.code` style) to per-player
//! intents. The host tracks which keys are held and asks for a `TickInput`
//! each tick.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sim::{PlayerId, PlayerIntent, TickInput};

/// A bindable action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
}

/// Key code -> (player, action)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    bindings: HashMap<String, (PlayerId, Action)>,
}

impl Default for KeyBindings {
    /// P1: A/D/W/Space, P2: arrows/Enter
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };
        for (code, player, action) in [
            ("KeyA", PlayerId::P1, Action::MoveLeft),
            ("KeyD", PlayerId::P1, Action::MoveRight),
            ("KeyW", PlayerId::P1, Action::Jump),
            ("Space", PlayerId::P1, Action::Attack),
            ("ArrowLeft", PlayerId::P2, Action::MoveLeft),
            ("ArrowRight", PlayerId::P2, Action::MoveRight),
            ("ArrowUp", PlayerId::P2, Action::Jump),
            ("Enter", PlayerId::P2, Action::Attack),
        ] {
            bindings.bind(code, player, action);
        }
        bindings
    }
}

impl KeyBindings {
    /// Bind a key, replacing whatever it was bound to
    pub fn bind(&mut self, code: &str, player: PlayerId, action: Action) {
        self.bindings.insert(code.to_string(), (player, action));
    }

    pub fn unbind(&mut self, code: &str) -> Option<(PlayerId, Action)> {
        self.bindings.remove(code)
    }

    pub fn lookup(&self, code: &str) -> Option<(PlayerId, Action)> {
        self.bindings.get(code).copied()
    }

    /// Build this tick's intents from the keys currently held.
    /// Unknown keys are ignored.
    pub fn intents<'a>(&self, held: impl IntoIterator<Item = &'a str>) -> TickInput {
        let mut input = TickInput::default();
        for code in held {
            let Some((player, action)) = self.lookup(code) else {
                continue;
            };
            let intent: &mut PlayerIntent = &mut input.players[player.index()];
            match action {
                Action::MoveLeft => intent.move_left = true,
                Action::MoveRight => intent.move_right = true,
                Action::Jump => intent.jump = true,
                Action::Attack => intent.attack = true,
            }
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keys = KeyBindings::default();
        let input = keys.intents(["KeyA", "Space", "ArrowUp", "KeyQ"]);
        assert_eq!(
            input.intent(PlayerId::P1),
            &PlayerIntent {
                move_left: true,
                attack: true,
                ..Default::default()
            }
        );
        assert_eq!(
            input.intent(PlayerId::P2),
            &PlayerIntent {
                jump: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_rebind() {
        let mut keys = KeyBindings::default();
        keys.bind("KeyF", PlayerId::P1, Action::Attack);
        assert_eq!(keys.unbind("Space"), Some((PlayerId::P1, Action::Attack)));
        let input = keys.intents(["KeyF", "Space"]);
        assert!(input.intent(PlayerId::P1).attack);
        assert_eq!(keys.lookup("Space"), None);
    }

    #[test]
    fn test_no_keys_is_idle() {
        assert_eq!(KeyBindings::default().intents(std::iter::empty()), TickInput::default());
    }
}

//! Weapon Duel entry point
//!
//! The browser build is driven from JavaScript through `WebDuel`. Natively
//! this runs a scripted headless match and prints the result.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Weapon Duel (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start in the library, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use weapon_duel::consts::TICK_HZ;
    use weapon_duel::persistence;
    use weapon_duel::platform::KeyBindings;
    use weapon_duel::renderer::build_frame;
    use weapon_duel::sim::{ArenaKind, PlayerId};
    use weapon_duel::weapon::Rgba;
    use weapon_duel::{BattleStateMachine, Drawing, Screen};

    /// Black rectangle on a white 400x300 canvas
    fn drawn_rectangle(x0: u32, y0: u32, w: u32, h: u32) -> Drawing {
        let (width, height) = (400u32, 300u32);
        let mut pixels = vec![255u8; (width * height * 4) as usize];
        for y in y0..(y0 + h).min(height) {
            for x in x0..(x0 + w).min(width) {
                let i = ((y * width + x) * 4) as usize;
                pixels[i..i + 3].copy_from_slice(&[0, 0, 0]);
            }
        }
        Drawing::packed(pixels, width, height, Rgba::WHITE)
    }

    pub fn run(seed: u64) {
        let mut machine = BattleStateMachine::new(persistence::open_default_store(), seed);
        let keys = KeyBindings::default();

        machine.start_game();
        machine.set_description("a steel spear crackling with lightning");
        machine.finalize_weapon();
        machine.set_drawing(drawn_rectangle(150, 40, 40, 220));
        machine.finalize_weapon();

        for player in PlayerId::BOTH {
            if let Some(weapon) = machine.weapon(player) {
                println!("{player}: {weapon}");
            }
        }

        machine.continue_to_arena_select();
        machine.select_arena(ArenaKind::Classic);

        // Both players close in and swing whenever they can
        let held = ["KeyD", "Space", "ArrowLeft", "Enter"];
        let mut vertices = 0;
        let limit = machine.settings().battle_time_sec * TICK_HZ + 1;
        for _ in 0..limit {
            if let Some(snapshot) = machine.snapshot() {
                vertices = build_frame(&snapshot).len();
            }
            if let Some(outcome) = machine.update(&keys.intents(held)) {
                println!("Result: {outcome}");
                break;
            }
        }

        if machine.screen() != Screen::Result {
            log::warn!("Battle did not finish");
            return;
        }
        if let Some(report) = machine.report() {
            println!(
                "Hits: P1 {} / P2 {} in {:.1}s ({} vertices in the last frame)",
                report.stats.hits[0],
                report.stats.hits[1],
                report.stats.elapsed_ms() / 1000.0,
                vertices,
            );
        }
        let records = machine.records();
        println!(
            "Record: {} games, P1 {} wins, P2 {} wins, {} draws",
            records.total_games, records.p1_wins, records.p2_wins, records.draws
        );
    }
}

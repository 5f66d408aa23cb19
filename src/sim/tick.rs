//! Fixed timestep battle tick
//!
//! Order within a tick: intents (move, jump, attack) for both players, then
//! the physics step, hazard contacts, bookkeeping and finally the win check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::combat::attempt_attack;
use super::physics::BodyKind;
use super::state::{BattleContext, BattleEvent, Outcome, PlayerId};
use crate::consts::*;

/// One player's intents for a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntent {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub attack: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Indexed by `PlayerId::index`
    pub players: [PlayerIntent; 2],
}

impl TickInput {
    pub fn new(p1: PlayerIntent, p2: PlayerIntent) -> Self {
        Self { players: [p1, p2] }
    }

    pub fn intent(&self, id: PlayerId) -> &PlayerIntent {
        &self.players[id.index()]
    }
}

/// Decide the outcome from the current state, if the battle is over.
///
/// Health is checked before the timer: a knockout on the last tick is still
/// a win.
pub fn evaluate_outcome(ctx: &BattleContext, timer_expired: bool) -> Option<Outcome> {
    let p1_down = !ctx.player(PlayerId::P1).is_alive();
    let p2_down = !ctx.player(PlayerId::P2).is_alive();

    match (p1_down, p2_down) {
        (true, true) => Some(Outcome::Draw),
        (true, false) => Some(Outcome::Winner(PlayerId::P2)),
        (false, true) => Some(Outcome::Winner(PlayerId::P1)),
        (false, false) if timer_expired => Some(Outcome::Draw),
        _ => None,
    }
}

fn apply_intent(ctx: &mut BattleContext, id: PlayerId, intent: &PlayerIntent) {
    let body = ctx.player(id).body;

    let direction = match (intent.move_left, intent.move_right) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    };
    if direction != 0.0 {
        ctx.world.apply_force(body, Vec2::new(direction * MOVE_FORCE, 0.0));
        ctx.player_mut(id).facing = direction;
    }

    if intent.jump {
        let player = ctx.player(id);
        if player.on_ground && player.stamina > JUMP_STAMINA_COST {
            let vx = player.velocity.x;
            let p = ctx.player_mut(id);
            p.spend_stamina(JUMP_STAMINA_COST);
            p.on_ground = false;
            ctx.world.set_velocity(body, Vec2::new(vx, JUMP_VELOCITY));
            ctx.events.push(BattleEvent::Jumped { player: id });
        }
    }

    if intent.attack {
        // Rejections are silent
        attempt_attack(ctx, id);
    }
}

/// Apply ground contacts and hazard hits from the latest step
fn resolve_contacts(ctx: &mut BattleContext) {
    let report = ctx.world.collision_events().clone();

    for id in PlayerId::BOTH {
        let body = ctx.player(id).body;
        let grounded = report.contacts.iter().any(|c| c.supports(body));
        ctx.player_mut(id).on_ground = grounded;
    }

    for event in &report.started {
        for id in PlayerId::BOTH {
            let body = ctx.player(id).body;
            if let Some((_, BodyKind::Hazard)) = event.other(body) {
                let position = ctx.player(id).position;
                let dealt = ctx.player_mut(id).apply_damage(HAZARD_DAMAGE);
                ctx.add_hit_effect(position);
                ctx.events.push(BattleEvent::HazardHit {
                    player: id,
                    damage: dealt,
                    position,
                });
                log::debug!("{} touched a hazard ({} hp left)", id, ctx.player(id).health);
            }
        }
    }
}

/// Advance the battle by one fixed timestep. Returns the outcome on the tick
/// the battle ends; a finished battle no longer advances.
pub fn tick(ctx: &mut BattleContext, input: &TickInput, dt_ms: f32) -> Option<Outcome> {
    if ctx.is_over() {
        return None;
    }

    ctx.events.clear();
    ctx.time_ticks += 1;

    for player in &mut ctx.players {
        player.tick_timers();
    }

    for id in PlayerId::BOTH {
        apply_intent(ctx, id, input.intent(id));
    }

    // Grounded state only survives if this step re-detects the contact
    for player in &mut ctx.players {
        player.on_ground = false;
    }
    ctx.world.step(dt_ms);
    ctx.sync_from_world();
    resolve_contacts(ctx);

    for player in &mut ctx.players {
        player.regenerate_stamina();
    }

    for effect in &mut ctx.hit_effects {
        effect.ttl_ticks = effect.ttl_ticks.saturating_sub(1);
    }
    ctx.hit_effects.retain(|e| e.ttl_ticks > 0);

    let timer_expired = ctx.timer.tick();
    ctx.stats.elapsed_ticks = ctx.time_ticks;

    let outcome = evaluate_outcome(ctx, timer_expired)?;
    ctx.outcome = Some(outcome);
    ctx.events.push(BattleEvent::Ended(outcome));
    ctx.timer.cancel();
    log::info!(
        "Battle over after {:.1}s: {} (hits {} / {})",
        ctx.stats.elapsed_ms() / 1000.0,
        outcome,
        ctx.stats.hits_by(PlayerId::P1),
        ctx.stats.hits_by(PlayerId::P2)
    );
    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameSettings;
    use crate::sim::arena::ArenaKind;
    use crate::sim::state::BattleSetup;
    use crate::weapon::Weapon;
    use proptest::prelude::*;

    fn context_with(arena: ArenaKind, settings: &GameSettings, seed: u64) -> BattleContext {
        BattleContext::new(
            BattleSetup {
                weapons: [Weapon::fallback(), Weapon::fallback()],
                arena,
                seed,
                start_timestamp_ms: 0.0,
            },
            settings,
        )
    }

    fn context() -> BattleContext {
        context_with(ArenaKind::Classic, &GameSettings::default(), 1)
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn run_idle(ctx: &mut BattleContext, ticks: u32) {
        for _ in 0..ticks {
            tick(ctx, &idle(), TICK_MS);
        }
    }

    #[test]
    fn test_players_settle_on_ground() {
        let mut ctx = context();
        run_idle(&mut ctx, 10);
        for id in PlayerId::BOTH {
            let p = ctx.player(id);
            assert!(p.on_ground, "{id} should be grounded");
            assert!((p.position.y + PLAYER_HEIGHT / 2.0 - GROUND_TOP).abs() < 1.0);
        }
    }

    #[test]
    fn test_jump_costs_stamina_and_leaves_ground() {
        let mut ctx = context();
        run_idle(&mut ctx, 5);
        let jump = TickInput::new(
            PlayerIntent {
                jump: true,
                ..Default::default()
            },
            PlayerIntent::default(),
        );
        tick(&mut ctx, &jump, TICK_MS);
        let p1 = ctx.player(PlayerId::P1);
        // 100 - 20 + 0.8 regen
        assert!((p1.stamina - 80.8).abs() < 1e-4);
        assert!(!p1.on_ground);
        assert!(p1.velocity.y < 0.0);
        assert!(ctx.events.contains(&BattleEvent::Jumped { player: PlayerId::P1 }));
    }

    #[test]
    fn test_no_jump_when_tired() {
        let mut ctx = context();
        run_idle(&mut ctx, 5);
        ctx.player_mut(PlayerId::P1).stamina = 20.0;
        let jump = TickInput::new(
            PlayerIntent {
                jump: true,
                ..Default::default()
            },
            PlayerIntent::default(),
        );
        tick(&mut ctx, &jump, TICK_MS);
        assert!(ctx.player(PlayerId::P1).on_ground);
        assert!((ctx.player(PlayerId::P1).stamina - 20.8).abs() < 1e-4);
    }

    #[test]
    fn test_on_ground_cleared_in_air() {
        let mut ctx = context();
        run_idle(&mut ctx, 5);
        // Lift P1 well above everything
        let body = ctx.player(PlayerId::P1).body;
        ctx.world.body_mut(body).unwrap().shape.center.y = 100.0;
        tick(&mut ctx, &idle(), TICK_MS);
        assert!(!ctx.player(PlayerId::P1).on_ground);
    }

    fn place(ctx: &mut BattleContext, id: PlayerId, center: Vec2, velocity: Vec2) {
        let body = ctx.player(id).body;
        let b = ctx.world.body_mut(body).unwrap();
        b.shape.center = center;
        b.velocity = velocity;
    }

    fn jump_p1() -> TickInput {
        TickInput::new(
            PlayerIntent {
                jump: true,
                ..Default::default()
            },
            PlayerIntent::default(),
        )
    }

    #[test]
    fn test_jump_from_spawn_on_every_arena() {
        for arena in ArenaKind::ALL {
            let mut ctx = context_with(arena, &GameSettings::default(), 1);
            run_idle(&mut ctx, 5);
            let start_y = ctx.player(PlayerId::P1).position.y;

            let mut jumps = 0;
            let mut highest = start_y;
            // Shorter than one full jump, so only one takeoff fits
            for _ in 0..50 {
                tick(&mut ctx, &jump_p1(), TICK_MS);
                jumps += ctx
                    .events
                    .iter()
                    .filter(|e| **e == BattleEvent::Jumped { player: PlayerId::P1 })
                    .count();
                highest = highest.min(ctx.player(PlayerId::P1).position.y);
            }
            assert_eq!(jumps, 1, "{arena:?}");
            assert!(start_y - highest > 100.0, "{arena:?} rose {}", start_y - highest);
        }
    }

    #[test]
    fn test_ceiling_bump_does_not_ground() {
        let mut ctx = context_with(ArenaKind::Skyward, &GameSettings::default(), 1);
        run_idle(&mut ctx, 5);
        // Head just under the platform spanning 245..355, underside at 266, still rising
        place(&mut ctx, PlayerId::P1, Vec2::new(300.0, 306.0), Vec2::new(0.0, -5.0));
        tick(&mut ctx, &idle(), TICK_MS);

        let body = ctx.player(PlayerId::P1).body;
        let touched = ctx
            .world
            .collision_events()
            .contacts
            .iter()
            .any(|c| c.other(body).is_some_and(|(_, kind)| kind == BodyKind::Platform));
        assert!(touched);
        assert!(!ctx.player(PlayerId::P1).on_ground);

        // No mid-air jump off the underside
        tick(&mut ctx, &jump_p1(), TICK_MS);
        assert!(!ctx.events.contains(&BattleEvent::Jumped { player: PlayerId::P1 }));
    }

    #[test]
    fn test_side_contact_does_not_ground() {
        let mut ctx = context();
        run_idle(&mut ctx, 5);
        // Right edge 2 units into the left side of the platform spanning 260..380
        place(&mut ctx, PlayerId::P1, Vec2::new(242.0, 328.0), Vec2::ZERO);
        tick(&mut ctx, &idle(), TICK_MS);

        let body = ctx.player(PlayerId::P1).body;
        let touched = ctx
            .world
            .collision_events()
            .contacts
            .iter()
            .any(|c| c.other(body).is_some_and(|(_, kind)| kind == BodyKind::Platform));
        assert!(touched);
        assert!(!ctx.player(PlayerId::P1).on_ground);
        assert!(ctx.player(PlayerId::P1).position.x < 240.0 + 1e-3);
    }

    #[test]
    fn test_landing_on_platform_grounds() {
        let mut ctx = context();
        run_idle(&mut ctx, 5);
        // Just above the platform top at 320
        place(&mut ctx, PlayerId::P1, Vec2::new(320.0, 279.0), Vec2::ZERO);
        run_idle(&mut ctx, 10);
        let p1 = ctx.player(PlayerId::P1);
        assert!(p1.on_ground);
        assert!((p1.position.y + PLAYER_HEIGHT / 2.0 - 320.0).abs() < 1.0);
    }

    #[test]
    fn test_move_sets_facing() {
        let mut ctx = context();
        let left = TickInput::new(
            PlayerIntent {
                move_left: true,
                ..Default::default()
            },
            PlayerIntent::default(),
        );
        let start_x = ctx.player(PlayerId::P1).position.x;
        for _ in 0..30 {
            tick(&mut ctx, &left, TICK_MS);
            assert!(ctx.player(PlayerId::P1).velocity.x.abs() <= MAX_HORIZONTAL_SPEED);
        }
        let p1 = ctx.player(PlayerId::P1);
        assert_eq!(p1.facing, -1.0);
        assert!(p1.position.x < start_x);
    }

    #[test]
    fn test_knockout_wins() {
        let mut ctx = context();
        ctx.player_mut(PlayerId::P2).health = 0;
        assert_eq!(tick(&mut ctx, &idle(), TICK_MS), Some(Outcome::Winner(PlayerId::P1)));
        assert!(ctx.is_over());
        // Finished battles don't advance
        let ticks = ctx.time_ticks;
        assert_eq!(tick(&mut ctx, &idle(), TICK_MS), None);
        assert_eq!(ctx.time_ticks, ticks);
    }

    #[test]
    fn test_double_knockout_is_draw() {
        let mut ctx = context();
        ctx.player_mut(PlayerId::P1).health = 0;
        ctx.player_mut(PlayerId::P2).health = 0;
        assert_eq!(tick(&mut ctx, &idle(), TICK_MS), Some(Outcome::Draw));
    }

    #[test]
    fn test_timer_expiry_is_draw() {
        let settings = GameSettings {
            battle_time_sec: 10,
            ..Default::default()
        };
        let mut ctx = context_with(ArenaKind::Classic, &settings, 1);
        let mut result = None;
        for _ in 0..10 * TICK_HZ {
            result = tick(&mut ctx, &idle(), TICK_MS);
        }
        assert_eq!(result, Some(Outcome::Draw));
        assert!(ctx.events.contains(&BattleEvent::Ended(Outcome::Draw)));
    }

    #[test]
    fn test_knockout_on_last_tick_beats_timer() {
        let settings = GameSettings {
            battle_time_sec: 10,
            ..Default::default()
        };
        let mut ctx = context_with(ArenaKind::Classic, &settings, 1);
        for _ in 0..10 * TICK_HZ - 1 {
            assert_eq!(tick(&mut ctx, &idle(), TICK_MS), None);
        }
        ctx.player_mut(PlayerId::P1).health = 40;
        ctx.player_mut(PlayerId::P2).health = 0;
        assert_eq!(tick(&mut ctx, &idle(), TICK_MS), Some(Outcome::Winner(PlayerId::P1)));
    }

    #[test]
    fn test_simultaneous_hits_can_draw() {
        let mut ctx = context();
        run_idle(&mut ctx, 5);
        ctx.player_mut(PlayerId::P1).position.x = 380.0;
        ctx.player_mut(PlayerId::P2).position.x = 420.0;
        ctx.player_mut(PlayerId::P1).health = 1;
        ctx.player_mut(PlayerId::P2).health = 1;
        let attack = PlayerIntent {
            attack: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut ctx, &TickInput::new(attack, attack), TICK_MS), Some(Outcome::Draw));
    }

    #[test]
    fn test_hazard_hits_once_per_contact() {
        let mut ctx = context_with(ArenaKind::Volcano, &GameSettings::default(), 3);
        run_idle(&mut ctx, 5);
        // Drop P1 onto the lava pool
        let body = ctx.player(PlayerId::P1).body;
        ctx.world.body_mut(body).unwrap().shape.center.x = 400.0;
        run_idle(&mut ctx, 30);

        assert_eq!(ctx.player(PlayerId::P1).health, 80);
        assert_eq!(ctx.player(PlayerId::P2).health, 100);
        // Hazard hits aren't weapon hits
        assert_eq!(ctx.stats.hits_by(PlayerId::P2), 0);
    }

    #[test]
    fn test_hit_effects_expire() {
        let mut ctx = context();
        ctx.add_hit_effect(Vec2::new(10.0, 10.0));
        run_idle(&mut ctx, HIT_EFFECT_TICKS - 1);
        assert_eq!(ctx.hit_effects.len(), 1);
        run_idle(&mut ctx, 1);
        assert!(ctx.hit_effects.is_empty());
    }

    #[test]
    fn test_determinism() {
        // Same seed and inputs produce identical battles
        let mut a = context_with(ArenaKind::Gauntlet, &GameSettings::default(), 99);
        let mut b = context_with(ArenaKind::Gauntlet, &GameSettings::default(), 99);

        let chase = TickInput::new(
            PlayerIntent {
                move_right: true,
                attack: true,
                ..Default::default()
            },
            PlayerIntent {
                move_left: true,
                attack: true,
                jump: true,
                ..Default::default()
            },
        );
        for _ in 0..600 {
            let ra = tick(&mut a, &chase, TICK_MS);
            let rb = tick(&mut b, &chase, TICK_MS);
            assert_eq!(ra, rb);
        }
        for id in PlayerId::BOTH {
            assert_eq!(a.player(id).health, b.player(id).health);
            assert_eq!(a.player(id).position, b.player(id).position);
        }
        assert_eq!(a.stats, b.stats);
    }

    fn intent_strategy() -> impl Strategy<Value = PlayerIntent> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(move_left, move_right, jump, attack)| PlayerIntent {
                move_left,
                move_right,
                jump,
                attack,
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_health_and_stamina_bounded(
            seed in any::<u64>(),
            inputs in prop::collection::vec((intent_strategy(), intent_strategy()), 1..300),
        ) {
            let mut ctx = context_with(ArenaKind::Gauntlet, &GameSettings::default(), seed);
            let mut outcomes = 0;
            for (p1, p2) in inputs {
                if tick(&mut ctx, &TickInput::new(p1, p2), TICK_MS).is_some() {
                    outcomes += 1;
                }
                for id in PlayerId::BOTH {
                    let p = ctx.player(id);
                    prop_assert!(p.health >= 0 && p.health <= p.health_max);
                    prop_assert!(p.stamina >= 0.0 && p.stamina <= STAMINA_MAX);
                }
            }
            prop_assert!(outcomes <= 1);
        }
    }
}

//! Attack resolution
//!
//! Turns an attack intent into stamina/cooldown changes and, when the target
//! is within reach, randomized damage plus knockback.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{BattleContext, BattleEvent, PlayerId};
use crate::consts::*;

/// Why an attack was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    CoolingDown,
    Exhausted,
}

/// Result of an attack attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackOutcome {
    /// Nothing changed
    Rejected(RejectReason),
    /// Swing happened, target out of reach or already down
    Missed,
    Hit { target: PlayerId, damage: i32 },
}

/// Damage for a landed hit given a roll in [0, 1).
///
/// Uniform in [0.5 * base, base] where base = weapon damage * 0.3.
pub fn roll_damage(weapon_damage: u32, roll: f32) -> i32 {
    let base = weapon_damage as f32 * 0.3;
    let roll = roll.clamp(0.0, 1.0);
    (base * 0.5 + roll * base * 0.5).round() as i32
}

/// Try to attack with the RNG owned by the battle
pub fn attempt_attack(ctx: &mut BattleContext, attacker: PlayerId) -> AttackOutcome {
    // Rejected attempts must not consume a roll
    let p = ctx.player(attacker);
    if p.stamina < ATTACK_STAMINA_COST || p.attack_cooldown > 0 {
        return attempt_attack_with_roll(ctx, attacker, 0.0);
    }
    let roll: f32 = ctx.rng.random();
    attempt_attack_with_roll(ctx, attacker, roll)
}

/// Try to attack with an explicit damage roll in [0, 1)
pub fn attempt_attack_with_roll(ctx: &mut BattleContext, attacker: PlayerId, roll: f32) -> AttackOutcome {
    let target = attacker.other();

    {
        let p = ctx.player(attacker);
        if p.attack_cooldown > 0 {
            return AttackOutcome::Rejected(RejectReason::CoolingDown);
        }
        if p.stamina < ATTACK_STAMINA_COST {
            return AttackOutcome::Rejected(RejectReason::Exhausted);
        }
    }

    let (attacker_x, reach, weapon_damage) = {
        let p = ctx.player_mut(attacker);
        p.spend_stamina(ATTACK_STAMINA_COST);
        p.attack_cooldown = p.weapon.cooldown_ticks();
        p.attack_ticks = ATTACK_FLAG_TICKS;
        (p.position.x, p.weapon.effective_range(), p.weapon.damage)
    };
    ctx.events.push(BattleEvent::AttackStarted { player: attacker });

    let (target_x, target_pos, target_alive, target_body) = {
        let t = ctx.player(target);
        (t.position.x, t.position, t.is_alive(), t.body)
    };

    let distance = (attacker_x - target_x).abs();
    if distance > reach || !target_alive {
        return AttackOutcome::Missed;
    }

    let damage = roll_damage(weapon_damage, roll);
    let dealt = ctx.player_mut(target).apply_damage(damage);
    ctx.stats.record_hit(attacker);

    // Push along attacker -> target; fall back to facing when stacked
    let dx = target_x - attacker_x;
    let dir = if dx.abs() > f32::EPSILON {
        dx.signum()
    } else {
        ctx.player(attacker).facing
    };
    let knockback = Vec2::new(dir * damage as f32 / 1000.0, -KNOCKBACK_LIFT);
    ctx.world.apply_force(target_body, knockback);

    ctx.add_hit_effect(target_pos);
    ctx.events.push(BattleEvent::Hit {
        attacker,
        target,
        damage: dealt,
        position: target_pos,
    });
    log::debug!(
        "{} hits {} for {} ({} hp left)",
        attacker,
        target,
        dealt,
        ctx.player(target).health
    );

    AttackOutcome::Hit {
        target,
        damage: dealt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameSettings;
    use crate::sim::arena::ArenaKind;
    use crate::sim::state::BattleSetup;
    use crate::weapon::Weapon;

    fn weapon(damage: u32, speed: u32, range: u32) -> Weapon {
        let mut w = Weapon::fallback();
        w.damage = damage;
        w.speed = speed;
        w.range = range;
        w
    }

    fn context(w1: Weapon, w2: Weapon) -> BattleContext {
        BattleContext::new(
            BattleSetup {
                weapons: [w1, w2],
                arena: ArenaKind::Classic,
                seed: 42,
                start_timestamp_ms: 0.0,
            },
            &GameSettings::default(),
        )
    }

    fn place(ctx: &mut BattleContext, p1_x: f32, p2_x: f32) {
        ctx.player_mut(PlayerId::P1).position.x = p1_x;
        ctx.player_mut(PlayerId::P2).position.x = p2_x;
    }

    #[test]
    fn test_cooldown_from_speed() {
        let mut ctx = context(weapon(50, 80, 50), Weapon::fallback());
        let outcome = attempt_attack(&mut ctx, PlayerId::P1);
        assert_ne!(outcome, AttackOutcome::Rejected(RejectReason::CoolingDown));
        let p = ctx.player(PlayerId::P1);
        assert_eq!(p.attack_cooldown, 20);
        assert_eq!(p.stamina, 85.0);
        assert!(p.attacking());
        assert_eq!(p.attack_ticks, ATTACK_FLAG_TICKS);
    }

    #[test]
    fn test_slow_weapon_cooldown() {
        let mut ctx = context(weapon(50, 30, 50), Weapon::fallback());
        attempt_attack(&mut ctx, PlayerId::P1);
        assert_eq!(ctx.player(PlayerId::P1).attack_cooldown, 50);
    }

    #[test]
    fn test_rejected_on_cooldown_no_change() {
        let mut ctx = context(Weapon::fallback(), Weapon::fallback());
        place(&mut ctx, 300.0, 320.0);
        ctx.player_mut(PlayerId::P1).attack_cooldown = 5;
        let before_p2 = ctx.player(PlayerId::P2).health;

        let outcome = attempt_attack(&mut ctx, PlayerId::P1);
        assert_eq!(outcome, AttackOutcome::Rejected(RejectReason::CoolingDown));
        let p1 = ctx.player(PlayerId::P1);
        assert_eq!(p1.stamina, 100.0);
        assert_eq!(p1.attack_cooldown, 5);
        assert!(!p1.attacking());
        assert_eq!(ctx.player(PlayerId::P2).health, before_p2);
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_rejected_when_exhausted() {
        let mut ctx = context(Weapon::fallback(), Weapon::fallback());
        ctx.player_mut(PlayerId::P1).stamina = 14.9;
        assert_eq!(
            attempt_attack(&mut ctx, PlayerId::P1),
            AttackOutcome::Rejected(RejectReason::Exhausted)
        );
        assert_eq!(ctx.player(PlayerId::P1).stamina, 14.9);

        // Exactly 15 is enough
        ctx.player_mut(PlayerId::P1).stamina = 15.0;
        assert!(!matches!(
            attempt_attack(&mut ctx, PlayerId::P1),
            AttackOutcome::Rejected(_)
        ));
        assert_eq!(ctx.player(PlayerId::P1).stamina, 0.0);
    }

    #[test]
    fn test_range_boundary_inclusive() {
        // range 60 -> effective 50 + 90 = 140
        let mut ctx = context(weapon(50, 50, 60), Weapon::fallback());
        place(&mut ctx, 200.0, 340.0);
        let outcome = attempt_attack_with_roll(&mut ctx, PlayerId::P1, 0.0);
        assert!(matches!(outcome, AttackOutcome::Hit { target: PlayerId::P2, .. }));
        assert_eq!(ctx.stats.hits_by(PlayerId::P1), 1);
        assert_eq!(ctx.hit_effects.len(), 1);
    }

    #[test]
    fn test_out_of_range_misses() {
        let mut ctx = context(weapon(50, 50, 60), Weapon::fallback());
        place(&mut ctx, 200.0, 340.5);
        let outcome = attempt_attack_with_roll(&mut ctx, PlayerId::P1, 0.0);
        assert_eq!(outcome, AttackOutcome::Missed);
        // Swing still costs stamina and starts cooldown
        assert_eq!(ctx.player(PlayerId::P1).stamina, 85.0);
        assert_eq!(ctx.player(PlayerId::P1).attack_cooldown, 30);
        assert_eq!(ctx.stats.hits_by(PlayerId::P1), 0);
    }

    #[test]
    fn test_damage_roll_bounds() {
        // damage 100 -> base 30 -> [15, 30]
        assert_eq!(roll_damage(100, 0.0), 15);
        assert_eq!(roll_damage(100, 0.999_999), 30);
        assert_eq!(roll_damage(100, 0.5), 23); // 15 + 7.5 = 22.5 -> 23
    }

    #[test]
    fn test_dead_target_not_hit() {
        let mut ctx = context(Weapon::fallback(), Weapon::fallback());
        place(&mut ctx, 300.0, 320.0);
        ctx.player_mut(PlayerId::P2).health = 0;
        assert_eq!(attempt_attack(&mut ctx, PlayerId::P1), AttackOutcome::Missed);
        assert_eq!(ctx.stats.hits_by(PlayerId::P1), 0);
    }

    #[test]
    fn test_knockback_pushes_away() {
        let mut ctx = context(Weapon::fallback(), Weapon::fallback());
        place(&mut ctx, 300.0, 360.0);
        attempt_attack_with_roll(&mut ctx, PlayerId::P1, 0.5);
        let body = ctx.world.body(ctx.player(PlayerId::P2).body).unwrap();
        assert!(body.force.x > 0.0);
        assert!(body.force.y < 0.0);
    }

    #[test]
    fn test_health_never_negative() {
        let mut ctx = context(weapon(100, 100, 100), Weapon::fallback());
        place(&mut ctx, 300.0, 320.0);
        ctx.player_mut(PlayerId::P2).health = 3;
        attempt_attack_with_roll(&mut ctx, PlayerId::P1, 0.9);
        assert_eq!(ctx.player(PlayerId::P2).health, 0);
    }
}

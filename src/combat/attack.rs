//! Attack resolution
//!
//! One d20 plus the attacker's bonus against the defender's AC:
//! - a natural 20 is a critical hit and always lands, rolling twice the damage dice
//! - a natural 1 is a fumble and always misses without a damage roll
//! - otherwise the attack hits when the total meets or beats the AC
//!
//! Armor only affects whether an attack connects; a landed hit is never reduced.

use serde::Serialize;

use crate::dice::{is_critical, is_fumble, DiceRoll, Roller};

/// Outcome of one swing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttackResult {
    /// Natural d20
    pub roll: u32,
    pub attack_bonus: i32,
    pub attack_total: i32,
    pub target_ac: i32,
    pub hit: bool,
    pub critical: bool,
    pub fumble: bool,
    /// Damage rolled on a hit, before the target's HP floor
    pub damage: Option<i32>,
}

impl AttackResult {
    /// Classify a d20 roll against a target
    pub fn new(roll: u32, attack_bonus: i32, target_ac: i32) -> Self {
        let critical = is_critical(roll);
        let fumble = is_fumble(roll);
        let attack_total = roll as i32 + attack_bonus;

        let hit = critical || (!fumble && attack_total >= target_ac);

        Self {
            roll,
            attack_bonus,
            attack_total,
            target_ac,
            hit,
            critical,
            fumble,
            damage: None,
        }
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = Some(damage);
        self
    }
}

/// Roll to hit and, on a hit, roll damage.
///
/// Critical hits roll twice the dice; the modifier and flat bonus are added once.
pub fn resolve_attack(
    attack_bonus: i32,
    target_ac: i32,
    damage: DiceRoll,
    damage_bonus: i32,
    roller: &mut dyn Roller,
) -> AttackResult {
    let result = AttackResult::new(roller.d20(), attack_bonus, target_ac);
    if !result.hit {
        return result;
    }
    let rolled = if result.critical {
        damage.roll_doubled(roller)
    } else {
        damage.roll_with(roller)
    };
    result.with_damage((rolled + damage_bonus).max(0))
}

//! Hazard and trap saves, and picking up room treasure
//!
//! A save is a d20 at or under the relevant attribute. Failing one deals
//! the listed damage, if any.

use serde::Serialize;
use tracing::info;

use super::DungeonRoom;
use crate::dice::Roller;
use crate::player::{Attribute, Player};

/// Save attribute, d6 damage on failure, and what the save is for
struct SaveRule {
    attribute: Attribute,
    damages: bool,
    description: &'static str,
}

const fn rule(attribute: Attribute, damages: bool, description: &'static str) -> SaveRule {
    SaveRule {
        attribute,
        damages,
        description,
    }
}

fn hazard_rule(name: &str) -> SaveRule {
    use Attribute::*;
    match name {
        "Bog" => rule(Strength, false, "escape the bog"),
        "Landslide" => rule(Dexterity, true, "avoid falling rocks"),
        "Sinkhole" => rule(Dexterity, true, "dodge the collapsing ground"),
        "Poison" => rule(Toughness, true, "resist the poison"),
        "Weather" => rule(Toughness, false, "endure harsh weather"),
        "Debris" => rule(Strength, false, "clear the debris"),
        "Collapse" => rule(Toughness, true, "survive the collapse"),
        "Vapor" => rule(Toughness, true, "resist toxic vapors"),
        "Toxin" => rule(Toughness, true, "resist the toxin"),
        "Ruin" => rule(Dexterity, true, "avoid crumbling ruins"),
        _ => rule(Toughness, true, "survive"),
    }
}

fn trap_rule(name: &str) -> SaveRule {
    use Attribute::*;
    match name {
        "Pit" => rule(Dexterity, true, "dodge the pit trap"),
        "Dart" => rule(Dexterity, true, "dodge the poison dart"),
        "Spike" => rule(Dexterity, true, "avoid the spike trap"),
        "Pendulum" => rule(Dexterity, true, "duck under the swinging blade"),
        "Boulder" => rule(Toughness, true, "withstand the rolling boulder"),
        "Acid" => rule(Toughness, true, "resist the acid spray"),
        _ => rule(Dexterity, true, "avoid the trap"),
    }
}

/// Outcome of a hazard or trap save
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    /// Hazard or trap name
    pub name: String,
    /// "STR", "DEX", "WIL" or "TOU"
    pub attribute: &'static str,
    pub roll: u32,
    pub target: i32,
    pub success: bool,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    pub consequence: String,
}

fn resolve(name: &str, rule: SaveRule, player: &mut Player, roller: &mut dyn Roller) -> SaveOutcome {
    let save = player.saving_throw(rule.attribute, roller);

    let (damage, consequence) = if save.success {
        (None, format!("Successfully {}!", rule.description))
    } else if rule.damages {
        let rolled = roller.d6() as i32;
        let (taken, _) = player.take_damage(rolled);
        (
            Some(taken),
            format!("Failed to {}! Took {} damage.", rule.description, taken),
        )
    } else {
        (
            None,
            format!("Failed to {}, but no damage taken.", rule.description),
        )
    };

    info!(
        player = %player.name,
        name,
        roll = save.roll,
        target = save.target,
        success = save.success,
        "save"
    );

    SaveOutcome {
        name: name.to_string(),
        attribute: rule.attribute.abbrev(),
        roll: save.roll,
        target: save.target,
        success: save.success,
        description: rule.description,
        damage,
        consequence,
    }
}

pub fn hazard_save(name: &str, player: &mut Player, roller: &mut dyn Roller) -> SaveOutcome {
    resolve(name, hazard_rule(name), player, roller)
}

pub fn trap_save(name: &str, player: &mut Player, roller: &mut dyn Roller) -> SaveOutcome {
    resolve(name, trap_rule(name), player, roller)
}

/// Treasure picked up from a room
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreasureHaul {
    pub collected: Vec<String>,
    /// Items that did not fit and stay in the room
    pub left_behind: usize,
}

/// Move room treasure into the pack while it fits
pub fn collect_treasure(room: &mut DungeonRoom, player: &mut Player) -> TreasureHaul {
    let mut haul = TreasureHaul::default();
    let mut remaining = Vec::new();

    for item in room.treasure.drain(..) {
        let name = item.name.clone();
        match player.add_item(item) {
            Ok(()) => haul.collected.push(name),
            Err(item) => remaining.push(item),
        }
    }

    haul.left_behind = remaining.len();
    room.treasure = remaining;
    if !haul.collected.is_empty() {
        info!(
            player = %player.name,
            collected = haul.collected.len(),
            left = haul.left_behind,
            "collected treasure"
        );
    }
    haul
}

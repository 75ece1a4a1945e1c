//! Treasure notation
//!
//! Converts treasure table text into concrete items. Literal kinds
//! (Weapon, Artifact, Ring, Potion, Scroll) call the item generator at an
//! escalated rarity; dice kinds ("3d6 Gold", "d100 Silver", "3d6x100 Gold",
//! "d20 Gems") roll a quantity first.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use super::{Item, ItemGenerator, ItemSlot, ItemType, Rarity};
use crate::dice::Roller;

/// `[count]d<sides>[x<multiplier>] <kind>`
static TREASURE_DICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d*)d(\d+)(?:x(\d+))?\s*(\w+)").unwrap());

const GEM_NAMES: [&str; 6] = ["Ruby", "Sapphire", "Emerald", "Diamond", "Amethyst", "Topaz"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreasureError {
    #[error("treasure dice out of range: {0}")]
    BadDice(String),
}

/// Parse a treasure table entry into an item for the given tier
pub fn parse_treasure(text: &str, tier: u8, roller: &mut dyn Roller) -> Result<Item, TreasureError> {
    let trimmed = text.trim();

    match trimmed.to_lowercase().as_str() {
        "weapon" => {
            let rarity = if roller.chance(60) {
                Rarity::Uncommon
            } else {
                Rarity::Rare
            };
            return Ok(ItemGenerator::new(roller).weapon(tier, Some(rarity)));
        }
        "artifact" => return Ok(ItemGenerator::new(roller).random_loot(tier.max(2))),
        "potion" => return Ok(ItemGenerator::new(roller).consumable(tier)),
        "scroll" => return Ok(ItemGenerator::new(roller).spell_scroll(tier)),
        "ring" => {
            let rarity = if roller.chance(70) {
                Rarity::Rare
            } else {
                Rarity::Epic
            };
            let mut ring = ItemGenerator::new(roller).armor(tier, Some(rarity), ItemSlot::Shield);
            ring.name = ring.name.replace("Shield", "Ring").replace("Buckler", "Ring");
            ring.description = format!("A magical {} ring. AC +{}", rarity, ring.ac_bonus);
            ring.is_bulky = false;
            return Ok(ring);
        }
        _ => {}
    }

    let Some(caps) = TREASURE_DICE.captures(trimmed) else {
        return Ok(fallback(trimmed));
    };
    let number = |i: usize, default: u32| -> Result<u32, TreasureError> {
        match caps.get(i).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
            Some(s) => s.parse().map_err(|_| TreasureError::BadDice(trimmed.to_string())),
            None => Ok(default),
        }
    };
    let count = number(1, 1)?;
    let sides = number(2, 0)?;
    let multiplier = number(3, 1)?;
    if sides == 0 {
        return Err(TreasureError::BadDice(trimmed.to_string()));
    }
    let kind = caps[4].to_lowercase();
    let total = roller.dice(count, sides) * multiplier;

    let item = if kind.contains("silver") {
        let gold = total / 10;
        Item::new(format!("{} Silver Coins", total), ItemType::Junk, Rarity::Common, gold)
            .with_description(format!(
                "A pouch containing {} silver coins (worth {} gold)",
                total, gold
            ))
    } else if kind.contains("gold") {
        Item::new(format!("{} Gold Coins", total), ItemType::Junk, Rarity::Common, total)
            .with_description(format!("A pouch containing {} gold coins", total))
    } else if kind.contains("gem") {
        gems(total, roller)
    } else {
        fallback(trimmed)
    };
    Ok(item)
}

/// A handful of gems worth 10-50 gold apiece
fn gems(count: u32, roller: &mut dyn Roller) -> Item {
    let value = count * roller.range(10, 50);
    let name = if count == 1 {
        GEM_NAMES[roller.pick(GEM_NAMES.len())].to_string()
    } else {
        format!("{} Mixed Gems", count)
    };
    let rarity = if count > 5 {
        Rarity::Uncommon
    } else {
        Rarity::Common
    };
    Item::new(name, ItemType::Junk, rarity, value).with_description(format!(
        "{} precious gem(s) worth {} gold total",
        count, value
    ))
}

fn fallback(text: &str) -> Item {
    Item::new(format!("Treasure: {}", text), ItemType::Junk, Rarity::Common, 50)
        .with_description(text)
}

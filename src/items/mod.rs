//! Items
//!
//! Every inventory entry, equipped piece and treasure payload is an [`Item`].
//! Plain-string entries from older saves are converted with
//! [`Item::mundane`] when they are deserialized.

pub mod generator;
pub mod treasure;

use serde::{Deserialize, Serialize};

use crate::dice::DiceRoll;

pub use generator::ItemGenerator;
pub use treasure::{parse_treasure, TreasureError};

/// Item rarity, from common (tier 0) to legendary (tier 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[serde(alias = "COMMON")]
    Common,
    #[serde(alias = "UNCOMMON")]
    Uncommon,
    #[serde(alias = "RARE")]
    Rare,
    #[serde(alias = "EPIC")]
    Epic,
    #[serde(alias = "LEGENDARY")]
    Legendary,
}

impl Rarity {
    /// Numeric tier (0-4)
    pub fn tier(&self) -> u8 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }

    /// Display color used by clients
    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Common => "#FFFFFF",
            Rarity::Uncommon => "#1EFF00",
            Rarity::Rare => "#0070DD",
            Rarity::Epic => "#A335EE",
            Rarity::Legendary => "#FF8000",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        };
        f.write_str(s)
    }
}

/// Broad item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Armor,
    Helmet,
    Shield,
    Consumable,
    QuestItem,
    Junk,
}

/// Equipment slot an item occupies when worn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSlot {
    Weapon,
    Armor,
    Helmet,
    Shield,
}

/// What a consumable or scroll does when used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemEffect {
    Heal,
    CurePoison,
    BuffAttack,
    BuffDefense,
    SpellDamage,
    SpellHeal,
    SpellBuff,
    SpellDebuff,
}

impl ItemEffect {
    pub fn label(&self) -> &'static str {
        match self {
            ItemEffect::Heal => "Heal",
            ItemEffect::CurePoison => "Cure Poison",
            ItemEffect::BuffAttack => "Buff Attack",
            ItemEffect::BuffDefense => "Buff Defense",
            ItemEffect::SpellDamage => "Spell Damage",
            ItemEffect::SpellHeal => "Spell Heal",
            ItemEffect::SpellBuff => "Spell Buff",
            ItemEffect::SpellDebuff => "Spell Debuff",
        }
    }
}

/// Name fragments that make a plain-string item bulky
const BULKY_KEYWORDS: [&str; 6] = [
    "plate",
    "chain",
    "great sword",
    "warhammer",
    "battle axe",
    "crossbow",
];

/// An item with stats, rarity and modifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub item_type: ItemType,
    /// Equipment slot, `None` for consumables and loose goods
    #[serde(default)]
    pub slot: Option<ItemSlot>,
    pub rarity: Rarity,
    /// Value in gold
    pub value: u32,
    #[serde(default)]
    pub damage_die: Option<DiceRoll>,
    #[serde(default)]
    pub attack_bonus: i32,
    #[serde(default)]
    pub ac_bonus: i32,
    /// Carried for completeness; hits are never reduced
    #[serde(default)]
    pub damage_reduction: i32,
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Bulky items take two inventory slots
    #[serde(default)]
    pub is_bulky: bool,
    #[serde(default)]
    pub healing_amount: i32,
    #[serde(default)]
    pub effect_duration: i32,
    #[serde(default)]
    pub effect_type: Option<ItemEffect>,
    #[serde(default)]
    pub description: String,
}

impl Item {
    /// Create a bare item
    pub fn new(name: impl Into<String>, item_type: ItemType, rarity: Rarity, value: u32) -> Self {
        Self {
            name: name.into(),
            item_type,
            slot: None,
            rarity,
            value,
            damage_die: None,
            attack_bonus: 0,
            ac_bonus: 0,
            damage_reduction: 0,
            modifiers: Vec::new(),
            is_bulky: false,
            healing_amount: 0,
            effect_duration: 0,
            effect_type: None,
            description: String::new(),
        }
    }

    /// A plain named possession (rations, torches, loose junk)
    pub fn mundane(name: impl Into<String>) -> Self {
        let name = name.into();
        let lower = name.to_lowercase();
        let mut item = Self::new(name, ItemType::Junk, Rarity::Common, 0);
        item.is_bulky = BULKY_KEYWORDS.iter().any(|k| lower.contains(k));
        item
    }

    /// Set the equipment slot
    pub fn with_slot(mut self, slot: ItemSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Inventory slots this item occupies
    pub fn slot_size(&self) -> u32 {
        if self.is_bulky {
            2
        } else {
            1
        }
    }

    /// Whether attacks with this weapon use dexterity
    pub fn uses_dexterity(&self) -> bool {
        self.modifiers
            .iter()
            .any(|m| m == "ranged" || m == "finesse")
    }

    /// Summed bonuses, including average weapon damage, for comparisons
    pub fn total_bonus(&self) -> i32 {
        let damage = self.damage_die.map_or(0, |d| d.average());
        self.attack_bonus + self.ac_bonus + self.damage_reduction + damage
    }

    /// Case-insensitive name match
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// Inventory entry as it may appear in stored data: an item or a bare name
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum StoredItem {
    Full(Box<Item>),
    Name(String),
}

impl From<StoredItem> for Item {
    fn from(stored: StoredItem) -> Self {
        match stored {
            StoredItem::Full(item) => *item,
            StoredItem::Name(name) => Item::mundane(name),
        }
    }
}

/// Deserialize a list of items, accepting bare names for older data
pub fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<Item>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let stored: Vec<StoredItem> = Deserialize::deserialize(deserializer)?;
    Ok(stored.into_iter().map(Item::from).collect())
}

/// Deserialize an optional item, accepting a bare name for older data
pub fn deserialize_optional_item<'de, D>(deserializer: D) -> Result<Option<Item>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let stored: Option<StoredItem> = Deserialize::deserialize(deserializer)?;
    Ok(stored.map(Item::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_accepts_both_cases() {
        let upper: Rarity = serde_json::from_str("\"RARE\"").unwrap();
        let lower: Rarity = serde_json::from_str("\"rare\"").unwrap();
        assert_eq!(upper, Rarity::Rare);
        assert_eq!(lower, Rarity::Rare);
        assert_eq!(serde_json::to_string(&Rarity::Epic).unwrap(), "\"epic\"");
        assert!(Rarity::Legendary > Rarity::Rare);
    }

    #[test]
    fn test_mundane_bulky_detection() {
        assert!(Item::mundane("Plate Mail").is_bulky);
        assert!(Item::mundane("Rusty Great Sword").is_bulky);
        assert!(!Item::mundane("Torch").is_bulky);
        assert_eq!(Item::mundane("Chain Shirt").slot_size(), 2);
    }

    #[test]
    fn test_item_json_shape() {
        let mut sword = Item::new("Long Sword", ItemType::Weapon, Rarity::Common, 15)
            .with_slot(ItemSlot::Weapon);
        sword.damage_die = Some(DiceRoll::new(1, 8, 0));
        let json = serde_json::to_value(&sword).unwrap();
        assert_eq!(json["item_type"], "weapon");
        assert_eq!(json["slot"], "weapon");
        assert_eq!(json["damage_die"], "1d8");
        assert_eq!(json["effect_type"], serde_json::Value::Null);

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, sword);
    }

    #[test]
    fn test_minimal_item_uses_defaults() {
        let item: Item = serde_json::from_str(
            r#"{"name": "Antidote", "item_type": "consumable", "rarity": "COMMON", "value": 15,
                "effect_type": "cure_poison"}"#,
        )
        .unwrap();
        assert_eq!(item.effect_type, Some(ItemEffect::CurePoison));
        assert_eq!(item.slot, None);
        assert_eq!(item.slot_size(), 1);
    }

    #[test]
    fn test_legacy_string_items() {
        #[derive(Deserialize)]
        struct Bag {
            #[serde(deserialize_with = "deserialize_items")]
            items: Vec<Item>,
        }
        let bag: Bag = serde_json::from_str(
            r#"{"items": ["Torch", {"name": "Ruby", "item_type": "junk", "rarity": "common", "value": 30}]}"#,
        )
        .unwrap();
        assert_eq!(bag.items.len(), 2);
        assert_eq!(bag.items[0].name, "Torch");
        assert_eq!(bag.items[0].item_type, ItemType::Junk);
        assert_eq!(bag.items[1].value, 30);
    }

    #[test]
    fn test_uses_dexterity() {
        let mut bow = Item::new("Bow", ItemType::Weapon, Rarity::Common, 15);
        assert!(!bow.uses_dexterity());
        bow.modifiers.push("ranged".to_string());
        assert!(bow.uses_dexterity());
    }
}

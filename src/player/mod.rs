//! Player characters
//!
//! Holds the four attributes (STR, DEX, WIL, TOU), hit points, equipment,
//! currency and progression. Combat numbers are derived on demand:
//! - armor class: 10, +1 at TOU 14+, plus armor, shield and helmet bonuses
//! - attack bonus: +1 at STR 14+ (DEX for ranged or finesse weapons) plus the weapon's bonus
//! - damage: the weapon's die, or the base die when unarmed

mod inventory;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::combat::effects::{EffectKind, StatusEffect, StatusEffects};
use crate::dice::{DiceRoll, Roller};
use crate::items::{deserialize_items, deserialize_optional_item, Item, ItemSlot};

/// Rounds a dying character has before death
pub const DEATH_TIMER_TURNS: u32 = 60;
/// XP needed per level
pub const XP_PER_LEVEL: u32 = 20;
/// Silver pieces per gold piece
pub const SILVER_PER_GOLD: u32 = 10;

const BASE_DAMAGE: DiceRoll = DiceRoll {
    count: 1,
    sides: 6,
    modifier: 0,
};

/// The four character attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Strength,
    Dexterity,
    Willpower,
    Toughness,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Willpower,
        Attribute::Toughness,
    ];

    pub fn abbrev(&self) -> &'static str {
        match self {
            Attribute::Strength => "STR",
            Attribute::Dexterity => "DEX",
            Attribute::Willpower => "WIL",
            Attribute::Toughness => "TOU",
        }
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Ok(Attribute::Strength),
            "dex" | "dexterity" => Ok(Attribute::Dexterity),
            "wil" | "willpower" => Ok(Attribute::Willpower),
            "tou" | "toughness" => Ok(Attribute::Toughness),
            other => Err(format!("unknown attribute: {}", other)),
        }
    }
}

/// Outcome of a roll-under saving throw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveRoll {
    pub attribute: Attribute,
    /// The d20 kept (lower of two when fatigued)
    pub roll: u32,
    pub target: i32,
    pub success: bool,
}

/// Worn and wielded items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default, deserialize_with = "deserialize_optional_item")]
    pub weapon: Option<Item>,
    #[serde(default, deserialize_with = "deserialize_optional_item")]
    pub armor: Option<Item>,
    #[serde(default, deserialize_with = "deserialize_optional_item")]
    pub shield: Option<Item>,
    #[serde(default, deserialize_with = "deserialize_optional_item")]
    pub helmet: Option<Item>,
}

impl Equipment {
    pub fn get(&self, slot: ItemSlot) -> Option<&Item> {
        match slot {
            ItemSlot::Weapon => self.weapon.as_ref(),
            ItemSlot::Armor => self.armor.as_ref(),
            ItemSlot::Shield => self.shield.as_ref(),
            ItemSlot::Helmet => self.helmet.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: ItemSlot) -> &mut Option<Item> {
        match slot {
            ItemSlot::Weapon => &mut self.weapon,
            ItemSlot::Armor => &mut self.armor,
            ItemSlot::Shield => &mut self.shield,
            ItemSlot::Helmet => &mut self.helmet,
        }
    }

    /// Put an item in a slot, returning what was there
    pub fn replace(&mut self, slot: ItemSlot, item: Item) -> Option<Item> {
        self.slot_mut(slot).replace(item)
    }

    /// Empty a slot
    pub fn take(&mut self, slot: ItemSlot) -> Option<Item> {
        self.slot_mut(slot).take()
    }

    /// AC from armor, shield and helmet
    pub fn ac_bonus(&self) -> i32 {
        [&self.armor, &self.shield, &self.helmet]
            .into_iter()
            .flatten()
            .map(|item| item.ac_bonus)
            .sum()
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn default_attribute() -> i32 {
    10
}

fn default_level() -> u32 {
    1
}

fn default_hp() -> i32 {
    10
}

fn default_damage_die() -> DiceRoll {
    BASE_DAMAGE
}

fn default_slots() -> u32 {
    10
}

fn default_race() -> String {
    "Human".to_string()
}

fn default_character_type() -> String {
    "Adventurer".to_string()
}

/// A player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default = "default_race")]
    pub race: String,
    #[serde(default = "default_character_type")]
    pub character_type: String,
    #[serde(default = "default_attribute")]
    pub strength: i32,
    #[serde(default = "default_attribute")]
    pub dexterity: i32,
    #[serde(default = "default_attribute")]
    pub willpower: i32,
    #[serde(default = "default_attribute")]
    pub toughness: i32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp_current: u32,
    #[serde(default = "default_hp")]
    pub hp_max: i32,
    #[serde(default = "default_hp")]
    pub hp_current: i32,
    /// Unarmed damage
    #[serde(default = "default_damage_die")]
    pub damage_die: DiceRoll,
    #[serde(default, deserialize_with = "deserialize_items")]
    pub inventory: Vec<Item>,
    #[serde(default = "default_slots")]
    pub inventory_max_slots: u32,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub status_effects: StatusEffects,
    #[serde(default)]
    pub special_skill: Option<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    /// Disadvantage on every save until an overnight rest
    #[serde(default)]
    pub is_fatigued: bool,
    #[serde(default)]
    pub is_dying: bool,
    #[serde(default)]
    pub death_timer: Option<u32>,
    #[serde(default)]
    pub silver: u32,
    #[serde(default)]
    pub gold: u32,
    #[serde(default)]
    pub encounters_defeated: u32,
    #[serde(default = "now")]
    pub created_at: String,
    #[serde(default = "now")]
    pub last_modified: String,
}

impl Player {
    /// A level 1 character with average attributes and 10 HP
    pub fn new(name: &str) -> Self {
        let now = now();
        Self {
            name: name.to_string(),
            race: default_race(),
            character_type: default_character_type(),
            strength: 10,
            dexterity: 10,
            willpower: 10,
            toughness: 10,
            level: 1,
            xp_current: 0,
            hp_max: 10,
            hp_current: 10,
            damage_die: BASE_DAMAGE,
            inventory: Vec::new(),
            inventory_max_slots: default_slots(),
            equipment: Equipment::default(),
            status_effects: StatusEffects::new(),
            special_skill: None,
            traits: Vec::new(),
            is_fatigued: false,
            is_dying: false,
            death_timer: None,
            silver: 0,
            gold: 0,
            encounters_defeated: 0,
            created_at: now.clone(),
            last_modified: now,
        }
    }

    /// Roll a fresh adventurer.
    ///
    /// Attributes are 4d6 drop lowest, HP is 1d6+1 (+1 at WIL 14+), and
    /// the purse starts with 3d6 silver. Starting kit is a cloak and three
    /// rations.
    pub fn generate(name: &str, roller: &mut dyn Roller) -> Self {
        let mut player = Self::new(name);
        for attribute in Attribute::ALL {
            let mut rolls: Vec<u32> = (0..4).map(|_| roller.d6()).collect();
            rolls.sort_unstable();
            *player.attribute_mut(attribute) = rolls[1..].iter().sum::<u32>() as i32;
        }
        let wil_bonus = i32::from(player.willpower >= 14);
        player.hp_max = roller.d6() as i32 + 1 + wil_bonus;
        player.hp_current = player.hp_max;
        player.silver = roller.dice(3, 6);
        for kit in ["Cloak", "Ration", "Ration", "Ration"] {
            player.inventory.push(Item::mundane(kit));
        }
        debug!(player = %player.name, hp = player.hp_max, "generated adventurer");
        player
    }

    /// Record a modification time
    pub fn touch(&mut self) {
        self.last_modified = now();
    }

    pub fn attribute(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Willpower => self.willpower,
            Attribute::Toughness => self.toughness,
        }
    }

    fn attribute_mut(&mut self, attribute: Attribute) -> &mut i32 {
        match attribute {
            Attribute::Strength => &mut self.strength,
            Attribute::Dexterity => &mut self.dexterity,
            Attribute::Willpower => &mut self.willpower,
            Attribute::Toughness => &mut self.toughness,
        }
    }

    pub fn armor_class(&self) -> i32 {
        10 + i32::from(self.toughness >= 14) + self.equipment.ac_bonus()
    }

    pub fn attack_bonus(&self) -> i32 {
        let weapon = self.equipment.weapon.as_ref();
        let uses_dex = weapon.is_some_and(Item::uses_dexterity);
        let ability = if uses_dex {
            self.dexterity
        } else {
            self.strength
        };
        i32::from(ability >= 14) + weapon.map_or(0, |w| w.attack_bonus)
    }

    /// Whether the wielded weapon is a ranged one
    pub fn attacks_at_range(&self) -> bool {
        self.equipment
            .weapon
            .as_ref()
            .is_some_and(|w| w.modifiers.iter().any(|m| m == "ranged"))
    }

    pub fn damage_dice(&self) -> DiceRoll {
        self.equipment
            .weapon
            .as_ref()
            .and_then(|w| w.damage_die)
            .unwrap_or(self.damage_die)
    }

    /// Attributes never add to damage
    pub fn damage_bonus(&self) -> i32 {
        0
    }

    /// Apply damage, returning (damage taken, dropped to 0)
    pub fn take_damage(&mut self, amount: i32) -> (i32, bool) {
        let amount = amount.max(0);
        self.hp_current = (self.hp_current - amount).max(0);
        self.touch();
        (amount, self.hp_current <= 0)
    }

    /// Heal up to max HP, returning the amount restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp_current;
        self.hp_current = (self.hp_current + amount.max(0)).min(self.hp_max);
        self.touch();
        self.hp_current - before
    }

    pub fn add_status_effect(&mut self, effect: StatusEffect) {
        self.status_effects.add(effect);
        self.touch();
    }

    pub fn remove_status_effect(&mut self, name: &EffectKind) -> bool {
        let removed = self.status_effects.remove(name);
        if removed {
            self.touch();
        }
        removed
    }

    pub fn has_status_effect(&self, name: &EffectKind) -> bool {
        self.status_effects.has(name)
    }

    /// Advance status effects one round, returning damage owed
    pub fn update_status_effects(&mut self) -> i32 {
        let before = self.status_effects.len();
        let damage = self.status_effects.tick();
        if self.status_effects.len() != before {
            self.touch();
        }
        damage
    }

    /// Roll d20 at or under an attribute; fatigue takes the lower of two rolls
    pub fn saving_throw(&self, attribute: Attribute, roller: &mut dyn Roller) -> SaveRoll {
        let roll = if self.is_fatigued {
            roller.d20().min(roller.d20())
        } else {
            roller.d20()
        };
        let target = self.attribute(attribute);
        SaveRoll {
            attribute,
            roll,
            target,
            success: roll as i32 <= target,
        }
    }

    /// WIL save at 0 HP: success holds at 1 HP, failure starts the dying clock
    pub fn death_save(&mut self, roller: &mut dyn Roller) -> SaveRoll {
        let save = self.saving_throw(Attribute::Willpower, roller);
        if save.success {
            self.hp_current = 1;
            self.is_dying = false;
            self.death_timer = None;
        } else {
            self.hp_current = 0;
            self.is_dying = true;
            self.death_timer = Some(DEATH_TIMER_TURNS);
        }
        info!(player = %self.name, roll = save.roll, success = save.success, "death save");
        self.touch();
        save
    }

    pub fn xp_for_next_level(&self) -> u32 {
        self.level * XP_PER_LEVEL
    }

    /// Add XP, levelling up as many times as it covers. Returns the levels reached.
    pub fn gain_xp(&mut self, amount: u32, roller: &mut dyn Roller) -> Vec<u32> {
        self.xp_current += amount;
        let mut levels = Vec::new();
        while self.xp_current >= self.xp_for_next_level() {
            self.level_up(roller);
            levels.push(self.level);
        }
        self.touch();
        levels
    }

    /// +1d6 max HP; each attribute rises by 1 when 3d6 beats it
    pub fn level_up(&mut self, roller: &mut dyn Roller) {
        self.level += 1;
        let hp = roller.d6() as i32;
        self.hp_max += hp;
        self.hp_current += hp;
        for attribute in Attribute::ALL {
            let roll = roller.dice(3, 6) as i32;
            let current = self.attribute_mut(attribute);
            if roll > *current {
                *current += 1;
            }
        }
        info!(player = %self.name, level = self.level, "level up");
        self.touch();
    }

    /// Add coins, folding every ten silver into a gold piece
    pub fn add_currency(&mut self, silver: u32, gold: u32) {
        self.silver += silver;
        self.gold += gold;
        self.convert_silver();
        self.touch();
    }

    /// Spend coins, making change from gold. Fails without enough funds.
    pub fn remove_currency(&mut self, silver: u32, gold: u32) -> bool {
        let needed = silver + gold * SILVER_PER_GOLD;
        let available = self.total_silver();
        if available < needed {
            return false;
        }
        self.silver = available - needed;
        self.gold = 0;
        self.convert_silver();
        self.touch();
        true
    }

    /// Purse value in silver
    pub fn total_silver(&self) -> u32 {
        self.silver + self.gold * SILVER_PER_GOLD
    }

    fn convert_silver(&mut self) {
        self.gold += self.silver / SILVER_PER_GOLD;
        self.silver %= SILVER_PER_GOLD;
    }

    /// Recover 1d6 HP and shake off fatigue
    pub fn rest_overnight(&mut self, roller: &mut dyn Roller) -> i32 {
        let healed = self.heal(roller.d6() as i32);
        self.is_fatigued = false;
        healed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DiceRoller, ScriptedRoller};
    use crate::items::{ItemType, Rarity};

    fn armor(name: &str, slot: ItemSlot, ac: i32) -> Item {
        let mut item = Item::new(name, ItemType::Armor, Rarity::Common, 10).with_slot(slot);
        item.ac_bonus = ac;
        item
    }

    #[test]
    fn test_defaults() {
        let player = Player::new("Ash");
        assert_eq!(player.hp_max, 10);
        assert_eq!(player.armor_class(), 10);
        assert_eq!(player.attack_bonus(), 0);
        assert_eq!(player.damage_dice(), DiceRoll::new(1, 6, 0));
        assert_eq!(player.inventory_max_slots, 10);
    }

    #[test]
    fn test_armor_class_stacks() {
        let mut player = Player::new("Ash");
        player.toughness = 14;
        player.equipment.replace(ItemSlot::Armor, armor("Chain Mail", ItemSlot::Armor, 3));
        player.equipment.replace(ItemSlot::Shield, armor("Buckler", ItemSlot::Shield, 1));
        player.equipment.replace(ItemSlot::Helmet, armor("Iron Helm", ItemSlot::Helmet, 1));
        assert_eq!(player.armor_class(), 16);
    }

    #[test]
    fn test_attack_bonus_by_weapon_kind() {
        let mut player = Player::new("Ash");
        player.strength = 15;
        player.dexterity = 9;
        let mut sword = Item::new("Sword", ItemType::Weapon, Rarity::Uncommon, 30)
            .with_slot(ItemSlot::Weapon);
        sword.attack_bonus = 2;
        sword.damage_die = Some(DiceRoll::new(1, 8, 0));
        player.equipment.replace(ItemSlot::Weapon, sword);
        assert_eq!(player.attack_bonus(), 3);
        assert_eq!(player.damage_dice(), DiceRoll::new(1, 8, 0));

        let mut bow = Item::new("Bow", ItemType::Weapon, Rarity::Common, 15).with_slot(ItemSlot::Weapon);
        bow.modifiers.push("ranged".to_string());
        player.equipment.replace(ItemSlot::Weapon, bow);
        assert_eq!(player.attack_bonus(), 0);
        assert!(player.attacks_at_range());
        // no die on the bow: base die
        assert_eq!(player.damage_dice(), DiceRoll::new(1, 6, 0));
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut player = Player::new("Ash");
        assert_eq!(player.take_damage(4), (4, false));
        assert_eq!(player.heal(10), 4);
        assert_eq!(player.take_damage(25), (25, true));
        assert_eq!(player.hp_current, 0);
    }

    #[test]
    fn test_saving_throw_with_fatigue() {
        let mut player = Player::new("Ash");
        let mut roller = ScriptedRoller::new([12, 15, 7]);
        let save = player.saving_throw(Attribute::Toughness, &mut roller);
        assert!(!save.success);
        assert_eq!(save.roll, 12);

        player.is_fatigued = true;
        let save = player.saving_throw(Attribute::Toughness, &mut roller);
        assert_eq!(save.roll, 7);
        assert!(save.success);
    }

    #[test]
    fn test_death_save_outcomes() {
        let mut player = Player::new("Ash");
        player.hp_current = 0;
        let save = player.death_save(&mut ScriptedRoller::new([10]));
        assert!(save.success);
        assert_eq!(player.hp_current, 1);
        assert!(!player.is_dying);
        assert_eq!(player.death_timer, None);

        player.hp_current = 0;
        let save = player.death_save(&mut ScriptedRoller::new([11]));
        assert!(!save.success);
        assert_eq!(player.hp_current, 0);
        assert!(player.is_dying);
        assert_eq!(player.death_timer, Some(60));
    }

    #[test]
    fn test_gain_xp_levels() {
        let mut player = Player::new("Ash");
        // not enough
        assert!(player.gain_xp(19, &mut ScriptedRoller::new([])).is_empty());
        // hp 4, then 3d6 per attribute: STR 18 (+1), DEX 3, WIL 3, TOU 18 (+1)
        let mut roller = ScriptedRoller::new([4, 6, 6, 6, 1, 1, 1, 1, 1, 1, 6, 6, 6]);
        assert_eq!(player.gain_xp(1, &mut roller), vec![2]);
        assert_eq!(player.level, 2);
        assert_eq!(player.hp_max, 14);
        assert_eq!(player.hp_current, 14);
        assert_eq!(player.strength, 11);
        assert_eq!(player.dexterity, 10);
        assert_eq!(player.toughness, 11);
        assert_eq!(player.xp_for_next_level(), 40);
    }

    #[test]
    fn test_gain_xp_multiple_levels() {
        let mut player = Player::new("Ash");
        // thresholds 20, 40 and 60 are all covered
        let levels = player.gain_xp(60, &mut DiceRoller::seeded(5));
        assert_eq!(levels, vec![2, 3, 4]);
        assert_eq!(player.xp_current, 60);
        assert_eq!(player.xp_for_next_level(), 80);
    }

    #[test]
    fn test_currency_conversion() {
        let mut player = Player::new("Ash");
        player.add_currency(25, 1);
        assert_eq!((player.gold, player.silver), (3, 5));
        assert!(player.remove_currency(7, 0));
        assert_eq!((player.gold, player.silver), (2, 8));
        assert!(!player.remove_currency(0, 3));
        assert_eq!(player.total_silver(), 28);
    }

    #[test]
    fn test_rest_overnight() {
        let mut player = Player::new("Ash");
        player.hp_current = 3;
        player.is_fatigued = true;
        assert_eq!(player.rest_overnight(&mut ScriptedRoller::new([5])), 5);
        assert_eq!(player.hp_current, 8);
        assert!(!player.is_fatigued);
    }

    #[test]
    fn test_status_effects() {
        let mut player = Player::new("Ash");
        player.add_status_effect(StatusEffect::dot(EffectKind::Poisoned, 6, 1));
        assert!(player.has_status_effect(&EffectKind::Poisoned));
        assert_eq!(player.update_status_effects(), 1);
        assert!(player.remove_status_effect(&EffectKind::Poisoned));
        assert!(!player.remove_status_effect(&EffectKind::Poisoned));
    }

    #[test]
    fn test_generate_adventurer() {
        // 4d6 drop lowest for STR, DEX, WIL, TOU; hp d6+1; 3d6 silver
        let mut roller = ScriptedRoller::new([
            6, 6, 6, 1, 3, 3, 3, 3, 2, 5, 4, 6, 1, 1, 1, 1, 4, 2, 2, 2,
        ]);
        let player = Player::generate("Wren", &mut roller);
        assert_eq!(player.strength, 18);
        assert_eq!(player.dexterity, 9);
        assert_eq!(player.willpower, 15);
        assert_eq!(player.toughness, 3);
        assert_eq!(player.hp_max, 6);
        assert_eq!(player.silver, 6);
        assert_eq!(player.inventory.len(), 4);
    }

    #[test]
    fn test_legacy_save_with_string_items() {
        let player: Player = serde_json::from_str(
            r#"{"name": "Old Timer", "inventory": ["Torch", "Plate Mail"],
                "equipment": {"weapon": "Rusty Sword", "armor": null},
                "hp_max": 12, "hp_current": 7}"#,
        )
        .unwrap();
        assert_eq!(player.inventory.len(), 2);
        assert_eq!(player.slots_used(), 3);
        assert_eq!(player.equipment.weapon.as_ref().unwrap().name, "Rusty Sword");
        assert_eq!(player.level, 1);
        assert_eq!(player.strength, 10);
    }

    #[test]
    fn test_round_trip() {
        let mut player = Player::new("Ash");
        player.add_currency(3, 2);
        player.add_status_effect(StatusEffect::permanent(EffectKind::Diseased));
        player.inventory.push(Item::mundane("Torch"));
        let json = serde_json::to_value(&player).unwrap();
        let back: Player = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, player);
        assert_eq!(serde_json::to_value(&back).unwrap(), json);
    }
}

//! Procedural item generation
//!
//! Stats scale with the dungeon tier (1-4) and the rolled rarity:
//! - weapons upgrade their damage die at tier 2 and again at tier 4
//! - armor gains +1 AC per tier above 1
//! - rare and better items carry named modifiers

use tracing::debug;

use super::{Item, ItemEffect, ItemSlot, ItemType, Rarity};
use crate::dice::{DiceRoll, Roller};

static WEAPON_PREFIXES: [&str; 8] = [
    "Rusty", "Crude", "Steel", "Sharp", "Gleaming", "Mighty", "Ancient", "Legendary",
];
static ARMOR_PREFIXES: [&str; 8] = [
    "Tattered", "Worn", "Sturdy", "Reinforced", "Gleaming", "Enchanted", "Ancient", "Legendary",
];
static SUFFIXES: [&str; 10] = [
    "of Fire",
    "of Ice",
    "of Lightning",
    "of the Bear",
    "of the Wolf",
    "of Protection",
    "of Power",
    "of Swiftness",
    "of the Titan",
    "of the Phoenix",
];
static WEAPON_MODIFIERS: [&str; 8] = [
    "fire_damage",
    "ice_damage",
    "lightning_damage",
    "lifesteal",
    "critical_hit",
    "armor_pierce",
    "durability",
    "luck",
];
static ARMOR_MODIFIERS: [&str; 3] = ["durability", "armor_pierce_resist", "luck"];

/// Fragments that mark a base name as a weapon when choosing a prefix
const WEAPON_WORDS: [&str; 6] = ["Sword", "Axe", "Mace", "Dagger", "Spear", "Bow"];

struct WeaponKind {
    name: &'static str,
    die: DiceRoll,
    bulky: bool,
    ranged: bool,
}

const fn weapon(name: &'static str, count: u32, sides: u32, bulky: bool, ranged: bool) -> WeaponKind {
    WeaponKind {
        name,
        die: DiceRoll {
            count,
            sides,
            modifier: 0,
        },
        bulky,
        ranged,
    }
}

static WEAPONS: [WeaponKind; 11] = [
    weapon("Dagger", 1, 6, false, false),
    weapon("Short Sword", 1, 6, false, false),
    weapon("Long Sword", 1, 8, false, false),
    weapon("Great Sword", 2, 6, true, false),
    weapon("Axe", 1, 6, false, false),
    weapon("Battle Axe", 2, 6, true, false),
    weapon("Mace", 1, 8, false, false),
    weapon("Warhammer", 2, 6, true, false),
    weapon("Spear", 1, 8, false, false),
    weapon("Bow", 1, 8, false, true),
    weapon("Crossbow", 2, 6, true, true),
];

static BODY_ARMOR: [&str; 5] = ["Leather Armor", "Hide Armor", "Chain Mail", "Scale Mail", "Plate Mail"];
const BULKY_ARMOR: [&str; 3] = ["Chain Mail", "Scale Mail", "Plate Mail"];
static HELMETS: [&str; 4] = ["Leather Cap", "Iron Helm", "Steel Helm", "Full Helm"];
static SHIELDS: [&str; 4] = ["Buckler", "Round Shield", "Kite Shield", "Tower Shield"];

/// (name, effect, healing, duration)
static CONSUMABLES: [(&str, ItemEffect, i32, i32); 5] = [
    ("Healing Potion", ItemEffect::Heal, 20, 0),
    ("Greater Healing Potion", ItemEffect::Heal, 40, 0),
    ("Antidote", ItemEffect::CurePoison, 0, 0),
    ("Strength Potion", ItemEffect::BuffAttack, 0, 3),
    ("Defense Potion", ItemEffect::BuffDefense, 0, 3),
];

/// (name, effect, description)
static SPELL_SCROLLS: [(&str, ItemEffect, &str); 8] = [
    ("Fireball Scroll", ItemEffect::SpellDamage, "Hurls a ball of fire dealing 2d6 damage to target"),
    ("Lightning Bolt Scroll", ItemEffect::SpellDamage, "Strikes target with lightning for 2d6 damage"),
    ("Ice Shard Scroll", ItemEffect::SpellDamage, "Launches ice shards dealing 1d8 damage"),
    ("Healing Light Scroll", ItemEffect::SpellHeal, "Restores 2d6 HP to the caster"),
    ("Shield Scroll", ItemEffect::SpellBuff, "Grants +2 AC for 3 turns"),
    ("Haste Scroll", ItemEffect::SpellBuff, "Grants advantage on next 2 attacks"),
    ("Sleep Scroll", ItemEffect::SpellDebuff, "Target must make WIL save or be paralyzed for 2 turns"),
    ("Web Scroll", ItemEffect::SpellDebuff, "Target movement reduced, disadvantage on attacks for 2 turns"),
];

/// Generates items from a roller
pub struct ItemGenerator<'r> {
    roller: &'r mut dyn Roller,
}

impl<'r> ItemGenerator<'r> {
    pub fn new(roller: &'r mut dyn Roller) -> Self {
        Self { roller }
    }

    fn choose<'a, T>(&mut self, options: &'a [T]) -> &'a T {
        &options[self.roller.pick(options.len())]
    }

    /// Generate a weapon; rarity is rolled for the tier unless given
    pub fn weapon(&mut self, tier: u8, rarity: Option<Rarity>) -> Item {
        let rarity = rarity.unwrap_or_else(|| self.rarity_for(tier));
        let kind = self.choose(&WEAPONS);

        let mut die = kind.die;
        if tier >= 2 {
            die = die.upgraded();
        }
        if tier >= 4 {
            die = die.upgraded();
        }

        let attack_bonus = self.bonus_for(rarity);
        let mut modifiers = self.modifiers_for(rarity, &WEAPON_MODIFIERS, true);
        let name = self.item_name(kind.name, rarity, attack_bonus, &modifiers);
        if kind.ranged {
            modifiers.push("ranged".to_string());
        }

        let mut item = Item::new(
            name,
            ItemType::Weapon,
            rarity,
            (10 + tier as u32 * 5) * (rarity.tier() as u32 + 1),
        )
        .with_slot(ItemSlot::Weapon)
        .with_description(format!("A {} weapon. Damage: {}+{}", rarity, die, attack_bonus));
        item.damage_die = Some(die);
        item.attack_bonus = attack_bonus;
        item.modifiers = modifiers;
        item.is_bulky = kind.bulky;
        debug!(item = %item.name, tier, "generated weapon");
        item
    }

    /// Generate body armor, a helmet or a shield
    pub fn armor(&mut self, tier: u8, rarity: Option<Rarity>, slot: ItemSlot) -> Item {
        let rarity = rarity.unwrap_or_else(|| self.rarity_for(tier));
        let (base_name, base_ac, item_type) = match slot {
            ItemSlot::Armor => (*self.choose(&BODY_ARMOR), 2, ItemType::Armor),
            ItemSlot::Helmet => (*self.choose(&HELMETS), 1, ItemType::Helmet),
            ItemSlot::Shield => (*self.choose(&SHIELDS), 1, ItemType::Shield),
            ItemSlot::Weapon => ("Armor", 1, ItemType::Armor),
        };

        let ac_bonus = base_ac + (tier as i32 - 1) + self.bonus_for(rarity);
        let modifiers = self.modifiers_for(rarity, &ARMOR_MODIFIERS, false);
        let name = self.item_name(base_name, rarity, ac_bonus, &modifiers);

        let mut item = Item::new(
            name,
            item_type,
            rarity,
            (8 + tier as u32 * 4) * (rarity.tier() as u32 + 1),
        )
        .with_slot(slot)
        .with_description(format!("A {} piece of protective gear. AC +{}", rarity, ac_bonus));
        item.ac_bonus = ac_bonus;
        item.modifiers = modifiers;
        item.is_bulky = BULKY_ARMOR.contains(&base_name);
        item
    }

    /// Generate a potion or similar consumable
    pub fn consumable(&mut self, tier: u8) -> Item {
        let &(name, effect, healing, duration) = self.choose(&CONSUMABLES);
        let healing = if healing > 0 {
            healing + (tier as i32 - 1) * 10
        } else {
            0
        };
        let mut item = Item::new(name, ItemType::Consumable, Rarity::Common, 10 + tier as u32 * 5)
            .with_description(format!("A consumable item. {}", effect.label()));
        item.healing_amount = healing;
        item.effect_duration = duration;
        item.effect_type = Some(effect);
        item
    }

    /// Generate a single-use spell scroll
    pub fn spell_scroll(&mut self, tier: u8) -> Item {
        let &(name, effect, description) = self.choose(&SPELL_SCROLLS);
        let rarity = if tier <= 2 {
            Rarity::Uncommon
        } else {
            Rarity::Rare
        };
        let mut item = Item::new(name, ItemType::Consumable, rarity, 15 + tier as u32 * 10)
            .with_description(description);
        item.effect_type = Some(effect);
        item
    }

    /// Random loot: 35% weapon, 25% armor, 20% consumable, 20% scroll
    pub fn random_loot(&mut self, tier: u8) -> Item {
        match self.roller.d100() {
            1..=35 => self.weapon(tier, None),
            36..=60 => {
                let slot = *self.choose(&[ItemSlot::Armor, ItemSlot::Helmet, ItemSlot::Shield]);
                self.armor(tier, None, slot)
            }
            61..=80 => self.consumable(tier),
            _ => self.spell_scroll(tier),
        }
    }

    /// Rarity weights by tier
    pub fn rarity_for(&mut self, tier: u8) -> Rarity {
        let roll = self.roller.d100();
        match tier {
            0 | 1 => match roll {
                1..=60 => Rarity::Common,
                61..=90 => Rarity::Uncommon,
                _ => Rarity::Rare,
            },
            2 => match roll {
                1..=30 => Rarity::Common,
                31..=60 => Rarity::Uncommon,
                61..=90 => Rarity::Rare,
                _ => Rarity::Epic,
            },
            3 => match roll {
                1..=20 => Rarity::Uncommon,
                21..=50 => Rarity::Rare,
                51..=90 => Rarity::Epic,
                _ => Rarity::Legendary,
            },
            _ => match roll {
                1..=30 => Rarity::Rare,
                31..=60 => Rarity::Epic,
                _ => Rarity::Legendary,
            },
        }
    }

    /// Stat bonus range by rarity
    pub fn bonus_for(&mut self, rarity: Rarity) -> i32 {
        let (lo, hi) = match rarity {
            Rarity::Common => (0, 1),
            Rarity::Uncommon => (1, 2),
            Rarity::Rare => (2, 4),
            Rarity::Epic => (4, 6),
            Rarity::Legendary => (6, 10),
        };
        self.roller.range(lo, hi) as i32
    }

    fn modifiers_for(&mut self, rarity: Rarity, pool: &[&str], second_at_legendary: bool) -> Vec<String> {
        let mut modifiers = Vec::new();
        if rarity >= Rarity::Rare {
            modifiers.push(self.choose(pool).to_string());
        }
        if second_at_legendary && rarity >= Rarity::Legendary {
            let rest: Vec<&str> = pool
                .iter()
                .copied()
                .filter(|m| !modifiers.iter().any(|have| have == m))
                .collect();
            if !rest.is_empty() {
                modifiers.push(self.choose(&rest).to_string());
            }
        }
        modifiers
    }

    fn item_name(&mut self, base: &str, rarity: Rarity, bonus: i32, modifiers: &[String]) -> String {
        let mut parts = Vec::new();
        if rarity >= Rarity::Uncommon {
            let is_weapon = base.to_lowercase().contains("weapon")
                || WEAPON_WORDS.iter().any(|w| base.contains(w));
            let prefixes = if is_weapon {
                &WEAPON_PREFIXES
            } else {
                &ARMOR_PREFIXES
            };
            parts.push(self.choose(prefixes).to_string());
        }
        parts.push(base.to_string());
        if bonus > 0 {
            parts.push(format!("+{}", bonus));
        }
        if rarity >= Rarity::Rare && !modifiers.is_empty() {
            parts.push(self.choose(&SUFFIXES).to_string());
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{DiceRoller, ScriptedRoller};

    #[test]
    fn test_common_weapon() {
        // pick Long Sword (3rd), bonus roll 1 -> 0
        let mut roller = ScriptedRoller::new([3, 1]);
        let item = ItemGenerator::new(&mut roller).weapon(1, Some(Rarity::Common));
        assert_eq!(item.name, "Long Sword");
        assert_eq!(item.damage_die, Some(DiceRoll::new(1, 8, 0)));
        assert_eq!(item.attack_bonus, 0);
        assert_eq!(item.value, 15);
        assert_eq!(item.slot, Some(ItemSlot::Weapon));
        assert!(!item.is_bulky);
    }

    #[test]
    fn test_weapon_die_upgrades_with_tier() {
        // Dagger 1d6 -> 1d8 at tier 2
        let mut roller = ScriptedRoller::new([1, 1]);
        let item = ItemGenerator::new(&mut roller).weapon(2, Some(Rarity::Common));
        assert_eq!(item.damage_die, Some(DiceRoll::new(1, 8, 0)));

        // Crossbow 2d6 -> 2d8 -> 2d10 at tier 4, ranged and bulky
        let mut roller = ScriptedRoller::new([11, 1]);
        let item = ItemGenerator::new(&mut roller).weapon(4, Some(Rarity::Common));
        assert_eq!(item.damage_die, Some(DiceRoll::new(2, 10, 0)));
        assert!(item.is_bulky);
        assert!(item.uses_dexterity());
    }

    #[test]
    fn test_uncommon_weapon_gets_prefix_and_bonus() {
        // Spear, bonus roll 2 of 1-2, prefix Steel
        let mut roller = ScriptedRoller::new([9, 2, 3]);
        let item = ItemGenerator::new(&mut roller).weapon(1, Some(Rarity::Uncommon));
        assert_eq!(item.name, "Steel Spear +2");
        assert_eq!(item.attack_bonus, 2);
    }

    #[test]
    fn test_armor_scaling_and_bulk() {
        // Plate Mail, bonus 0, tier 3 adds 2
        let mut roller = ScriptedRoller::new([5, 1]);
        let item = ItemGenerator::new(&mut roller).armor(3, Some(Rarity::Common), ItemSlot::Armor);
        assert_eq!(item.ac_bonus, 4);
        assert!(item.is_bulky);
        assert_eq!(item.item_type, ItemType::Armor);
        assert_eq!(item.name, "Plate Mail +4");
    }

    #[test]
    fn test_consumable_healing_scales() {
        let mut roller = ScriptedRoller::new([1]);
        let potion = ItemGenerator::new(&mut roller).consumable(2);
        assert_eq!(potion.name, "Healing Potion");
        assert_eq!(potion.healing_amount, 30);
        assert_eq!(potion.effect_type, Some(ItemEffect::Heal));
        assert_eq!(potion.value, 20);
    }

    #[test]
    fn test_rarity_weights() {
        let mut roller = ScriptedRoller::new([60, 61, 91, 95, 25]);
        let mut gen = ItemGenerator::new(&mut roller);
        assert_eq!(gen.rarity_for(1), Rarity::Common);
        assert_eq!(gen.rarity_for(1), Rarity::Uncommon);
        assert_eq!(gen.rarity_for(1), Rarity::Rare);
        assert_eq!(gen.rarity_for(2), Rarity::Epic);
        assert_eq!(gen.rarity_for(4), Rarity::Rare);
    }

    #[test]
    fn test_random_loot_is_well_formed() {
        let mut roller = DiceRoller::seeded(3);
        for tier in 1..=4 {
            for _ in 0..50 {
                let item = ItemGenerator::new(&mut roller).random_loot(tier);
                assert!(!item.name.is_empty());
                match item.item_type {
                    ItemType::Weapon => assert!(item.damage_die.is_some()),
                    ItemType::Armor | ItemType::Helmet | ItemType::Shield => {
                        assert!(item.ac_bonus >= 1)
                    }
                    ItemType::Consumable => assert!(item.effect_type.is_some()),
                    other => panic!("unexpected loot type {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_legendary_weapon_has_two_distinct_modifiers() {
        let mut roller = DiceRoller::seeded(11);
        for _ in 0..20 {
            let item = ItemGenerator::new(&mut roller).weapon(4, Some(Rarity::Legendary));
            let magic: Vec<_> = item.modifiers.iter().filter(|m| *m != "ranged").collect();
            assert_eq!(magic.len(), 2);
            assert_ne!(magic[0], magic[1]);
        }
    }
}

//! Monsters
//!
//! A [`Monster`] is built from a denizen table entry. Hit points are rolled
//! from the hit-dice text once at spawn and persisted from then on; special
//! abilities are read from keywords in the attack and special text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combat::effects::StatusEffects;
use crate::dice::{DiceRoll, Roller};
use crate::tables::DenizenEntry;

static HP_NOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)d(\d+)").unwrap());
static HIT_DICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)([+-]\d+)?").unwrap());
static DAMAGE_DICE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d*)d(\d+)").unwrap());
static BRACKETED_BONUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\+(\d+)\)").unwrap());
static BARE_BONUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+(\d+)").unwrap());

/// Damage dealt when the attack text names no dice
const DEFAULT_DAMAGE: DiceRoll = DiceRoll {
    count: 1,
    sides: 6,
    modifier: 0,
};

fn default_tier() -> u8 {
    1
}

/// Ability flags parsed from a monster's attack and special text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialAbilities {
    pub poison: bool,
    pub paralyze: bool,
    pub disease: bool,
    pub level_drain: bool,
    pub regeneration: bool,
    pub immune_wpn: bool,
    pub immune_magic: bool,
    pub immune_cold: bool,
    pub immune_fire: bool,
    pub immune_poison: bool,
    pub berserking: bool,
    pub spell: bool,
    pub fly: bool,
    pub teleport: bool,
    pub gaze: bool,
    pub breath_weapon: bool,
    pub web: bool,
    pub charm: bool,
}

impl SpecialAbilities {
    /// Detect abilities from keywords (case-insensitive)
    pub fn parse(attack: &str, special: Option<&str>) -> Self {
        let text = format!(
            "{} {}",
            attack.to_lowercase(),
            special.unwrap_or_default().to_lowercase()
        );
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
        Self {
            poison: has(&["poison"]),
            paralyze: has(&["paralyze", "paralysis"]),
            disease: has(&["disease"]),
            level_drain: has(&["drain"]),
            regeneration: has(&["regen"]),
            immune_wpn: has(&["immune wpn", "imn. wpn", "immune weapon"]),
            immune_magic: has(&["immune magic", "imn. magic"]),
            // no table text grants these
            immune_cold: false,
            immune_fire: false,
            immune_poison: false,
            berserking: has(&["berserking"]),
            spell: has(&["spell"]),
            fly: has(&["fly"]),
            teleport: has(&["teleport"]),
            gaze: has(&["gaze"]),
            breath_weapon: has(&["breath"]),
            web: has(&["web"]),
            charm: has(&["charm"]),
        }
    }
}

/// A monster in a room or an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    /// Hit dice notation as printed in the table
    pub hd: String,
    pub ac: i32,
    pub attack: String,
    #[serde(default)]
    pub special: Option<String>,
    #[serde(default = "default_tier")]
    pub tier: u8,
    pub hp_max: i32,
    pub hp_current: i32,
    #[serde(default)]
    pub special_abilities: SpecialAbilities,
    #[serde(default)]
    pub status_effects: StatusEffects,
}

impl Monster {
    /// Create a monster with known hit points
    pub fn new(name: &str, hd: &str, ac: i32, attack: &str, hp_max: i32) -> Self {
        Self {
            name: name.to_string(),
            hd: hd.to_string(),
            ac,
            attack: attack.to_string(),
            special: None,
            tier: default_tier(),
            hp_max,
            hp_current: hp_max,
            special_abilities: SpecialAbilities::parse(attack, None),
            status_effects: StatusEffects::new(),
        }
    }

    /// Spawn a monster from a denizen entry, rolling its hit points
    pub fn spawn(entry: &DenizenEntry, tier: u8, roller: &mut dyn Roller) -> Self {
        let hp = roll_hit_points(&entry.hd, roller);
        let mut monster = Self::new(&entry.name, &entry.hd, entry.ac, &entry.attack, hp);
        monster.special = entry.special.clone();
        monster.special_abilities = SpecialAbilities::parse(&entry.attack, entry.special.as_deref());
        monster.tier = tier;
        debug!(monster = %monster.name, hd = %monster.hd, hp, "spawned monster");
        monster
    }

    /// Spawn the number appearing for `tier`, numbering copies when there are several
    pub fn spawn_group(entry: &DenizenEntry, tier: u8, roller: &mut dyn Roller) -> Vec<Self> {
        let count = number_appearing(tier, roller);
        (1..=count)
            .map(|n| {
                let mut monster = Self::spawn(entry, tier, roller);
                if count > 1 {
                    monster.name = format!("{} #{}", monster.name, n);
                }
                monster
            })
            .collect()
    }

    pub fn with_special(mut self, special: &str) -> Self {
        self.special_abilities = SpecialAbilities::parse(&self.attack, Some(special));
        self.special = Some(special.to_string());
        self
    }

    pub fn with_tier(mut self, tier: u8) -> Self {
        self.tier = tier;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp_current > 0
    }

    /// XP value by hit dice
    pub fn xp_value(&self) -> u32 {
        xp_for_hit_dice(hit_dice_value(&self.hd))
    }

    /// Apply damage, returning (damage taken, killed)
    pub fn take_damage(&mut self, amount: i32) -> (i32, bool) {
        let amount = amount.max(0);
        self.hp_current = (self.hp_current - amount).max(0);
        (amount, !self.is_alive())
    }

    /// Heal up to max HP; the dead stay dead
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.hp_current;
        self.hp_current = (self.hp_current + amount).min(self.hp_max);
        self.hp_current - before
    }

    /// Heal 1 HP when the monster regenerates
    pub fn apply_regeneration(&mut self) -> i32 {
        if self.special_abilities.regeneration {
            self.heal(1)
        } else {
            0
        }
    }

    /// Damage dice named in the attack text, 1d6 when none
    pub fn damage_dice(&self) -> DiceRoll {
        let attack = self.attack.to_lowercase();
        DAMAGE_DICE
            .captures(&attack)
            .and_then(|caps| {
                let count = match caps[1].parse::<u32>() {
                    Ok(n) => n,
                    Err(_) => 1,
                };
                let sides = caps[2].parse::<u32>().ok()?;
                (count > 0 && sides > 0).then(|| DiceRoll::new(count, sides, 0))
            })
            .unwrap_or(DEFAULT_DAMAGE)
    }

    /// Attack bonus from "(+N)" or "+N" in the attack text
    pub fn attack_bonus(&self) -> i32 {
        let attack = self.attack.to_lowercase();
        BRACKETED_BONUS
            .captures(&attack)
            .or_else(|| BARE_BONUS.captures(&attack))
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(0)
    }
}

/// Roll hit points from hit dice notation.
///
/// "1d2HP" rolls the dice as written, "1/2" rolls a d4, "2+2" rolls 2d8+2
/// (minimum 1). Anything else is a single d8.
pub fn roll_hit_points(hd: &str, roller: &mut dyn Roller) -> i32 {
    let hd = hd.trim();
    if hd.to_uppercase().contains("HP") {
        if let Some(caps) = HP_NOTATION.captures(hd) {
            if let (Ok(count), Ok(sides)) = (caps[1].parse(), caps[2].parse()) {
                return (roller.dice(count, sides) as i32).max(1);
            }
        }
    }
    if hd.contains('/') {
        return roller.d4() as i32;
    }
    if let Some(caps) = HIT_DICE.captures(hd) {
        if let Ok(count) = caps[1].parse::<u32>() {
            let modifier = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .unwrap_or(0);
            return (roller.dice(count, 8) as i32 + modifier).max(1);
        }
    }
    roller.roll(8) as i32
}

/// Numeric hit dice used for XP ("1/2" counts as half)
pub fn hit_dice_value(hd: &str) -> f32 {
    let hd = hd.trim();
    if hd.contains('/') {
        return 0.5;
    }
    if hd.to_uppercase().contains("HP") {
        return HP_NOTATION
            .captures(hd)
            .and_then(|caps| caps[1].parse::<f32>().ok())
            .map_or(1.0, |count| (count / 2.0).max(0.5));
    }
    HIT_DICE
        .captures(hd)
        .and_then(|caps| caps[1].parse::<f32>().ok())
        .unwrap_or(1.0)
}

/// XP award by hit dice
pub fn xp_for_hit_dice(hd: f32) -> u32 {
    const STEPS: [(f32, u32); 11] = [
        (0.5, 10),
        (1.0, 50),
        (2.0, 100),
        (3.0, 200),
        (4.0, 450),
        (5.0, 700),
        (6.0, 1100),
        (7.0, 1800),
        (8.0, 2300),
        (9.0, 2900),
        (10.0, 3900),
    ];
    STEPS
        .iter()
        .find(|(limit, _)| hd <= *limit)
        .map_or_else(|| 3900 + ((hd - 10.0) * 1000.0) as u32, |(_, xp)| *xp)
}

/// Monsters appearing against a lone adventurer: 1-2 at tier 1, otherwise 1
pub fn number_appearing(tier: u8, roller: &mut dyn Roller) -> u32 {
    if tier <= 1 {
        roller.range(1, 2)
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedRoller;

    fn entry(name: &str, hd: &str, attack: &str) -> DenizenEntry {
        DenizenEntry::new(name, hd, 12, attack)
    }

    #[test]
    fn test_hit_point_notations() {
        let mut roller = ScriptedRoller::new([2, 5, 3, 1, 4, 6, 7]);
        // 2d8+2
        assert_eq!(roll_hit_points("2+2", &mut roller), 9);
        // 1d8-1, minimum 1
        assert_eq!(roll_hit_points("1-1", &mut roller), 2);
        assert_eq!(roll_hit_points("1-1", &mut roller), 1);
        // d4
        assert_eq!(roll_hit_points("1/2", &mut roller), 4);
        // 1d2 as written
        assert_eq!(roll_hit_points("1d2HP", &mut roller), 6);
        // unreadable falls back to a d8
        assert_eq!(roll_hit_points("lots", &mut roller), 7);
    }

    #[test]
    fn test_xp_by_hit_dice() {
        assert_eq!(xp_for_hit_dice(hit_dice_value("1/2")), 10);
        assert_eq!(xp_for_hit_dice(hit_dice_value("1d2HP")), 10);
        assert_eq!(xp_for_hit_dice(hit_dice_value("1")), 50);
        assert_eq!(xp_for_hit_dice(hit_dice_value("2+2")), 100);
        assert_eq!(xp_for_hit_dice(hit_dice_value("6+4")), 1100);
        assert_eq!(xp_for_hit_dice(hit_dice_value("10")), 3900);
        assert_eq!(xp_for_hit_dice(12.0), 5900);
    }

    #[test]
    fn test_ability_keywords() {
        let spider = SpecialAbilities::parse("Bite, Poison, Web", None);
        assert!(spider.poison && spider.web);
        assert!(!spider.paralyze);

        let vampire = SpecialAbilities::parse("Bite, Imn. Wpn, Regen.", None);
        assert!(vampire.immune_wpn && vampire.regeneration);

        let wraith = SpecialAbilities::parse("Touch", Some("Level Drain, Fly"));
        assert!(wraith.level_drain && wraith.fly);
        assert!(!wraith.immune_fire);
    }

    #[test]
    fn test_damage_dice_and_bonus() {
        assert_eq!(Monster::new("Ogre", "4", 12, "Club 2d6", 20).damage_dice(), DiceRoll::new(2, 6, 0));
        assert_eq!(Monster::new("Imp", "1", 12, "Sting d4", 4).damage_dice(), DiceRoll::new(1, 4, 0));
        assert_eq!(Monster::new("Bandit", "1", 12, "Wpn", 4).damage_dice(), DiceRoll::new(1, 6, 0));

        assert_eq!(Monster::new("Minotaur", "6+4", 13, "Wpn(+1)", 30).attack_bonus(), 1);
        assert_eq!(Monster::new("Knight", "10", 20, "Sword +3", 50).attack_bonus(), 3);
        assert_eq!(Monster::new("Rat", "1-1", 12, "Bite, Disease", 3).attack_bonus(), 0);
    }

    #[test]
    fn test_one_hp_monster_dies_to_any_damage() {
        let mut monster = Monster::new("Centipede", "1d2HP", 10, "Bite, Poison", 1);
        assert!(monster.is_alive());
        let (taken, killed) = monster.take_damage(3);
        assert_eq!(taken, 3);
        assert!(killed);
        assert_eq!(monster.hp_current, 0);
        assert!(!monster.is_alive());
    }

    #[test]
    fn test_heal_and_regeneration() {
        let mut troll = Monster::new("Troll", "6+3", 15, "Claw(+2), Regeneration", 20);
        troll.take_damage(5);
        assert_eq!(troll.apply_regeneration(), 1);
        assert_eq!(troll.heal(10), 4);
        assert_eq!(troll.hp_current, 20);

        troll.take_damage(50);
        assert_eq!(troll.heal(5), 0);
        assert_eq!(troll.apply_regeneration(), 0);

        let mut bandit = Monster::new("Bandit", "1", 12, "Wpn", 5);
        bandit.take_damage(2);
        assert_eq!(bandit.apply_regeneration(), 0);
    }

    #[test]
    fn test_spawn_group_numbers_copies() {
        // range(1, 2) -> 2, then 1d8 each
        let mut roller = ScriptedRoller::new([2, 5, 3]);
        let monsters = Monster::spawn_group(&entry("Bandit", "1", "Wpn"), 1, &mut roller);
        assert_eq!(monsters.len(), 2);
        assert_eq!(monsters[0].name, "Bandit #1");
        assert_eq!(monsters[1].name, "Bandit #2");
        assert_eq!(monsters[0].hp_max, 5);
        assert_eq!(monsters[1].hp_max, 3);

        let mut roller = ScriptedRoller::new([4]);
        let monsters = Monster::spawn_group(&entry("Ghoul", "2", "Claw, Paralyze"), 2, &mut roller);
        assert_eq!(monsters.len(), 1);
        assert_eq!(monsters[0].name, "Ghoul");
        assert_eq!(monsters[0].tier, 2);
        assert!(monsters[0].special_abilities.paralyze);
    }

    #[test]
    fn test_serde_keeps_rolled_hp() {
        let mut monster = Monster::new("Spider", "2+2", 13, "Bite, Poison, Web", 11);
        monster.take_damage(4);
        let json = serde_json::to_value(&monster).unwrap();
        assert_eq!(json["hp_current"], 7);
        assert_eq!(json["special_abilities"]["poison"], true);

        let back: Monster = serde_json::from_value(json).unwrap();
        assert_eq!(back, monster);
    }

    #[test]
    fn test_deserialize_without_tier_defaults_to_one() {
        let monster: Monster = serde_json::from_str(
            r#"{"name": "Kobold", "hd": "1/2", "ac": 13, "attack": "Weapon",
                "hp_max": 3, "hp_current": 0, "is_alive": false}"#,
        )
        .unwrap();
        assert_eq!(monster.tier, 1);
        assert!(!monster.is_alive());
    }

    #[test]
    fn test_missing_hp_is_rejected() {
        let result = serde_json::from_str::<Monster>(
            r#"{"name": "Kobold", "hd": "1/2", "ac": 13, "attack": "Weapon"}"#,
        );
        assert!(result.is_err());
    }
}

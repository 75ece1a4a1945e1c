//! Rewards dropped by defeated monsters

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dice::Roller;
use crate::items::{Item, ItemGenerator};
use crate::monster::Monster;
use crate::player::SILVER_PER_GOLD;

static COIN_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(gold|silver)").unwrap());

/// Percent chance a corpse carries an item
const ITEM_DROP_CHANCE: u32 = 60;

/// A purse of coins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredCurrency")]
pub struct Currency {
    pub gold: u32,
    pub silver: u32,
}

impl Currency {
    /// Express an amount of silver as gold plus the remainder
    pub fn from_silver(amount: u32) -> Self {
        Self {
            gold: amount / SILVER_PER_GOLD,
            silver: amount % SILVER_PER_GOLD,
        }
    }

    pub fn total_silver(&self) -> u32 {
        self.gold * SILVER_PER_GOLD + self.silver
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.gold, self.silver) {
            (0, silver) => write!(f, "{} silver", silver),
            (gold, 0) => write!(f, "{} gold", gold),
            (gold, silver) => write!(f, "{} gold, {} silver", gold, silver),
        }
    }
}

/// Coins as stored: a struct, or text such as "1 gold, 5 silver" in older saves
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCurrency {
    Coins {
        #[serde(default)]
        gold: u32,
        #[serde(default)]
        silver: u32,
    },
    Text(String),
}

impl TryFrom<StoredCurrency> for Currency {
    type Error = String;

    fn try_from(stored: StoredCurrency) -> Result<Self, Self::Error> {
        match stored {
            StoredCurrency::Coins { gold, silver } => Ok(Currency { gold, silver }),
            StoredCurrency::Text(text) => {
                let mut coins = Currency::default();
                let mut matched = false;
                for caps in COIN_TEXT.captures_iter(&text) {
                    let amount: u32 = caps[1]
                        .parse()
                        .map_err(|_| format!("bad coin amount: {}", text))?;
                    if caps[2].eq_ignore_ascii_case("gold") {
                        coins.gold += amount;
                    } else {
                        coins.silver += amount;
                    }
                    matched = true;
                }
                if matched {
                    Ok(coins)
                } else {
                    Err(format!("not a coin amount: {}", text))
                }
            }
        }
    }
}

/// One entry of combat loot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Loot {
    Item(Box<Item>),
    Currency(Currency),
}

impl Loot {
    pub fn name(&self) -> String {
        match self {
            Loot::Item(item) => item.name.clone(),
            Loot::Currency(coins) => coins.to_string(),
        }
    }
}

/// Roll what a dead monster leaves behind.
///
/// 60% chance of one item at the monster's tier; always 5-20 silver per tier.
pub fn roll_loot(monster: &Monster, roller: &mut dyn Roller) -> Vec<Loot> {
    let tier = monster.tier.max(1);
    let mut loot = Vec::with_capacity(2);
    if roller.chance(ITEM_DROP_CHANCE) {
        let item = ItemGenerator::new(roller).random_loot(tier);
        loot.push(Loot::Item(Box::new(item)));
    }
    let amount = roller.range(5, 20) * u32::from(tier);
    loot.push(Loot::Currency(Currency::from_silver(amount)));
    loot
}

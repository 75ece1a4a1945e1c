//! Dice notation
//!
//! Parses and rolls notation like "2d6+3", "1d20", "d8", "3d8-2"

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{DiceError, Roller};

/// A parsed dice roll specification, serialized in notation form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Flat modifier added once
    pub modifier: i32,
}

impl DiceRoll {
    /// Create a new dice roll
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Roll the dice and return the total
    pub fn roll_with(&self, roller: &mut dyn Roller) -> i32 {
        roller.dice(self.count, self.sides) as i32 + self.modifier
    }

    /// Roll twice as many dice, adding the modifier once
    pub fn roll_doubled(&self, roller: &mut dyn Roller) -> i32 {
        roller.dice(self.count * 2, self.sides) as i32 + self.modifier
    }

    /// Get the expected average (rounded down)
    pub fn average(&self) -> i32 {
        let avg_per_die = (1.0 + self.sides as f64) / 2.0;
        (self.count as f64 * avg_per_die + self.modifier as f64) as i32
    }

    /// Next larger die used when weapon damage scales with tier
    pub fn upgraded(&self) -> Self {
        let (count, sides) = match (self.count, self.sides) {
            (1, 4) => (1, 6),
            (1, 6) => (1, 8),
            (1, 8) => (1, 10),
            (1, 10) => (1, 12),
            (1, 12) => (2, 6),
            (2, 6) => (2, 8),
            (2, 8) => (2, 10),
            other => other,
        };
        Self::new(count, sides, self.modifier)
    }
}

impl FromStr for DiceRoll {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dice(s)
    }
}

impl TryFrom<String> for DiceRoll {
    type Error = DiceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_dice(&s)
    }
}

impl From<DiceRoll> for String {
    fn from(roll: DiceRoll) -> Self {
        roll.to_string()
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

/// Parse a dice notation string like "2d6+3"
pub fn parse_dice(notation: &str) -> Result<DiceRoll, DiceError> {
    let notation = notation.trim().to_lowercase();
    let invalid = || DiceError::Invalid(notation.clone());

    let d_pos = notation.find('d').ok_or_else(invalid)?;

    // "d6" means "1d6"
    let count_str = &notation[..d_pos];
    let count: u32 = if count_str.is_empty() {
        1
    } else {
        count_str.parse().map_err(|_| invalid())?
    };
    if count == 0 {
        return Err(DiceError::ZeroDice);
    }

    let rest = &notation[d_pos + 1..];
    let (sides_str, modifier) = if let Some(plus_pos) = rest.find('+') {
        let modifier: i32 = rest[plus_pos + 1..].parse().map_err(|_| invalid())?;
        (&rest[..plus_pos], modifier)
    } else if let Some(minus_pos) = rest.rfind('-').filter(|&pos| pos > 0) {
        let modifier: i32 = rest[minus_pos..].parse().map_err(|_| invalid())?;
        (&rest[..minus_pos], modifier)
    } else {
        (rest, 0)
    };

    let sides: u32 = sides_str.parse().map_err(|_| invalid())?;
    if sides == 0 {
        return Err(DiceError::ZeroSides);
    }

    Ok(DiceRoll {
        count,
        sides,
        modifier,
    })
}

/// Check if a d20 roll is a natural 20 (critical hit)
pub fn is_critical(roll: u32) -> bool {
    roll == 20
}

/// Check if a d20 roll is a natural 1 (critical fail)
pub fn is_fumble(roll: u32) -> bool {
    roll == 1
}

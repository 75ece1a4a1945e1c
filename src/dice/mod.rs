//! Dice and randomness
//!
//! Every random decision in the engine goes through a [`Roller`]:
//! - [`DiceRoller`] draws from a seeded or OS-seeded `StdRng`
//! - [`ScriptedRoller`] replays a fixed sequence for deterministic tests
//!
//! Dice notation ("2d6+1", "d20") lives in [`notation`].

pub mod notation;

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

pub use notation::{is_critical, is_fumble, parse_dice, DiceRoll};

/// Dice notation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("invalid dice notation: {0}")]
    Invalid(String),
    #[error("dice count must be at least 1")]
    ZeroDice,
    #[error("die sides must be at least 1")]
    ZeroSides,
    #[error("dice total out of range: {0}")]
    Overflow(String),
}

/// Source of dice outcomes.
///
/// Only [`Roller::roll`] is required; the named dice are built on it so a
/// scripted fake sees exactly one value per physical die.
pub trait Roller {
    /// Roll one die with `sides` faces, returning 1..=sides
    fn roll(&mut self, sides: u32) -> u32;

    fn d4(&mut self) -> u32 {
        self.roll(4)
    }

    fn d6(&mut self) -> u32 {
        self.roll(6)
    }

    fn d20(&mut self) -> u32 {
        self.roll(20)
    }

    fn d100(&mut self) -> u32 {
        self.roll(100)
    }

    /// Sum of two d6 (2..=12)
    fn two_d6(&mut self) -> u32 {
        self.roll(6) + self.roll(6)
    }

    /// Tens die then units die (11..=66)
    fn d66(&mut self) -> u32 {
        self.roll(6) * 10 + self.roll(6)
    }

    /// Sum of `count` dice with `sides` faces
    fn dice(&mut self, count: u32, sides: u32) -> u32 {
        (0..count).map(|_| self.roll(sides)).sum()
    }

    /// Uniform integer in lo..=hi
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        lo + self.roll(hi - lo + 1) - 1
    }

    /// Percentile check: true when a d100 comes up at or under `percent`
    fn chance(&mut self, percent: u32) -> bool {
        self.d100() <= percent
    }

    /// Uniform index into a slice of length `len` (which must be non-zero)
    fn pick(&mut self, len: usize) -> usize {
        let len = len.max(1);
        (self.roll(len as u32) as usize).clamp(1, len) - 1
    }
}

impl<R: Roller + ?Sized> Roller for &mut R {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

impl<R: Roller + ?Sized> Roller for Box<R> {
    fn roll(&mut self, sides: u32) -> u32 {
        (**self).roll(sides)
    }
}

/// Roller backed by `rand`'s standard generator
#[derive(Debug, Clone)]
pub struct DiceRoller {
    rng: StdRng,
}

impl DiceRoller {
    /// Seed from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible roller for a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when a seed is configured, OS-seeded otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl Roller for DiceRoller {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

/// Replays queued raw die values in order.
///
/// Values are returned as-is regardless of the die requested, so a script
/// must be written against the exact order of rolls an operation makes.
/// Once the queue is drained every roll returns the fallback value.
#[derive(Debug, Clone)]
pub struct ScriptedRoller {
    queue: VecDeque<u32>,
    fallback: u32,
    consumed: usize,
}

impl ScriptedRoller {
    /// Queue `values`, falling back to 1 when exhausted
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: values.into_iter().collect(),
            fallback: 1,
            consumed: 0,
        }
    }

    /// Value returned after the script runs out
    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Append more values to the script
    pub fn push(&mut self, values: impl IntoIterator<Item = u32>) {
        self.queue.extend(values);
    }

    /// Number of rolls made so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Number of scripted values not yet used
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Roller for ScriptedRoller {
    fn roll(&mut self, _sides: u32) -> u32 {
        self.consumed += 1;
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

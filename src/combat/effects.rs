//! Status effects system
//!
//! Manages lingering conditions on players and monsters:
//! - Poisoned (damage each turn), paralyzed, stunned
//! - Diseased and other permanent afflictions
//!
//! Durations count down once per combat round. A negative duration marks a
//! permanent effect that only an explicit cure removes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Duration value for effects that never expire on their own
pub const PERMANENT: i32 = -1;

/// Kinds of status effects
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EffectKind {
    /// Takes damage each turn
    Poisoned,
    /// Cannot act
    Paralyzed,
    /// Permanent until cured
    Diseased,
    /// Cannot act
    Stunned,
    /// Any other named condition
    Other(String),
}

impl FromStr for EffectKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "poisoned" | "poison" => EffectKind::Poisoned,
            "paralyzed" | "paralyze" => EffectKind::Paralyzed,
            "diseased" | "disease" => EffectKind::Diseased,
            "stunned" | "stun" => EffectKind::Stunned,
            other => EffectKind::Other(other.to_string()),
        })
    }
}

impl From<String> for EffectKind {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl From<EffectKind> for String {
    fn from(kind: EffectKind) -> Self {
        kind.to_string()
    }
}

impl EffectKind {
    /// Whether this effect prevents actions
    pub fn prevents_action(&self) -> bool {
        matches!(self, EffectKind::Stunned | EffectKind::Paralyzed)
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EffectKind::Poisoned => "poisoned",
            EffectKind::Paralyzed => "paralyzed",
            EffectKind::Diseased => "diseased",
            EffectKind::Stunned => "stunned",
            EffectKind::Other(name) => name.as_str(),
        };
        write!(f, "{}", s)
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// A status effect instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: EffectKind,
    /// Remaining rounds; negative means permanent
    pub duration: i32,
    /// Damage applied at each tick
    #[serde(default, skip_serializing_if = "is_zero")]
    pub damage_per_turn: i32,
}

impl StatusEffect {
    /// Create a new status effect
    pub fn new(name: EffectKind, duration: i32) -> Self {
        Self {
            name,
            duration,
            damage_per_turn: 0,
        }
    }

    /// Create a damage-over-time effect
    pub fn dot(name: EffectKind, duration: i32, damage: i32) -> Self {
        Self {
            name,
            duration,
            damage_per_turn: damage,
        }
    }

    /// An effect that never expires on its own
    pub fn permanent(name: EffectKind) -> Self {
        Self::new(name, PERMANENT)
    }

    pub fn is_permanent(&self) -> bool {
        self.duration < 0
    }
}

/// Effects on a single entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect, refreshing the duration of one already present
    pub fn add(&mut self, effect: StatusEffect) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.name == effect.name) {
            existing.duration = if existing.is_permanent() || effect.is_permanent() {
                PERMANENT
            } else {
                existing.duration.max(effect.duration)
            };
            existing.damage_per_turn = existing.damage_per_turn.max(effect.damage_per_turn);
        } else {
            self.effects.push(effect);
        }
    }

    /// Remove an effect, returning whether it was present
    pub fn remove(&mut self, name: &EffectKind) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| &e.name != name);
        self.effects.len() != before
    }

    pub fn has(&self, name: &EffectKind) -> bool {
        self.effects.iter().any(|e| &e.name == name)
    }

    pub fn get(&self, name: &EffectKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| &e.name == name)
    }

    /// Check if entity can act (not stunned/paralyzed)
    pub fn can_act(&self) -> bool {
        self.disabling().is_none()
    }

    /// The first effect keeping the entity from acting
    pub fn disabling(&self) -> Option<&EffectKind> {
        self.effects
            .iter()
            .map(|e| &e.name)
            .find(|name| name.prevents_action())
    }

    /// Advance every effect by one round.
    ///
    /// Returns the damage owed this round. Effects whose duration reaches
    /// zero are dropped after dealing their final damage.
    pub fn tick(&mut self) -> i32 {
        let damage = self.effects.iter().map(|e| e.damage_per_turn).sum();
        let effects = std::mem::take(&mut self.effects);
        self.effects = effects
            .into_iter()
            .filter_map(|mut effect| {
                if effect.duration > 0 {
                    effect.duration -= 1;
                    if effect.duration == 0 {
                        debug!(effect = %effect.name, "status effect expired");
                        return None;
                    }
                }
                Some(effect)
            })
            .collect();
        damage
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

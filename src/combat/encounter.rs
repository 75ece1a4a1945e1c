//! Turn-based combat encounters
//!
//! A [`CombatEncounter`] alternates between the player phase (one of
//! attack, use item, flee) and the monster phase, where every living
//! monster acts in roster order. The primary party member (index 0) is the
//! one who acts and is attacked.
//!
//! Once `combat_result` leaves `in_progress` the encounter is terminal and
//! every further action is rejected with [`Rejection::CombatEnded`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::attack::{resolve_attack, AttackResult};
use super::effects::{EffectKind, StatusEffect, StatusEffects};
use super::loot::{roll_loot, Loot};
use crate::dice::Roller;
use crate::items::ItemEffect;
use crate::monster::{Monster, SpecialAbilities};
use crate::player::{Attribute, Player};

/// Flee chance in percent
const BASE_FLEE_CHANCE: u32 = 50;
/// Extra flee chance when below half HP
const WOUNDED_FLEE_BONUS: u32 = 10;
/// Log lines included in a status snapshot
const STATUS_LOG_LINES: usize = 10;
/// Max HP lost to a level-draining hit
const LEVEL_DRAIN: i32 = 2;

const POISON_DURATION: i32 = 6;
const POISON_DAMAGE: i32 = 1;
const PARALYSIS_DURATION: i32 = 3;

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("an encounter needs at least one party member")]
    EmptyParty,
    #[error("malformed encounter: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Why a player or monster action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Combat has already ended")]
    CombatEnded,
    #[error("Not player's turn")]
    NotPlayerTurn,
    #[error("Monsters act after the player")]
    NotMonsterTurn,
    #[error("Invalid target")]
    InvalidTarget,
    #[error("You don't have {0}")]
    MissingItem(String),
    #[error("{0} cannot be used in combat")]
    NotUsable(String),
}

impl Rejection {
    /// Whether the action was refused because the encounter is over
    pub fn combat_ended(&self) -> bool {
        matches!(self, Rejection::CombatEnded)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatResult {
    #[default]
    InProgress,
    Victory,
    Defeat,
    Fled,
}

impl CombatResult {
    pub fn is_terminal(&self) -> bool {
        *self != CombatResult::InProgress
    }
}

/// Category of a combat log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Info,
    Attack,
    Damage,
    Heal,
    Special,
    Result,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
}

/// Outcome of a player attack
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackReport {
    pub attacker: String,
    pub target: String,
    #[serde(flatten)]
    pub attack: AttackResult,
    /// HP actually removed from the target
    pub damage_dealt: i32,
    pub target_killed: bool,
}

/// Outcome of using an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub item: String,
    pub effect: String,
}

/// Outcome of a flee attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FleeReport {
    pub fled: bool,
    pub roll: u32,
    pub flee_chance: u32,
}

/// HP and conditions of one combatant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatantStatus {
    pub name: String,
    pub hp_current: i32,
    pub hp_max: i32,
    pub ac: i32,
    pub is_alive: bool,
    pub status_effects: StatusEffects,
}

impl From<&Player> for CombatantStatus {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            hp_current: player.hp_current,
            hp_max: player.hp_max,
            ac: player.armor_class(),
            is_alive: player.hp_current > 0,
            status_effects: player.status_effects.clone(),
        }
    }
}

impl From<&Monster> for CombatantStatus {
    fn from(monster: &Monster) -> Self {
        Self {
            name: monster.name.clone(),
            hp_current: monster.hp_current,
            hp_max: monster.hp_max,
            ac: monster.ac,
            is_alive: monster.is_alive(),
            status_effects: monster.status_effects.clone(),
        }
    }
}

/// Read-only view of an encounter for clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatStatus {
    pub id: Uuid,
    pub turn_number: u32,
    pub is_player_turn: bool,
    pub combat_result: CombatResult,
    pub is_over: bool,
    pub player: CombatantStatus,
    pub party: Vec<CombatantStatus>,
    /// Living monsters only
    pub monsters: Vec<CombatantStatus>,
    /// The most recent log lines
    pub combat_log: Vec<LogEntry>,
    pub loot: Vec<Loot>,
}

/// A battle between a party and a group of monsters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredEncounter")]
pub struct CombatEncounter {
    pub id: Uuid,
    party: Vec<Player>,
    /// Dead monsters stay in the roster for the loot pass
    pub monsters: Vec<Monster>,
    pub turn_number: u32,
    pub combat_result: CombatResult,
    pub is_player_turn: bool,
    pub combat_log: Vec<LogEntry>,
    pub loot: Vec<Loot>,
}

/// Serialized form, also accepting the single `player` field of older saves
#[derive(Deserialize)]
struct StoredEncounter {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    #[serde(default)]
    party: Vec<Player>,
    #[serde(default)]
    player: Option<Player>,
    monsters: Vec<Monster>,
    turn_number: u32,
    combat_result: CombatResult,
    is_player_turn: bool,
    combat_log: Vec<LogEntry>,
    #[serde(default)]
    loot: Vec<Loot>,
}

impl TryFrom<StoredEncounter> for CombatEncounter {
    type Error = CombatError;

    fn try_from(stored: StoredEncounter) -> Result<Self, Self::Error> {
        let party = if stored.party.is_empty() {
            stored.player.into_iter().collect()
        } else {
            stored.party
        };
        if party.is_empty() {
            return Err(CombatError::EmptyParty);
        }
        Ok(Self {
            id: stored.id,
            party,
            monsters: stored.monsters,
            turn_number: stored.turn_number,
            combat_result: stored.combat_result,
            is_player_turn: stored.is_player_turn,
            combat_log: stored.combat_log,
            loot: stored.loot,
        })
    }
}

impl CombatEncounter {
    /// Start a battle. The first party member takes the actions.
    pub fn new(party: Vec<Player>, monsters: Vec<Monster>) -> Result<Self, CombatError> {
        if party.is_empty() {
            return Err(CombatError::EmptyParty);
        }
        Ok(Self::begin(party, monsters))
    }

    /// A battle with a single character
    pub fn solo(player: Player, monsters: Vec<Monster>) -> Self {
        Self::begin(vec![player], monsters)
    }

    /// `party` must not be empty
    fn begin(party: Vec<Player>, monsters: Vec<Monster>) -> Self {
        let mut encounter = Self {
            id: Uuid::new_v4(),
            party,
            monsters,
            turn_number: 0,
            combat_result: CombatResult::InProgress,
            is_player_turn: true,
            combat_log: Vec::new(),
            loot: Vec::new(),
        };

        let monster_names = encounter
            .monsters
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let message = if encounter.party.len() > 1 {
            let party_names = encounter
                .party
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("Combat started! Party ({}) vs {}", party_names, monster_names)
        } else {
            format!("Combat started! {} vs {}", encounter.player().name, monster_names)
        };
        info!(
            encounter = %encounter.id,
            party = encounter.party.len(),
            monsters = encounter.monsters.len(),
            "combat started"
        );
        encounter.log(message, LogKind::Info);
        encounter
    }

    pub fn from_json(json: &str) -> Result<Self, CombatError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The acting party member
    pub fn player(&self) -> &Player {
        &self.party[0]
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.party[0]
    }

    pub fn party(&self) -> &[Player] {
        &self.party
    }

    /// Hand the party back once the encounter is settled
    pub fn into_party(self) -> Vec<Player> {
        self.party
    }

    pub fn is_over(&self) -> bool {
        self.combat_result.is_terminal()
    }

    pub fn alive_monsters(&self) -> Vec<&Monster> {
        self.monsters.iter().filter(|m| m.is_alive()).collect()
    }

    fn log(&mut self, message: impl Into<String>, kind: LogKind) {
        let message = message.into();
        debug!(encounter = %self.id, turn = self.turn_number, "{}", message);
        self.combat_log.push(LogEntry {
            turn: self.turn_number,
            message,
            kind,
        });
    }

    fn player_phase(&self) -> Result<(), Rejection> {
        if self.is_over() {
            return Err(Rejection::CombatEnded);
        }
        if !self.is_player_turn {
            return Err(Rejection::NotPlayerTurn);
        }
        Ok(())
    }

    /// Attack the `target_index`-th living monster
    pub fn player_attack(
        &mut self,
        target_index: usize,
        roller: &mut dyn Roller,
    ) -> Result<AttackReport, Rejection> {
        self.player_phase()?;
        let index = self
            .monsters
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_alive())
            .map(|(i, _)| i)
            .nth(target_index)
            .ok_or(Rejection::InvalidTarget)?;

        let player = self.player();
        let attacker = player.name.clone();
        let ranged = player.attacks_at_range();
        let attack_type = if ranged { "ranged" } else { "melee" };
        let bonus_label = if ranged { "SB" } else { "AB" };
        let target_ac = self.monsters[index].ac;
        let result = resolve_attack(
            player.attack_bonus(),
            target_ac,
            player.damage_dice(),
            player.damage_bonus(),
            roller,
        );

        let target = &mut self.monsters[index];
        let target_name = target.name.clone();
        let (damage_dealt, target_killed) = match result.damage {
            Some(damage) => target.take_damage(damage),
            None => (0, false),
        };
        let (hp_current, hp_max) = (target.hp_current, target.hp_max);

        let report = AttackReport {
            attacker: attacker.clone(),
            target: target_name.clone(),
            attack: result,
            damage_dealt,
            target_killed,
        };

        if result.fumble {
            self.log(
                format!("{} fumbles the {} attack! (rolled 1)", attacker, attack_type),
                LogKind::Attack,
            );
            self.is_player_turn = false;
            return Ok(report);
        }

        if result.critical {
            self.log(
                format!(
                    "{} scores a CRITICAL HIT with {} attack on {}! Rolls {}, deals {} damage!",
                    attacker, attack_type, target_name, result.roll, damage_dealt
                ),
                LogKind::Attack,
            );
        } else if result.hit {
            self.log(
                format!(
                    "{} hits {} with {} attack! Rolls {}+{} {}={} vs AC {}, deals {} damage! ({}/{} HP remaining)",
                    attacker,
                    target_name,
                    attack_type,
                    result.roll,
                    result.attack_bonus,
                    bonus_label,
                    result.attack_total,
                    target_ac,
                    damage_dealt,
                    hp_current,
                    hp_max
                ),
                LogKind::Attack,
            );
        } else {
            self.log(
                format!(
                    "{} attacks {} with {} attack but misses! Rolls {}+{} {}={} vs AC {}",
                    attacker,
                    target_name,
                    attack_type,
                    result.roll,
                    result.attack_bonus,
                    bonus_label,
                    result.attack_total,
                    target_ac
                ),
                LogKind::Attack,
            );
        }
        if target_killed {
            self.log(format!("{} has been slain!", target_name), LogKind::Result);
        }

        self.check_combat_end(roller);
        self.is_player_turn = false;
        Ok(report)
    }

    /// Use a healing item or antidote from the acting player's inventory
    pub fn player_use_item(&mut self, item_name: &str) -> Result<ItemReport, Rejection> {
        self.player_phase()?;
        let item = self
            .player()
            .find_item(item_name)
            .ok_or_else(|| Rejection::MissingItem(item_name.to_string()))?;

        enum Usage {
            Heal(i32),
            CurePoison,
        }
        let lower = item.name.to_lowercase();
        let usage = if item.effect_type == Some(ItemEffect::Heal) && item.healing_amount > 0 {
            Usage::Heal(item.healing_amount)
        } else if lower.contains("healing") || lower.contains("herb") {
            Usage::Heal(if lower.contains("minor") { 3 } else { 6 })
        } else if item.effect_type == Some(ItemEffect::CurePoison) || lower.contains("antidote") {
            Usage::CurePoison
        } else {
            return Err(Rejection::NotUsable(item.name.clone()));
        };

        let player = self.player_mut();
        let Some(item) = player.remove_item(item_name) else {
            return Err(Rejection::MissingItem(item_name.to_string()));
        };
        let name = player.name.clone();
        let (message, kind, effect) = match usage {
            Usage::Heal(amount) => {
                let healed = player.heal(amount);
                (
                    format!(
                        "{} uses {} and heals {} HP! ({}/{})",
                        name, item.name, healed, player.hp_current, player.hp_max
                    ),
                    LogKind::Heal,
                    format!("Healed {} HP", healed),
                )
            }
            Usage::CurePoison => {
                if player.remove_status_effect(&EffectKind::Poisoned) {
                    (
                        format!("{} uses {} and cures poison!", name, item.name),
                        LogKind::Heal,
                        "Poison cured".to_string(),
                    )
                } else {
                    (
                        format!("{} uses {} but is not poisoned.", name, item.name),
                        LogKind::Info,
                        "No poison to cure".to_string(),
                    )
                }
            }
        };
        self.log(message, kind);
        self.is_player_turn = false;
        Ok(ItemReport {
            item: item.name,
            effect,
        })
    }

    /// Try to escape: 50%, or 60% below half HP
    pub fn player_flee(&mut self, roller: &mut dyn Roller) -> Result<FleeReport, Rejection> {
        self.player_phase()?;
        let player = self.player();
        let name = player.name.clone();
        let mut flee_chance = BASE_FLEE_CHANCE;
        if player.hp_current < player.hp_max / 2 {
            flee_chance += WOUNDED_FLEE_BONUS;
        }
        let roll = roller.d100();
        let fled = roll <= flee_chance;

        if fled {
            self.combat_result = CombatResult::Fled;
            self.log(
                format!(
                    "{} successfully flees from combat! (Rolled {} vs {}%)",
                    name, roll, flee_chance
                ),
                LogKind::Result,
            );
            info!(encounter = %self.id, "party fled");
        } else {
            self.log(
                format!("{} tries to flee but fails! (Rolled {} vs {}%)", name, roll, flee_chance),
                LogKind::Info,
            );
            self.is_player_turn = false;
        }
        Ok(FleeReport {
            fled,
            roll,
            flee_chance,
        })
    }

    /// Run the monster phase.
    ///
    /// Each living monster ticks its effects, then acts unless it is
    /// paralyzed or stunned. The phase stops early once the encounter ends
    /// or the player has had to make a death save.
    pub fn monster_turn(&mut self, roller: &mut dyn Roller) -> Result<(), Rejection> {
        if self.is_over() {
            return Err(Rejection::CombatEnded);
        }
        if self.is_player_turn {
            return Err(Rejection::NotMonsterTurn);
        }

        for index in 0..self.monsters.len() {
            if !self.monsters[index].is_alive() {
                continue;
            }
            let monster = &mut self.monsters[index];
            monster.status_effects.tick();
            if let Some(effect) = monster.status_effects.disabling() {
                let message = format!("{} is {} and cannot act!", monster.name, effect);
                self.log(message, LogKind::Special);
                continue;
            }
            let healed = monster.apply_regeneration();
            if healed > 0 {
                let message = format!(
                    "{} regenerates {} HP! ({}/{})",
                    monster.name, healed, monster.hp_current, monster.hp_max
                );
                self.log(message, LogKind::Heal);
            }

            self.monster_attack(index, roller);

            let made_death_save = self.player().hp_current <= 0;
            self.check_combat_end(roller);
            if self.is_over() {
                break;
            }
            if made_death_save {
                let message = format!(
                    "{} narrowly survives! Monster attacks end for this turn.",
                    self.player().name
                );
                self.log(message, LogKind::Special);
                break;
            }
        }

        if !self.is_over() {
            self.turn_number += 1;
            self.is_player_turn = true;
            self.player_upkeep(roller);
        }
        Ok(())
    }

    fn monster_attack(&mut self, index: usize, roller: &mut dyn Roller) {
        let monster = &self.monsters[index];
        let monster_name = monster.name.clone();
        let abilities = monster.special_abilities;
        let player_name = self.player().name.clone();
        let player_ac = self.player().armor_class();
        let result = resolve_attack(
            monster.attack_bonus(),
            player_ac,
            monster.damage_dice(),
            0,
            roller,
        );

        if result.fumble {
            self.log(
                format!("{} fumbles the attack on {}! (rolled 1)", monster_name, player_name),
                LogKind::Attack,
            );
            return;
        }
        let Some(damage) = result.damage else {
            self.log(
                format!(
                    "{} attacks {} but misses! Rolls {}+{}={} vs AC {}",
                    monster_name,
                    player_name,
                    result.roll,
                    result.attack_bonus,
                    result.attack_total,
                    player_ac
                ),
                LogKind::Attack,
            );
            return;
        };

        let player = self.player_mut();
        let (dealt, dropped) = player.take_damage(damage);
        let message = if result.critical {
            format!(
                "{} scores a CRITICAL HIT on {}! Deals {} damage!",
                monster_name, player_name, dealt
            )
        } else {
            format!(
                "{} hits {}! Rolls {}+{}={} vs AC {}, deals {} damage! ({}/{} HP remaining)",
                monster_name,
                player_name,
                result.roll,
                result.attack_bonus,
                result.attack_total,
                player_ac,
                dealt,
                player.hp_current,
                player.hp_max
            )
        };
        self.log(message, LogKind::Attack);
        self.apply_special_effects(&abilities, roller);
        if dropped {
            self.log(format!("{} has been struck down!", player_name), LogKind::Result);
        }
    }

    /// Side effects of a landed monster hit. Poison, paralysis and disease
    /// each allow a TOU save; level drain does not.
    fn apply_special_effects(&mut self, abilities: &SpecialAbilities, roller: &mut dyn Roller) {
        let afflictions = [
            (
                abilities.poison,
                StatusEffect::dot(EffectKind::Poisoned, POISON_DURATION, POISON_DAMAGE),
                "is POISONED",
                "the poison",
            ),
            (
                abilities.paralyze,
                StatusEffect::new(EffectKind::Paralyzed, PARALYSIS_DURATION),
                "is PARALYZED",
                "the paralysis",
            ),
            (
                abilities.disease,
                StatusEffect::permanent(EffectKind::Diseased),
                "contracts a DISEASE",
                "the disease",
            ),
        ];

        for (present, effect, afflicted, resisted) in afflictions {
            if !present {
                continue;
            }
            let player = self.player_mut();
            let save = player.saving_throw(Attribute::Toughness, roller);
            let name = player.name.clone();
            let message = if save.success {
                format!(
                    "{} resists {}! (Rolled {}, needed {} or less)",
                    name, resisted, save.roll, save.target
                )
            } else {
                player.add_status_effect(effect);
                format!(
                    "{} {}! (Rolled {}, needed {} or less)",
                    name, afflicted, save.roll, save.target
                )
            };
            self.log(message, LogKind::Special);
        }

        if abilities.level_drain {
            let player = self.player_mut();
            player.hp_max = (player.hp_max - LEVEL_DRAIN).max(1);
            player.hp_current = player.hp_current.min(player.hp_max);
            player.touch();
            let message = format!(
                "{} feels their life essence draining away! (-{} max HP)",
                player.name, LEVEL_DRAIN
            );
            self.log(message, LogKind::Special);
        }
    }

    /// Tick the acting player's conditions at the end of the monster phase
    fn player_upkeep(&mut self, roller: &mut dyn Roller) {
        let player = self.player_mut();
        let damage = player.update_status_effects();
        if damage <= 0 {
            return;
        }
        let (dealt, dropped) = player.take_damage(damage);
        let message = format!(
            "{} suffers {} damage from lingering effects! ({}/{})",
            player.name, dealt, player.hp_current, player.hp_max
        );
        self.log(message, LogKind::Damage);
        if dropped {
            self.check_combat_end(roller);
        }
    }

    /// Settle the encounter if the player is down or every monster is dead.
    ///
    /// A player at 0 HP makes a death save first; a failed save is a defeat.
    /// Victory awards XP and rolls loot.
    pub fn check_combat_end(&mut self, roller: &mut dyn Roller) {
        if self.is_over() {
            return;
        }
        if self.player().hp_current <= 0 {
            let player = self.player_mut();
            let save = player.death_save(roller);
            let name = player.name.clone();
            if save.success {
                self.log(
                    format!(
                        "Death save SUCCESS! {} clings to life with 1 HP! (Rolled {}, needed {} or less)",
                        name, save.roll, save.target
                    ),
                    LogKind::Special,
                );
                self.log(
                    format!("{} survives and can continue fighting!", name),
                    LogKind::Result,
                );
            } else {
                self.log(
                    format!(
                        "Death save FAILED! {} is dying and will perish in 1 hour if not treated! (Rolled {}, needed {} or less)",
                        name, save.roll, save.target
                    ),
                    LogKind::Special,
                );
                self.combat_result = CombatResult::Defeat;
                self.log(
                    format!("{} has been defeated and is dying!", name),
                    LogKind::Result,
                );
                info!(encounter = %self.id, turn = self.turn_number, "party defeated");
                return;
            }
        }

        if self.monsters.iter().any(Monster::is_alive) {
            return;
        }
        self.combat_result = CombatResult::Victory;
        let message = format!("{} is victorious! All enemies defeated!", self.player().name);
        self.log(message, LogKind::Result);
        info!(encounter = %self.id, turn = self.turn_number, "party victorious");
        self.award_xp(roller);
        self.roll_all_loot(roller);
    }

    /// One XP per dead monster to every party member
    fn award_xp(&mut self, roller: &mut dyn Roller) {
        let xp = self.monsters.iter().filter(|m| !m.is_alive()).count() as u32;
        if xp == 0 {
            return;
        }
        let mut messages = Vec::new();
        for member in &mut self.party {
            let levels = member.gain_xp(xp, roller);
            member.encounters_defeated += 1;
            if levels.is_empty() {
                let to_next = member.xp_for_next_level().saturating_sub(member.xp_current);
                messages.push(format!(
                    "{} gained {} XP! ({} XP to next level)",
                    member.name, xp, to_next
                ));
            } else {
                for level in levels {
                    messages.push(format!(
                        "{} gained {} XP and reached LEVEL {}!",
                        member.name, xp, level
                    ));
                }
            }
        }
        for message in messages {
            self.log(message, LogKind::Result);
        }
    }

    fn roll_all_loot(&mut self, roller: &mut dyn Roller) {
        for monster in self.monsters.iter().filter(|m| !m.is_alive()) {
            self.loot.extend(roll_loot(monster, roller));
        }
        if self.loot.is_empty() {
            self.log("No loot found on the corpses.", LogKind::Info);
        } else {
            let summary = self.loot.iter().map(Loot::name).collect::<Vec<_>>().join(", ");
            self.log(format!("Loot found: {}", summary), LogKind::Result);
        }
    }

    /// Snapshot for clients: HP summaries, living monsters, the last ten log lines
    pub fn status(&self) -> CombatStatus {
        let start = self.combat_log.len().saturating_sub(STATUS_LOG_LINES);
        CombatStatus {
            id: self.id,
            turn_number: self.turn_number,
            is_player_turn: self.is_player_turn,
            combat_result: self.combat_result,
            is_over: self.is_over(),
            player: self.player().into(),
            party: self.party.iter().map(CombatantStatus::from).collect(),
            monsters: self
                .monsters
                .iter()
                .filter(|m| m.is_alive())
                .map(CombatantStatus::from)
                .collect(),
            combat_log: self.combat_log[start..].to_vec(),
            loot: self.loot.clone(),
        }
    }
}

//! Combat scenario tests
//!
//! Tests kills, victory rewards, death saves and fleeing

use delve::combat::Loot;
use delve::{CombatEncounter, CombatResult, DiceRoller, Monster, Rejection, ScriptedRoller};

use crate::common::{adventurer, brute, rat};

const TRIALS: u32 = 1000;

/// Test: A 1 HP monster dies to any damage and drops out of the target list
#[test]
fn test_one_hp_monster_dies() {
    let mut encounter = CombatEncounter::solo(adventurer("Ash"), vec![rat(1), rat(5)]);
    // 15 hits AC 10, damage 1
    let report = encounter
        .player_attack(0, &mut ScriptedRoller::new([15, 1]))
        .unwrap();

    assert!(report.target_killed);
    assert!(!encounter.monsters[0].is_alive());
    let alive = encounter.alive_monsters();
    assert_eq!(alive.len(), 1);
    assert_eq!(alive[0].hp_current, 5);
    assert_eq!(encounter.combat_result, CombatResult::InProgress);
    assert_eq!(encounter.status().monsters.len(), 1);
}

/// Test: Killing the last monster wins, grants 1 XP and rolls loot once
#[test]
fn test_single_hit_victory() {
    let mut encounter = CombatEncounter::solo(adventurer("Ash"), vec![rat(3)]);
    // hit 15, damage 3, loot: 61 skips the item, range roll 1 gives 5 silver
    let mut roller = ScriptedRoller::new([15, 3, 61, 1]);
    let report = encounter.player_attack(0, &mut roller).unwrap();

    assert!(report.attack.hit);
    assert!(!report.attack.critical);
    assert_eq!(report.damage_dealt, 3);
    assert_eq!(encounter.combat_result, CombatResult::Victory);
    assert_eq!(encounter.player().xp_current, 1);
    assert_eq!(encounter.player().encounters_defeated, 1);
    assert_eq!(roller.remaining(), 0);

    assert_eq!(encounter.loot.len(), 1);
    assert!(matches!(encounter.loot[0], Loot::Currency(_)));
    let loot_lines = encounter
        .combat_log
        .iter()
        .filter(|e| e.message.starts_with("Loot found"))
        .count();
    assert_eq!(loot_lines, 1);
}

/// Test: Every party member earns XP from a shared victory
#[test]
fn test_party_shares_xp() {
    let party = vec![adventurer("Ash"), adventurer("Bo")];
    let mut encounter = CombatEncounter::new(party, vec![rat(2), rat(2)]).unwrap();
    encounter.monsters[1].hp_current = 0;

    encounter
        .player_attack(0, &mut ScriptedRoller::new([15, 2]).with_fallback(100))
        .unwrap();

    assert_eq!(encounter.combat_result, CombatResult::Victory);
    for member in encounter.party() {
        assert_eq!(member.xp_current, 2);
    }
}

/// Test: A natural 20 always hits and doubles the damage dice
#[test]
fn test_critical_hit() {
    let golem = Monster::new("Stone Golem", "3", 50, "Fist 1d8", 30);
    let mut encounter = CombatEncounter::solo(adventurer("Ash"), vec![golem]);
    let mut roller = ScriptedRoller::new([20, 6, 6]);
    let report = encounter.player_attack(0, &mut roller).unwrap();

    assert!(report.attack.critical);
    assert!(report.attack.hit);
    assert_eq!(report.damage_dealt, 12);
    assert_eq!(encounter.monsters[0].hp_current, 18);
    assert_eq!(roller.remaining(), 0);
}

/// Test: A natural 1 always misses and rolls no damage
#[test]
fn test_fumble() {
    let sitting_duck = Monster::new("Slime", "1", 0, "Ooze", 4);
    let mut encounter = CombatEncounter::solo(adventurer("Ash"), vec![sitting_duck]);
    let mut roller = ScriptedRoller::new([1, 6]);
    let report = encounter.player_attack(0, &mut roller).unwrap();

    assert!(report.attack.fumble);
    assert!(!report.attack.hit);
    assert_eq!(encounter.monsters[0].hp_current, 4);
    assert_eq!(roller.consumed(), 1);
    assert!(!encounter.is_player_turn);
}

/// Test: Dropping to 0 HP with willpower 10 survives about half the time
#[test]
fn test_death_save_rate() {
    let mut roller = DiceRoller::seeded(1234);
    let mut downed = 0;
    let mut survived = 0;

    for _ in 0..TRIALS {
        let mut player = adventurer("Ash");
        player.hp_current = 1;
        let mut encounter = CombatEncounter::solo(player, vec![brute("Ogre", 20)]);
        encounter.is_player_turn = false;
        encounter.monster_turn(&mut roller).unwrap();

        let struck = encounter
            .combat_log
            .iter()
            .any(|e| e.message.ends_with("has been struck down!"));
        if !struck {
            continue;
        }
        downed += 1;
        match encounter.combat_result {
            CombatResult::InProgress => {
                survived += 1;
                assert_eq!(encounter.player().hp_current, 1);
                assert!(encounter.is_player_turn);
            }
            CombatResult::Defeat => assert!(encounter.player().is_dying),
            other => panic!("unexpected result {:?}", other),
        }
    }

    assert!(downed > 900, "only {} of {} trials reached 0 HP", downed, TRIALS);
    let rate = f64::from(survived) / f64::from(downed);
    assert!((0.43..=0.57).contains(&rate), "death save rate {}", rate);
}

/// Test: The death save is rolled once; a lost fight stays lost
#[test]
fn test_defeat_is_final() {
    let mut player = adventurer("Ash");
    player.hp_current = 1;
    let mut encounter = CombatEncounter::solo(player, vec![brute("Ogre", 20)]);
    encounter.is_player_turn = false;
    // hit, 3 damage, death save 15 fails against WIL 10
    encounter
        .monster_turn(&mut ScriptedRoller::new([10, 3, 15]))
        .unwrap();
    assert_eq!(encounter.combat_result, CombatResult::Defeat);

    let mut roller = ScriptedRoller::new([1, 1, 1]);
    encounter.check_combat_end(&mut roller);
    assert_eq!(encounter.combat_result, CombatResult::Defeat);
    assert_eq!(roller.consumed(), 0);
    assert_eq!(
        encounter.player_attack(0, &mut roller),
        Err(Rejection::CombatEnded)
    );
    assert!(encounter.player_flee(&mut roller).is_err());
    assert!(encounter.monster_turn(&mut roller).is_err());
    assert_eq!(roller.consumed(), 0);
}

/// Test: Fleeing below half HP succeeds about 60% of the time
#[test]
fn test_wounded_flee_rate() {
    let mut roller = DiceRoller::seeded(99);
    let mut fled = 0;
    for _ in 0..TRIALS {
        let mut player = adventurer("Ash");
        player.hp_current = 4;
        let mut encounter = CombatEncounter::solo(player, vec![rat(3)]);
        let report = encounter.player_flee(&mut roller).unwrap();
        assert_eq!(report.flee_chance, 60);
        if report.fled {
            fled += 1;
            assert_eq!(encounter.combat_result, CombatResult::Fled);
        } else {
            assert!(!encounter.is_player_turn);
        }
    }
    assert!((540..=660).contains(&fled), "fled {} of {}", fled, TRIALS);
}

/// Test: Exactly half HP is not wounded enough for the bonus
#[test]
fn test_flee_at_half_hp() {
    let mut player = adventurer("Ash");
    player.hp_current = 5;
    let mut encounter = CombatEncounter::solo(player, vec![rat(3)]);
    let report = encounter
        .player_flee(&mut ScriptedRoller::new([55]))
        .unwrap();
    assert_eq!(report.flee_chance, 50);
    assert!(!report.fled);
}

/// Test: Auto-played fights always end
#[test]
fn test_fights_terminate() {
    let mut roller = DiceRoller::seeded(42);
    for _ in 0..50 {
        let mut encounter =
            CombatEncounter::solo(adventurer("Ash"), vec![rat(4), rat(4), rat(4)]);
        let mut actions = 0;
        while !encounter.is_over() {
            if encounter.is_player_turn {
                encounter.player_attack(0, &mut roller).unwrap();
            } else {
                encounter.monster_turn(&mut roller).unwrap();
            }
            actions += 1;
            assert!(actions < 1000, "fight did not end");
        }
        assert!(encounter.combat_result.is_terminal());
        assert!(matches!(
            encounter.combat_result,
            CombatResult::Victory | CombatResult::Defeat
        ));
    }
}

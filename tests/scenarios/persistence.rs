//! Persistence scenario tests
//!
//! Tests saving and restoring dungeons, fights and snapshots mid-game

use delve::persist::SNAPSHOT_VERSION;
use delve::{CombatEncounter, DiceRoller, Dungeon, Player, Snapshot, SnapshotError};

use crate::common::{entered_dungeon, explore, rat, tables};

/// Test: A partly explored dungeon survives JSON and keeps generating identically
#[test]
fn test_dungeon_resumes_after_reload() {
    let (mut dungeon, mut roller) = entered_dungeon(8);
    explore(&mut dungeon, &mut roller, 3);

    let json = serde_json::to_string(&dungeon).unwrap();
    let mut restored = Dungeon::from_json(&json).unwrap();
    assert_eq!(restored, dungeon);

    // both copies continue with the same dice
    let mut left = DiceRoller::seeded(77);
    let mut right = DiceRoller::seeded(77);
    explore(&mut dungeon, &mut left, 10);
    explore(&mut restored, &mut right, 10);
    assert_eq!(restored, dungeon);
}

/// Test: Grid cells serialize under "x,y" keys with [x, y] door targets
#[test]
fn test_grid_wire_format() {
    let (mut dungeon, mut roller) = entered_dungeon(2);
    explore(&mut dungeon, &mut roller, 5);

    let value = serde_json::to_value(&dungeon).unwrap();
    let rooms = value["grid"]["rooms"].as_object().expect("rooms map");
    assert!(rooms.contains_key("0,0"));
    for (key, room) in rooms {
        let coords: Vec<i64> = key.split(',').map(|n| n.parse().unwrap()).collect();
        assert_eq!(room["x"].as_i64(), Some(coords[0]));
        assert_eq!(room["y"].as_i64(), Some(coords[1]));
        for door in room["doors"].as_object().unwrap().values() {
            assert_eq!(door["to_room"].as_array().unwrap().len(), 2);
            assert!(door["type"].is_string());
        }
    }
}

/// Test: An interrupted fight resumes from its saved state
#[test]
fn test_fight_resumes_after_reload() {
    let mut roller = DiceRoller::seeded(5);
    let mut encounter = CombatEncounter::solo(Player::new("Ash"), vec![rat(6), rat(6)]);
    encounter.player_attack(0, &mut roller).unwrap();

    let json = serde_json::to_string(&encounter).unwrap();
    let mut restored = CombatEncounter::from_json(&json).unwrap();
    assert_eq!(restored, encounter);

    let mut left = DiceRoller::seeded(6);
    let mut right = DiceRoller::seeded(6);
    if encounter.is_player_turn {
        encounter.player_attack(0, &mut left).unwrap();
        restored.player_attack(0, &mut right).unwrap();
    } else {
        encounter.monster_turn(&mut left).unwrap();
        restored.monster_turn(&mut right).unwrap();
    }
    assert_eq!(restored, encounter);
}

/// Test: A snapshot written to disk restores the whole session
#[test]
fn test_snapshot_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saves").join("session.json");

    let (mut dungeon, mut roller) = entered_dungeon(13);
    explore(&mut dungeon, &mut roller, 4);
    let player = Player::generate("Wren", &mut roller);
    let fight = CombatEncounter::solo(player.clone(), vec![rat(3)]);

    let snapshot = Snapshot::new(player)
        .with_dungeon(dungeon)
        .with_combat(fight);
    snapshot.save(&path).unwrap();

    let loaded = Snapshot::load(&path).unwrap();
    assert_eq!(loaded.version, SNAPSHOT_VERSION);
    assert_eq!(loaded, snapshot);

    let mut dungeon = loaded.dungeon.expect("dungeon saved");
    assert!(dungeon.entered);
    dungeon.advance(&mut roller, tables()).unwrap();
}

/// Test: Player-only snapshots omit the absent parts
#[test]
fn test_player_only_snapshot() {
    let snapshot = Snapshot::new(Player::new("Ash"));
    let json = snapshot.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.get("dungeon").is_none());
    assert!(value.get("combat").is_none());
    assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
}

/// Test: Garbage on disk is reported, not panicked on
#[test]
fn test_corrupt_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"version\": 1, \"player\": 3}").unwrap();
    assert!(matches!(
        Snapshot::load(&path),
        Err(SnapshotError::Json(_))
    ));
}

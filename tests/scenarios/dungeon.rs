//! Dungeon scenario tests
//!
//! Tests the entrance, walking the grid, and the room budget

use delve::dungeon::{Advance, DungeonError, RoomContents, RoomKind};
use delve::{generate_dungeon, DiceRoller, Direction, DungeonGrid, JsonTables, TableSource};

use crate::common::{entered_dungeon, explore, reachable, tables};

/// Test: A fresh grid holds only an explored entrance at the origin
#[test]
fn test_fresh_grid_entrance() {
    for seed in 0..30 {
        let mut roller = DiceRoller::seeded(seed);
        let grid = DungeonGrid::new(&mut roller);

        assert_eq!(grid.rooms_generated(), 1);
        assert_eq!(grid.rooms().count(), 1);
        assert_eq!(grid.player_pos(), grid.entrance_pos());

        let entrance = grid.room_at(grid.entrance_pos()).expect("entrance exists");
        assert_eq!(entrance.room_type, RoomKind::Entrance);
        assert!(entrance.explored);
        assert_eq!(entrance.contents, RoomContents::Entrance);
        assert!((1..=3).contains(&entrance.exits.len()));
        assert!(entrance.has_exit(Direction::North));
        let pattern = entrance.entrance_pattern.expect("pattern rolled");
        assert!((1..=6).contains(&pattern));
    }
}

/// Test: Every generated room can be reached from the entrance through doors
#[test]
fn test_exploration_stays_connected() {
    for seed in 0..25 {
        let (mut dungeon, mut roller) = entered_dungeon(seed);
        explore(&mut dungeon, &mut roller, 300);

        let grid = dungeon.grid.as_ref().expect("entered dungeon has a grid");
        let reached = reachable(grid);
        for room in grid.rooms() {
            assert!(
                reached.contains(&room.pos()),
                "seed {}: room at {} is unreachable",
                seed,
                room.pos()
            );
            assert!(room.explored);
        }
    }
}

/// Test: Doors are recorded on both sides of every connection
#[test]
fn test_doors_are_bidirectional() {
    for seed in 0..25 {
        let (mut dungeon, mut roller) = entered_dungeon(seed);
        explore(&mut dungeon, &mut roller, 300);

        let grid = dungeon.grid.as_ref().expect("grid");
        for room in grid.rooms() {
            for (direction, door) in &room.doors {
                assert_eq!(door.to_room, room.pos().step(*direction));
                let neighbour = grid.room_at(door.to_room).expect("door leads to a room");
                let back = neighbour
                    .door(direction.opposite())
                    .expect("door on the far side");
                assert_eq!(back.to_room, room.pos());
                assert_eq!(back.kind, door.kind);
            }
        }
    }
}

/// Test: No more rooms are generated than the dungeon's size allows
#[test]
fn test_room_budget_is_respected() {
    for seed in 0..25 {
        let (mut dungeon, mut roller) = entered_dungeon(seed);
        explore(&mut dungeon, &mut roller, 500);

        let grid = dungeon.grid.as_ref().expect("grid");
        assert!(grid.rooms_generated() <= dungeon.total_rooms.max(1));
        assert_eq!(grid.rooms().count() as u32, grid.rooms_generated());
        assert!(dungeon.current_room <= dungeon.total_rooms);
    }
}

/// Test: Only the entrance carries entrance contents
#[test]
fn test_generated_rooms_are_populated() {
    let (mut dungeon, mut roller) = entered_dungeon(7);
    explore(&mut dungeon, &mut roller, 200);

    let grid = dungeon.grid.as_ref().expect("grid");
    for room in grid.rooms() {
        let is_entrance = room.pos() == grid.entrance_pos();
        assert_eq!(room.contents == RoomContents::Entrance, is_entrance);
        assert_eq!(room.room_type == RoomKind::Entrance, is_entrance);
    }
}

/// Test: Walking to the end lets the dungeon be completed exactly once
#[test]
fn test_walk_to_completion() {
    let (mut dungeon, mut roller) = entered_dungeon(11);
    explore(&mut dungeon, &mut roller, 500);
    // dead ends can strand the walk before the budget is spent
    while dungeon.advance_room() {}

    assert_eq!(
        dungeon.advance(&mut roller, tables()).unwrap(),
        Advance::AtEnd
    );
    dungeon.complete().expect("every room visited");
    assert!(dungeon.completed);
    assert!(dungeon.complete().is_err());
}

/// Test: A dungeon without a grid records rolled rooms by number
#[test]
fn test_gridless_rooms() {
    let mut roller = DiceRoller::seeded(3);
    let mut dungeon = generate_dungeon(&mut roller, tables()).unwrap();
    assert!(dungeon.grid.is_none());

    for expected in 1..=dungeon.total_rooms {
        let room = dungeon.explore_legacy_room(&mut roller, tables()).unwrap();
        assert_eq!(room.room_number, expected);
        assert!(matches!(
            dungeon.advance(&mut roller, tables()).unwrap(),
            Advance::Counter { advanced: true }
        ));
    }
    assert_eq!(dungeon.explored_rooms.len() as u32, dungeon.total_rooms);
    assert_eq!(
        dungeon.advance(&mut roller, tables()).unwrap(),
        Advance::AtEnd
    );
}

/// Test: Table overrides flow through room generation
#[test]
fn test_overridden_tables() {
    let quiet = JsonTables::from_json(
        r#"{ "tables": {
            "room":     { "1": "Empty", "2": "Empty", "3": "Empty", "4": "Empty", "5": "Empty", "6": "Empty" },
            "corridor": { "1": "Empty", "2": "Empty", "3": "Empty", "4": "Empty", "5": "Empty", "6": "Empty" }
        } }"#,
    )
    .unwrap();

    let mut roller = DiceRoller::seeded(21);
    let mut dungeon = generate_dungeon(&mut roller, &quiet).unwrap();
    dungeon.enter(&mut roller);
    for _ in 0..100 {
        if dungeon.advance(&mut roller, &quiet).unwrap() == Advance::AtEnd {
            break;
        }
    }

    let grid = dungeon.grid.as_ref().unwrap();
    for room in grid.rooms().filter(|r| r.room_type != RoomKind::Entrance) {
        assert_eq!(room.contents, RoomContents::Empty);
        assert!(room.monsters.is_empty());
        assert!(room.treasure.is_empty());
    }
}

/// Test: A bad door roll leaves the grid untouched
#[test]
fn test_failed_move_is_atomic() {
    let barred = JsonTables::from_json(
        r#"{ "tables": { "door": { "1": "Barred", "2": "Barred", "3": "Barred",
                                   "4": "Barred", "5": "Barred", "6": "Barred" } } }"#,
    )
    .unwrap();
    let source: &dyn TableSource = &barred;

    let mut roller = DiceRoller::seeded(5);
    let mut dungeon = generate_dungeon(&mut roller, source).unwrap();
    dungeon.enter(&mut roller);
    let before = dungeon.clone();

    let err = dungeon
        .move_in_direction(Direction::North, &mut roller, source)
        .unwrap_err();
    assert!(matches!(err, DungeonError::UnknownDoor(_)));
    assert_eq!(dungeon, before);
}

//! Shared helpers for the scenario tests

use std::collections::{BTreeSet, VecDeque};

use delve::dungeon::Pos;
use delve::{generate_dungeon, BuiltinTables, DiceRoller, Dungeon, DungeonGrid, Monster, Player};

pub fn tables() -> &'static BuiltinTables {
    BuiltinTables::shared()
}

/// A level 1 adventurer with every attribute at 10 and 10 HP
pub fn adventurer(name: &str) -> Player {
    Player::new(name)
}

/// A monster that never misses a standing target except on a fumble
pub fn brute(name: &str, hp: i32) -> Monster {
    Monster::new(name, "1", 10, "Claw (+30) 1d6", hp)
}

/// A single-hit-die monster with AC 10
pub fn rat(hp: i32) -> Monster {
    Monster::new("Giant Rat", "0", 10, "Bite 1d4", hp)
}

/// Generate and enter a dungeon from a seed
pub fn entered_dungeon(seed: u64) -> (Dungeon, DiceRoller) {
    let mut roller = DiceRoller::seeded(seed);
    let mut dungeon = generate_dungeon(&mut roller, tables()).expect("dungeon generates");
    dungeon.enter(&mut roller);
    (dungeon, roller)
}

/// Walk the dungeon until it reports the end or `steps` run out
pub fn explore(dungeon: &mut Dungeon, roller: &mut DiceRoller, steps: u32) {
    for _ in 0..steps {
        if matches!(
            dungeon.advance(roller, tables()).expect("advance"),
            delve::dungeon::Advance::AtEnd
        ) {
            break;
        }
    }
}

/// Every cell reachable from the entrance by following doors
pub fn reachable(grid: &DungeonGrid) -> BTreeSet<Pos> {
    let mut seen = BTreeSet::from([grid.entrance_pos()]);
    let mut queue = VecDeque::from([grid.entrance_pos()]);
    while let Some(pos) = queue.pop_front() {
        let Some(room) = grid.room_at(pos) else {
            continue;
        };
        for door in room.doors.values() {
            if seen.insert(door.to_room) {
                queue.push_back(door.to_room);
            }
        }
    }
    seen
}

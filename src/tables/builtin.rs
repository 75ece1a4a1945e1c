//! Built-in dungeon table data

use std::collections::HashMap;
use std::sync::LazyLock;

use super::{DenizenEntry, DenizenSet, Table, TableError, TableName, TableSource};

type Rows = &'static [&'static str];

const THEME: Rows = &["Criminal", "Haunted", "Infested", "Unnatural", "Occult", "Monster"];
const DUNGEON_TYPE: Rows = &["Cave", "Crypt", "Temple", "Ruin", "Lair", "Hideout"];
const ADJECTIVE_1: Rows = &["Forgotten", "Hidden", "Haunted", "Shattered", "Dark", "Cursed"];
const ADJECTIVE_2: Rows = &["Many", "Desperate", "Shallow", "Frozen", "Infested", "Dying"];
const NOUN_1: Rows = &["Gods", "Veils", "Ravens", "Omens", "Portals", "Shadows"];
const NOUN_2: Rows = &["Stars", "Truths", "Deaths", "Depths", "Spirits", "Doom"];
const SIZE: Rows = &[
    "1d6+1 Rooms",
    "1d6+1 Rooms",
    "2d6+2 Rooms",
    "2d6+2 Rooms",
    "3d6+3 Rooms",
    "3d6+3 Rooms",
];
const SPECIAL_ROOMS_COUNT: Rows = &["1", "1", "2", "2", "3", "3"];
const CORRIDOR: Rows = &["Empty", "Empty", "Empty", "Spoor", "Danger", "Danger"];
const ROOM: Rows = &["Empty", "Spoor", "Discovery", "Discovery", "Danger", "Danger"];
const SPOOR: Rows = &["Blood", "Tracks", "Voices", "Odor", "Corpse", "Knocking"];
const DOOR: Rows = &["Unlocked", "Stuck", "Stuck", "Locked", "Locked", "Trapped"];
const DISCOVERY: Rows = &[
    "Special Room",
    "Special Room",
    "Feature",
    "Item",
    "Treasure A",
    "Treasure B",
];
const SPECIAL_ROOM_1: Rows = &["Shrine", "Library", "Crypt", "Trophy", "Workshop", "Laboratory"];
const SPECIAL_ROOM_2: Rows = &["Archive", "Weapon", "Ritual", "Torture", "Kitchen", "Throne"];
const FEATURE: Rows = &["Pool", "Garden", "River", "Obelisk", "Lever", "Mist"];
const ITEM: Rows = &["Key", "Torch", "Junk", "Tools", "Weapon", "Food"];
const TREASURE_A: Rows = &["Weapon", "3d6 Gold", "d6 Gems", "Potion", "Artifact", "Scroll"];
const TREASURE_B: Rows = &["Artifact", "d100 Silver", "3d6x100 Gold", "d20 Gems", "Ring", "Potion"];
const DANGER: Rows = &[
    "Hazard",
    "Trap",
    "Encounter",
    "Monster (T1)",
    "Monster (T1)",
    "Monster (T2)",
];
const HAZARD: Rows = &["Debris", "Collapse", "Vapor", "Resources", "Toxin", "Darkness"];
const TRAP: Rows = &["Pit", "Dart", "Spike", "Pendulum", "Boulder", "Acid"];
const REACTION: Rows = &["Helpful", "Indifferent", "Rude", "Hostile", "Hostile", "Hostile"];
const DRESSING_NATURAL: Rows = &["Dung", "Moss", "Dust", "Crystal", "Oil", "Mold"];
const DRESSING_MAN_MADE: Rows = &["Tapestry", "Graffiti", "Furniture", "Mirror", "Statue", "Fireplace"];
const DRESSING_LIGHTING: Rows = &["None", "Candles", "Sconces", "Glow", "Torches", "Lamps"];
const DRESSING_ODOR: Rows = &["Dung", "Urine", "Sweat", "Smoke", "Dust", "Food"];
const DRESSING_ODD: Rows = &[
    "Talking corpse",
    "Hazy orb",
    "Singing flies",
    "Creature egg",
    "Helpful ghost",
    "Glowing tree",
];
const DRESSING_MYSTICAL: Rows = &[
    "Hovering flame",
    "Silver pool",
    "Metal orb",
    "Glowing portal",
    "Ritual marks",
    "Bloody altar",
];
const DESTRUCTION: Rows = &["Curse", "Invasion", "Lich", "Environment", "Infestation", "Plague"];
const BUILDER: Rows = &["Wizard", "Cult", "Man", "Humanoid", "Monster", "God"];
const PURPOSE: Rows = &["Mine", "Portal", "Crypt", "Hideout", "Prison", "Temple"];

/// Keyed 2-12
const DUNGEON_ENCOUNTERS: Rows = &[
    "An altar: [1-2] with drops of fresh blood [3-4] lid shakes and rattles from inside [5-6] emits a clanging alarm sound if touched",
    "A pool: [1-2] heals d6 HP if sipped from [3-4] causes d4 poison damage if sipped [5-6] grants +1 to melee weapons washed within for 1 day",
    "Glowing fungus: [1-2] that replenishes 1 HP [3-4] that explodes when crushed (d6 dmg) [5-6] that makes a great lantern",
    "A man locked in a cage: [1-2] who swears he is a prophet [3-4] swears he can cast heal (false) [5-6] swears he can cast heal (true)",
    "An adventurer's corpse [1-2] is rigged with a trap (d8 dmg) [3-4] has a purse with d20 coins [5-6] has a magical cloak (causes shadow camouflage)",
    "Two creatures: [1-2] toss something between them as a game [3-4] argue over which should receive an item between them [5-6] are fighting another two creatures",
    "A creature sleeps: [1-2] draped over a chest [3-4] in a doorway [5-6] atop a sarcophagus",
    "A lost merchant: [1-2] is catatonic in the corner [3-4] pleads for your help [5-6] attacks in a fit of total madness",
    "Centipedes: [1-2] eat the carcass of a creature [3-4] surround an NPC in a corner [5-6] peck through the remains of an adventurer and their gear",
    "1d4 Adventurers: [1-2] are fighting a Tier 1 Unnatural [3-4] are trying to disarm a trap [5-6] are arguing about whether to open a treasure chest",
    "A large egg: [1-2] emanates warmth and a soft glow [3-4] begins to crack, and the snout of some reptile is beginning to emerge [5-6] is cracked open, with a trail of blood and slime leading out of the room",
];

/// (name, hd, ac, attack), keyed 2-12
type Stats = &'static [(&'static str, &'static str, i32, &'static str)];

const TIER_1_LOW: Stats = &[
    ("Acolyte", "1", 16, "Wpn"),
    ("Centipede", "1d2HP", 10, "Bite, Poison"),
    ("Giant Rat", "1-1", 12, "Bite, Disease"),
    ("Giant Rat", "1-1", 12, "Bite, Disease"),
    ("Spider", "2+2", 13, "Bite, Poison, Web"),
    ("Kobold", "1/2", 13, "Weapon"),
    ("Skeleton", "1/2", 11, "Wpn"),
    ("Skeleton", "1/2", 11, "Wpn"),
    ("Bandit", "1", 12, "Wpn"),
    ("Bandit", "1", 12, "Wpn"),
    ("Giant Rat", "1-1", 12, "Bite, Disease"),
];

const TIER_1_MID: Stats = &[
    ("Giant Bat", "4", 12, "Bite, Disease(50%)"),
    ("Ghoul", "2", 13, "Claw, Paralyze"),
    ("Carrion Creeper", "3", 14, "Bite(1), Paralyze"),
    ("Spider", "2+2", 13, "Bite, Poison, Web"),
    ("Spider", "2+2", 13, "Bite, Poison, Web"),
    ("Zombie", "1", 12, "Wpn & Shield"),
    ("Giant Bat", "4", 12, "Bite, Disease(50%)"),
    ("Lizardman", "2+1", 14, "Sword"),
    ("Lizardman", "2+1", 14, "Sword"),
    ("Bandit", "1", 12, "Wpn"),
    ("Bandit", "1", 12, "Wpn"),
];

const TIER_1_HIGH: Stats = &[
    ("Ghoul", "2", 13, "Claw, Paralyze"),
    ("Demon", "3", 16, "Tail Sting, Immune Wpn"),
    ("Bugbear", "3+1", 14, "Wpn or Bite"),
    ("Grey Ooze", "3", 11, "Strike, Imn. Magic/Steel"),
    ("Demon", "3", 16, "Tail Sting, Imn. Wpn"),
    ("Giant Centipede", "4", 19, "Bite, Poison"),
    ("Gargoyle", "4", 14, "Claw, Fly"),
    ("Giant Skeleton", "2", 12, "Wpn"),
    ("Minotaur", "6+4", 13, "Wpn(+1)"),
    ("Troll", "6+3", 15, "Claw(+2), Regeneration"),
    ("Hell Hound", "5", 15, "Bite, Fire(2HP/Rnd.)"),
];

const TIER_2_LOW: Stats = &[
    ("Lizardman", "2+1", 14, "Sword"),
    ("Lizardman", "2+1", 14, "Sword"),
    ("Bandit", "1", 12, "Wpn"),
    ("Bandit", "1", 12, "Wpn"),
    ("Ghoul", "2", 13, "Claw, Paralyze"),
    ("Demon", "3", 16, "Tail Sting, Immune Wpn"),
    ("Bugbear", "3+1", 14, "Wpn or Bite"),
    ("Grey Ooze", "3", 11, "Strike, Imn. Magic/Steel"),
    ("Demon", "3", 16, "Tail Sting, Imn. Wpn"),
    ("Giant Centipede", "4", 19, "Bite, Poison"),
    ("Gargoyle", "4", 14, "Claw, Fly"),
];

const TIER_2_HIGH: Stats = &[
    ("Giant Skeleton", "2", 12, "Wpn"),
    ("Minotaur", "6+4", 13, "Wpn(+1)"),
    ("Troll", "6+3", 15, "Claw(+2), Regeneration"),
    ("Hell Hound", "5", 15, "Bite, Fire(2HP/Rnd.)"),
    ("Vampire", "7-9", 17, "Bite, Imn. Wpn, Regen."),
    ("Vampire", "7-9", 17, "Bite, Imn. Wpn, Regen."),
    ("Death Knight", "10", 20, "Sword(+3), Imn. Wpn"),
    ("Minotaur", "6+4", 13, "Wpn(+1)"),
    ("Troll", "6+3", 15, "Claw(+2), Regeneration"),
    ("Hell Hound", "5", 15, "Bite, Fire(2HP/Rnd.)"),
    ("Vampire", "7-9", 17, "Bite, Imn. Wpn, Regen."),
];

static BUILTIN: LazyLock<BuiltinTables> = LazyLock::new(BuiltinTables::build);

/// The static table set shipped with the engine
#[derive(Debug, Clone)]
pub struct BuiltinTables {
    tables: HashMap<TableName, Table<String>>,
    denizens: HashMap<DenizenSet, Table<DenizenEntry>>,
}

impl BuiltinTables {
    /// Shared instance, built on first use
    pub fn shared() -> &'static BuiltinTables {
        &BUILTIN
    }

    fn build() -> Self {
        let tables = TableName::ALL
            .iter()
            .map(|&name| (name, string_table(name)))
            .collect();
        let denizens = DenizenSet::ALL
            .iter()
            .map(|&set| (set, denizen_table(set)))
            .collect();
        Self { tables, denizens }
    }
}

fn rows_for(name: TableName) -> Rows {
    match name {
        TableName::Theme => THEME,
        TableName::DungeonType => DUNGEON_TYPE,
        TableName::Adjective1 => ADJECTIVE_1,
        TableName::Adjective2 => ADJECTIVE_2,
        TableName::Noun1 => NOUN_1,
        TableName::Noun2 => NOUN_2,
        TableName::Size => SIZE,
        TableName::SpecialRoomsCount => SPECIAL_ROOMS_COUNT,
        TableName::Corridor => CORRIDOR,
        TableName::Room => ROOM,
        TableName::Spoor => SPOOR,
        TableName::Door => DOOR,
        TableName::Discovery => DISCOVERY,
        TableName::SpecialRoom1 => SPECIAL_ROOM_1,
        TableName::SpecialRoom2 => SPECIAL_ROOM_2,
        TableName::Feature => FEATURE,
        TableName::Item => ITEM,
        TableName::TreasureA => TREASURE_A,
        TableName::TreasureB => TREASURE_B,
        TableName::Danger => DANGER,
        TableName::Hazard => HAZARD,
        TableName::Trap => TRAP,
        TableName::Reaction => REACTION,
        TableName::DressingNatural => DRESSING_NATURAL,
        TableName::DressingManMade => DRESSING_MAN_MADE,
        TableName::DressingLighting => DRESSING_LIGHTING,
        TableName::DressingOdor => DRESSING_ODOR,
        TableName::DressingOdd => DRESSING_ODD,
        TableName::DressingMystical => DRESSING_MYSTICAL,
        TableName::Destruction => DESTRUCTION,
        TableName::Builder => BUILDER,
        TableName::Purpose => PURPOSE,
        TableName::DungeonEncounters => DUNGEON_ENCOUNTERS,
    }
}

fn string_table(name: TableName) -> Table<String> {
    let rows = rows_for(name);
    // 2d6 tables start at 2
    let first = if name == TableName::DungeonEncounters { 2 } else { 1 };
    rows.iter()
        .enumerate()
        .map(|(i, row)| (first + i as u32, row.to_string()))
        .collect()
}

fn denizen_table(set: DenizenSet) -> Table<DenizenEntry> {
    let rows = match set {
        DenizenSet::Tier1Low => TIER_1_LOW,
        DenizenSet::Tier1Mid => TIER_1_MID,
        DenizenSet::Tier1High => TIER_1_HIGH,
        DenizenSet::Tier2Low => TIER_2_LOW,
        DenizenSet::Tier2High => TIER_2_HIGH,
    };
    rows.iter()
        .enumerate()
        .map(|(i, &(name, hd, ac, attack))| (2 + i as u32, DenizenEntry::new(name, hd, ac, attack)))
        .collect()
}

impl TableSource for BuiltinTables {
    fn table(&self, name: TableName) -> Result<&Table<String>, TableError> {
        self.tables
            .get(&name)
            .ok_or_else(|| TableError::Unknown(name.to_string()))
    }

    fn denizens(&self, set: DenizenSet) -> Result<&Table<DenizenEntry>, TableError> {
        self.denizens
            .get(&set)
            .ok_or_else(|| TableError::Unknown(set.to_string()))
    }
}

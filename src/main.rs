//! delve - generate dungeons and play out fights from the command line

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delve::dungeon::{Advance, RoomContents};
use delve::items::ItemGenerator;
use delve::tables::DenizenSet;
use delve::{
    generate_dungeon, BuiltinTables, CombatEncounter, Config, DiceRoller, JsonTables, LogFormat,
    Monster, Player, Roller, Snapshot, TableName, TableSource,
};

/// Rounds after which an auto-played fight is abandoned
const MAX_ROUNDS: u32 = 200;

/// Tabletop dungeon crawl engine
#[derive(Parser, Debug)]
#[command(name = "delve", version, about = "Generate dungeons and run fights")]
struct Cli {
    /// Config file (defaults to delve.toml in the working directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible rolls
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dungeon and walk it
    Dungeon {
        /// Maximum moves to make
        #[arg(long, default_value_t = 20)]
        steps: u32,
        /// Only list the rooms at the end
        #[arg(long)]
        rooms_only: bool,
        /// Print the dungeon as JSON
        #[arg(long)]
        json: bool,
        /// Write a snapshot to the snapshot directory
        #[arg(long)]
        save: bool,
    },
    /// Auto-play a fight against denizens of the configured tier
    Fight {
        #[arg(long, default_value_t = 1)]
        monsters: u32,
    },
    /// Roll once on a table, or list the tables
    Tables { name: Option<String> },
    /// Summarize a saved snapshot
    Show { path: PathBuf },
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_filter.clone().into());
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .init();
}

fn load_tables(config: &Config) -> Result<Box<dyn TableSource>> {
    match &config.tables {
        Some(path) => {
            let tables = JsonTables::load(path)
                .with_context(|| format!("Failed to load tables from {}", path.display()))?;
            Ok(Box::new(tables))
        }
        None => Ok(Box::new(BuiltinTables::shared())),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.json_logs {
        config.log_format = LogFormat::Json;
    }
    init_tracing(&config);

    let tables = load_tables(&config)?;
    let mut roller = DiceRoller::from_seed(config.seed);
    info!(seed = ?config.seed, tier = config.tier, "starting");

    match cli.command {
        Command::Dungeon {
            steps,
            rooms_only,
            json,
            save,
        } => run_dungeon(&config, tables.as_ref(), &mut roller, steps, rooms_only, json, save),
        Command::Fight { monsters } => run_fight(&config, tables.as_ref(), &mut roller, monsters),
        Command::Tables { name } => run_tables(tables.as_ref(), &mut roller, name),
        Command::Show { path } => show_snapshot(&path),
    }
}

fn run_dungeon(
    config: &Config,
    tables: &dyn TableSource,
    roller: &mut dyn Roller,
    steps: u32,
    rooms_only: bool,
    json: bool,
    save: bool,
) -> Result<()> {
    let mut dungeon = generate_dungeon(roller, tables)?;
    dungeon.enter(roller);

    if !json && !rooms_only {
        println!("{}", dungeon.name);
        println!(
            "Built by {} as a {}, ruined by {}. {} ({} rooms)\n",
            dungeon.builder, dungeon.purpose, dungeon.destruction, dungeon.size, dungeon.total_rooms
        );
        println!("{}\n", dungeon.room_description());
    }

    for _ in 0..steps {
        match dungeon.advance(roller, tables)? {
            Advance::AtEnd => break,
            Advance::Moved { direction } => {
                if !json && !rooms_only {
                    println!("--- You go {} ---", direction);
                    println!("{}\n", dungeon.room_description());
                }
            }
            Advance::Counter { .. } => {}
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&dungeon)?);
    } else if let Some(grid) = &dungeon.grid {
        println!(
            "Explored {} of {} rooms:",
            grid.rooms_generated(),
            dungeon.total_rooms
        );
        for room in grid.rooms() {
            let mut line = format!(
                "  {} {:?}: {}",
                room.pos(),
                room.room_type,
                room.contents.label()
            );
            if room.is_special {
                line.push_str(" [special]");
            }
            if let RoomContents::Danger { .. } = room.contents {
                let alive = room.alive_monsters().count();
                if alive > 0 {
                    line.push_str(&format!(" ({} monsters)", alive));
                }
            }
            println!("{}", line);
        }
    }

    if save {
        let player = Player::generate("Adventurer", roller);
        let path = config
            .snapshot_dir
            .join(format!("{}.json", chrono::Utc::now().format("%Y%m%d-%H%M%S")));
        Snapshot::new(player).with_dungeon(dungeon).save(&path)?;
        eprintln!("Saved {}", path.display());
    }
    Ok(())
}

fn run_fight(
    config: &Config,
    tables: &dyn TableSource,
    roller: &mut dyn Roller,
    count: u32,
) -> Result<()> {
    if count == 0 {
        bail!("A fight needs at least one monster");
    }
    let tier = config.tier.max(1);

    let mut player = Player::generate("Adventurer", roller);
    let weapon = ItemGenerator::new(roller).weapon(tier, None);
    if let Err(weapon) = player.equip(weapon) {
        player.inventory.push(weapon);
    }

    let mut monsters = Vec::new();
    for n in 1..=count {
        let set = DenizenSet::select(tier, roller);
        let entry = tables.roll_denizen(set, roller)?;
        let mut monster = Monster::spawn(entry, tier, roller);
        if count > 1 {
            monster.name = format!("{} #{}", monster.name, n);
        }
        monsters.push(monster);
    }

    let mut encounter = CombatEncounter::solo(player, monsters);
    let mut printed = print_log(&encounter, 0);
    while !encounter.is_over() && encounter.turn_number < MAX_ROUNDS {
        if encounter.is_player_turn {
            if encounter.player_attack(0, roller).is_err() {
                break;
            }
        } else if encounter.monster_turn(roller).is_err() {
            break;
        }
        printed = print_log(&encounter, printed);
    }

    let status = encounter.status();
    println!(
        "\nResult: {:?} after {} turns. {} at {}/{} HP.",
        status.combat_result,
        status.turn_number,
        status.player.name,
        status.player.hp_current,
        status.player.hp_max
    );
    for loot in &status.loot {
        println!("  Loot: {}", loot.name());
    }
    Ok(())
}

/// Print log lines from `from` on, returning the new high-water mark
fn print_log(encounter: &CombatEncounter, from: usize) -> usize {
    for entry in encounter.combat_log.iter().skip(from) {
        println!("[{:>3}] {}", entry.turn, entry.message);
    }
    encounter.combat_log.len()
}

fn run_tables(tables: &dyn TableSource, roller: &mut dyn Roller, name: Option<String>) -> Result<()> {
    let Some(name) = name else {
        for table in TableName::ALL {
            println!("{}", table);
        }
        return Ok(());
    };
    let table: TableName = name.parse()?;
    println!("{}: {}", table, tables.roll(table, roller)?);
    Ok(())
}

fn show_snapshot(path: &Path) -> Result<()> {
    let snapshot = Snapshot::load(path)?;
    let player = &snapshot.player;
    println!(
        "{} (level {}, {}/{} HP) saved {}",
        player.name, player.level, player.hp_current, player.hp_max, snapshot.saved_at
    );
    if let Some(dungeon) = &snapshot.dungeon {
        println!(
            "In {}: room {} of {}{}",
            dungeon.name,
            dungeon.current_room,
            dungeon.total_rooms,
            if dungeon.completed { " (completed)" } else { "" }
        );
    }
    if let Some(combat) = &snapshot.combat {
        println!(
            "Fighting {} monster(s), {:?}",
            combat.alive_monsters().len(),
            combat.combat_result
        );
    }
    Ok(())
}

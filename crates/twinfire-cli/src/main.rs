//! Headless Twinfire match runner.
//!
//! Loads a configuration, spawns a fleet, lets two autopilots fight it for a
//! fixed number of ticks and prints the final scores.
//!
//! Usage:
//!   twinfire --mode coop --ticks 3600 --boss 1200
//!   RUST_LOG=twinfire_core=debug twinfire --config match.json --save end.json

mod autopilot;
mod sink;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twinfire_core::config::{CombatConfig, Difficulty, GameMode};
use twinfire_core::entity::components::PickupKind;
use twinfire_core::entity::PlayerId;
use twinfire_core::sink::dispatch;
use twinfire_core::simulation::Simulation;

use crate::autopilot::Autopilot;
use crate::sink::LogSink;

/// Ticks between mystery pickups dropped into the field.
const PICKUP_INTERVAL: u64 = 900;

#[derive(Parser, Debug)]
#[command(name = "twinfire")]
#[command(about = "Run a scripted Twinfire match without a screen")]
struct Args {
    /// JSON configuration file; missing fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Rule variant, overriding the configuration file
    #[arg(long, value_enum)]
    mode: Option<CliMode>,
    /// Difficulty, overriding the configuration file
    #[arg(long, value_enum)]
    difficulty: Option<CliDifficulty>,
    /// Level, overriding the configuration file
    #[arg(long)]
    level: Option<u32>,
    /// Match RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Ticks to run unless the match ends first
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Fleet rows per wave
    #[arg(long, default_value_t = 4)]
    rows: u32,
    /// Fleet columns per wave
    #[arg(long, default_value_t = 8)]
    cols: u32,
    /// Tick on which a boss enters
    #[arg(long)]
    boss: Option<u64>,
    /// Write a snapshot of the final state to this path
    #[arg(long)]
    save: Option<PathBuf>,
    /// Log resolution decisions (debug level) unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliMode {
    Coop,
    Versus,
    SingleLife,
    LimitedAmmo,
}

impl From<CliMode> for GameMode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Coop => GameMode::Coop,
            CliMode::Versus => GameMode::Versus,
            CliMode::SingleLife => GameMode::SingleLife,
            CliMode::LimitedAmmo => GameMode::LimitedAmmo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliDifficulty {
    Easy,
    Normal,
    Hard,
}

impl From<CliDifficulty> for Difficulty {
    fn from(value: CliDifficulty) -> Self {
        match value {
            CliDifficulty::Easy => Difficulty::Easy,
            CliDifficulty::Normal => Difficulty::Normal,
            CliDifficulty::Hard => Difficulty::Hard,
        }
    }
}

fn load_config(args: &Args) -> Result<CombatConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            CombatConfig::from_json(&json)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => CombatConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty.into();
    }
    if let Some(level) = args.level {
        config.level = level;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&args)?;
    let mut sim = Simulation::new(config, args.seed).context("failed to create match")?;
    let pilots = [Autopilot::new(PlayerId::One), Autopilot::new(PlayerId::Two)];
    let mut sink = LogSink::default();

    let mut waves = 0;
    for _ in 0..args.ticks {
        let tick = sim.tick();
        if sim.aliens().is_empty() && !sim.config().mode.is_versus() {
            waves += 1;
            sim.spawn_fleet(args.rows, args.cols);
            info!(tick, wave = waves, "wave spawned");
        }
        if args.boss == Some(tick) {
            let width = sim.config().field.width;
            let size = sim.config().boss.size;
            sim.spawn_boss(Vec2::new((width - size.x) * 0.5, 20.0));
        }
        if tick > 0 && tick % PICKUP_INTERVAL == 0 {
            let width = sim.config().field.width;
            sim.spawn_pickup(PickupKind::Mystery, Vec2::new(width * 0.5, 0.0), Vec2::new(0.0, 2.0));
        }

        for pilot in &pilots {
            pilot.drive(&mut sim);
        }
        let events = sim.step();
        dispatch(&events, &mut sink);

        if sim.is_over() {
            break;
        }
    }

    let scores = sim.scores();
    println!();
    println!("=== MATCH SUMMARY ===");
    println!("  Mode:       {:?}", sim.config().mode);
    println!("  Seed:       {}", sim.seed());
    println!("  Ticks:      {}", sim.tick());
    println!("  Waves:      {waves}");
    for player in PlayerId::ALL {
        println!(
            "  {player}:         score {:>6}  health {}  hits taken {}",
            scores.score(player),
            scores.health(player),
            sink.ship_hits[player.index()],
        );
    }
    println!("  High score: {}", scores.high_score());
    println!("  Destroyed:  {} aliens", sink.aliens_destroyed);
    println!("  Breaches:   {}", sink.breaches);
    println!("  Absorbed:   {}", sink.absorbed);
    println!("  Effects:    {} sounds, {} explosions", sink.sounds, sink.explosions);
    println!("  Over:       {}", sim.is_over());

    if let Some(path) = &args.save {
        let snapshot = sim.save().context("failed to serialize match")?;
        fs::write(path, snapshot)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("  Saved:      {}", path.display());
    }

    Ok(())
}

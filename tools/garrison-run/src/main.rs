//! garrison-run: play a canned scenario headless and report what the bot's
//! squads did.
//!
//! Usage:
//!   garrison-run --scenario skirmish --ticks 400
//!   garrison-run --scenario air-raid --seed 7 --config squads.toml --json > run.jsonl
//!
//! Log verbosity follows `RUST_LOG` (e.g. `RUST_LOG=garrison_squad=debug`).

use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use garrison_core::config::SquadManagerConfig;
use garrison_core::events::SquadEvent;
use garrison_sim::scenario::{self, ScenarioId};
use garrison_sim::{SimConfig, SimulationEngine};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    Skirmish,
    AirRaid,
    Ambush,
}

impl From<Scenario> for ScenarioId {
    fn from(s: Scenario) -> Self {
        match s {
            Scenario::Skirmish => ScenarioId::Skirmish,
            Scenario::AirRaid => ScenarioId::AirRaid,
            Scenario::Ambush => ScenarioId::Ambush,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "garrison-run", about = "Run a squad protection scenario headless")]
struct Args {
    #[arg(long, value_enum, default_value_t = Scenario::Skirmish)]
    scenario: Scenario,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 400)]
    ticks: u64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Squad manager tuning (TOML). Defaults apply to missing keys.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print every snapshot as one JSON line instead of a summary.
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let squad = match &args.config {
        Some(path) => match SquadManagerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), "config rejected: {e}");
                process::exit(1);
            }
        },
        None => SquadManagerConfig::default(),
    };

    let mut engine = SimulationEngine::new(SimConfig {
        seed: args.seed,
        squad,
        ..Default::default()
    });
    let id = ScenarioId::from(args.scenario);
    let units = scenario::load(&mut engine, id);
    info!(
        scenario = id.name(),
        seed = args.seed,
        defenders = units.defenders.len(),
        attackers = units.attackers.len(),
        "scenario loaded"
    );

    let mut orders = 0usize;
    for _ in 0..args.ticks {
        let snap = engine.tick();
        orders += snap.orders.len();

        if args.json {
            match serde_json::to_string(&snap) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    error!("snapshot serialization failed: {e}");
                    process::exit(1);
                }
            }
            continue;
        }

        for event in &snap.events {
            println!("[{:>5}] {}", snap.time.tick, describe(event));
        }
    }

    if !args.json {
        let live = engine.squad_manager().squads().count();
        println!(
            "{} ticks, {orders} orders issued, {live} squad(s) still active",
            engine.time().tick
        );
    }
}

fn describe(event: &SquadEvent) -> String {
    match event {
        SquadEvent::Formed { squad, kind, target } => match target {
            Some(target) => format!("squad {squad} formed ({kind:?}) against {target}"),
            None => format!("squad {squad} formed ({kind:?})"),
        },
        SquadEvent::MembersAdded { squad, units } => {
            let ids: Vec<String> = units.iter().map(|u| u.to_string()).collect();
            format!("squad {squad} drafted {}", ids.join(", "))
        }
        SquadEvent::StateChanged { squad, from, to } => {
            format!("squad {squad}: {from:?} -> {to:?}")
        }
        SquadEvent::Dissolved { squad } => format!("squad {squad} dissolved"),
    }
}

//! Tamagotchi Sim - Entry Point
//!
//! Terminal front-end for the pet simulation. Pets decay on real one-second
//! timers while the prompt waits for input; decay-driven departures are
//! printed as they happen.

use std::io::{self, Write};
use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

use tamagotchi_sim::core::config::SimulationConfig;
use tamagotchi_sim::core::error::Result;
use tamagotchi_sim::entity::{Action, PetView};
use tamagotchi_sim::naming::{NamePool, NameSource, RandomUserClient};
use tamagotchi_sim::simulation::{Simulation, TokioScheduler};

/// Keep a handful of virtual pets alive from the terminal
#[derive(Parser, Debug)]
#[command(name = "tamagotchi")]
#[command(about = "Keep up to four virtual pets alive from the terminal")]
struct Args {
    /// TOML config file (missing keys use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the roster capacity
    #[arg(long)]
    capacity: Option<usize>,

    /// Random seed for species (and offline names)
    #[arg(long)]
    seed: Option<u64>,

    /// Use the built-in name pool instead of randomuser.me
    #[arg(long)]
    offline: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they don't tear up the roster display
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tamagotchi_sim=info")),
        )
        .init();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    // Pet timers are !Send and live on a LocalSet
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = LocalSet::new();
    local.block_on(&rt, run(config, args.offline))
}

async fn run(config: SimulationConfig, offline: bool) -> Result<()> {
    let names = name_source(&config, offline);
    let sim = Simulation::new(config, Rc::new(TokioScheduler), names)?;

    sim.on_decay_evicted(|departures| {
        println!();
        for departure in departures {
            println!("  {}", departure.message());
        }
    });

    tracing::info!("Tamagotchi Sim starting...");
    println!("\n=== TAMAGOTCHI ===");
    print_help(sim.capacity());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Help => print_help(sim.capacity()),
            Command::Status => display_status(&sim.snapshot()),
            Command::Json => println!("{}", serde_json::to_string_pretty(&sim.snapshot())?),
            Command::New => match sim.create_pet().await {
                Ok(id) => {
                    if let Some(pet) = sim.pet(id) {
                        println!("{} the {} has arrived!", pet.name, pet.species);
                    }
                    display_status(&sim.snapshot());
                }
                Err(e) => println!("{}", e),
            },
            Command::Act(action, position) => {
                let Some(id) = position.checked_sub(1).and_then(|i| sim.pet_at(i)) else {
                    println!("No pet #{}", position);
                    continue;
                };
                let name = sim.pet(id).map(|p| p.name).unwrap_or_default();

                let departures = sim.apply_action(id, action)?;
                println!("{}", action.activity_message(&name));
                for departure in &departures {
                    println!("  {}", departure.message());
                }
                display_status(&sim.snapshot());
            }
            Command::Restart => {
                sim.restart();
                println!("Game restarted.");
            }
        }
    }

    println!("\nGoodbye! {} pet(s) still waiting for you.", sim.len());
    Ok(())
}

fn name_source(config: &SimulationConfig, offline: bool) -> Box<dyn NameSource> {
    if offline {
        return Box::new(NamePool::new(config.seed));
    }

    match RandomUserClient::new(&config.naming) {
        Ok(client) => Box::new(client),
        Err(e) => {
            tracing::warn!(error = %e, "name client unavailable - using offline names");
            Box::new(NamePool::new(config.seed))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Empty,
    New,
    Act(Action, usize),
    Status,
    Json,
    Restart,
    Help,
    Quit,
}

fn parse_command(input: &str) -> std::result::Result<Command, String> {
    let mut words = input.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Empty);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "new" | "n" => Command::New,
        "status" | "s" => Command::Status,
        "json" => Command::Json,
        "restart" => Command::Restart,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" => Command::Quit,
        other => {
            let action: Action = other
                .parse()
                .map_err(|_| format!("Unknown command: {}. Type 'help' for commands.", head))?;
            let position = words
                .next()
                .and_then(|w| w.parse::<usize>().ok())
                .ok_or_else(|| format!("Usage: {} <pet number>", action))?;
            Command::Act(action, position)
        }
    };

    if words.next().is_some() && !matches!(command, Command::Act(..)) {
        return Err(format!("'{}' takes no arguments", head));
    }
    Ok(command)
}

fn print_help(capacity: usize) {
    println!();
    println!("Commands:");
    println!("  new / n         - Adopt a new pet (max {})", capacity);
    println!("  nap <n>         - Let pet #n take a nap");
    println!("  play <n>        - Play with pet #n");
    println!("  eat <n>         - Feed pet #n");
    println!("  status / s      - Show all pets");
    println!("  json            - Dump the roster as JSON");
    println!("  restart         - Send every pet away and start over");
    println!("  quit / q        - Exit");
    println!();
}

fn display_status(pets: &[PetView]) {
    println!();
    if pets.is_empty() {
        println!("  No pets. Type 'new' to adopt one.");
    }
    for (i, pet) in pets.iter().enumerate() {
        println!(
            "  #{} {} ({}) [{}] - Energy {}/100, Fullness {}/100, Happiness {}/100",
            i + 1,
            pet.name,
            pet.species,
            pet.countdown_label(),
            pet.energy,
            pet.fullness,
            pet.happiness
        );
    }
    println!();
}

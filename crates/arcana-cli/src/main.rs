//! CLI frontend for the ArcanaDesk dice roller.

mod commands;

use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "arcana",
    about = "ArcanaDesk — dice roller for the game master's desk",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a dice formula and print the breakdown
    Roll {
        /// Formula to evaluate (e.g. "2d20kh1+5", "4d6dl1", "adv")
        formula: String,

        /// Number of times to evaluate the formula
        #[arg(short, long, default_value = "1")]
        times: u32,

        /// RNG seed for deterministic rolls
        #[arg(short, long)]
        seed: Option<u64>,

        /// Emit each result as a JSON line instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive rolling session with history and statistics
    Session {
        /// RNG seed for deterministic rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Roll {
            formula,
            times,
            seed,
            json,
        } => commands::roll::run(&formula, times, seed, json),
        Commands::Session { seed } => commands::session::run(seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

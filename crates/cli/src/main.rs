//! LayerClaw CLI — the main entry point.
//!
//! Commands:
//! - `load`        — Smart-load layers by priority (default)
//! - `priorities`  — Show every layer's score
//! - `wake`        — Print every layer document, no scoring
//! - `access`      — Record one use of a layer
//! - `stats`       — Show learning log and access counters
//! - `hook`        — Record expectation/outcome hooks
//! - `reset`       — Forget all layer statistics
//! - `init`        — Write a default config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "layerclaw",
    about = "LayerClaw — priority-driven memory loading for AI agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load memory layers in priority order
    Load {
        /// Characters of each layer to print
        #[arg(long, default_value_t = 200)]
        preview: usize,

        /// Print loaded layers as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the priority of every layer
    Priorities {
        /// Print priorities as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every layer document in fixed order
    Wake,

    /// Record one access to a layer
    Access {
        /// Layer name (e.g. SOUL)
        layer: String,
    },

    /// Show learning and access statistics
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record learning hooks
    Hook {
        #[command(subcommand)]
        action: commands::learn::HookAction,
    },

    /// Delete all recorded layer statistics
    Reset {
        /// Confirm the deletion
        #[arg(long)]
        confirm: bool,
    },

    /// Write a default config file
    Init,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Load {
        preview: 200,
        json: false,
    });
    match command {
        Commands::Load { preview, json } => commands::memory::load(preview, json)?,
        Commands::Priorities { json } => commands::memory::priorities(json)?,
        Commands::Wake => commands::memory::wake()?,
        Commands::Access { layer } => commands::memory::access(&layer)?,
        Commands::Stats { json } => commands::learn::stats(json)?,
        Commands::Hook { action } => commands::learn::run(action)?,
        Commands::Reset { confirm } => commands::memory::reset(confirm)?,
        Commands::Init => commands::init::run()?,
    }

    Ok(())
}

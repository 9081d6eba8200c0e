//! CLI frontend for inspecting and managing Palaver save slots.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use pv_save::SaveConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "pv",
    about = "Palaver: inspect and manage conversation save slots",
    version,
    propagate_version = true
)]
struct Cli {
    /// Save root (default: per-user data directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Game folder inside the save root
    #[arg(long, global = true)]
    game_folder: Option<String>,

    /// Number of save slots
    #[arg(long, global = true)]
    slots: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List save slots and the savegames they hold
    Slots,

    /// Show a savegame and its conversation state
    Show {
        /// Slot index
        slot: usize,
    },

    /// Empty the engine files of a savegame
    Clear {
        /// Slot index
        slot: usize,
    },
}

impl Cli {
    fn save_config(&self) -> SaveConfig {
        let mut config = SaveConfig::default();
        if let Some(root) = &self.root {
            config = config.with_root(root);
        }
        if let Some(folder) = &self.game_folder {
            config = config.with_game_folder(folder);
        }
        if let Some(slots) = self.slots {
            config = config.with_max_slots(slots);
        }
        config
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.save_config();
    tracing::debug!(dir = %config.game_dir().display(), slots = config.max_slots, "Using save folder");

    let result = match cli.command {
        Commands::Slots => commands::slots::run(&config),
        Commands::Show { slot } => commands::show::run(&config, slot),
        Commands::Clear { slot } => commands::clear::run(&config, slot),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

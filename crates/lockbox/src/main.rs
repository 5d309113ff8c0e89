// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lockbox - a single-user secrets vault.
//!
//! This is the binary entry point for the Lockbox server and its
//! maintenance commands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;
mod setup;
mod status;

/// Lockbox - a single-user secrets vault.
#[derive(Parser, Debug)]
#[command(name = "lockbox", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Lockbox HTTP server.
    Serve,
    /// Set the master password from the terminal (first run only).
    Setup,
    /// Show server status.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match lockbox_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            lockbox_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Setup) => setup::run_setup(&config).await,
        Some(Commands::Status { json }) => status::run_status(&config, json).await,
        None => {
            println!("lockbox: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("lockbox: {e}");
        std::process::exit(1);
    }
}

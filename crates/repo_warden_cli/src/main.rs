use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod bootstrap;
mod commands;
mod config;
mod errors;

use commands::{config_cmd, drivers_cmd};

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;

/// repo-warden CLI: inspect and validate the daemon's configuration
#[derive(Parser)]
#[command(name = "repo-warden")]
#[command(about = "Inspect and validate repo-warden configuration", long_about = None)]
struct Cli {
    /// Directory the configuration is read from
    #[arg(long, global = true)]
    config_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the configuration and report problems
    Check,

    /// Resolve the configuration and print the result
    Show {
        /// Also print each source's driver configuration
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the registered source and VCS drivers
    Drivers,

    /// Show the CLI version
    Version,
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().pretty())
        .with(EnvFilter::from_env("REPO_WARDEN_LOG"))
        .init();

    let cli = Cli::parse();
    let config_dir = config::config_dir(cli.config_dir.as_deref());
    let result = match &cli.command {
        Commands::Check => config_cmd::check(&config_dir),
        Commands::Show { verbose } => config_cmd::show(&config_dir, *verbose),
        Commands::Drivers => {
            drivers_cmd::drivers();
            Ok(())
        }
        Commands::Version => {
            println!(
                "repo-warden version {}",
                option_env!("REPO_WARDEN_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(message = "command failed", error = %e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}

//! condapipe CLI tool.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "condapipe")]
#[command(about = "Synthesize CI pipeline stack descriptions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the cloud assembly from a resource-names configuration
    Synth {
        /// Path to the configuration file
        #[arg(long, env = "CONDAPIPE_CONFIG", default_value = "condapipe.kdl")]
        config: String,
        /// Output directory for the cloud assembly
        #[arg(long, default_value = "out")]
        out: String,
    },
    /// Print the synthesized template to stdout
    Print {
        /// Path to the configuration file
        #[arg(long, env = "CONDAPIPE_CONFIG", default_value = "condapipe.kdl")]
        config: String,
    },
    /// Validate a resource-names configuration
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "condapipe.kdl")]
        path: String,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Synth { config, out } => {
            commands::synth(&config, &out)?;
        }
        Commands::Print { config } => {
            commands::print(&config)?;
        }
        Commands::Validate { path } => {
            commands::validate(&path)?;
        }
    }

    Ok(())
}

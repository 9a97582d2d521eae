use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{
    ConfigCommand, EventsCommand, LogCommand, LogbooksCommand, RemoteCommand, TrimCommand,
};
use config::Config;

#[derive(Parser)]
#[command(name = "luna")]
#[command(version)]
#[command(about = "Track feedings, diapers, naps and more from the terminal", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log an event to a logbook
    Log(LogCommand),

    /// Show the events in a logbook
    Events(EventsCommand),

    /// List or create logbooks
    Logbooks(LogbooksCommand),

    /// Trim an oversized logbook down to its safe size (lossy)
    Trim(TrimCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Manage the WebDAV backend
    Remote(RemoteCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config)?;

    match &cli.command {
        Commands::Log(cmd) => cmd.run(&config).await,
        Commands::Events(cmd) => cmd.run(&config).await,
        Commands::Logbooks(cmd) => cmd.run(&config).await,
        Commands::Trim(cmd) => cmd.run(&config).await,
        Commands::Config(cmd) => cmd.run(&config),
        Commands::Remote(cmd) => cmd.run(&config).await,
    }
}

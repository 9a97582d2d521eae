use clap::{Args, Subcommand};

use luna_core::Logbook;

use super::{display_name, open_repository};
use crate::config::Config;

#[derive(Args)]
pub struct LogbooksCommand {
    #[command(subcommand)]
    pub command: Option<LogbooksSubcommand>,
}

#[derive(Subcommand)]
pub enum LogbooksSubcommand {
    /// List all logbooks on the active backend
    List,

    /// Create a new, empty logbook
    Create {
        /// Logbook name
        name: String,
    },
}

impl LogbooksCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            None | Some(LogbooksSubcommand::List) => self.list(config).await,
            Some(LogbooksSubcommand::Create { name }) => self.create(config, name).await,
        }
    }

    async fn list(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let repo = open_repository(config)?;
        let names = repo.list_logbooks().await?;

        if names.is_empty() {
            println!("No logbooks yet.");
            println!("Log the first event with 'luna log', or 'luna logbooks create <NAME>'.");
            return Ok(());
        }
        for name in names {
            println!("{}", display_name(&name));
        }
        Ok(())
    }

    async fn create(
        &self,
        config: &Config,
        name: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let repo = open_repository(config)?;
        repo.save_logbook(&Logbook::new(name)).await?;
        println!("Logbook created: {}", display_name(name));
        Ok(())
    }
}

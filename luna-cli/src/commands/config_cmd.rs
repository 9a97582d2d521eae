use clap::{Args, Subcommand};

use crate::config::{Config, DataRepo};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show,

    /// Select the storage backend
    SetRepo {
        #[arg(value_enum)]
        repo: DataRepo,
    },

    /// Remember a default bottle content
    SetBottle {
        /// Milliliters
        ml: u32,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show => {
                println!("Configuration");
                println!("=============\n");

                if let Some(path) = &config.config_file {
                    println!("Config file: {}", path.display());
                } else {
                    println!(
                        "Config file: {} (not found)",
                        Config::default_config_path().display()
                    );
                }
                println!();

                println!("data_repo: {}", config.data_repo);
                println!("data_dir: {}", config.data_dir.value.display());
                println!("  source: {}", config.data_dir.source);
                match config.bottle_ml {
                    Some(ml) => println!("bottle_ml: {ml}"),
                    None => println!("bottle_ml: (not set)"),
                }
                println!();

                println!(
                    "webdav url: {}",
                    config.webdav.url.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "webdav username: {}",
                    config.webdav.username.as_deref().unwrap_or("(not set)")
                );
                println!(
                    "webdav password: {}",
                    if config.webdav.password.is_some() {
                        "(saved)"
                    } else {
                        "(not set)"
                    }
                );
                Ok(())
            }

            ConfigSubcommand::SetRepo { repo } => {
                if *repo == DataRepo::Webdav && !config.webdav.is_configured() {
                    return Err(
                        "no WebDAV credentials saved; run 'luna remote setup' instead".into(),
                    );
                }
                let mut updated = config.clone();
                updated.data_repo = *repo;
                let path = updated.save()?;
                println!("Backend set to {} ({})", repo, path.display());
                Ok(())
            }

            ConfigSubcommand::SetBottle { ml } => {
                if *ml == 0 {
                    return Err("bottle content must be at least 1 ml".into());
                }
                let mut updated = config.clone();
                updated.bottle_ml = Some(*ml);
                let path = updated.save()?;
                println!("Default bottle content set to {ml} ml ({})", path.display());
                Ok(())
            }
        }
    }
}

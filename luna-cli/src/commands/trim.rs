use clap::Args;

use luna_core::{Logbook, LogbookSession};

use super::{confirm, display_name, open_repository};
use crate::config::{Config, DataRepo};

#[derive(Args)]
pub struct TrimCommand {
    /// Logbook to trim (defaults to the default logbook)
    #[arg(long, short, default_value = "")]
    logbook: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl TrimCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let repo = open_repository(config)?;
        let mut session = LogbookSession::open(repo, &self.logbook).await?;

        if !session.logbook().is_oversized() {
            println!(
                "Logbook {} holds {} events, within the safe limit of {}; nothing to trim.",
                display_name(&self.logbook),
                session.logbook().len(),
                Logbook::MAX_SAFE_SIZE
            );
            return Ok(());
        }

        if !self.yes {
            println!(
                "Logbook {} holds {} events. Trimming keeps the most recent {} and \
                 discards the rest forever{}.",
                display_name(&self.logbook),
                session.logbook().len(),
                Logbook::MAX_SAFE_SIZE / 2,
                match config.data_repo {
                    DataRepo::Webdav => ", on the WebDAV share too",
                    DataRepo::LocalFile => "",
                }
            );
            if !confirm("Continue?")? {
                println!("Aborted, nothing was changed.");
                return Ok(());
            }
        }

        let dropped = session.trim_and_save().await?;
        println!("Dropped {dropped} events.");
        Ok(())
    }
}

mod config_cmd;
mod events;
mod log;
mod logbooks;
mod remote;
mod trim;

pub use config_cmd::ConfigCommand;
pub use events::EventsCommand;
pub use log::LogCommand;
pub use logbooks::LogbooksCommand;
pub use remote::RemoteCommand;
pub use trim::TrimCommand;

use std::io::{self, Write};
use std::sync::Arc;

use luna_core::{FileLogbookRepository, LogbookRepository, WebDavLogbookRepository};

use crate::config::{Config, DataRepo};

/// Builds the backend the configuration points at.
pub(crate) fn open_repository(
    config: &Config,
) -> Result<Arc<dyn LogbookRepository>, Box<dyn std::error::Error>> {
    tracing::debug!("using the {} backend", config.data_repo);
    match config.data_repo {
        DataRepo::LocalFile => Ok(Arc::new(FileLogbookRepository::new(
            config.data_dir.value.clone(),
        ))),
        DataRepo::Webdav => {
            let Some((url, username, password)) = config.webdav.credentials() else {
                return Err(
                    "the webdav backend is selected but no credentials are saved; \
                     run 'luna remote setup' first"
                        .into(),
                );
            };
            Ok(Arc::new(WebDavLogbookRepository::new(
                url, username, password,
            )?))
        }
    }
}

/// Asks a yes/no question on the terminal; everything but an explicit yes
/// declines.
pub(crate) fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

pub(crate) fn display_name(name: &str) -> &str {
    if name == luna_core::DEFAULT_LOGBOOK_NAME {
        "(default)"
    } else {
        name
    }
}

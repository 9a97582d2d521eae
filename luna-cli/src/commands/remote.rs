use clap::{Args, Subcommand};

use luna_core::{BootstrapOutcome, FileLogbookRepository, WebDavLogbookRepository};

use super::display_name;
use crate::config::{Config, DataRepo, WebdavSettings};

#[derive(Args)]
pub struct RemoteCommand {
    #[command(subcommand)]
    pub command: RemoteSubcommand,
}

#[derive(Subcommand)]
pub enum RemoteSubcommand {
    /// Connect to a WebDAV share, establish the logbook there, and switch
    /// over to it
    Setup {
        /// WebDAV collection URL, e.g. https://cloud.example.org/remote.php/dav/files/user/luna
        url: String,

        #[arg(long, short)]
        username: String,

        /// Password; omit to read it from $LUNA_WEBDAV_PASSWORD
        #[arg(long, short)]
        password: Option<String>,

        /// Logbook to establish remotely
        #[arg(long, short, default_value = "")]
        logbook: String,
    },

    /// Switch back to local files (credentials stay saved, the share is not
    /// touched)
    Disable,
}

impl RemoteCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RemoteSubcommand::Setup {
                url,
                username,
                password,
                logbook,
            } => {
                let password = match password {
                    Some(password) => password.clone(),
                    None => std::env::var("LUNA_WEBDAV_PASSWORD").map_err(|_| {
                        "no password given and LUNA_WEBDAV_PASSWORD is not set"
                    })?,
                };

                let remote = WebDavLogbookRepository::new(
                    url.clone(),
                    username.clone(),
                    password.clone(),
                )?;
                let local = FileLogbookRepository::new(config.data_dir.value.clone());

                // Establishes the remote logbook: no-op if it exists, upload
                // of the local file (or a fresh empty logbook) if not.
                let outcome = remote.create_or_bootstrap(&local, logbook).await?;
                match outcome {
                    BootstrapOutcome::AlreadyExists => println!(
                        "Logbook {} already exists on the share; it was left as-is.",
                        display_name(logbook)
                    ),
                    BootstrapOutcome::UploadedLocal => println!(
                        "Uploaded the local logbook {} to the share.",
                        display_name(logbook)
                    ),
                    BootstrapOutcome::CreatedEmpty => println!(
                        "Created an empty logbook {} on the share.",
                        display_name(logbook)
                    ),
                }

                // Only a verified connection is worth saving.
                let mut updated = config.clone();
                updated.data_repo = DataRepo::Webdav;
                updated.webdav = WebdavSettings {
                    url: Some(url.clone()),
                    username: Some(username.clone()),
                    password: Some(password),
                };
                let path = updated.save()?;
                println!("Switched to the WebDAV backend ({}).", path.display());
                Ok(())
            }

            RemoteSubcommand::Disable => {
                let mut updated = config.clone();
                updated.data_repo = DataRepo::LocalFile;
                let path = updated.save()?;
                println!("Switched to the local backend ({}).", path.display());
                Ok(())
            }
        }
    }
}

//! Storage backends for logbooks.
//!
//! A backend persists whole logbooks: load, save (full replace), list. All
//! operations are asynchronous and run their blocking work off the caller's
//! task; each resolves to exactly one success value or one [`StorageError`].
//! The caller owns a loaded [`Logbook`] exclusively until the next save; the
//! backend keeps no reference to it.

mod error;
mod local;
mod naming;
mod webdav;

use async_trait::async_trait;

use crate::models::Logbook;

pub use error::StorageError;
pub use local::FileLogbookRepository;
pub use webdav::{BootstrapOutcome, WebDavLogbookRepository};

/// Name of the logbook used by installations that predate multiple
/// logbooks.
pub const DEFAULT_LOGBOOK_NAME: &str = "";

#[async_trait]
pub trait LogbookRepository: Send + Sync {
    /// Enumerates the logical names of all stored logbooks. An empty list
    /// means "no logbooks exist yet" and is not an error.
    async fn list_logbooks(&self) -> Result<Vec<String>, StorageError>;

    /// Loads the named logbook. Backends differ on a missing resource: the
    /// local backend creates and persists an empty logbook, the remote one
    /// surfaces [`StorageError::NotFound`] so the caller can bootstrap.
    async fn load_logbook(&self, name: &str) -> Result<Logbook, StorageError>;

    /// Persists the logbook, fully replacing its prior stored state.
    async fn save_logbook(&self, logbook: &Logbook) -> Result<(), StorageError>;
}

//! Luna Core Library
//!
//! Event model, logbook container and storage backends (local file and
//! remote WebDAV) shared by the Luna applications.

pub mod models;
pub mod session;
pub mod storage;

pub use models::{Event, EventKind, Logbook};
pub use session::{LogbookSession, SaveGate, SaveToken};
pub use storage::{
    BootstrapOutcome, FileLogbookRepository, LogbookRepository, StorageError,
    WebDavLogbookRepository, DEFAULT_LOGBOOK_NAME,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

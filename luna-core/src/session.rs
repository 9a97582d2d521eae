//! Caller-side contract around a loaded logbook: one save in flight per
//! logbook name, and optimistic mutations that roll back when the save
//! fails, so the in-memory list and the durable store never observably
//! diverge.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, error};

use crate::models::{Event, Logbook};
use crate::storage::{LogbookRepository, StorageError};

/// Hands out at most one live [`SaveToken`] per logbook name.
///
/// Cloning shares the underlying state, so one gate can guard every caller
/// that writes through a given backend.
#[derive(Clone, Default)]
pub struct SaveGate {
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl SaveGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the save slot for `name`. Returns `None` while another token
    /// for the same name is alive.
    pub fn begin(&self, name: &str) -> Option<SaveToken> {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(name.to_string()) {
            return None;
        }
        Some(SaveToken {
            gate: Arc::clone(&self.in_flight),
            name: name.to_string(),
        })
    }
}

/// Proof that the holder owns the single save slot for a logbook name.
/// Released on drop.
pub struct SaveToken {
    gate: Arc<Mutex<HashSet<String>>>,
    name: String,
}

impl Drop for SaveToken {
    fn drop(&mut self) {
        self.gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.name);
    }
}

/// A loaded logbook tied to the backend it came from.
///
/// The session owns the logbook exclusively between loads and saves; the
/// backend never retains a reference. Reloading re-reads from storage and
/// never writes, so a periodic refresh cannot clobber remote changes.
pub struct LogbookSession {
    repo: Arc<dyn LogbookRepository>,
    gate: SaveGate,
    logbook: Logbook,
}

impl LogbookSession {
    /// Loads `name` from the backend and wraps it in a session with its own
    /// gate.
    pub async fn open(
        repo: Arc<dyn LogbookRepository>,
        name: &str,
    ) -> Result<Self, StorageError> {
        Self::open_with_gate(repo, name, SaveGate::new()).await
    }

    /// Like [`LogbookSession::open`], sharing a gate with other writers.
    pub async fn open_with_gate(
        repo: Arc<dyn LogbookRepository>,
        name: &str,
        gate: SaveGate,
    ) -> Result<Self, StorageError> {
        let logbook = repo.load_logbook(name).await?;
        Ok(Self {
            repo,
            gate,
            logbook,
        })
    }

    pub fn logbook(&self) -> &Logbook {
        &self.logbook
    }

    fn begin_save(&self) -> Result<SaveToken, StorageError> {
        self.gate.begin(&self.logbook.name).ok_or_else(|| {
            StorageError::Unknown(format!(
                "a save is already in flight for logbook '{}'",
                self.logbook.name
            ))
        })
    }

    /// Appends `event` and persists. If the save fails the event is removed
    /// again, restoring the pre-append state.
    pub async fn log_event(&mut self, event: Event) -> Result<(), StorageError> {
        let _token = self.begin_save()?;
        self.logbook.append(event.clone());
        if let Err(e) = self.repo.save_logbook(&self.logbook).await {
            error!("event was not saved, dropping it from the list: {e}");
            self.logbook.remove(&event);
            return Err(e);
        }
        debug!("event logged to {:?}", self.logbook.name);
        Ok(())
    }

    /// Removes `event` and persists. Re-inserts it at its old position if
    /// the save fails. Returns whether the event was present at all.
    pub async fn delete_event(&mut self, event: &Event) -> Result<bool, StorageError> {
        let _token = self.begin_save()?;
        let Some(pos) = self.logbook.events.iter().position(|e| e == event) else {
            return Ok(false);
        };
        let removed = self.logbook.events.remove(pos);
        if let Err(e) = self.repo.save_logbook(&self.logbook).await {
            self.logbook.events.insert(pos, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Rewrites the timestamp of the event at `index`, re-sorts and
    /// persists. Restores the previous order if the save fails.
    pub async fn edit_event_time(&mut self, index: usize, time: i64) -> Result<(), StorageError> {
        let _token = self.begin_save()?;
        if index >= self.logbook.events.len() {
            return Err(StorageError::Unknown(format!("no event at index {index}")));
        }
        let previous = self.logbook.events.clone();
        self.logbook.events[index].time = time;
        self.logbook.sort();
        if let Err(e) = self.repo.save_logbook(&self.logbook).await {
            self.logbook.events = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Discards the oldest half of an oversized logbook and persists. The
    /// caller must have confirmed this explicitly: trimmed events are gone
    /// for good. Returns how many events were dropped.
    pub async fn trim_and_save(&mut self) -> Result<usize, StorageError> {
        let _token = self.begin_save()?;
        let previous = self.logbook.events.clone();
        let before = self.logbook.len();
        self.logbook.trim();
        if let Err(e) = self.repo.save_logbook(&self.logbook).await {
            self.logbook.events = previous;
            return Err(e);
        }
        Ok(before - self.logbook.len())
    }

    /// Re-reads the logbook from the backend. Never writes.
    pub async fn reload(&mut self) -> Result<(), StorageError> {
        self.logbook = self.repo.load_logbook(&self.logbook.name).await?;
        Ok(())
    }
}

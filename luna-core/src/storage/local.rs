//! Local file backend: one flat JSON file per logbook in a process-private
//! data directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::task;
use tracing::debug;

use super::naming;
use super::{LogbookRepository, StorageError};
use crate::models::{Event, Logbook};

const FILE_PREFIX: &str = "data";

/// Persists logbooks as files under a data directory.
///
/// Storage is private to the process, so a plain full-file read and
/// full-file write per operation is enough; there is no locking. Loading a
/// logbook that has no file yet creates, persists and returns an empty one,
/// which keeps first runs free of error handling.
#[derive(Clone, Debug)]
pub struct FileLogbookRepository {
    data_dir: PathBuf,
}

impl FileLogbookRepository {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the file path backing the named logbook.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(naming::encode_filename(FILE_PREFIX, name))
    }

    /// Whether a file for the named logbook exists already.
    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    fn read_logbook(dir: &Path, name: &str) -> Result<Logbook, StorageError> {
        let path = dir.join(naming::encode_filename(FILE_PREFIX, name));
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()));
            }
            Err(e) => return Err(StorageError::Transport(e.to_string())),
        };
        let events: Vec<Event> =
            serde_json::from_str(&json).map_err(|e| StorageError::Decode(e.to_string()))?;
        debug!("loaded {} events into logbook {:?}", events.len(), name);
        Ok(Logbook {
            name: name.to_string(),
            events,
        })
    }

    fn write_logbook(dir: &Path, logbook: &Logbook) -> Result<(), StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::Transport(e.to_string()))?;
        let path = dir.join(naming::encode_filename(FILE_PREFIX, &logbook.name));
        let json = serde_json::to_string(&logbook.events)
            .map_err(|e| StorageError::Unknown(e.to_string()))?;
        fs::write(&path, json).map_err(|e| StorageError::Transport(e.to_string()))
    }

    fn scan_names(dir: &Path) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            // A data directory that was never created holds no logbooks.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Transport(e.to_string())),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::Transport(e.to_string()))?;
            let filename = entry.file_name();
            if let Some(name) = filename
                .to_str()
                .and_then(|f| naming::decode_filename(FILE_PREFIX, f))
            {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl LogbookRepository for FileLogbookRepository {
    async fn list_logbooks(&self) -> Result<Vec<String>, StorageError> {
        let dir = self.data_dir.clone();
        task::spawn_blocking(move || Self::scan_names(&dir))
            .await
            .map_err(|e| StorageError::Unknown(e.to_string()))?
    }

    async fn load_logbook(&self, name: &str) -> Result<Logbook, StorageError> {
        let dir = self.data_dir.clone();
        let name = name.to_string();
        task::spawn_blocking(move || match Self::read_logbook(&dir, &name) {
            Err(StorageError::NotFound(_)) => {
                debug!("no logbook file for {:?}, creating one", name);
                let logbook = Logbook::new(name);
                Self::write_logbook(&dir, &logbook)?;
                Ok(logbook)
            }
            other => other,
        })
        .await
        .map_err(|e| StorageError::Unknown(e.to_string()))?
    }

    async fn save_logbook(&self, logbook: &Logbook) -> Result<(), StorageError> {
        let dir = self.data_dir.clone();
        let logbook = logbook.clone();
        task::spawn_blocking(move || Self::write_logbook(&dir, &logbook))
            .await
            .map_err(|e| StorageError::Unknown(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;
    use tempfile::TempDir;

    fn test_repo() -> (FileLogbookRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileLogbookRepository::new(temp_dir.path().to_path_buf());
        (repo, temp_dir)
    }

    #[tokio::test]
    async fn test_load_missing_logbook_creates_it() {
        let (repo, _temp) = test_repo();

        let logbook = repo.load_logbook("x").await.unwrap();
        assert_eq!(logbook.name, "x");
        assert!(logbook.is_empty());

        // The file now exists and shows up in the listing.
        assert!(repo.exists("x"));
        assert_eq!(repo.list_logbooks().await.unwrap(), vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let (repo, _temp) = test_repo();

        let mut logbook = Logbook::new("baby2");
        logbook.append(Event::new(EventKind::BabyBottle).with_quantity(120));
        logbook.append(Event::new(EventKind::DiaperPoo));
        repo.save_logbook(&logbook).await.unwrap();

        let loaded = repo.load_logbook("baby2").await.unwrap();
        assert_eq!(loaded, logbook);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_state() {
        let (repo, _temp) = test_repo();

        let mut logbook = Logbook::new("");
        logbook.append(Event::new(EventKind::Colic));
        repo.save_logbook(&logbook).await.unwrap();

        logbook.events.clear();
        repo.save_logbook(&logbook).await.unwrap();

        let loaded = repo.load_logbook("").await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_list_empty_directory_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let repo = FileLogbookRepository::new(temp_dir.path().join("never-created"));
        assert!(repo.list_logbooks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_ignores_foreign_files() {
        let (repo, temp) = test_repo();
        repo.load_logbook("").await.unwrap();
        std::fs::write(temp.path().join("settings.yaml"), "x").unwrap();
        std::fs::write(temp.path().join("database.json"), "[]").unwrap();

        assert_eq!(repo.list_logbooks().await.unwrap(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_default_logbook_filename() {
        let (repo, _temp) = test_repo();
        assert!(repo.path_for("").ends_with("data.json"));
        assert!(repo.path_for("baby2").ends_with("data_baby2.json"));
    }

    #[tokio::test]
    async fn test_corrupt_file_surfaces_decode_error() {
        let (repo, temp) = test_repo();
        std::fs::write(temp.path().join("data.json"), "not json at all").unwrap();

        let err = repo.load_logbook("").await.unwrap_err();
        assert!(matches!(err, StorageError::Decode(_)));
    }

    #[tokio::test]
    async fn test_record_missing_mandatory_field_fails_decode() {
        let (repo, temp) = test_repo();
        std::fs::write(temp.path().join("data.json"), r#"[{"type":"NOTE"}]"#).unwrap();

        let err = repo.load_logbook("").await.unwrap_err();
        assert!(matches!(err, StorageError::Decode(_)));
    }
}

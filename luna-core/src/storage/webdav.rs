//! Remote WebDAV backend: one flat JSON file per logbook inside a WebDAV
//! collection, addressed over HTTP with basic auth.

use std::time::Duration;

use async_trait::async_trait;
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use reqwest::{Method, StatusCode};
use tracing::{debug, error};

use super::local::FileLogbookRepository;
use super::naming;
use super::{LogbookRepository, StorageError};
use crate::models::{Event, Logbook};

const FILE_PREFIX: &str = "lunatracker_logbook";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// What [`WebDavLogbookRepository::create_or_bootstrap`] found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The remote logbook already existed; nothing was written.
    AlreadyExists,
    /// No remote logbook, but a local file existed and was uploaded.
    UploadedLocal,
    /// Neither remote nor local existed; a fresh empty logbook was
    /// uploaded.
    CreatedEmpty,
}

/// Persists logbooks on a remote WebDAV share.
///
/// Unlike the local backend, loading a missing logbook surfaces
/// [`StorageError::NotFound`] instead of creating one: remote creation has
/// to be an explicit, user-visible step (see
/// [`WebDavLogbookRepository::create_or_bootstrap`]).
///
/// A save is a full-replace PUT with no remote lock and no merge, so when
/// two devices save concurrently the last writer wins and the other's
/// unsynced changes are lost.
pub struct WebDavLogbookRepository {
    base_url: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl WebDavLogbookRepository {
    /// Creates a repository over the given collection URL, with the default
    /// per-request timeout.
    pub fn new(
        base_url: String,
        username: String,
        password: String,
    ) -> Result<Self, StorageError> {
        Self::with_timeout(base_url, username, password, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: String,
        username: String,
        password: String,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Unknown(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, name: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            naming::encode_filename(FILE_PREFIX, name)
        )
    }

    fn classify_status(status: StatusCode, name: &str) -> StorageError {
        match status.as_u16() {
            404 => StorageError::NotFound(name.to_string()),
            401 => StorageError::Unauthorized,
            503 => StorageError::ServiceUnavailable,
            other => StorageError::Protocol(format!("unexpected status {other}")),
        }
    }

    fn transport(e: reqwest::Error) -> StorageError {
        StorageError::Transport(e.to_string())
    }

    /// Connects to the server and establishes the named logbook if it does
    /// not exist yet: an existing local file is uploaded as-is (the first
    /// sync of previously offline data), otherwise a fresh empty logbook is
    /// created remotely. Used by first-time setup, never by the normal
    /// load/save flow. Errors are surfaced, not retried.
    pub async fn create_or_bootstrap(
        &self,
        local: &FileLogbookRepository,
        name: &str,
    ) -> Result<BootstrapOutcome, StorageError> {
        match self.load_logbook(name).await {
            Ok(_) => {
                debug!(
                    "logbook {:?} already exists on the server, leaving it untouched",
                    name
                );
                Ok(BootstrapOutcome::AlreadyExists)
            }
            Err(StorageError::NotFound(_)) => {
                if local.exists(name) {
                    let logbook = local.load_logbook(name).await?;
                    self.save_logbook(&logbook).await?;
                    debug!(
                        "uploaded local logbook {:?} ({} events)",
                        name,
                        logbook.len()
                    );
                    Ok(BootstrapOutcome::UploadedLocal)
                } else {
                    self.save_logbook(&Logbook::new(name)).await?;
                    debug!("created empty remote logbook {:?}", name);
                    Ok(BootstrapOutcome::CreatedEmpty)
                }
            }
            Err(e) => {
                error!("bootstrap of logbook {:?} failed: {e}", name);
                Err(e)
            }
        }
    }

    fn parse_multistatus_names(body: &str) -> Result<Vec<String>, StorageError> {
        let mut reader = Reader::from_str(body);
        let mut names = Vec::new();
        let mut in_href = false;
        loop {
            match reader.read_event() {
                Ok(XmlEvent::Start(e)) if e.local_name().as_ref() == b"href" => in_href = true,
                Ok(XmlEvent::End(e)) if e.local_name().as_ref() == b"href" => in_href = false,
                Ok(XmlEvent::Text(t)) if in_href => {
                    let href = t
                        .unescape()
                        .map_err(|e| StorageError::Decode(e.to_string()))?;
                    let Some(segment) = href.trim_end_matches('/').rsplit('/').next() else {
                        continue;
                    };
                    let Ok(filename) = urlencoding::decode(segment) else {
                        continue;
                    };
                    if let Some(name) = naming::decode_filename(FILE_PREFIX, &filename) {
                        names.push(name);
                    }
                }
                Ok(XmlEvent::Eof) => break,
                Err(e) => {
                    return Err(StorageError::Decode(format!(
                        "invalid listing response: {e}"
                    )));
                }
                Ok(_) => {}
            }
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl LogbookRepository for WebDavLogbookRepository {
    async fn list_logbooks(&self) -> Result<Vec<String>, StorageError> {
        let propfind = Method::from_bytes(b"PROPFIND")
            .map_err(|e| StorageError::Unknown(e.to_string()))?;
        let response = self
            .client
            .request(propfind, format!("{}/", self.base_url))
            .header("Depth", "1")
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(Self::transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify_status(status, ""));
        }
        let body = response.text().await.map_err(Self::transport)?;
        Self::parse_multistatus_names(&body)
    }

    async fn load_logbook(&self, name: &str) -> Result<Logbook, StorageError> {
        let response = self
            .client
            .get(self.url(name))
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(Self::transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify_status(status, name));
        }
        let body = response.text().await.map_err(Self::transport)?;
        let events: Vec<Event> =
            serde_json::from_str(&body).map_err(|e| StorageError::Decode(e.to_string()))?;
        debug!("loaded {} events into logbook {:?}", events.len(), name);
        Ok(Logbook {
            name: name.to_string(),
            events,
        })
    }

    async fn save_logbook(&self, logbook: &Logbook) -> Result<(), StorageError> {
        // Full replace, no remote lock: the last writer wins.
        let body = serde_json::to_string(&logbook.events)
            .map_err(|e| StorageError::Unknown(e.to_string()))?;
        let response = self
            .client
            .put(self.url(&logbook.name))
            .basic_auth(&self.username, Some(&self.password))
            .body(body)
            .send()
            .await
            .map_err(Self::transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify_status(status, &logbook.name));
        }
        debug!("logbook {:?} saved", logbook.name);
        Ok(())
    }
}

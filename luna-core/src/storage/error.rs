use thiserror::Error;

/// Every failure a storage backend can surface.
///
/// One closed taxonomy shared by all backends and all operations; an
/// asynchronous call resolves to exactly one success value or exactly one of
/// these. The first three variants drive distinct user-facing messages, so
/// their classification must stay stable.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested logbook does not exist. Surfaced by the remote backend
    /// only; the local backend creates missing logbooks on first read.
    #[error("no logbook named '{0}' exists")]
    NotFound(String),

    /// The server rejected the credentials (HTTP 401).
    #[error("access denied by the server, check username and password")]
    Unauthorized,

    /// The server is temporarily unreachable or overloaded (HTTP 503).
    #[error("the server is temporarily unavailable")]
    ServiceUnavailable,

    /// Network-level failure: timeout, connection reset, DNS, local disk
    /// I/O.
    #[error("network error: {0}")]
    Transport(String),

    /// The server responded, but with a status or body that fits none of
    /// the above.
    #[error("unexpected server response: {0}")]
    Protocol(String),

    /// Stored bytes could not be parsed as event records.
    #[error("malformed logbook data: {0}")]
    Decode(String),

    /// Anything not classified above. Still a distinct failure, never
    /// silently dropped.
    #[error("{0}")]
    Unknown(String),
}

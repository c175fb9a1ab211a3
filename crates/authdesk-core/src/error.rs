//! Structured client errors shared by every form and API call.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error category.
///
/// Every failure a form can show falls into exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Local field validation failed; nothing was sent.
    Validation,
    /// Backend rejected the credentials or the bearer token.
    Authentication,
    /// Backend could not be reached.
    Network,
    /// Backend answered with an error (message surfaced verbatim when present).
    Server,
    /// The durable token slot could not be read or written.
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Authentication => write!(f, "authentication"),
            ErrorKind::Network => write!(f, "network"),
            ErrorKind::Server => write!(f, "server"),
            ErrorKind::Storage => write!(f, "storage"),
        }
    }
}

/// Structured error with kind and a single display message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientError {
    /// Error category
    pub kind: ErrorKind,
    /// One-line message suitable for inline display
    pub message: String,
    /// HTTP status, when the backend answered
    pub status: Option<u16>,
}

impl ClientError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Builds an error from a non-success HTTP response.
    ///
    /// 401 and 403 are authentication failures; everything else is a server
    /// error. The backend's `message` field wins over `fallback`.
    pub fn from_status(status: u16, body: &str, fallback: &str) -> Self {
        let kind = if matches!(status, 401 | 403) {
            ErrorKind::Authentication
        } else {
            ErrorKind::Server
        };
        let message = backend_message(body).unwrap_or_else(|| fallback.to_string());
        Self {
            kind,
            message,
            status: Some(status),
        }
    }

    /// Returns true when the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClientError {}

/// Result type threaded through every client operation.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Extracts `{"message": "..."}` from an error body.
fn backend_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body).ok()?;
    let msg = json.get("message")?.as_str()?.trim();
    if msg.is_empty() {
        None
    } else {
        Some(msg.to_string())
    }
}

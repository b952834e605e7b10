//! Error types for the API client
//!
//! Every failure reaches the caller as a single [`ApiError`] whose `Display`
//! is the human-readable message a UI shows as-is. Two families matter:
//!
//! - **Transport failures**: no HTTP response was obtained at all. These carry
//!   a [`TransportFailureKind`] and a hint naming the resolved base URL.
//! - **Status errors**: a response arrived with a failing status. The message
//!   is taken from the response body (see [`crate::payload::Payload::error_message`]).
//!
//! Malformed response bodies are not errors here; they decode to
//! [`crate::payload::Payload::Null`].

use crate::payload::Payload;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response was obtained from the backend
    #[error("{message}")]
    Transport {
        /// Best-effort classification of the underlying failure
        kind: TransportFailureKind,
        /// Base URL the request was resolved against
        base_url: String,
        /// Full URL that was attempted
        url: String,
        /// Underlying error text followed by the remediation hint
        message: String,
    },

    /// The backend answered with a non-success status
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
        /// Decoded response body
        payload: Payload,
    },

    /// Request body could not be serialized to JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A caller-supplied header name or value was rejected
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A successful payload did not have the shape a typed helper expected
    #[error("Unexpected payload: {0}")]
    UnexpectedPayload(String),
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a transport error from the underlying error text.
    ///
    /// The message embeds the underlying text (when there is any), the
    /// resolved base URL, and a hint specific to the classification.
    pub fn transport(underlying: &str, base_url: &str, url: impl Into<String>) -> Self {
        let kind = classify_transport_error(underlying);
        let hint = format!("Backend base resolved to {base_url}. {}", kind.hint());
        let underlying = underlying.trim();
        let message = if underlying.is_empty() {
            hint
        } else {
            format!("{underlying}. {hint}")
        };
        Self::Transport {
            kind,
            base_url: base_url.to_string(),
            url: url.into(),
            message,
        }
    }

    /// Create a status error
    pub fn status(status: u16, message: impl Into<String>, payload: Payload) -> Self {
        Self::Status {
            status,
            message: message.into(),
            payload,
        }
    }

    /// HTTP status of a status error
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classification of a transport error
    #[must_use]
    pub fn transport_kind(&self) -> Option<TransportFailureKind> {
        match self {
            Self::Transport { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Check if no response was obtained
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if the backend rejected the credentials (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }
}

/// Classification of a failure to obtain any response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportFailureKind {
    /// Connection refused, DNS failure, backend down
    Network,
    /// Request blocked by a cross-origin policy
    Cors,
    /// Anything the heuristics do not recognize
    Unknown,
}

impl TransportFailureKind {
    /// Remediation hint shown after the resolved base URL
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::Network => {
                "Network error. Backend may be down or URL is wrong (RECIPE_API_BASE)."
            }
            Self::Cors => "CORS blocked. Configure server CORS to allow this client's origin.",
            Self::Unknown => {
                "Ensure the backend is listening on the expected host and port and allows this client's origin."
            }
        }
    }
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Network => "network",
            Self::Cors => "cors",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

const NETWORK_MARKERS: &[&str] = &[
    "failed to fetch",
    "networkerror",
    "connection refused",
    "error sending request",
    "dns error",
    "tcp connect error",
];

const CORS_MARKERS: &[&str] = &["cors", "blocked by"];

/// Classify the text of a transport failure.
///
/// Best-effort substring matching on the lower-cased text. The same text
/// always yields the same kind; unrecognized wording degrades to
/// [`TransportFailureKind::Unknown`].
#[must_use]
pub fn classify_transport_error(text: &str) -> TransportFailureKind {
    let lower = text.to_lowercase();
    if NETWORK_MARKERS.iter().any(|m| lower.contains(m)) {
        TransportFailureKind::Network
    } else if CORS_MARKERS.iter().any(|m| lower.contains(m)) {
        TransportFailureKind::Cors
    } else {
        TransportFailureKind::Unknown
    }
}

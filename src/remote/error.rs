// Errors raised by calls to the remote REST API

use serde::Deserialize;

/// Failure of a remote call
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Connection, TLS or timeout failure from the transport
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response; `message` is taken from the error envelope when present
    #[error("Remote API returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    /// 2xx response whose body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl RemoteError {
    /// Display text supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RemoteError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::Transport(err) => err.status().map(|s| s.as_u16()),
            RemoteError::Decode(_) => None,
        }
    }
}

/// Structured error envelope `{message, error?, statusCode?}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// Pull a human-readable message out of an error body
///
/// `message` may be a string or a list of strings (field validation
/// failures); anything else yields `None`.
pub fn extract_message(body: &str) -> Option<String> {
    let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;

    match envelope.message? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|item| item.as_str())
                .filter(|text| !text.trim().is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}

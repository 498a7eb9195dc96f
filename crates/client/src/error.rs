use reqwest::StatusCode;
use serde_json::Value;

use crate::session::SessionError;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing, expired or rejected access credential (HTTP 401).
    #[error("unauthorized: {}", payload_message(.payload))]
    Unauthorized { payload: Value },
    /// Any other non-success status. The payload is exactly what the server
    /// sent (JSON, or the raw body as a JSON string).
    #[error("request failed with {status}: {}", payload_message(.payload))]
    RequestFailed { status: StatusCode, payload: Value },
    /// No response was obtained (connection refused, DNS, timeout).
    #[error("network unavailable: {0}")]
    NetworkUnavailable(#[source] reqwest::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Rejected locally, nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("session store error: {0}")]
    Session(#[from] SessionError),
}

impl ClientError {
    pub(crate) fn from_status(status: StatusCode, payload: Value) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized { payload },
            _ => ClientError::RequestFailed { status, payload },
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }

    /// Server error payload, when the server answered.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ClientError::Unauthorized { payload } | ClientError::RequestFailed { payload, .. } => {
                Some(payload)
            }
            _ => None,
        }
    }
}

/// Best-effort human text out of an error payload.
///
/// The backend answers with `{"detail": ..}`, `{"error": ..}` or a map of
/// field name to list of messages.
pub fn payload_message(payload: &Value) -> String {
    match payload {
        Value::Null => "no details".to_string(),
        Value::String(text) if text.trim().is_empty() => "no details".to_string(),
        Value::String(text) => text.clone(),
        Value::Object(map) => {
            for key in ["detail", "error", "message"] {
                if let Some(Value::String(text)) = map.get(key) {
                    return text.clone();
                }
            }
            map.iter()
                .map(|(field, value)| format!("{field}: {}", flatten(value)))
                .collect::<Vec<_>>()
                .join("; ")
        }
        other => flatten(other),
    }
}

fn flatten(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items.iter().map(flatten).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

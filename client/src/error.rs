//! Error types for the Eventos backend gateway

use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Coarse classification used by views to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Role or ownership mismatch, missing or expired credential
    Authorization,
    /// The entity is not in the state the request expected
    StateConflict,
    /// Network failure, server error, or an unusable body
    Transport,
}

/// Errors that can occur when talking to the backend.
///
/// Every variant that comes from an HTTP response carries the backend's own
/// message, or a generic one when the body had none.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// A 2xx response whose body could not be used
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// 401 - missing or invalid credential
    #[error("{message}")]
    Unauthorized {
        /// Backend message
        message: String,
    },

    /// 403 - authenticated but not allowed
    #[error("{message}")]
    Forbidden {
        /// Backend message
        message: String,
    },

    /// 404 - the entity does not exist
    #[error("{message}")]
    NotFound {
        /// Backend message
        message: String,
    },

    /// 409 - the entity changed state under us
    #[error("{message}")]
    Conflict {
        /// Backend message
        message: String,
    },

    /// Any other 4xx rejection
    #[error("{message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Backend message
        message: String,
    },

    /// 5xx
    #[error("{message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Backend message
        message: String,
    },
}

impl ApiError {
    /// Build an error from a non-success status and its raw body.
    ///
    /// The message is taken from a JSON `error` or `message` field, then from
    /// the plain-text body, then falls back to a generic message.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| generic_message(status));

        match status {
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound { message },
            409 => Self::Conflict { message },
            400..=499 => Self::Rejected { status, message },
            _ => Self::Server { status, message },
        }
    }

    /// Classify the error.
    ///
    /// The backend answers most refused transitions with a plain 4xx, so any
    /// 4xx that is not about credentials counts as a state conflict.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized { .. } | Self::Forbidden { .. } => ErrorCategory::Authorization,
            Self::NotFound { .. } | Self::Conflict { .. } | Self::Rejected { .. } => {
                ErrorCategory::StateConflict
            },
            Self::Transport(_) | Self::Decode(_) | Self::Server { .. } => ErrorCategory::Transport,
        }
    }

    /// Human-readable message suitable for a notification.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Transport(_) => "Could not reach the server, please try again".to_string(),
            Self::Decode(_) => "The server sent an unexpected response".to_string(),
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Conflict { message }
            | Self::Rejected { message, .. }
            | Self::Server { message, .. } => message.clone(),
        }
    }

    /// HTTP status, when the error came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(_) | Self::Decode(_) => None,
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Rejected { status, .. } | Self::Server { status, .. } => Some(*status),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

fn generic_message(status: u16) -> String {
    format!("HTTP error! status: {status}")
}

fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str::<serde_json::Value>(body) {
        return ["error", "message"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(serde_json::Value::as_str))
            .map(str::trim)
            .find(|text| !text.is_empty())
            .map(str::to_string);
    }

    Some(body.to_string())
}

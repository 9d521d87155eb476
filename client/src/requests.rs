//! Request and response bodies exchanged with the backend

use chrono::NaiveDateTime;
use eventos_core::types::{EventId, Role, User};
use eventos_core::validation::{ProfileChanges, ValidEvent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer credential issued at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in logs through Debug; never print them.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Login credentials.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl LoginRequest {
    /// Create login credentials.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoginResponse {
    /// Bearer credential for later requests
    pub token: AuthToken,
    /// Logged-in identity
    pub user: User,
}

/// Account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateUserRequest {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
    /// Account role
    #[serde(rename = "type")]
    pub role: Role,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateUserRequest {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl From<ProfileChanges> for UpdateUserRequest {
    fn from(changes: ProfileChanges) -> Self {
        Self {
            name: changes.name,
            email: changes.email,
            password: changes.password,
        }
    }
}

/// Event creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Start
    pub start_date_time: NaiveDateTime,
    /// End
    pub end_date_time: NaiveDateTime,
    /// Location
    pub location: String,
    /// Capacity
    pub capacity: u32,
}

impl From<ValidEvent> for CreateEventRequest {
    fn from(event: ValidEvent) -> Self {
        Self {
            title: event.title,
            description: event.description,
            start_date_time: event.start_date_time,
            end_date_time: event.end_date_time,
            location: event.location,
            capacity: event.capacity,
        }
    }
}

/// Event update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    /// Title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_time: Option<NaiveDateTime>,
    /// End
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date_time: Option<NaiveDateTime>,
    /// Location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Capacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl From<ValidEvent> for UpdateEventRequest {
    fn from(event: ValidEvent) -> Self {
        Self {
            title: Some(event.title),
            description: Some(event.description),
            start_date_time: Some(event.start_date_time),
            end_date_time: Some(event.end_date_time),
            location: Some(event.location),
            capacity: Some(event.capacity),
        }
    }
}

/// Enrollment creation; the participant is taken from the credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentRequest {
    /// Event to enroll into
    pub event_id: EventId,
}

/// Zero-based page selection for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number
    pub page: u32,
    /// Items per page
    pub size: u32,
}

impl PageRequest {
    /// First page of `size` items.
    #[must_use]
    pub const fn first(size: u32) -> Self {
        Self { page: 0, size }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(10)
    }
}

/// Success envelope `{data, message}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) data: Option<T>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

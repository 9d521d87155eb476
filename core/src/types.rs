//! Domain types shared by the client, the views and the test backend.
//!
//! Field names follow the backend's JSON (camelCase); timestamps are the
//! backend's local date-times without an offset.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Get the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a user.
    UserId
);
id_type!(
    /// Unique identifier for an event.
    EventId
);
id_type!(
    /// Unique identifier for an enrollment.
    EnrollmentId
);

/// The two kinds of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Creates and owns events, approves or rejects enrollments into them.
    #[serde(rename = "ORGANIZADOR")]
    Organizer,
    /// Enrolls into events and may cancel their own enrollments.
    #[serde(rename = "PARTICIPANTE")]
    Participant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organizer => write!(f, "organizer"),
            Self::Participant => write!(f, "participant"),
        }
    }
}

/// Identity record owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Account role (`type` on the wire)
    #[serde(rename = "type")]
    pub role: Role,
    /// When the account was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    /// Whether this user organizes events.
    #[must_use]
    pub fn is_organizer(&self) -> bool {
        self.role == Role::Organizer
    }

    /// Whether this user enrolls into events.
    #[must_use]
    pub fn is_participant(&self) -> bool {
        self.role == Role::Participant
    }
}

/// An event as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event ID
    pub id: EventId,
    /// Title
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Start of the event
    pub start_date_time: NaiveDateTime,
    /// End of the event
    pub end_date_time: NaiveDateTime,
    /// Where it happens
    pub location: String,
    /// Maximum number of confirmed enrollments
    pub capacity: u32,
    /// Organizer who owns the event
    pub organizer_id: UserId,
    /// Organizer display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_name: Option<String>,
    /// Confirmed enrollments, computed by the backend
    #[serde(default)]
    pub current_enrollments: u32,
    /// Whether the backend still accepts enrollments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// When the event was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Event {
    /// Whether `user_id` is the organizer of this event.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.organizer_id == user_id
    }
}

/// Lifecycle state of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    /// Waiting for the organizer
    Pending,
    /// Accepted by the organizer; counts against capacity
    Confirmed,
    /// Rejected by the organizer or canceled by the participant
    Canceled,
}

impl EnrollmentStatus {
    /// All statuses, in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Confirmed, Self::Canceled];

    /// Whether the enrollment still holds a place in the event.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Canceled)
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// A participant's request to attend an event.
///
/// The backend flattens a few event and participant fields into the record so
/// list views do not need extra lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    /// Enrollment ID
    pub id: EnrollmentId,
    /// Parent event
    pub event_id: EventId,
    /// Event title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_title: Option<String>,
    /// Event start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_start_date_time: Option<NaiveDateTime>,
    /// Event location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_location: Option<String>,
    /// Participant who owns the enrollment
    pub participant_id: UserId,
    /// Participant display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_name: Option<String>,
    /// Participant email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_email: Option<String>,
    /// Current lifecycle state
    pub status: EnrollmentStatus,
    /// When the enrollment was made
    pub enrollment_date: NaiveDateTime,
}

impl Enrollment {
    /// Whether the enrollment is Pending or Confirmed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Whether `user_id` owns this enrollment.
    #[must_use]
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.participant_id == user_id
    }
}

/// The backend's pagination envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub content: Vec<T>,
    /// Number of pages available
    #[serde(default)]
    pub total_pages: u32,
    /// Number of items across all pages
    #[serde(default)]
    pub total_elements: u64,
    /// Requested page size
    #[serde(default)]
    pub size: u32,
    /// Zero-based page number
    #[serde(default)]
    pub number: u32,
}

impl<T> Page<T> {
    /// Slice `items` into the zero-based `page` of `size` elements.
    #[must_use]
    pub fn from_items(items: Vec<T>, page: u32, size: u32) -> Self {
        let total_elements = items.len() as u64;
        let size = size.max(1);
        let total_pages = u32::try_from(total_elements.div_ceil(u64::from(size))).unwrap_or(u32::MAX);
        let skip = usize::try_from(u64::from(page) * u64::from(size)).unwrap_or(usize::MAX);
        let content = items.into_iter().skip(skip).take(size as usize).collect();

        Self {
            content,
            total_pages,
            total_elements,
            size,
            number: page,
        }
    }

    /// Whether the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

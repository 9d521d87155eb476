//! Event capacity accounting.
//!
//! `current_enrollments` comes from the backend and counts Confirmed
//! enrollments only. Nothing here recomputes it from a list.

use crate::types::{Enrollment, EnrollmentStatus, Event};

/// Whether the event has no confirmed places left.
#[must_use]
pub const fn is_full(event: &Event) -> bool {
    event.current_enrollments >= event.capacity
}

/// Places left before the event is full.
#[must_use]
pub const fn available_spots(event: &Event) -> u32 {
    event.capacity.saturating_sub(event.current_enrollments)
}

/// Whether a participant may be offered a new enrollment.
///
/// Fullness blocks new enrollments only. A participant holding an active
/// enrollment is never offered a new one, full or not.
#[must_use]
pub const fn accepts_new_enrollment(event: &Event, has_active_enrollment: bool) -> bool {
    !has_active_enrollment && !is_full(event)
}

/// Per-status counts over a fetched list of enrollments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrollmentStats {
    /// Confirmed enrollments
    pub confirmed: usize,
    /// Pending enrollments
    pub pending: usize,
    /// Canceled enrollments
    pub canceled: usize,
}

impl EnrollmentStats {
    /// Count enrollments by status.
    #[must_use]
    pub fn from_enrollments<'a>(enrollments: impl IntoIterator<Item = &'a Enrollment>) -> Self {
        enrollments
            .into_iter()
            .fold(Self::default(), |mut stats, enrollment| {
                match enrollment.status {
                    EnrollmentStatus::Confirmed => stats.confirmed += 1,
                    EnrollmentStatus::Pending => stats.pending += 1,
                    EnrollmentStatus::Canceled => stats.canceled += 1,
                }
                stats
            })
    }

    /// All enrollments counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.confirmed + self.pending + self.canceled
    }
}

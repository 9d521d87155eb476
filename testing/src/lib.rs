//! # Eventos Testing
//!
//! Testing utilities for the Eventos client.
//!
//! This crate provides:
//! - A fixed clock for deterministic timestamps
//! - [`InMemoryBackend`], a backend that enforces the server's rules in memory
//! - [`ReducerTest`], a given/when/then harness for view reducers
//! - Property-based testing strategies for the domain enums
//!
//! ## Example
//!
//! ```
//! use eventos_client::{EventosBackend, LoginRequest};
//! use eventos_core::Role;
//! use eventos_testing::InMemoryBackend;
//!
//! # tokio_test::block_on(async {
//! let backend = InMemoryBackend::new();
//! backend.seed_user("Ana", "ana@example.com", "secret1", Role::Participant);
//!
//! let login = backend
//!     .login(&LoginRequest::new("ana@example.com", "secret1"))
//!     .await
//!     .unwrap();
//! assert_eq!(login.user.name, "Ana");
//! # });
//! ```

pub mod backend;

/// Clocks for tests.
pub mod clock {
    use chrono::{DateTime, Duration, Utc};
    use eventos_core::environment::Clock;

    /// 2025-06-01 09:00:00 UTC, in seconds since the epoch.
    const REFERENCE_INSTANT: i64 = 1_748_768_400;

    /// A clock stopped at one instant.
    ///
    /// Seeded events, enrollment dates and notifications all read the same
    /// time, so tests can compare them exactly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FixedClock(DateTime<Utc>);

    impl FixedClock {
        /// Stopped at `instant`.
        #[must_use]
        pub const fn at(instant: DateTime<Utc>) -> Self {
            Self(instant)
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// The instant every test in the workspace runs at.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::at(DateTime::<Utc>::default() + Duration::seconds(REFERENCE_INSTANT))
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use eventos_core::lifecycle::Transition;
    use eventos_core::types::{EnrollmentStatus, Role};
    use proptest::prelude::*;

    /// Any enrollment status.
    pub fn status() -> impl Strategy<Value = EnrollmentStatus> {
        prop::sample::select(EnrollmentStatus::ALL.to_vec())
    }

    /// Any lifecycle transition.
    pub fn transition() -> impl Strategy<Value = Transition> {
        prop_oneof![
            Just(Transition::Confirm),
            Just(Transition::Reject),
            Just(Transition::Cancel),
        ]
    }

    /// Either role.
    pub fn role() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Organizer), Just(Role::Participant)]
    }
}

pub use backend::InMemoryBackend;
pub use clock::{test_clock, FixedClock};
pub use reducer_test::{ReducerTest, ShowsErrors};

#[cfg(test)]
mod tests {
    use super::*;
    use eventos_core::environment::Clock;

    #[test]
    fn shared_clock_is_stopped_at_the_reference_instant() {
        let clock = test_clock();
        assert_eq!(clock.now().to_rfc3339(), "2025-06-01T09:00:00+00:00");
        assert_eq!(clock.now(), test_clock().now());
    }
}

//! Role-scoped views.
//!
//! Each view is a reducer over its own state, run by a [`Store`](crate::store::Store).
//! Offered actions are derived from state on every read and never stored.

pub mod catalog;
pub mod event_enrollments;
pub mod my_enrollments;
pub mod organizer_events;

pub use catalog::{CatalogAction, CatalogReducer, CatalogState};
pub use event_enrollments::{
    Decision, EventEnrollmentsAction, EventEnrollmentsReducer, EventEnrollmentsState,
};
pub use my_enrollments::{MyEnrollmentsAction, MyEnrollmentsReducer, MyEnrollmentsState};
pub use organizer_events::{OrganizerEventsAction, OrganizerEventsReducer, OrganizerEventsState};

#[cfg(test)]
mod shown_errors {
    use super::{CatalogState, EventEnrollmentsState, MyEnrollmentsState, OrganizerEventsState};
    use crate::notify::Notification;
    use eventos_testing::reducer_test::ShowsErrors;

    fn error_of(notification: Option<&Notification>) -> Option<&str> {
        notification
            .filter(|n| n.is_error())
            .map(|n| n.message.as_str())
    }

    impl ShowsErrors for CatalogState {
        fn shown_error(&self) -> Option<&str> {
            error_of(self.notification.as_ref())
        }
    }

    impl ShowsErrors for MyEnrollmentsState {
        fn shown_error(&self) -> Option<&str> {
            error_of(self.notification.as_ref())
        }
    }

    impl ShowsErrors for OrganizerEventsState {
        fn shown_error(&self) -> Option<&str> {
            error_of(self.notification.as_ref())
        }
    }

    impl ShowsErrors for EventEnrollmentsState {
        fn shown_error(&self) -> Option<&str> {
            error_of(self.notification.as_ref())
        }
    }
}

//! Role-scoped view composition.
//!
//! Given who is looking and what they are looking at, decide which actions a
//! view offers. Every function here is pure; views call them on each read of
//! their state instead of storing the result.

use crate::capacity;
use crate::lifecycle::{authorize, Actor, Transition};
use crate::types::{Enrollment, Event, Role, UserId};
use smallvec::SmallVec;

/// An action a view may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferedAction {
    /// Create a new enrollment in the event
    Enroll,
    /// Navigate to the participant's existing enrollment
    ViewEnrollment,
    /// Cancel the participant's own enrollment
    Cancel,
    /// Confirm a pending enrollment
    Confirm,
    /// Reject a pending enrollment
    Reject,
    /// Edit an owned event
    EditEvent,
    /// Delete an owned event
    DeleteEvent,
    /// Open the enrollment list of an owned event
    ViewEnrollments,
}

impl OfferedAction {
    /// Whether choosing this action sends a mutating request.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::ViewEnrollment | Self::ViewEnrollments)
    }

    /// The lifecycle transition behind this action, if any.
    #[must_use]
    pub const fn transition(self) -> Option<Transition> {
        match self {
            Self::Confirm => Some(Transition::Confirm),
            Self::Reject => Some(Transition::Reject),
            Self::Cancel => Some(Transition::Cancel),
            _ => None,
        }
    }
}

impl From<Transition> for OfferedAction {
    fn from(transition: Transition) -> Self {
        match transition {
            Transition::Confirm => Self::Confirm,
            Transition::Reject => Self::Reject,
            Transition::Cancel => Self::Cancel,
        }
    }
}

/// Small inline set of offered actions.
pub type Offers = SmallVec<[OfferedAction; 3]>;

/// Actions offered on an enrollment row.
///
/// An organizer who owns the event gets confirm and reject on Pending rows.
/// A participant who owns the enrollment gets cancel on Pending and Confirmed
/// rows. Everyone else, and every Canceled row, gets nothing.
#[must_use]
pub fn enrollment_offers(actor: Actor, enrollment: &Enrollment, event_organizer: UserId) -> Offers {
    enrollment
        .status
        .allowed_transitions()
        .iter()
        .copied()
        .filter(|transition| authorize(actor, *transition, enrollment, event_organizer).is_ok())
        .map(OfferedAction::from)
        .collect()
}

/// Actions offered on a row of the participant's own enrollment list.
///
/// Only participant-driven transitions are considered, so the event's
/// organizer is not needed.
#[must_use]
pub fn own_enrollment_offers(actor: Actor, enrollment: &Enrollment) -> Offers {
    enrollment
        .status
        .allowed_transitions()
        .iter()
        .copied()
        .filter(|transition| transition.required_role() == Role::Participant)
        .filter(|transition| authorize(actor, *transition, enrollment, actor.user_id).is_ok())
        .map(OfferedAction::from)
        .collect()
}

/// Action offered on an event card in the participant catalog.
///
/// A participant with an active enrollment always gets the non-mutating
/// [`OfferedAction::ViewEnrollment`], even when the event is full. Otherwise
/// [`OfferedAction::Enroll`] is offered while places remain. Organizers browse
/// events without enrollment actions.
#[must_use]
pub fn catalog_offer(role: Role, event: &Event, has_active_enrollment: bool) -> Option<OfferedAction> {
    if role != Role::Participant {
        return None;
    }

    if has_active_enrollment {
        Some(OfferedAction::ViewEnrollment)
    } else if capacity::accepts_new_enrollment(event, has_active_enrollment) {
        Some(OfferedAction::Enroll)
    } else {
        None
    }
}

/// Actions offered on an event in the organizer's own list.
#[must_use]
pub fn organizer_event_offers(actor: Actor, event: &Event) -> Offers {
    if actor.role == Role::Organizer && event.is_owned_by(actor.user_id) {
        SmallVec::from_slice(&[
            OfferedAction::ViewEnrollments,
            OfferedAction::EditEvent,
            OfferedAction::DeleteEvent,
        ])
    } else {
        SmallVec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::types::{EnrollmentId, EnrollmentStatus, EventId};
    use chrono::NaiveDate;

    fn event(organizer: UserId, capacity: u32, current_enrollments: u32) -> Event {
        let start = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Event {
            id: EventId::new(),
            title: "Workshop".to_string(),
            description: "Hands-on".to_string(),
            start_date_time: start,
            end_date_time: start + chrono::Duration::hours(3),
            location: "Braga".to_string(),
            capacity,
            organizer_id: organizer,
            organizer_name: Some("Org".to_string()),
            current_enrollments,
            is_active: Some(true),
            created_at: None,
        }
    }

    fn enrollment(participant: UserId, status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id: EnrollmentId::new(),
            event_id: EventId::new(),
            event_title: None,
            event_start_date_time: None,
            event_location: None,
            participant_id: participant,
            participant_name: None,
            participant_email: None,
            status,
            enrollment_date: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn organizer_sees_confirm_and_reject_on_pending_only() {
        let organizer = UserId::new();
        let actor = Actor::new(organizer, Role::Organizer);
        let participant = UserId::new();

        let pending = enrollment(participant, EnrollmentStatus::Pending);
        assert_eq!(
            enrollment_offers(actor, &pending, organizer).as_slice(),
            &[OfferedAction::Confirm, OfferedAction::Reject]
        );

        for status in [EnrollmentStatus::Confirmed, EnrollmentStatus::Canceled] {
            assert!(enrollment_offers(actor, &enrollment(participant, status), organizer).is_empty());
        }
    }

    #[test]
    fn organizer_of_another_event_sees_nothing() {
        let actor = Actor::new(UserId::new(), Role::Organizer);
        let pending = enrollment(UserId::new(), EnrollmentStatus::Pending);
        assert!(enrollment_offers(actor, &pending, UserId::new()).is_empty());
    }

    #[test]
    fn participant_sees_cancel_until_canceled() {
        let participant = UserId::new();
        let actor = Actor::new(participant, Role::Participant);
        let organizer = UserId::new();

        for status in [EnrollmentStatus::Pending, EnrollmentStatus::Confirmed] {
            assert_eq!(
                enrollment_offers(actor, &enrollment(participant, status), organizer).as_slice(),
                &[OfferedAction::Cancel]
            );
        }
        assert!(
            enrollment_offers(actor, &enrollment(participant, EnrollmentStatus::Canceled), organizer)
                .is_empty()
        );
    }

    #[test]
    fn own_list_offers_cancel_to_the_owner_only() {
        let participant = UserId::new();
        let row = enrollment(participant, EnrollmentStatus::Confirmed);

        let owner = Actor::new(participant, Role::Participant);
        assert_eq!(own_enrollment_offers(owner, &row).as_slice(), &[OfferedAction::Cancel]);

        let stranger = Actor::new(UserId::new(), Role::Participant);
        assert!(own_enrollment_offers(stranger, &row).is_empty());

        // Even an organizer id matching the actor never yields confirm/reject here
        let organizer = Actor::new(participant, Role::Organizer);
        let pending = enrollment(participant, EnrollmentStatus::Pending);
        assert!(own_enrollment_offers(organizer, &pending).is_empty());
    }

    #[test]
    fn full_event_hides_enroll_but_keeps_view() {
        let full = event(UserId::new(), 2, 2);

        assert_eq!(catalog_offer(Role::Participant, &full, false), None);
        let offer = catalog_offer(Role::Participant, &full, true).unwrap();
        assert_eq!(offer, OfferedAction::ViewEnrollment);
        assert!(!offer.is_mutating());
    }

    #[test]
    fn open_event_offers_enroll() {
        let open = event(UserId::new(), 2, 1);
        assert_eq!(
            catalog_offer(Role::Participant, &open, false),
            Some(OfferedAction::Enroll)
        );
        assert_eq!(catalog_offer(Role::Organizer, &open, false), None);
    }

    #[test]
    fn organizer_event_actions_require_ownership() {
        let organizer = UserId::new();
        let owned = event(organizer, 10, 0);

        assert_eq!(
            organizer_event_offers(Actor::new(organizer, Role::Organizer), &owned).len(),
            3
        );
        assert!(organizer_event_offers(Actor::new(UserId::new(), Role::Organizer), &owned).is_empty());
    }
}

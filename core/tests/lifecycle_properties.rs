//! Property tests for the enrollment lifecycle and capacity rules.

#![allow(clippy::unwrap_used)] // Test code

use chrono::NaiveDate;
use eventos_core::capacity::is_full;
use eventos_core::lifecycle::{check_transition, Actor, Transition};
use eventos_core::offers::{catalog_offer, enrollment_offers, OfferedAction};
use eventos_core::types::{Enrollment, EnrollmentId, EnrollmentStatus, Event, EventId, Role, UserId};
use eventos_testing::properties;
use proptest::prelude::*;

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
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    }
}

fn event(capacity: u32, current_enrollments: u32) -> Event {
    let start = NaiveDate::from_ymd_opt(2025, 7, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    Event {
        id: EventId::new(),
        title: "Conference".to_string(),
        description: "Annual".to_string(),
        start_date_time: start,
        end_date_time: start + chrono::Duration::hours(8),
        location: "Faro".to_string(),
        capacity,
        organizer_id: UserId::new(),
        organizer_name: None,
        current_enrollments,
        is_active: Some(true),
        created_at: None,
    }
}

proptest! {
    #[test]
    fn prop_transition_requires_matching_role_and_ownership(
        status in properties::status(),
        transition in properties::transition(),
        role in properties::role(),
        owns_enrollment in any::<bool>(),
        owns_event in any::<bool>(),
    ) {
        let actor_id = UserId::new();
        let participant = if owns_enrollment { actor_id } else { UserId::new() };
        let organizer = if owns_event { actor_id } else { UserId::new() };
        let record = enrollment(participant, status);

        let result = check_transition(Actor::new(actor_id, role), transition, &record, organizer);

        let authorized = match transition {
            Transition::Confirm | Transition::Reject => role == Role::Organizer && owns_event,
            Transition::Cancel => role == Role::Participant && owns_enrollment,
        };

        match result {
            Ok(next) => {
                prop_assert!(authorized);
                prop_assert_eq!(next, status.apply(transition).unwrap());
            }
            Err(err) => prop_assert_eq!(err.is_authorization(), !authorized),
        }
        // The record itself is never touched by the check
        prop_assert_eq!(record.status, status);
    }

    #[test]
    fn prop_canceled_is_terminal(transition in properties::transition()) {
        prop_assert!(EnrollmentStatus::Canceled.apply(transition).is_err());
    }

    #[test]
    fn prop_cancel_accepted_only_while_active(status in properties::status()) {
        prop_assert_eq!(status.apply(Transition::Cancel).is_ok(), status.is_active());
    }

    #[test]
    fn prop_is_full_iff_current_reaches_capacity(capacity in 1u32..500, current in 0u32..600) {
        let event = event(capacity, current);
        prop_assert_eq!(is_full(&event), current >= capacity);

        // Enrolled participants keep their view action whatever the fill level
        prop_assert_eq!(
            catalog_offer(Role::Participant, &event, true),
            Some(OfferedAction::ViewEnrollment)
        );
        prop_assert_eq!(
            catalog_offer(Role::Participant, &event, false) == Some(OfferedAction::Enroll),
            current < capacity
        );
    }

    #[test]
    fn prop_offered_actions_always_pass_the_transition_check(
        status in properties::status(),
        role in properties::role(),
        owns_enrollment in any::<bool>(),
        owns_event in any::<bool>(),
    ) {
        let actor_id = UserId::new();
        let participant = if owns_enrollment { actor_id } else { UserId::new() };
        let organizer = if owns_event { actor_id } else { UserId::new() };
        let record = enrollment(participant, status);
        let actor = Actor::new(actor_id, role);

        for offer in enrollment_offers(actor, &record, organizer) {
            let transition = offer.transition().unwrap();
            prop_assert!(check_transition(actor, transition, &record, organizer).is_ok());
        }
    }
}

#[test]
fn full_event_scenario_from_two_of_two() {
    let full = event(2, 2);

    assert_eq!(catalog_offer(Role::Participant, &full, false), None);
    let view = catalog_offer(Role::Participant, &full, true).unwrap();
    assert_eq!(view, OfferedAction::ViewEnrollment);
    assert!(!view.is_mutating());
}

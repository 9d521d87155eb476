//! Organizer view of one event's enrollments.
//!
//! Shows per-status counts, a status filter, and confirm/reject on Pending
//! rows. Capacity numbers always come from the event as fetched: a confirm
//! is never counted locally.

use crate::environment::AppEnvironment;
use crate::error::{AppError, Result};
use crate::notify::Notification;
use eventos_client::{collect_pages, ApiError, EventosBackend};
use eventos_core::capacity::{available_spots, is_full, EnrollmentStats};
use eventos_core::effect::Effect;
use eventos_core::lifecycle::{check_transition, Actor, Transition};
use eventos_core::offers::{enrollment_offers, Offers};
use eventos_core::reducer::Reducer;
use eventos_core::types::{EnrollmentId, EventId, Page};
use eventos_core::{smallvec, Enrollment, EnrollmentStatus, Event, SmallVec, User};
use std::marker::PhantomData;

/// The event and its enrollments, fetched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnrollmentsData {
    /// The event
    pub event: Event,
    /// Its enrollments
    pub enrollments: Page<Enrollment>,
}

/// Event enrollments view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnrollmentsState {
    /// The organizer
    pub viewer: User,
    /// Event being managed
    pub event_id: EventId,
    /// The event as last fetched
    pub event: Option<Event>,
    /// Every enrollment of the event, all pages, as last fetched
    pub enrollments: Vec<Enrollment>,
    /// Only show this status; `None` shows all
    pub filter: Option<EnrollmentStatus>,
    /// A fetch is in flight
    pub loading: bool,
    /// A confirm or reject is in flight
    pub submitting: bool,
    /// Last notification
    pub notification: Option<Notification>,
}

/// A listed enrollment and the actions it offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentRow<'a> {
    /// The enrollment
    pub enrollment: &'a Enrollment,
    /// Offered actions
    pub offers: Offers,
}

impl EventEnrollmentsState {
    /// Empty view of `event_id` for `viewer`.
    #[must_use]
    pub fn new(viewer: User, event_id: EventId) -> Self {
        Self {
            viewer,
            event_id,
            event: None,
            enrollments: Vec::new(),
            filter: None,
            loading: false,
            submitting: false,
            notification: None,
        }
    }

    /// Counts over every fetched enrollment, ignoring the filter.
    #[must_use]
    pub fn stats(&self) -> EnrollmentStats {
        EnrollmentStats::from_enrollments(&self.enrollments)
    }

    /// Places left in the event, once fetched.
    #[must_use]
    pub fn spots_left(&self) -> Option<u32> {
        self.event.as_ref().map(available_spots)
    }

    /// Whether the event is full, once fetched.
    #[must_use]
    pub fn is_full(&self) -> Option<bool> {
        self.event.as_ref().map(is_full)
    }

    /// Rows matching the filter.
    #[must_use]
    pub fn rows(&self) -> Vec<EnrollmentRow<'_>> {
        let actor = Actor::from(&self.viewer);
        let Some(event) = &self.event else {
            return Vec::new();
        };
        self.enrollments
            .iter()
            .filter(|e| self.filter.is_none_or(|status| e.status == status))
            .map(|enrollment| EnrollmentRow {
                enrollment,
                offers: enrollment_offers(actor, enrollment, event.organizer_id),
            })
            .collect()
    }

    fn check(&self, id: EnrollmentId, transition: Transition) -> Result<EnrollmentStatus> {
        if !self.viewer.is_organizer() {
            return Err(AppError::WrongRole {
                role: self.viewer.role,
                action: "manage enrollments",
            });
        }
        let event = self.event.as_ref().ok_or(AppError::Missing("event"))?;
        let enrollment = self
            .enrollments
            .iter()
            .find(|e| e.id == id)
            .ok_or(AppError::Missing("enrollment"))?;
        Ok(check_transition(
            Actor::from(&self.viewer),
            transition,
            enrollment,
            event.organizer_id,
        )?)
    }
}

/// What the organizer decided about a Pending enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Accept the participant
    Confirm,
    /// Turn the participant away
    Reject,
}

impl Decision {
    /// The lifecycle transition this decision requests.
    #[must_use]
    pub const fn transition(self) -> Transition {
        match self {
            Self::Confirm => Transition::Confirm,
            Self::Reject => Transition::Reject,
        }
    }

    const fn done(self) -> &'static str {
        match self {
            Self::Confirm => "Enrollment confirmed",
            Self::Reject => "Enrollment rejected",
        }
    }
}

/// Event enrollments actions.
#[derive(Debug, Clone)]
pub enum EventEnrollmentsAction {
    /// Fetch the event and its enrollments
    Load,
    /// Fetch finished
    Loaded(Result<EventEnrollmentsData>),
    /// Show only one status, or all
    SetFilter(Option<EnrollmentStatus>),
    /// Confirm a Pending enrollment
    Confirm {
        /// Enrollment to confirm
        id: EnrollmentId,
    },
    /// Reject a Pending enrollment
    Reject {
        /// Enrollment to reject
        id: EnrollmentId,
    },
    /// Confirm or reject finished
    Decided {
        /// What was requested
        decision: Decision,
        /// The enrollment as the backend stored it
        result: Result<Enrollment>,
    },
    /// Clear the notification
    DismissNotification,
}

/// Event enrollments reducer.
#[derive(Debug)]
pub struct EventEnrollmentsReducer<B> {
    _backend: PhantomData<fn() -> B>,
}

impl<B> Default for EventEnrollmentsReducer<B> {
    fn default() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B> Clone for EventEnrollmentsReducer<B> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<B: EventosBackend> EventEnrollmentsReducer<B> {
    fn decide(
        state: &mut EventEnrollmentsState,
        id: EnrollmentId,
        decision: Decision,
        env: &AppEnvironment<B>,
    ) -> SmallVec<[Effect<EventEnrollmentsAction>; 4]> {
        if state.submitting {
            tracing::debug!(enrollment_id = %id, "Transition already in flight, ignoring");
            return smallvec![Effect::None];
        }

        let transition = decision.transition();
        let expected = match state.check(id, transition) {
            Ok(expected) => expected,
            Err(err) => {
                state.notification = Some(env.failure(&err));
                return smallvec![Effect::None];
            },
        };

        state.submitting = true;
        tracing::info!(
            enrollment_id = %id,
            %transition,
            %expected,
            "Requesting enrollment transition"
        );

        let request = env.request(move |backend, token| async move {
            match decision {
                Decision::Confirm => backend.confirm_enrollment(&token, id).await,
                Decision::Reject => backend.reject_enrollment(&token, id).await,
            }
        });
        smallvec![Effect::Future(Box::pin(async move {
            Some(EventEnrollmentsAction::Decided {
                decision,
                result: request.await,
            })
        }))]
    }
}

impl<B: EventosBackend> Reducer for EventEnrollmentsReducer<B> {
    type State = EventEnrollmentsState;
    type Action = EventEnrollmentsAction;
    type Environment = AppEnvironment<B>;

    fn reduce(
        &self,
        state: &mut EventEnrollmentsState,
        action: EventEnrollmentsAction,
        env: &AppEnvironment<B>,
    ) -> SmallVec<[Effect<EventEnrollmentsAction>; 4]> {
        match action {
            EventEnrollmentsAction::Load => {
                state.loading = true;
                let event_id = state.event_id;
                let size = env.page_size();
                let request = env.request(move |backend, token| async move {
                    let event = backend.get_event(&token, event_id).await?;
                    let enrollments = collect_pages(size, |page| {
                        backend.event_enrollments(&token, event_id, page)
                    })
                    .await?;
                    Ok::<_, ApiError>(EventEnrollmentsData { event, enrollments })
                });
                smallvec![Effect::Future(Box::pin(async move {
                    Some(EventEnrollmentsAction::Loaded(request.await))
                }))]
            },

            EventEnrollmentsAction::Loaded(Ok(data)) => {
                state.loading = false;
                tracing::debug!(
                    event_id = %data.event.id,
                    current_enrollments = data.event.current_enrollments,
                    capacity = data.event.capacity,
                    "Event enrollments refreshed"
                );
                state.event = Some(data.event);
                state.enrollments = data.enrollments.content;
                smallvec![Effect::None]
            },

            EventEnrollmentsAction::Loaded(Err(err)) => {
                state.loading = false;
                state.notification = Some(env.failure(&err));
                smallvec![Effect::None]
            },

            EventEnrollmentsAction::SetFilter(filter) => {
                state.filter = filter;
                smallvec![Effect::None]
            },

            EventEnrollmentsAction::Confirm { id } => {
                Self::decide(state, id, Decision::Confirm, env)
            },

            EventEnrollmentsAction::Reject { id } => {
                Self::decide(state, id, Decision::Reject, env)
            },

            EventEnrollmentsAction::Decided { decision, result } => {
                state.submitting = false;
                state.notification = Some(match result {
                    Ok(enrollment) => {
                        tracing::info!(
                            enrollment_id = %enrollment.id,
                            ?decision,
                            status = %enrollment.status,
                            "Enrollment transitioned"
                        );
                        Notification::success(decision.done(), env.now())
                    },
                    Err(err) => env.failure(&err),
                });
                self.reduce(state, EventEnrollmentsAction::Load, env)
            },

            EventEnrollmentsAction::DismissNotification => {
                state.notification = None;
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ErrorKind;
    use crate::session::SessionStore;
    use eventos_core::Role;
    use eventos_core::offers::OfferedAction;
    use eventos_core::types::UserId;
    use eventos_core::NaiveDateTime;
    use eventos_testing::reducer_test::assertions;
    use eventos_testing::{test_clock, InMemoryBackend, ReducerTest};
    use std::sync::Arc;

    fn env() -> AppEnvironment<InMemoryBackend> {
        AppEnvironment::new(
            Arc::new(InMemoryBackend::new()),
            Arc::new(SessionStore::new()),
            Config::default(),
        )
        .with_clock(test_clock())
    }

    fn organizer() -> User {
        User {
            id: UserId::new(),
            name: "Ines".to_string(),
            email: "ines@example.com".to_string(),
            role: Role::Organizer,
            created_at: None,
        }
    }

    fn event(owner: UserId) -> Event {
        Event {
            id: EventId::new(),
            title: "Hackathon".to_string(),
            description: "24h".to_string(),
            start_date_time: NaiveDateTime::default(),
            end_date_time: NaiveDateTime::default() + chrono::Duration::hours(24),
            location: "Coimbra".to_string(),
            capacity: 3,
            organizer_id: owner,
            organizer_name: None,
            current_enrollments: 1,
            is_active: Some(true),
            created_at: None,
        }
    }

    fn enrollment(event: &Event, status: EnrollmentStatus) -> Enrollment {
        Enrollment {
            id: EnrollmentId::new(),
            event_id: event.id,
            event_title: None,
            event_start_date_time: None,
            event_location: None,
            participant_id: UserId::new(),
            participant_name: Some("Joao".to_string()),
            participant_email: None,
            status,
            enrollment_date: NaiveDateTime::default(),
        }
    }

    fn loaded(viewer: User, event: Event, enrollments: Vec<Enrollment>) -> EventEnrollmentsState {
        let mut state = EventEnrollmentsState::new(viewer, event.id);
        state.event = Some(event);
        state.enrollments = enrollments;
        state
    }

    #[test]
    fn stats_and_rows_of_an_owned_event() {
        let viewer = organizer();
        let owned = event(viewer.id);
        let rows = vec![
            enrollment(&owned, EnrollmentStatus::Pending),
            enrollment(&owned, EnrollmentStatus::Confirmed),
            enrollment(&owned, EnrollmentStatus::Canceled),
        ];
        let mut state = loaded(viewer, owned, rows);

        let stats = state.stats();
        assert_eq!((stats.pending, stats.confirmed, stats.canceled), (1, 1, 1));
        assert_eq!(state.spots_left(), Some(2));
        assert_eq!(state.is_full(), Some(false));

        let offers: Vec<Offers> = state.rows().into_iter().map(|r| r.offers).collect();
        assert_eq!(offers[0].as_slice(), &[OfferedAction::Confirm, OfferedAction::Reject]);
        assert!(offers[1].is_empty());
        assert!(offers[2].is_empty());

        state.filter = Some(EnrollmentStatus::Pending);
        assert_eq!(state.rows().len(), 1);
        assert_eq!(state.stats().total(), 3);
    }

    #[test]
    fn confirming_a_confirmed_enrollment_is_a_state_conflict() {
        let viewer = organizer();
        let owned = event(viewer.id);
        let confirmed = enrollment(&owned, EnrollmentStatus::Confirmed);
        let state = loaded(viewer, owned, vec![confirmed.clone()]);

        let err = state.check(confirmed.id, Transition::Confirm).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StateConflict);

        ReducerTest::new(EventEnrollmentsReducer::default())
            .with_env(env())
            .given_state(state)
            .when_action(EventEnrollmentsAction::Confirm { id: confirmed.id })
            .then_state(|state| {
                assert!(!state.submitting);
                assert_eq!(state.enrollments[0].status, EnrollmentStatus::Confirmed);
            })
            .then_refused()
            .run();
    }

    #[test]
    fn organizer_of_another_event_cannot_confirm() {
        let foreign = event(UserId::new());
        let pending = enrollment(&foreign, EnrollmentStatus::Pending);
        let state = loaded(organizer(), foreign, vec![pending.clone()]);

        assert!(state.rows()[0].offers.is_empty());
        let err = state.check(pending.id, Transition::Reject).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
    }

    #[test]
    fn pending_confirm_is_requested() {
        let viewer = organizer();
        let owned = event(viewer.id);
        let pending = enrollment(&owned, EnrollmentStatus::Pending);

        ReducerTest::new(EventEnrollmentsReducer::default())
            .with_env(env())
            .given_state(loaded(viewer, owned, vec![pending.clone()]))
            .when_action(EventEnrollmentsAction::Confirm { id: pending.id })
            .then_state(|state| {
                assert!(state.submitting);
                // Status only changes after the refetch
                assert_eq!(state.enrollments[0].status, EnrollmentStatus::Pending);
            })
            .then_effects(assertions::assert_sends_request)
            .run();
    }

    #[test]
    fn decisions_map_to_organizer_transitions_only() {
        assert_eq!(Decision::Confirm.transition(), Transition::Confirm);
        assert_eq!(Decision::Reject.transition(), Transition::Reject);
    }

    #[test]
    fn success_message_names_the_requested_decision() {
        let viewer = organizer();
        let owned = event(viewer.id);
        let mut rejected = enrollment(&owned, EnrollmentStatus::Canceled);
        let state = loaded(viewer, owned, vec![rejected.clone()]);

        ReducerTest::new(EventEnrollmentsReducer::default())
            .with_env(env())
            .given_state(state.clone())
            .when_action(EventEnrollmentsAction::Decided {
                decision: Decision::Reject,
                result: Ok(rejected.clone()),
            })
            .then_state(|state| {
                let notification = state.notification.as_ref().unwrap();
                assert_eq!(notification.level, crate::notify::Level::Success);
                assert_eq!(notification.message, "Enrollment rejected");
            })
            .then_effects(assertions::assert_sends_request)
            .run();

        // Whatever status comes back, a confirm reads as a confirm
        rejected.status = EnrollmentStatus::Pending;
        ReducerTest::new(EventEnrollmentsReducer::default())
            .with_env(env())
            .given_state(state)
            .when_action(EventEnrollmentsAction::Decided {
                decision: Decision::Confirm,
                result: Ok(rejected),
            })
            .then_state(|state| {
                assert_eq!(
                    state.notification.as_ref().unwrap().message,
                    "Enrollment confirmed"
                );
            })
            .run();
    }

    #[test]
    fn rejected_transition_keeps_rows_and_reloads() {
        let viewer = organizer();
        let owned = event(viewer.id);
        let pending = enrollment(&owned, EnrollmentStatus::Pending);
        let mut state = loaded(viewer, owned, vec![pending]);
        state.submitting = true;
        let before = state.enrollments.clone();

        ReducerTest::new(EventEnrollmentsReducer::default())
            .with_env(env())
            .given_state(state)
            .when_action(EventEnrollmentsAction::Decided {
                decision: Decision::Confirm,
                result: Err(AppError::Api(ApiError::Conflict {
                    message: "Apenas inscrições pendentes podem ser confirmadas".to_string(),
                })),
            })
            .then_state(move |state| {
                assert!(!state.submitting);
                assert!(state.loading);
                assert_eq!(state.enrollments, before);
                let notification = state.notification.as_ref().unwrap();
                assert_eq!(
                    notification.message,
                    "Apenas inscrições pendentes podem ser confirmadas"
                );
            })
            .then_effects(assertions::assert_sends_request)
            .run();
    }
}

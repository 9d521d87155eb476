//! Participant dashboard: the event catalog.
//!
//! Lists events with the one action each card offers the viewer, supports
//! search, and lets a participant enroll.

use crate::environment::AppEnvironment;
use crate::error::{AppError, Result};
use crate::notify::Notification;
use eventos_client::{collect_pages, ApiError, CreateEnrollmentRequest, EventosBackend};
use eventos_core::capacity::{available_spots, is_full};
use eventos_core::effect::Effect;
use eventos_core::offers::{catalog_offer, OfferedAction};
use eventos_core::reducer::Reducer;
use eventos_core::types::{Enrollment, EventId, Page};
use eventos_core::{smallvec, Event, SmallVec, User};
use std::marker::PhantomData;

/// Events and the viewer's enrollments, fetched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogData {
    /// Events matching the current query
    pub events: Page<Event>,
    /// The viewer's enrollments
    pub enrollments: Page<Enrollment>,
}

/// Catalog view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    /// Who is looking
    pub viewer: User,
    /// Events as last fetched
    pub events: Vec<Event>,
    /// The viewer's enrollments as last fetched
    pub enrollments: Vec<Enrollment>,
    /// Current search query; empty lists everything
    pub query: String,
    /// A fetch is in flight
    pub loading: bool,
    /// An enrollment request is in flight; further submits are ignored
    pub submitting: bool,
    /// Last notification
    pub notification: Option<Notification>,
}

/// One event card with what it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCard<'a> {
    /// The event
    pub event: &'a Event,
    /// The viewer's active enrollment in it
    pub enrollment: Option<&'a Enrollment>,
    /// The single action the card offers
    pub offer: Option<OfferedAction>,
    /// Places left
    pub spots_left: u32,
    /// No places left
    pub is_full: bool,
}

impl CatalogState {
    /// Empty catalog for `viewer`.
    #[must_use]
    pub fn new(viewer: User) -> Self {
        Self {
            viewer,
            events: Vec::new(),
            enrollments: Vec::new(),
            query: String::new(),
            loading: false,
            submitting: false,
            notification: None,
        }
    }

    /// The viewer's active enrollment in `event_id`.
    #[must_use]
    pub fn active_enrollment(&self, event_id: EventId) -> Option<&Enrollment> {
        self.enrollments
            .iter()
            .find(|e| e.event_id == event_id && e.is_active())
    }

    /// Cards for every listed event, derived from the current state.
    #[must_use]
    pub fn cards(&self) -> Vec<EventCard<'_>> {
        self.events
            .iter()
            .map(|event| {
                let enrollment = self.active_enrollment(event.id);
                EventCard {
                    event,
                    enrollment,
                    offer: catalog_offer(self.viewer.role, event, enrollment.is_some()),
                    spots_left: available_spots(event),
                    is_full: is_full(event),
                }
            })
            .collect()
    }

    /// Card of one event.
    #[must_use]
    pub fn card(&self, event_id: EventId) -> Option<EventCard<'_>> {
        self.cards().into_iter().find(|c| c.event.id == event_id)
    }
}

/// Catalog actions.
#[derive(Debug, Clone)]
pub enum CatalogAction {
    /// Fetch events for the current query and the viewer's enrollments
    Load,
    /// Change the query and fetch; a blank query lists every event
    Search {
        /// Search text
        query: String,
    },
    /// Fetch finished
    Loaded(Result<CatalogData>),
    /// Enroll the viewer into an event
    Enroll {
        /// Event to enroll into
        event_id: EventId,
    },
    /// Enrollment request finished
    Enrolled(Result<Enrollment>),
    /// Clear the notification
    DismissNotification,
}

/// Catalog reducer.
#[derive(Debug)]
pub struct CatalogReducer<B> {
    _backend: PhantomData<fn() -> B>,
}

impl<B> Default for CatalogReducer<B> {
    fn default() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B> Clone for CatalogReducer<B> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<B: EventosBackend> CatalogReducer<B> {
    fn fetch(env: &AppEnvironment<B>, query: String) -> Effect<CatalogAction> {
        let events_size = env.catalog_page_size();
        let enrollments_size = env.page_size();

        let request = env.request(move |backend, token| async move {
            let events = if query.is_empty() {
                collect_pages(events_size, |page| backend.list_events(&token, page)).await?
            } else {
                collect_pages(events_size, |page| backend.search_events(&token, &query, page))
                    .await?
            };
            let enrollments =
                collect_pages(enrollments_size, |page| backend.my_enrollments(&token, page))
                    .await?;
            Ok::<_, ApiError>(CatalogData {
                events,
                enrollments,
            })
        });

        Effect::Future(Box::pin(async move { Some(CatalogAction::Loaded(request.await)) }))
    }

    /// Local checks before an enrollment request.
    fn check_enroll(state: &CatalogState, event_id: EventId) -> Result<()> {
        if !state.viewer.is_participant() {
            return Err(AppError::WrongRole {
                role: state.viewer.role,
                action: "enroll in events",
            });
        }
        let card = state.card(event_id).ok_or(AppError::Missing("event"))?;
        match card.offer {
            Some(OfferedAction::Enroll) => Ok(()),
            Some(_) => Err(AppError::AlreadyEnrolled),
            None => Err(AppError::EventFull),
        }
    }
}

impl<B: EventosBackend> Reducer for CatalogReducer<B> {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = AppEnvironment<B>;

    fn reduce(
        &self,
        state: &mut CatalogState,
        action: CatalogAction,
        env: &AppEnvironment<B>,
    ) -> SmallVec<[Effect<CatalogAction>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Fetching
            // ═══════════════════════════════════════════════════════════════
            CatalogAction::Load => {
                state.loading = true;
                smallvec![Self::fetch(env, state.query.clone())]
            },

            CatalogAction::Search { query } => {
                state.query = query.trim().to_string();
                self.reduce(state, CatalogAction::Load, env)
            },

            CatalogAction::Loaded(Ok(data)) => {
                state.loading = false;
                state.events = data.events.content;
                state.enrollments = data.enrollments.content;
                tracing::debug!(
                    events = state.events.len(),
                    enrollments = state.enrollments.len(),
                    "Catalog refreshed"
                );
                if state.events.is_empty() && !state.query.is_empty() {
                    state.notification = Some(Notification::info(
                        format!("No events match \"{}\"", state.query),
                        env.now(),
                    ));
                }
                smallvec![Effect::None]
            },

            CatalogAction::Loaded(Err(err)) => {
                state.loading = false;
                state.notification = Some(env.failure(&err));
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Enrolling
            // ═══════════════════════════════════════════════════════════════
            CatalogAction::Enroll { event_id } => {
                if state.submitting {
                    tracing::debug!(%event_id, "Enrollment already in flight, ignoring");
                    return smallvec![Effect::None];
                }

                if let Err(err) = Self::check_enroll(state, event_id) {
                    state.notification = Some(env.failure(&err));
                    return smallvec![Effect::None];
                }

                state.submitting = true;
                tracing::info!(%event_id, user_id = %state.viewer.id, "Requesting enrollment");

                let request = env.request(move |backend, token| async move {
                    backend
                        .create_enrollment(&token, &CreateEnrollmentRequest { event_id })
                        .await
                });
                smallvec![Effect::Future(Box::pin(async move {
                    Some(CatalogAction::Enrolled(request.await))
                }))]
            },

            CatalogAction::Enrolled(result) => {
                state.submitting = false;
                state.notification = Some(match result {
                    Ok(enrollment) => {
                        tracing::info!(
                            enrollment_id = %enrollment.id,
                            status = %enrollment.status,
                            "Enrollment created"
                        );
                        let title = enrollment.event_title.as_deref().unwrap_or("the event");
                        Notification::success(
                            format!("Enrolled in {title}. Waiting for the organizer to confirm."),
                            env.now(),
                        )
                    },
                    Err(err) => env.failure(&err),
                });
                self.reduce(state, CatalogAction::Load, env)
            },

            CatalogAction::DismissNotification => {
                state.notification = None;
                smallvec![Effect::None]
            },
        }
    }
}

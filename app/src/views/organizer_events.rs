//! Organizer dashboard: the organizer's own events.

use crate::environment::AppEnvironment;
use crate::error::{AppError, Result};
use crate::notify::Notification;
use eventos_client::{collect_pages, CreateEventRequest, EventosBackend, UpdateEventRequest};
use eventos_core::capacity::available_spots;
use eventos_core::effect::Effect;
use eventos_core::lifecycle::Actor;
use eventos_core::offers::{organizer_event_offers, OfferedAction, Offers};
use eventos_core::reducer::Reducer;
use eventos_core::types::{EventId, Page};
use eventos_core::validation::EventForm;
use eventos_core::{smallvec, Event, SmallVec, User};
use std::marker::PhantomData;

/// Organizer events view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizerEventsState {
    /// The organizer
    pub viewer: User,
    /// Owned events as last fetched
    pub events: Vec<Event>,
    /// A fetch is in flight
    pub loading: bool,
    /// A create, update or delete is in flight
    pub submitting: bool,
    /// Last notification
    pub notification: Option<Notification>,
}

/// An owned event and the actions it offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow<'a> {
    /// The event
    pub event: &'a Event,
    /// Places left
    pub spots_left: u32,
    /// Offered actions
    pub offers: Offers,
}

impl OrganizerEventsState {
    /// Empty list for `viewer`.
    #[must_use]
    pub fn new(viewer: User) -> Self {
        Self {
            viewer,
            events: Vec::new(),
            loading: false,
            submitting: false,
            notification: None,
        }
    }

    /// One row per listed event.
    #[must_use]
    pub fn rows(&self) -> Vec<EventRow<'_>> {
        let actor = Actor::from(&self.viewer);
        self.events
            .iter()
            .map(|event| EventRow {
                event,
                spots_left: available_spots(event),
                offers: organizer_event_offers(actor, event),
            })
            .collect()
    }

    /// Check that the viewer may perform `offer` on a listed event.
    fn check_offer(&self, id: EventId, offer: OfferedAction, action: &'static str) -> Result<()> {
        let event = self
            .events
            .iter()
            .find(|e| e.id == id)
            .ok_or(AppError::Missing("event"))?;
        if organizer_event_offers(Actor::from(&self.viewer), event).contains(&offer) {
            Ok(())
        } else {
            Err(AppError::NotEventOwner { action })
        }
    }
}

/// Organizer events actions.
#[derive(Debug, Clone)]
pub enum OrganizerEventsAction {
    /// Fetch owned events
    Load,
    /// Fetch finished
    Loaded(Result<Page<Event>>),
    /// Create an event from a form
    Create {
        /// Form as typed
        form: EventForm,
    },
    /// Replace an owned event's fields with a form
    Update {
        /// Event to update
        id: EventId,
        /// Form as typed
        form: EventForm,
    },
    /// Delete an owned event
    Delete {
        /// Event to delete
        id: EventId,
    },
    /// Create or update finished
    Saved(Result<Event>),
    /// Delete finished
    Deleted(Result<EventId>),
    /// Clear the notification
    DismissNotification,
}

/// Organizer events reducer.
#[derive(Debug)]
pub struct OrganizerEventsReducer<B> {
    _backend: PhantomData<fn() -> B>,
}

impl<B> Default for OrganizerEventsReducer<B> {
    fn default() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B> Clone for OrganizerEventsReducer<B> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<B: EventosBackend> OrganizerEventsReducer<B> {
    /// Refuse locally: notify and send nothing.
    fn refuse(
        state: &mut OrganizerEventsState,
        err: &AppError,
        env: &AppEnvironment<B>,
    ) -> SmallVec<[Effect<OrganizerEventsAction>; 4]> {
        state.notification = Some(env.failure(err));
        smallvec![Effect::None]
    }
}

impl<B: EventosBackend> Reducer for OrganizerEventsReducer<B> {
    type State = OrganizerEventsState;
    type Action = OrganizerEventsAction;
    type Environment = AppEnvironment<B>;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut OrganizerEventsState,
        action: OrganizerEventsAction,
        env: &AppEnvironment<B>,
    ) -> SmallVec<[Effect<OrganizerEventsAction>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════════
            // Fetching
            // ═══════════════════════════════════════════════════════════════
            OrganizerEventsAction::Load => {
                state.loading = true;
                let size = env.page_size();
                let request = env.request(move |backend, token| async move {
                    collect_pages(size, |page| backend.my_events(&token, page)).await
                });
                smallvec![Effect::Future(Box::pin(async move {
                    Some(OrganizerEventsAction::Loaded(request.await))
                }))]
            },

            OrganizerEventsAction::Loaded(result) => {
                state.loading = false;
                match result {
                    Ok(page) => state.events = page.content,
                    Err(err) => state.notification = Some(env.failure(&err)),
                }
                smallvec![Effect::None]
            },

            // ═══════════════════════════════════════════════════════════════
            // Mutations
            // ═══════════════════════════════════════════════════════════════
            OrganizerEventsAction::Create { form } => {
                if state.submitting {
                    return smallvec![Effect::None];
                }
                if !state.viewer.is_organizer() {
                    let err = AppError::WrongRole {
                        role: state.viewer.role,
                        action: "create events",
                    };
                    return Self::refuse(state, &err, env);
                }
                let valid = match form.validate() {
                    Ok(valid) => valid,
                    Err(err) => return Self::refuse(state, &AppError::from(err), env),
                };

                state.submitting = true;
                tracing::info!(title = %valid.title, capacity = valid.capacity, "Creating event");

                let body = CreateEventRequest::from(valid);
                let request = env.request(move |backend, token| async move {
                    backend.create_event(&token, &body).await
                });
                smallvec![Effect::Future(Box::pin(async move {
                    Some(OrganizerEventsAction::Saved(request.await))
                }))]
            },

            OrganizerEventsAction::Update { id, form } => {
                if state.submitting {
                    return smallvec![Effect::None];
                }
                if let Err(err) = state.check_offer(id, OfferedAction::EditEvent, "edit it") {
                    return Self::refuse(state, &err, env);
                }
                let valid = match form.validate() {
                    Ok(valid) => valid,
                    Err(err) => return Self::refuse(state, &AppError::from(err), env),
                };

                state.submitting = true;
                tracing::info!(event_id = %id, "Updating event");

                let body = UpdateEventRequest::from(valid);
                let request = env.request(move |backend, token| async move {
                    backend.update_event(&token, id, &body).await
                });
                smallvec![Effect::Future(Box::pin(async move {
                    Some(OrganizerEventsAction::Saved(request.await))
                }))]
            },

            OrganizerEventsAction::Delete { id } => {
                if state.submitting {
                    return smallvec![Effect::None];
                }
                if let Err(err) = state.check_offer(id, OfferedAction::DeleteEvent, "delete it") {
                    return Self::refuse(state, &err, env);
                }

                state.submitting = true;
                tracing::info!(event_id = %id, "Deleting event");

                let request = env.request(move |backend, token| async move {
                    backend.delete_event(&token, id).await
                });
                smallvec![Effect::Future(Box::pin(async move {
                    Some(OrganizerEventsAction::Deleted(request.await.map(|()| id)))
                }))]
            },

            OrganizerEventsAction::Saved(result) => {
                state.submitting = false;
                state.notification = Some(match result {
                    Ok(event) => {
                        tracing::info!(event_id = %event.id, "Event saved");
                        Notification::success(format!("Event \"{}\" saved", event.title), env.now())
                    },
                    Err(err) => env.failure(&err),
                });
                self.reduce(state, OrganizerEventsAction::Load, env)
            },

            OrganizerEventsAction::Deleted(result) => {
                state.submitting = false;
                state.notification = Some(match result {
                    Ok(id) => {
                        tracing::info!(event_id = %id, "Event deleted");
                        Notification::success("Event deleted", env.now())
                    },
                    Err(err) => env.failure(&err),
                });
                self.reduce(state, OrganizerEventsAction::Load, env)
            },

            OrganizerEventsAction::DismissNotification => {
                state.notification = None;
                smallvec![Effect::None]
            },
        }
    }
}

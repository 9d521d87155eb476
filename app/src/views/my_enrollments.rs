//! Participant view of their own enrollments.

use crate::environment::AppEnvironment;
use crate::error::{AppError, Result};
use crate::notify::Notification;
use eventos_client::{collect_pages, EventosBackend};
use eventos_core::effect::Effect;
use eventos_core::lifecycle::{check_cancel, Actor};
use eventos_core::offers::{own_enrollment_offers, Offers};
use eventos_core::reducer::Reducer;
use eventos_core::types::{EnrollmentId, Page};
use eventos_core::{smallvec, Enrollment, EnrollmentStatus, SmallVec, User};
use std::marker::PhantomData;

/// My-enrollments view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MyEnrollmentsState {
    /// The participant
    pub viewer: User,
    /// Enrollments as last fetched
    pub enrollments: Vec<Enrollment>,
    /// Only show this status; `None` shows all
    pub filter: Option<EnrollmentStatus>,
    /// A fetch is in flight
    pub loading: bool,
    /// A cancel is in flight
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

impl MyEnrollmentsState {
    /// Empty list for `viewer`.
    #[must_use]
    pub fn new(viewer: User) -> Self {
        Self {
            viewer,
            enrollments: Vec::new(),
            filter: None,
            loading: false,
            submitting: false,
            notification: None,
        }
    }

    /// Rows matching the filter.
    #[must_use]
    pub fn rows(&self) -> Vec<EnrollmentRow<'_>> {
        let actor = Actor::from(&self.viewer);
        self.enrollments
            .iter()
            .filter(|e| self.filter.is_none_or(|status| e.status == status))
            .map(|enrollment| EnrollmentRow {
                enrollment,
                offers: own_enrollment_offers(actor, enrollment),
            })
            .collect()
    }

    fn find(&self, id: EnrollmentId) -> Option<&Enrollment> {
        self.enrollments.iter().find(|e| e.id == id)
    }
}

/// My-enrollments actions.
#[derive(Debug, Clone)]
pub enum MyEnrollmentsAction {
    /// Fetch the list
    Load,
    /// Fetch finished
    Loaded(Result<Page<Enrollment>>),
    /// Show only one status, or all
    SetFilter(Option<EnrollmentStatus>),
    /// Cancel one of the participant's enrollments
    Cancel {
        /// Enrollment to cancel
        id: EnrollmentId,
    },
    /// Cancel finished
    Canceled(Result<Option<Enrollment>>),
    /// Clear the notification
    DismissNotification,
}

/// My-enrollments reducer.
#[derive(Debug)]
pub struct MyEnrollmentsReducer<B> {
    _backend: PhantomData<fn() -> B>,
}

impl<B> Default for MyEnrollmentsReducer<B> {
    fn default() -> Self {
        Self {
            _backend: PhantomData,
        }
    }
}

impl<B> Clone for MyEnrollmentsReducer<B> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<B: EventosBackend> Reducer for MyEnrollmentsReducer<B> {
    type State = MyEnrollmentsState;
    type Action = MyEnrollmentsAction;
    type Environment = AppEnvironment<B>;

    fn reduce(
        &self,
        state: &mut MyEnrollmentsState,
        action: MyEnrollmentsAction,
        env: &AppEnvironment<B>,
    ) -> SmallVec<[Effect<MyEnrollmentsAction>; 4]> {
        match action {
            MyEnrollmentsAction::Load => {
                state.loading = true;
                let size = env.page_size();
                let request = env.request(move |backend, token| async move {
                    collect_pages(size, |page| backend.my_enrollments(&token, page)).await
                });
                smallvec![Effect::Future(Box::pin(async move {
                    Some(MyEnrollmentsAction::Loaded(request.await))
                }))]
            },

            MyEnrollmentsAction::Loaded(result) => {
                state.loading = false;
                match result {
                    Ok(page) => state.enrollments = page.content,
                    Err(err) => state.notification = Some(env.failure(&err)),
                }
                smallvec![Effect::None]
            },

            MyEnrollmentsAction::SetFilter(filter) => {
                state.filter = filter;
                smallvec![Effect::None]
            },

            MyEnrollmentsAction::Cancel { id } => {
                if state.submitting {
                    return smallvec![Effect::None];
                }

                let checked = if state.viewer.is_participant() {
                    state
                        .find(id)
                        .ok_or(AppError::Missing("enrollment"))
                        .and_then(|e| check_cancel(Actor::from(&state.viewer), e).map_err(AppError::from))
                } else {
                    Err(AppError::WrongRole {
                        role: state.viewer.role,
                        action: "cancel enrollments",
                    })
                };

                if let Err(err) = checked {
                    state.notification = Some(env.failure(&err));
                    return smallvec![Effect::None];
                }

                state.submitting = true;
                tracing::info!(enrollment_id = %id, "Canceling enrollment");

                let request = env.request(move |backend, token| async move {
                    backend.cancel_enrollment(&token, id).await
                });
                smallvec![Effect::Future(Box::pin(async move {
                    Some(MyEnrollmentsAction::Canceled(request.await))
                }))]
            },

            MyEnrollmentsAction::Canceled(result) => {
                state.submitting = false;
                state.notification = Some(match result {
                    Ok(_) => Notification::success("Enrollment canceled", env.now()),
                    Err(err) => env.failure(&err),
                });
                self.reduce(state, MyEnrollmentsAction::Load, env)
            },

            MyEnrollmentsAction::DismissNotification => {
                state.notification = None;
                smallvec![Effect::None]
            },
        }
    }
}

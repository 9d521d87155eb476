//! Enrollment lifecycle state machine.
//!
//! ```text
//! Pending ──confirm──▶ Confirmed
//!    │                     │
//!    ├──reject───┐         │
//!    └──cancel───┴──▶ Canceled ◀──cancel──┘
//! ```
//!
//! The backend performs every transition. The client runs the same rules
//! before sending a request so a view built from a stale read cannot submit an
//! action whose preconditions no longer hold.

use crate::error::LifecycleError;
use crate::types::{Enrollment, EnrollmentStatus, Role, User, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A request to move an enrollment to another state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Pending → Confirmed, by the event's organizer
    Confirm,
    /// Pending → Canceled, by the event's organizer
    Reject,
    /// Pending | Confirmed → Canceled, by the enrollment's participant
    Cancel,
}

impl Transition {
    /// The only role allowed to request this transition.
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::Confirm | Self::Reject => Role::Organizer,
            Self::Cancel => Role::Participant,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirm => write!(f, "confirm"),
            Self::Reject => write!(f, "reject"),
            Self::Cancel => write!(f, "cancel"),
        }
    }
}

impl EnrollmentStatus {
    /// Apply `transition` to this status.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] when the transition is not
    /// defined from the current status.
    pub const fn apply(self, transition: Transition) -> Result<Self, LifecycleError> {
        match (self, transition) {
            (Self::Pending, Transition::Confirm) => Ok(Self::Confirmed),
            (Self::Pending, Transition::Reject)
            | (Self::Pending | Self::Confirmed, Transition::Cancel) => Ok(Self::Canceled),
            (from, transition) => Err(LifecycleError::InvalidTransition { from, transition }),
        }
    }

    /// Transitions defined from this status, regardless of who asks.
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [Transition] {
        match self {
            Self::Pending => &[Transition::Confirm, Transition::Reject, Transition::Cancel],
            Self::Confirmed => &[Transition::Cancel],
            Self::Canceled => &[],
        }
    }
}

/// Who is asking for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Acting user
    pub user_id: UserId,
    /// Role of the acting user
    pub role: Role,
}

impl Actor {
    /// Create an actor.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

/// Check that `actor` may request `transition` on `enrollment`.
///
/// `event_organizer` is the owner of the enrollment's event.
///
/// # Errors
///
/// - [`LifecycleError::RoleNotAllowed`] when the role never performs this transition
/// - [`LifecycleError::NotOwner`] when the actor does not own the enrollment
///   (cancel) or the event (confirm, reject)
pub fn authorize(
    actor: Actor,
    transition: Transition,
    enrollment: &Enrollment,
    event_organizer: UserId,
) -> Result<(), LifecycleError> {
    if actor.role != transition.required_role() {
        return Err(LifecycleError::RoleNotAllowed {
            role: actor.role,
            transition,
        });
    }

    let owns = match transition {
        Transition::Confirm | Transition::Reject => actor.user_id == event_organizer,
        Transition::Cancel => enrollment.is_owned_by(actor.user_id),
    };

    if owns {
        Ok(())
    } else {
        Err(LifecycleError::NotOwner { transition })
    }
}

/// Run both the ownership and the state checks, returning the expected next status.
///
/// Authorization is checked first so an outsider learns nothing about the
/// enrollment's state.
///
/// # Errors
///
/// Any error from [`authorize`] or [`EnrollmentStatus::apply`].
pub fn check_transition(
    actor: Actor,
    transition: Transition,
    enrollment: &Enrollment,
    event_organizer: UserId,
) -> Result<EnrollmentStatus, LifecycleError> {
    authorize(actor, transition, enrollment, event_organizer)?;
    enrollment.status.apply(transition)
}

/// [`check_transition`] for a cancel, which only looks at who owns the enrollment.
///
/// Views listing a participant's own enrollments do not know each event's
/// organizer; cancel never needs it.
///
/// # Errors
///
/// Same as [`check_transition`] with [`Transition::Cancel`].
pub fn check_cancel(actor: Actor, enrollment: &Enrollment) -> Result<EnrollmentStatus, LifecycleError> {
    check_transition(actor, Transition::Cancel, enrollment, actor.user_id)
}

//! Errors raised by client-side checks, before any request leaves the client.

use crate::lifecycle::Transition;
use crate::types::{EnrollmentStatus, Role};
use thiserror::Error;

/// A form failed validation and must not be submitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty.
    #[error("Please fill in the {field} field")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password is below the minimum length.
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort {
        /// Minimum accepted length
        min: usize,
    },

    /// A new password was given without the current one.
    #[error("Enter your current password to change it")]
    CurrentPasswordRequired,

    /// The backend says the current password is wrong.
    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    /// Capacity must be at least one.
    #[error("Capacity must be at least 1 (got {capacity})")]
    CapacityBelowMinimum {
        /// Rejected capacity
        capacity: i64,
    },

    /// Start is not strictly before end.
    #[error("Start date must be before end date")]
    StartNotBeforeEnd,
}

/// A lifecycle transition was refused locally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The enrollment is not in a state the transition accepts.
    #[error("Cannot {transition} an enrollment that is {from}")]
    InvalidTransition {
        /// Current status
        from: EnrollmentStatus,
        /// Requested transition
        transition: Transition,
    },

    /// The actor's role may not perform the transition.
    #[error("A {role} cannot {transition} enrollments")]
    RoleNotAllowed {
        /// Actor role
        role: Role,
        /// Requested transition
        transition: Transition,
    },

    /// The actor does not own the enrollment or its event.
    #[error("Only the owner may {transition} this enrollment")]
    NotOwner {
        /// Requested transition
        transition: Transition,
    },
}

impl LifecycleError {
    /// Whether the refusal is about who is asking rather than the current state.
    #[must_use]
    pub const fn is_authorization(&self) -> bool {
        matches!(self, Self::RoleNotAllowed { .. } | Self::NotOwner { .. })
    }
}

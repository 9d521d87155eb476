//! Application error types.

use eventos_client::{ApiError, ErrorCategory};
use eventos_core::{LifecycleError, Role, ValidationError};
use thiserror::Error;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Session errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The backend refused the credentials.
    #[error("Login failed: {message}")]
    LoginFailed {
        /// Backend message
        message: String,
    },

    /// No identity is held.
    #[error("You need to log in first")]
    NotAuthenticated,
}

/// How a failure should be treated by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caught before any request; nothing was sent
    Validation,
    /// Wrong role, not the owner, or no valid credential
    Authorization,
    /// The entity is not in the expected state
    StateConflict,
    /// The backend could not be reached or answered badly
    Transport,
}

impl From<ErrorCategory> for ErrorKind {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::Authorization => Self::Authorization,
            ErrorCategory::StateConflict => Self::StateConflict,
            ErrorCategory::Transport => Self::Transport,
        }
    }
}

/// Every failure a view can surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Form validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A lifecycle transition was refused locally
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The backend refused or could not be reached
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session problem
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The viewer's role does not offer this action
    #[error("A {role} account cannot {action}")]
    WrongRole {
        /// Viewer role
        role: Role,
        /// What was attempted
        action: &'static str,
    },

    /// The viewer does not own the event
    #[error("Only the organizer of this event can {action}")]
    NotEventOwner {
        /// What was attempted
        action: &'static str,
    },

    /// The participant already holds an active enrollment
    #[error("You are already enrolled in this event")]
    AlreadyEnrolled,

    /// No places left
    #[error("This event is full")]
    EventFull,

    /// The email is registered to another account
    #[error("This email is already in use")]
    EmailInUse,

    /// The entity is not in the displayed list anymore
    #[error("This {0} is no longer available")]
    Missing(&'static str),
}

impl AppError {
    /// Classify the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::EmailInUse => ErrorKind::Validation,
            Self::Lifecycle(err) => {
                if err.is_authorization() {
                    ErrorKind::Authorization
                } else {
                    ErrorKind::StateConflict
                }
            },
            Self::Api(err) => ErrorKind::from(err.category()),
            Self::Auth(_) | Self::WrongRole { .. } | Self::NotEventOwner { .. } => {
                ErrorKind::Authorization
            },
            Self::AlreadyEnrolled | Self::EventFull | Self::Missing(_) => ErrorKind::StateConflict,
        }
    }

    /// Text for an error notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventos_core::lifecycle::Transition;
    use eventos_core::EnrollmentStatus;

    #[test]
    fn kinds_follow_the_taxonomy() {
        assert_eq!(
            AppError::from(ValidationError::PasswordMismatch).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            AppError::from(LifecycleError::InvalidTransition {
                from: EnrollmentStatus::Confirmed,
                transition: Transition::Confirm,
            })
            .kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(
            AppError::from(LifecycleError::NotOwner {
                transition: Transition::Cancel
            })
            .kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            AppError::from(ApiError::from_response(409, "")).kind(),
            ErrorKind::StateConflict
        );
        assert_eq!(
            AppError::from(ApiError::Transport("refused".to_string())).kind(),
            ErrorKind::Transport
        );
        assert_eq!(AppError::from(AuthError::NotAuthenticated).kind(), ErrorKind::Authorization);
    }

    #[test]
    fn api_errors_show_the_backend_message() {
        let err = AppError::from(ApiError::from_response(400, r#"{"error":"Evento lotado"}"#));
        assert_eq!(err.user_message(), "Evento lotado");

        let err = AppError::from(ApiError::Transport("tcp connect error".to_string()));
        assert_eq!(err.user_message(), "Could not reach the server, please try again");
    }
}

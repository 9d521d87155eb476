//! Account workflows: sign-up and profile management.
//!
//! These run as plain async functions rather than view reducers: each is a
//! single form submission whose outcome the caller renders.

use crate::error::{AppError, Result};
use crate::session::SessionStore;
use eventos_client::{CreateUserRequest, EventosBackend, UpdateUserRequest};
use eventos_core::validation::{ProfileForm, RegistrationForm};
use eventos_core::{User, ValidationError};

/// Result of a profile submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// The backend accepted the changes; the session holds the new identity
    Updated(User),
    /// Nothing differed from the cached identity; no request was sent
    Unchanged,
}

/// Create an account.
///
/// The form is validated and the email checked for availability before the
/// account is created. The new user is not logged in.
///
/// # Errors
///
/// - [`AppError::Validation`] for an invalid form
/// - [`AppError::EmailInUse`] when the email is taken
/// - [`AppError::Api`] when the backend refuses
pub async fn register<B: EventosBackend>(backend: &B, form: &RegistrationForm) -> Result<User> {
    form.validate()?;

    let email = form.email.trim();
    if !backend.check_email_availability(email).await? {
        tracing::info!(email, "Registration refused, email in use");
        return Err(AppError::EmailInUse);
    }

    let request = CreateUserRequest {
        name: form.name.trim().to_string(),
        email: email.to_string(),
        password: form.password.clone(),
        role: form.role,
    };
    let user = backend.create_user(&request).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "Account created");
    Ok(user)
}

/// Apply a profile form to the logged-in account.
///
/// When the form sets a new password, the current one is checked with the
/// backend first; a wrong current password stops here, before any update is
/// sent. Only the fields that differ from the cached identity are sent.
///
/// # Errors
///
/// - [`AppError::Auth`] without a session
/// - [`AppError::Validation`] for an invalid form or a wrong current password
/// - [`AppError::Api`] when the backend refuses
pub async fn update_profile<B: EventosBackend>(
    backend: &B,
    session: &SessionStore,
    form: &ProfileForm,
) -> Result<ProfileOutcome> {
    let current = session.session().await?;
    form.validate()?;

    if form.changes_password() {
        let valid = backend
            .validate_password(&current.token, current.user.id, &form.current_password)
            .await?;
        if !valid {
            tracing::warn!(user_id = %current.user.id, "Current password rejected");
            return Err(ValidationError::CurrentPasswordIncorrect.into());
        }
    }

    let changes = form.changes(&current.user);
    if changes.is_empty() {
        tracing::debug!(user_id = %current.user.id, "Profile unchanged, nothing sent");
        return Ok(ProfileOutcome::Unchanged);
    }

    let request = UpdateUserRequest::from(changes);
    let user = backend
        .update_user(&current.token, current.user.id, &request)
        .await?;
    session.update_identity(user.clone()).await?;

    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(ProfileOutcome::Updated(user))
}

/// Re-read the logged-in account from the backend into the session.
///
/// # Errors
///
/// [`AppError::Auth`] without a session, [`AppError::Api`] on failure.
pub async fn refresh_identity<B: EventosBackend>(backend: &B, session: &SessionStore) -> Result<User> {
    let current = session.session().await?;
    let user = backend.get_user(&current.token, current.user.id).await?;
    session.update_identity(user.clone()).await?;
    Ok(user)
}

/// Delete the logged-in account and end the session.
///
/// # Errors
///
/// [`AppError::Auth`] without a session, [`AppError::Api`] on failure. The
/// session is kept when the backend refuses.
pub async fn delete_account<B: EventosBackend>(backend: &B, session: &SessionStore) -> Result<()> {
    let current = session.session().await?;
    backend.delete_user(&current.token, current.user.id).await?;
    tracing::info!(user_id = %current.user.id, "Account deleted");
    session.logout().await;
    Ok(())
}

//! Form validation that runs before any request is sent.
//!
//! A form that fails here never reaches the backend.

use crate::error::ValidationError;
use crate::types::{Role, User};
use chrono::NaiveDateTime;

/// Minimum password length accepted by the registration and profile forms.
pub const MIN_PASSWORD_LEN: usize = 6;

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField { field })
    } else {
        Ok(trimmed)
    }
}

fn check_new_password(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

/// Event create/edit form as typed by an organizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Start, if picked
    pub start_date_time: Option<NaiveDateTime>,
    /// End, if picked
    pub end_date_time: Option<NaiveDateTime>,
    /// Location
    pub location: String,
    /// Capacity as typed; may be zero or negative
    pub capacity: i64,
}

/// An event form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEvent {
    /// Trimmed title
    pub title: String,
    /// Trimmed description
    pub description: String,
    /// Start
    pub start_date_time: NaiveDateTime,
    /// End, strictly after start
    pub end_date_time: NaiveDateTime,
    /// Trimmed location
    pub location: String,
    /// Capacity, at least one
    pub capacity: u32,
}

impl EventForm {
    /// Validate the form.
    ///
    /// Checks run in order: required fields, capacity, then dates.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<ValidEvent, ValidationError> {
        let title = required(&self.title, "title")?;
        let description = required(&self.description, "description")?;
        let start = self
            .start_date_time
            .ok_or(ValidationError::MissingField { field: "start date" })?;
        let end = self
            .end_date_time
            .ok_or(ValidationError::MissingField { field: "end date" })?;
        let location = required(&self.location, "location")?;

        let capacity = u32::try_from(self.capacity)
            .ok()
            .filter(|capacity| *capacity >= 1)
            .ok_or(ValidationError::CapacityBelowMinimum {
                capacity: self.capacity,
            })?;

        if start >= end {
            return Err(ValidationError::StartNotBeforeEnd);
        }

        Ok(ValidEvent {
            title: title.to_string(),
            description: description.to_string(),
            start_date_time: start,
            end_date_time: end,
            location: location.to_string(),
            capacity,
        })
    }
}

/// Sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
    /// Password typed again
    pub confirm_password: String,
    /// Requested role
    pub role: Role,
}

impl RegistrationForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Missing name, email or password, mismatched confirmation, or a password
    /// shorter than [`MIN_PASSWORD_LEN`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        required(&self.name, "name")?;
        required(&self.email, "email")?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingField { field: "password" });
        }
        check_new_password(&self.password, &self.confirm_password)
    }
}

/// Profile form; empty password fields mean "keep the current password".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Current password, required only to set a new one
    pub current_password: String,
    /// New password
    pub new_password: String,
    /// New password typed again
    pub confirm_new_password: String,
}

impl ProfileForm {
    /// Start a form prefilled from the cached identity.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            ..Self::default()
        }
    }

    /// Whether the form asks for a password change.
    #[must_use]
    pub fn changes_password(&self) -> bool {
        !self.new_password.is_empty()
    }

    /// Validate the parts of the form that need no backend.
    ///
    /// Checking the current password against the backend happens afterwards,
    /// and only when a new password was given.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingField`] for an empty name or email
    /// - [`ValidationError::CurrentPasswordRequired`] when a new password has no current one
    /// - mismatch or length errors for the new password
    pub fn validate(&self) -> Result<(), ValidationError> {
        required(&self.name, "name")?;
        required(&self.email, "email")?;

        if self.changes_password() {
            if self.current_password.is_empty() {
                return Err(ValidationError::CurrentPasswordRequired);
            }
            check_new_password(&self.new_password, &self.confirm_new_password)?;
        }
        Ok(())
    }

    /// Fields that differ from the cached identity.
    #[must_use]
    pub fn changes(&self, user: &User) -> ProfileChanges {
        let name = self.name.trim();
        let email = self.email.trim();
        ProfileChanges {
            name: (name != user.name).then(|| name.to_string()),
            email: (email != user.email).then(|| email.to_string()),
            password: self.changes_password().then(|| self.new_password.clone()),
        }
    }
}

/// The subset of profile fields to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    /// New name
    pub name: Option<String>,
    /// New email
    pub email: Option<String>,
    /// New password
    pub password: Option<String>,
}

impl ProfileChanges {
    /// Whether there is nothing to send.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

//! The backend seam.
//!
//! Views depend on this trait rather than on the HTTP client so tests can run
//! the same workflows against an in-memory backend.

use crate::error::Result;
use crate::requests::{
    AuthToken, CreateEnrollmentRequest, CreateEventRequest, CreateUserRequest, LoginRequest,
    LoginResponse, PageRequest, UpdateEventRequest, UpdateUserRequest,
};
use eventos_core::types::{Enrollment, EnrollmentId, Event, EventId, Page, User, UserId};
use std::future::Future;

/// Every operation the client performs against the backend.
///
/// Each call is a single request. Mutating calls return the entity as the
/// backend stored it; callers refresh their lists afterwards instead of
/// patching them.
pub trait EventosBackend: Send + Sync + 'static {
    // ═══════════════════════════════════════════════════════════════════════
    // Users
    // ═══════════════════════════════════════════════════════════════════════

    /// Exchange credentials for a bearer token and the identity.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::Unauthorized`] or a rejection for bad credentials.
    fn login(&self, credentials: &LoginRequest) -> impl Future<Output = Result<LoginResponse>> + Send;

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Rejected when the email is already in use.
    fn create_user(&self, request: &CreateUserRequest) -> impl Future<Output = Result<User>> + Send;

    /// Fetch a user.
    ///
    /// # Errors
    ///
    /// Authorization errors or [`crate::ApiError::NotFound`].
    fn get_user(&self, token: &AuthToken, id: UserId) -> impl Future<Output = Result<User>> + Send;

    /// Update a user profile.
    ///
    /// # Errors
    ///
    /// Authorization errors or a rejection of the new values.
    fn update_user(
        &self,
        token: &AuthToken,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> impl Future<Output = Result<User>> + Send;

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Authorization errors or [`crate::ApiError::NotFound`].
    fn delete_user(&self, token: &AuthToken, id: UserId) -> impl Future<Output = Result<()>> + Send;

    /// Whether `email` is free to register.
    ///
    /// # Errors
    ///
    /// Transport errors only.
    fn check_email_availability(&self, email: &str) -> impl Future<Output = Result<bool>> + Send;

    /// Whether `password` is the user's current password.
    ///
    /// # Errors
    ///
    /// Authorization errors.
    fn validate_password(
        &self,
        token: &AuthToken,
        id: UserId,
        password: &str,
    ) -> impl Future<Output = Result<bool>> + Send;

    // ═══════════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════════

    /// Create an event owned by the caller.
    ///
    /// # Errors
    ///
    /// Authorization errors when the caller is not an organizer.
    fn create_event(
        &self,
        token: &AuthToken,
        request: &CreateEventRequest,
    ) -> impl Future<Output = Result<Event>> + Send;

    /// Fetch an event.
    ///
    /// # Errors
    ///
    /// [`crate::ApiError::NotFound`] for unknown ids.
    fn get_event(&self, token: &AuthToken, id: EventId) -> impl Future<Output = Result<Event>> + Send;

    /// Update an event owned by the caller.
    ///
    /// # Errors
    ///
    /// Authorization errors when the caller does not own the event.
    fn update_event(
        &self,
        token: &AuthToken,
        id: EventId,
        request: &UpdateEventRequest,
    ) -> impl Future<Output = Result<Event>> + Send;

    /// Delete an event owned by the caller.
    ///
    /// # Errors
    ///
    /// Authorization errors when the caller does not own the event.
    fn delete_event(&self, token: &AuthToken, id: EventId) -> impl Future<Output = Result<()>> + Send;

    /// List all events.
    ///
    /// # Errors
    ///
    /// Authorization or transport errors.
    fn list_events(
        &self,
        token: &AuthToken,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Event>>> + Send;

    /// Search events by title or location.
    ///
    /// # Errors
    ///
    /// Authorization or transport errors.
    fn search_events(
        &self,
        token: &AuthToken,
        query: &str,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Event>>> + Send;

    /// List events organized by the caller.
    ///
    /// # Errors
    ///
    /// Authorization or transport errors.
    fn my_events(
        &self,
        token: &AuthToken,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Event>>> + Send;

    // ═══════════════════════════════════════════════════════════════════════
    // Enrollments
    // ═══════════════════════════════════════════════════════════════════════

    /// Enroll the caller into an event; the result is Pending.
    ///
    /// # Errors
    ///
    /// Rejected when already enrolled or when the event is full.
    fn create_enrollment(
        &self,
        token: &AuthToken,
        request: &CreateEnrollmentRequest,
    ) -> impl Future<Output = Result<Enrollment>> + Send;

    /// List the caller's enrollments.
    ///
    /// # Errors
    ///
    /// Authorization or transport errors.
    fn my_enrollments(
        &self,
        token: &AuthToken,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Enrollment>>> + Send;

    /// List enrollments of an event owned by the caller.
    ///
    /// # Errors
    ///
    /// Authorization errors when the caller does not own the event.
    fn event_enrollments(
        &self,
        token: &AuthToken,
        event_id: EventId,
        page: PageRequest,
    ) -> impl Future<Output = Result<Page<Enrollment>>> + Send;

    /// Cancel one of the caller's enrollments.
    ///
    /// The backend may answer without a body, hence the `Option`.
    ///
    /// # Errors
    ///
    /// Authorization errors, or a state conflict when already canceled.
    fn cancel_enrollment(
        &self,
        token: &AuthToken,
        id: EnrollmentId,
    ) -> impl Future<Output = Result<Option<Enrollment>>> + Send;

    /// Confirm a pending enrollment of an event owned by the caller.
    ///
    /// # Errors
    ///
    /// Authorization errors, or a state conflict when not Pending or full.
    fn confirm_enrollment(
        &self,
        token: &AuthToken,
        id: EnrollmentId,
    ) -> impl Future<Output = Result<Enrollment>> + Send;

    /// Reject a pending enrollment of an event owned by the caller.
    ///
    /// # Errors
    ///
    /// Authorization errors, or a state conflict when not Pending.
    fn reject_enrollment(
        &self,
        token: &AuthToken,
        id: EnrollmentId,
    ) -> impl Future<Output = Result<Enrollment>> + Send;
}

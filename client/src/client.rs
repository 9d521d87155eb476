//! HTTP implementation of [`EventosBackend`]

use crate::backend::EventosBackend;
use crate::error::{ApiError, Result};
use crate::requests::{
    AuthToken, CreateEnrollmentRequest, CreateEventRequest, CreateUserRequest, Envelope,
    LoginRequest, LoginResponse, PageRequest, UpdateEventRequest, UpdateUserRequest,
};
use eventos_core::types::{Enrollment, EnrollmentId, Event, EventId, Page, User, UserId};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// Eventos backend client over HTTP.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct EventosClient {
    client: Client,
    base_url: String,
}

impl EventosClient {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Backend root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&AuthToken>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        match token {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        }
    }

    /// Send a request and unwrap the success envelope.
    ///
    /// `Ok(None)` means a 2xx without a body or without `data`.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(%method, %path, "Sending backend request");

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "Backend unreachable");
            ApiError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = ApiError::from_response(status.as_u16(), &body);
            tracing::warn!(
                %method,
                %path,
                status = status.as_u16(),
                message = %err,
                "Backend rejected request"
            );
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if let Some(message) = &envelope.message {
            tracing::debug!(%method, %path, %message, "Backend accepted request");
        }
        Ok(envelope.data)
    }

    async fn send_required<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        self.send(builder)
            .await?
            .ok_or_else(|| ApiError::Decode("response carried no data".to_string()))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.send::<serde_json::Value>(builder).await.map(|_| ())
    }
}

fn paged(builder: RequestBuilder, page: PageRequest) -> RequestBuilder {
    builder.query(&[("page", page.page), ("size", page.size)])
}

impl EventosBackend for EventosClient {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let response: LoginResponse = self
            .send_required(
                self.request(Method::POST, "/api/users/login", None)
                    .json(credentials),
            )
            .await?;
        tracing::info!(user_id = %response.user.id, role = ?response.user.role, "Logged in");
        Ok(response)
    }

    async fn create_user(&self, request: &CreateUserRequest) -> Result<User> {
        self.send_required(self.request(Method::POST, "/api/users", None).json(request))
            .await
    }

    async fn get_user(&self, token: &AuthToken, id: UserId) -> Result<User> {
        self.send_required(self.request(Method::GET, &format!("/api/users/{id}"), Some(token)))
            .await
    }

    async fn update_user(
        &self,
        token: &AuthToken,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> Result<User> {
        self.send_required(
            self.request(Method::PUT, &format!("/api/users/{id}"), Some(token))
                .json(request),
        )
        .await
    }

    async fn delete_user(&self, token: &AuthToken, id: UserId) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("/api/users/{id}"), Some(token)))
            .await
    }

    async fn check_email_availability(&self, email: &str) -> Result<bool> {
        self.send_required(
            self.request(Method::GET, "/api/users/check-email", None)
                .query(&[("email", email)]),
        )
        .await
    }

    async fn validate_password(&self, token: &AuthToken, id: UserId, password: &str) -> Result<bool> {
        self.send_required(
            self.request(
                Method::POST,
                &format!("/api/users/{id}/validate-password"),
                Some(token),
            )
            .query(&[("password", password)]),
        )
        .await
    }

    async fn create_event(&self, token: &AuthToken, request: &CreateEventRequest) -> Result<Event> {
        self.send_required(
            self.request(Method::POST, "/api/v1/events", Some(token))
                .json(request),
        )
        .await
    }

    async fn get_event(&self, token: &AuthToken, id: EventId) -> Result<Event> {
        self.send_required(self.request(Method::GET, &format!("/api/v1/events/{id}"), Some(token)))
            .await
    }

    async fn update_event(
        &self,
        token: &AuthToken,
        id: EventId,
        request: &UpdateEventRequest,
    ) -> Result<Event> {
        self.send_required(
            self.request(Method::PUT, &format!("/api/v1/events/{id}"), Some(token))
                .json(request),
        )
        .await
    }

    async fn delete_event(&self, token: &AuthToken, id: EventId) -> Result<()> {
        self.send_empty(self.request(
            Method::DELETE,
            &format!("/api/v1/events/{id}"),
            Some(token),
        ))
        .await
    }

    async fn list_events(&self, token: &AuthToken, page: PageRequest) -> Result<Page<Event>> {
        self.send_required(paged(
            self.request(Method::GET, "/api/v1/events", Some(token)),
            page,
        ))
        .await
    }

    async fn search_events(
        &self,
        token: &AuthToken,
        query: &str,
        page: PageRequest,
    ) -> Result<Page<Event>> {
        self.send_required(paged(
            self.request(Method::GET, "/api/v1/events/search", Some(token))
                .query(&[("query", query)]),
            page,
        ))
        .await
    }

    async fn my_events(&self, token: &AuthToken, page: PageRequest) -> Result<Page<Event>> {
        self.send_required(paged(
            self.request(Method::GET, "/api/v1/events/my-events", Some(token)),
            page,
        ))
        .await
    }

    async fn create_enrollment(
        &self,
        token: &AuthToken,
        request: &CreateEnrollmentRequest,
    ) -> Result<Enrollment> {
        self.send_required(
            self.request(Method::POST, "/api/v1/enrollments", Some(token))
                .json(request),
        )
        .await
    }

    async fn my_enrollments(&self, token: &AuthToken, page: PageRequest) -> Result<Page<Enrollment>> {
        self.send_required(paged(
            self.request(Method::GET, "/api/v1/enrollments/my-enrollments", Some(token)),
            page,
        ))
        .await
    }

    async fn event_enrollments(
        &self,
        token: &AuthToken,
        event_id: EventId,
        page: PageRequest,
    ) -> Result<Page<Enrollment>> {
        self.send_required(paged(
            self.request(
                Method::GET,
                &format!("/api/v1/enrollments/event/{event_id}"),
                Some(token),
            ),
            page,
        ))
        .await
    }

    async fn cancel_enrollment(
        &self,
        token: &AuthToken,
        id: EnrollmentId,
    ) -> Result<Option<Enrollment>> {
        self.send(self.request(
            Method::DELETE,
            &format!("/api/v1/enrollments/{id}"),
            Some(token),
        ))
        .await
    }

    async fn confirm_enrollment(&self, token: &AuthToken, id: EnrollmentId) -> Result<Enrollment> {
        self.send_required(self.request(
            Method::PUT,
            &format!("/api/v1/enrollments/{id}/confirm"),
            Some(token),
        ))
        .await
    }

    async fn reject_enrollment(&self, token: &AuthToken, id: EnrollmentId) -> Result<Enrollment> {
        self.send_required(self.request(
            Method::PUT,
            &format!("/api/v1/enrollments/{id}/reject"),
            Some(token),
        ))
        .await
    }
}

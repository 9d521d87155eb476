//! Dependencies injected into every view reducer.

use crate::config::Config;
use crate::error::{AuthError, Result};
use crate::notify::Notification;
use crate::session::SessionStore;
use crate::AppError;
use chrono::{DateTime, Utc};
use eventos_client::{AuthToken, EventosBackend};
use eventos_core::environment::{Clock, SystemClock};
use std::future::Future;
use std::sync::Arc;

/// Environment shared by the views.
pub struct AppEnvironment<B> {
    /// Backend gateway
    pub backend: Arc<B>,
    /// Current session
    pub session: Arc<SessionStore>,
    /// Time source for notifications
    pub clock: Arc<dyn Clock>,
    /// Paging and endpoint settings
    pub config: Arc<Config>,
}

impl<B> Clone for AppEnvironment<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            session: Arc::clone(&self.session),
            clock: Arc::clone(&self.clock),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B> std::fmt::Debug for AppEnvironment<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<B: EventosBackend> AppEnvironment<B> {
    /// Create an environment using the wall clock.
    #[must_use]
    pub fn new(backend: Arc<B>, session: Arc<SessionStore>, config: Config) -> Self {
        Self {
            backend,
            session,
            clock: Arc::new(SystemClock),
            config: Arc::new(config),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Current time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Error notification stamped with the current time.
    #[must_use]
    pub fn failure(&self, err: &AppError) -> Notification {
        Notification::error(err, self.now())
    }

    /// Items per request when collecting my events and enrollment lists.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    /// Items per request when collecting catalog events.
    #[must_use]
    pub fn catalog_page_size(&self) -> u32 {
        self.config.catalog_page_size
    }

    /// Build a backend call that runs with the session's credential.
    ///
    /// The credential is read when the returned future runs, not when it is
    /// built, so a logout in between is honored.
    pub fn request<T, F, Fut>(&self, call: F) -> impl Future<Output = Result<T>> + Send + 'static
    where
        F: FnOnce(Arc<B>, AuthToken) -> Fut + Send + 'static,
        Fut: Future<Output = eventos_client::Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let session = Arc::clone(&self.session);

        async move {
            let token = session.token().await.ok_or(AuthError::NotAuthenticated)?;
            Ok(call(backend, token).await?)
        }
    }
}

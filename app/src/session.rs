//! Session store: the current identity and its credential.
//!
//! One instance is created at the composition root and shared by the views
//! through the environment. It holds at most one session at a time and lives
//! as long as the application instance.

use crate::error::AuthError;
use eventos_client::{AuthToken, EventosBackend, LoginRequest};
use eventos_core::User;
use tokio::sync::RwLock;

/// A logged-in identity and the credential that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Cached identity
    pub user: User,
    /// Bearer credential
    pub token: AuthToken,
}

/// Holder of the current session.
#[derive(Debug, Default)]
pub struct SessionStore {
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Create an empty session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Authenticate against the backend and replace the current session.
    ///
    /// A failed login leaves any existing session untouched.
    ///
    /// # Errors
    ///
    /// [`AuthError::LoginFailed`] carrying the backend message.
    pub async fn login<B: EventosBackend>(
        &self,
        backend: &B,
        credentials: &LoginRequest,
    ) -> Result<User, AuthError> {
        let response = backend.login(credentials).await.map_err(|err| {
            tracing::warn!(email = %credentials.email, error = %err, "Login refused");
            AuthError::LoginFailed {
                message: err.message(),
            }
        })?;

        let user = response.user.clone();
        *self.current.write().await = Some(Session {
            user: response.user,
            token: response.token,
        });

        tracing::info!(user_id = %user.id, role = %user.role, "Session started");
        Ok(user)
    }

    /// Drop the current session, if any.
    pub async fn logout(&self) {
        if let Some(session) = self.current.write().await.take() {
            tracing::info!(user_id = %session.user.id, "Session ended");
        }
    }

    /// Replace the cached identity after a successful profile update.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotAuthenticated`] when no session is held.
    pub async fn update_identity(&self, user: User) -> Result<(), AuthError> {
        let mut current = self.current.write().await;
        let session = current.as_mut().ok_or(AuthError::NotAuthenticated)?;
        tracing::debug!(user_id = %user.id, "Session identity refreshed");
        session.user = user;
        Ok(())
    }

    /// The cached identity.
    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.as_ref().map(|s| s.user.clone())
    }

    /// The bearer credential.
    pub async fn token(&self) -> Option<AuthToken> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    /// The whole session.
    ///
    /// # Errors
    ///
    /// [`AuthError::NotAuthenticated`] when no session is held.
    pub async fn session(&self) -> Result<Session, AuthError> {
        self.current
            .read()
            .await
            .clone()
            .ok_or(AuthError::NotAuthenticated)
    }

    /// Whether an identity is held.
    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }
}

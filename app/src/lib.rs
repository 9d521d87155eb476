//! # Eventos App
//!
//! The client application built on [`eventos_core`] and [`eventos_client`]:
//! a session store, the route table with its guards, and one reducer per
//! role-scoped view.
//!
//! ## Example
//!
//! ```no_run
//! use eventos_app::views::{CatalogAction, CatalogReducer, CatalogState};
//! use eventos_app::{AppEnvironment, Config, SessionStore, Store};
//! use eventos_client::{EventosClient, LoginRequest};
//! use std::sync::Arc;
//!
//! # async fn run() -> eventos_app::Result<()> {
//! let config = Config::from_env();
//! let backend = Arc::new(EventosClient::new(&config.api_url));
//! let session = Arc::new(SessionStore::new());
//!
//! let credentials = LoginRequest {
//!     email: "ana@example.com".to_string(),
//!     password: "segredo".to_string(),
//! };
//! let viewer = session.login(backend.as_ref(), &credentials).await?;
//!
//! let env = AppEnvironment::new(backend, session, config);
//! let store = Store::new(CatalogState::new(viewer), CatalogReducer::default(), env);
//! store.send(CatalogAction::Load).await;
//!
//! let cards = store.state(|s| s.cards().len()).await;
//! println!("{cards} events");
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod config;
pub mod environment;
pub mod error;
pub mod notify;
pub mod routes;
pub mod session;
pub mod store;
pub mod views;

pub use account::ProfileOutcome;
pub use config::Config;
pub use environment::AppEnvironment;
pub use error::{AppError, AuthError, ErrorKind, Result};
pub use notify::{Level, Notification};
pub use routes::{Route, RouteDecision, Screen};
pub use session::{Session, SessionStore};
pub use store::Store;

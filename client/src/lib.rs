//! # Eventos backend gateway
//!
//! Typed access to the Eventos REST backend: authentication, user accounts,
//! events and enrollments.
//!
//! Every call carries the session's bearer token, unwraps the backend's
//! `{success, message, data}` envelope, and normalizes failures into
//! [`ApiError`] so views can react by [`ErrorCategory`].
//!
//! ## Example
//!
//! ```no_run
//! use eventos_client::{EventosBackend, EventosClient, LoginRequest, PageRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EventosClient::new("http://localhost:8080");
//!
//!     let login = client
//!         .login(&LoginRequest::new("ana@example.com", "secret1"))
//!         .await?;
//!
//!     let events = client.list_events(&login.token, PageRequest::first(100)).await?;
//!     println!("{} events", events.total_elements);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod paging;
pub mod requests;

// Re-export main types for convenience
pub use backend::EventosBackend;
pub use client::EventosClient;
pub use error::{ApiError, ErrorCategory, Result};
pub use paging::collect_pages;
pub use requests::{
    AuthToken, CreateEnrollmentRequest, CreateEventRequest, CreateUserRequest, LoginRequest,
    LoginResponse, PageRequest, UpdateEventRequest, UpdateUserRequest,
};

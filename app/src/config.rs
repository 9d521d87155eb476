//! Configuration management for the Eventos client.
//!
//! Loads configuration from environment variables with sensible defaults.

use eventos_client::LoginRequest;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Backend root URL
    pub api_url: String,
    /// Items per request for my events and every enrollment list, including
    /// the enrollments the catalog reads. Lists are always fetched in full.
    pub page_size: u32,
    /// Items per request for catalog events and search results
    pub catalog_page_size: u32,
    /// Log filter directive (`RUST_LOG`)
    pub log_level: String,
    /// Email used by the binary to log in
    pub login_email: Option<String>,
    /// Password used by the binary to log in
    #[serde(skip_serializing)]
    pub login_password: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("EVENTOS_API_URL").unwrap_or(defaults.api_url),
            page_size: env::var("EVENTOS_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.page_size),
            catalog_page_size: env::var("EVENTOS_CATALOG_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(defaults.catalog_page_size),
            log_level: env::var("RUST_LOG").unwrap_or(defaults.log_level),
            login_email: env::var("EVENTOS_EMAIL").ok(),
            login_password: env::var("EVENTOS_PASSWORD").ok(),
        }
    }

    /// Login credentials, when both email and password are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<LoginRequest> {
        match (&self.login_email, &self.login_password) {
            (Some(email), Some(password)) => Some(LoginRequest::new(email, password)),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            page_size: 10,
            catalog_page_size: 100,
            log_level: "eventos=info".to_string(),
            login_email: None,
            login_password: None,
        }
    }
}

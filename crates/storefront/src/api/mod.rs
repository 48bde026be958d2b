//! Typed client for the Partshub REST backend.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; every response is wrapped in an
//!   [`Envelope`], paginated lists additionally in a [`Page`].
//! - The backend is source of truth for carts of authenticated accounts,
//!   orders, and warranty records - no local sync, direct API calls.
//! - In-memory caching via `moka` for read-only catalog responses only;
//!   cart and order calls are never cached.

mod client;
pub mod types;

pub use client::{ApiClient, CheckoutBackend, RemoteCartSource};
pub use types::{Envelope, Page};

use thiserror::Error;

/// Errors that can occur when talking to the Partshub backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success HTTP status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Envelope carried a non-success application code.
    #[error("backend error ({code}): {message}")]
    Backend { code: i32, message: String },

    /// JSON body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Single-entity fetch resolved to no result.
    #[error("not found: {0}")]
    NotFound(String),

    /// Client could not be constructed from configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Whether the failure is a transport-level problem the user may retry
    /// manually. Backend-reported errors are not retryable as-is.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. })
    }
}

//! Unified error handling.
//!
//! Rolls the per-concern errors into one `AppError` with the storefront's
//! failure taxonomy: validation errors are user-correctable and block the
//! action, network/backend errors surface a generic message with state
//! preserved for a manual retry, and payment-terminal states carry their
//! own routes. Nothing here is fatal to the process.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::warranty::WarrantyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout flow error.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Warranty lookup error.
    #[error("Warranty error: {0}")]
    Warranty(#[from] WarrantyError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// The message shown to the user.
    ///
    /// Internal details never leak: transport failures collapse into a
    /// generic message, while user-correctable problems keep their
    /// specifics.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => "The store is misconfigured, please try again later".to_string(),
            Self::Api(err) => match err {
                ApiError::Backend { message, .. } => message.clone(),
                ApiError::NotFound(_) => "Not found".to_string(),
                _ => "Could not reach the store, please try again".to_string(),
            },
            Self::Checkout(err) => match err {
                CheckoutError::Validation(issues) => issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
                CheckoutError::Submission(message) => message.clone(),
                CheckoutError::PaymentProcessing(_) => {
                    "Payment processing error, please try again from your cart".to_string()
                }
            },
            Self::Warranty(err) => match err {
                WarrantyError::InvalidTerm { .. } => err.to_string(),
                WarrantyError::Api(_) => "Warranty lookup failed, please try again".to_string(),
            },
            Self::NotFound(what) => format!("{what} not found"),
        }
    }

    /// Whether a manual retry of the same action can succeed.
    ///
    /// Validation errors need corrected input first; everything
    /// network-shaped may simply be tried again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Api(err) => err.is_network(),
            Self::Checkout(err) => matches!(
                err,
                CheckoutError::Submission(_) | CheckoutError::PaymentProcessing(_)
            ),
            Self::Warranty(err) => matches!(err, WarrantyError::Api(_)),
            Self::NotFound(_) => false,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

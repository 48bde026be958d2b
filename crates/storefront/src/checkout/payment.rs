//! Payment provider return parsing.
//!
//! After the external provider finishes, it redirects the browser back with
//! query-encoded result parameters. Parsing never fails: anything that is
//! not a well-formed success or cancellation collapses into `Error`.

use std::borrow::Cow;

/// Query parameter carrying the provider's result status.
const STATUS_PARAM: &str = "status";
/// Query parameter carrying the order code.
const ORDER_CODE_PARAM: &str = "orderCode";
/// Query parameter carrying an optional provider message.
const MESSAGE_PARAM: &str = "message";

/// Outcome of a payment provider return redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentReturn {
    Success {
        order_code: String,
    },
    Cancelled {
        order_code: String,
    },
    Error {
        order_code: Option<String>,
        message: String,
    },
}

impl PaymentReturn {
    /// Parse the query string of a provider return URL.
    ///
    /// A success or cancellation without an order code is an error: there
    /// is nothing to confirm against the backend.
    #[must_use]
    pub fn parse_query(query: &str) -> Self {
        let mut status: Option<Cow<'_, str>> = None;
        let mut order_code: Option<String> = None;
        let mut message: Option<String> = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                STATUS_PARAM => status = Some(value),
                ORDER_CODE_PARAM => order_code = Some(value.into_owned()),
                MESSAGE_PARAM => message = Some(value.into_owned()),
                _ => {}
            }
        }

        let status = status.as_deref().map(str::to_ascii_lowercase);
        match (status.as_deref(), order_code) {
            (Some("success"), Some(code)) => Self::Success { order_code: code },
            (Some("cancelled" | "canceled"), Some(code)) => Self::Cancelled { order_code: code },
            (Some("success" | "cancelled" | "canceled"), None) => Self::Error {
                order_code: None,
                message: "payment return missing order code".to_string(),
            },
            (_, order_code) => Self::Error {
                order_code,
                message: message.unwrap_or_else(|| "payment failed".to_string()),
            },
        }
    }

    /// The order code, when the provider echoed one back.
    #[must_use]
    pub fn order_code(&self) -> Option<&str> {
        match self {
            Self::Success { order_code } | Self::Cancelled { order_code } => Some(order_code),
            Self::Error { order_code, .. } => order_code.as_deref(),
        }
    }
}

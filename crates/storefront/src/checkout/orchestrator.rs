//! Order/payment orchestration.
//!
//! Drives a validated cart + customer-info pair through order creation,
//! the external payment redirect, and the provider's return callback.
//! Observable states:
//!
//! ```text
//! Idle -> Validating -> Submitting -> AwaitingPaymentRedirect
//!      -> Returned{..} -> Terminal
//! ```
//!
//! Nothing here retries automatically; every failure degrades to a safe
//! state (Idle with the cart and form preserved, or a route back to the
//! cart) and waits for the user.

use std::time::Duration;

use thiserror::Error;
use tracing::{error, instrument};

use crate::api::types::{CreateOrderRequest, OrderLineDto};
use crate::api::{ApiError, CheckoutBackend};
use crate::cart::CartLine;

use super::customer::{CustomerInfo, ValidationIssue};
use super::payment::PaymentReturn;

/// Fixed countdown before auto-navigating home after a successful payment.
pub const HOME_REDIRECT_DELAY: Duration = Duration::from_secs(5);

/// Where the UI should send the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Cart,
    Checkout,
}

/// Client-observable checkout state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
    #[default]
    Idle,
    Validating,
    Submitting,
    /// Order created; the browser should navigate to `payment_url`.
    AwaitingPaymentRedirect {
        order_code: String,
        payment_url: String,
    },
    /// Provider redirected back; confirmation in progress.
    Returned(PaymentReturn),
    Terminal(CheckoutOutcome),
}

/// Terminal result of a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Paid and confirmed; navigate home after [`HOME_REDIRECT_DELAY`].
    Completed { order_code: String },
    /// User cancelled at the provider; a retry-payment path is offered.
    Cancelled { order_code: String },
    /// Provider reported a failure.
    Failed {
        order_code: Option<String>,
        message: String,
    },
}

impl CheckoutOutcome {
    /// The route the UI should take from this outcome.
    #[must_use]
    pub const fn next_route(&self) -> Route {
        match self {
            Self::Completed { .. } => Route::Home,
            Self::Cancelled { .. } => Route::Checkout,
            Self::Failed { .. } => Route::Cart,
        }
    }
}

/// Errors surfaced by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The form or cart failed validation; nothing was sent.
    #[error("checkout validation failed")]
    Validation(Vec<ValidationIssue>),

    /// Order creation was rejected or unreachable; cart and form state
    /// are preserved for a manual retry.
    #[error("order submission failed: {0}")]
    Submission(String),

    /// A confirmation call failed after the provider return; the user is
    /// routed back to the cart.
    #[error("payment processing error")]
    PaymentProcessing(#[source] ApiError),
}

impl CheckoutError {
    /// The safe route for the user after this error.
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::Validation(_) | Self::Submission(_) => Route::Checkout,
            Self::PaymentProcessing(_) => Route::Cart,
        }
    }
}

/// The checkout state machine.
pub struct CheckoutFlow<B> {
    backend: B,
    state: CheckoutState,
}

impl<B: CheckoutBackend> CheckoutFlow<B> {
    /// Start a flow in the `Idle` state.
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            state: CheckoutState::Idle,
        }
    }

    /// The current observable state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// The payment redirect target, once an order has been created.
    #[must_use]
    pub fn payment_url(&self) -> Option<&str> {
        match &self.state {
            CheckoutState::AwaitingPaymentRedirect { payment_url, .. } => Some(payment_url),
            _ => None,
        }
    }

    /// Validate and submit the checkout.
    ///
    /// On success the flow moves to `AwaitingPaymentRedirect` and returns
    /// the provider URL for the browser to navigate to.
    ///
    /// # Errors
    ///
    /// Validation failure returns every issue found, before any network
    /// call. Submission failure surfaces the backend message; in both
    /// cases the flow returns to `Idle` with cart and form untouched.
    #[instrument(skip(self, lines, info))]
    pub async fn submit(
        &mut self,
        lines: &[CartLine],
        info: &CustomerInfo,
    ) -> Result<String, CheckoutError> {
        self.state = CheckoutState::Validating;

        let mut issues = Vec::new();
        if lines.is_empty() {
            issues.push(ValidationIssue::EmptyCart);
        }
        if let Err(form_issues) = info.validate() {
            issues.extend(form_issues);
        }
        if !issues.is_empty() {
            self.state = CheckoutState::Idle;
            return Err(CheckoutError::Validation(issues));
        }

        self.state = CheckoutState::Submitting;
        let request = build_order_request(lines, info);

        match self.backend.create_order(&request).await {
            Ok(response) => {
                let payment_url = response.payment_url.clone();
                self.state = CheckoutState::AwaitingPaymentRedirect {
                    order_code: response.order_code,
                    payment_url: response.payment_url,
                };
                Ok(payment_url)
            }
            Err(e) => {
                error!(error = %e, "order creation failed");
                self.state = CheckoutState::Idle;
                Err(CheckoutError::Submission(e.to_string()))
            }
        }
    }

    /// Handle the payment provider's return redirect.
    ///
    /// Parses the query parameters, calls the matching confirmation
    /// endpoint, and settles into a terminal state.
    ///
    /// # Errors
    ///
    /// A confirmation call that cannot reach the backend degrades to
    /// [`CheckoutError::PaymentProcessing`]; the flow returns to `Idle`
    /// and the user is routed back to the cart. No automatic retry.
    #[instrument(skip(self))]
    pub async fn handle_payment_return(
        &mut self,
        query: &str,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let returned = PaymentReturn::parse_query(query);
        self.state = CheckoutState::Returned(returned.clone());

        let outcome = match returned {
            PaymentReturn::Success { order_code } => {
                match self.backend.mark_order_paid(&order_code).await {
                    Ok(()) => CheckoutOutcome::Completed { order_code },
                    Err(e) => return self.confirmation_failed(e),
                }
            }
            PaymentReturn::Cancelled { order_code } => {
                match self.backend.mark_order_failed(&order_code).await {
                    Ok(()) => CheckoutOutcome::Cancelled { order_code },
                    Err(e) => return self.confirmation_failed(e),
                }
            }
            PaymentReturn::Error {
                order_code,
                message,
            } => {
                if let Some(code) = &order_code
                    && let Err(e) = self.backend.mark_order_failed(code).await
                {
                    return self.confirmation_failed(e);
                }
                CheckoutOutcome::Failed {
                    order_code,
                    message,
                }
            }
        };

        self.state = CheckoutState::Terminal(outcome.clone());
        Ok(outcome)
    }

    fn confirmation_failed(&mut self, e: ApiError) -> Result<CheckoutOutcome, CheckoutError> {
        error!(error = %e, "payment confirmation call failed");
        self.state = CheckoutState::Idle;
        Err(CheckoutError::PaymentProcessing(e))
    }
}

/// Wait out the fixed post-payment countdown before navigating home.
pub async fn home_redirect_countdown() {
    tokio::time::sleep(HOME_REDIRECT_DELAY).await;
}

fn build_order_request(lines: &[CartLine], info: &CustomerInfo) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: info.full_name.trim().to_string(),
        email: info.email.trim().to_string(),
        phone: info.phone.trim().to_string(),
        address: info.address.trim().to_string(),
        city: info.city.trim().to_string(),
        district: info.district.trim().to_string(),
        ward: info.ward.trim().to_string(),
        notes: info.notes.trim().to_string(),
        lines: lines
            .iter()
            .map(|line| OrderLineDto {
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price.amount,
            })
            .collect(),
    }
}

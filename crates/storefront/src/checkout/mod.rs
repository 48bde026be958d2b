//! Checkout: summary calculation, customer validation, and the
//! order/payment orchestration flow.

mod customer;
mod orchestrator;
mod payment;
mod summary;

pub use customer::{CustomerInfo, ValidationIssue};
pub use orchestrator::{
    CheckoutError, CheckoutFlow, CheckoutOutcome, CheckoutState, HOME_REDIRECT_DELAY, Route,
    home_redirect_countdown,
};
pub use payment::PaymentReturn;
pub use summary::{CheckoutSummary, FLAT_SHIPPING_FEE_VND, FREE_SHIPPING_THRESHOLD_VND, summary};

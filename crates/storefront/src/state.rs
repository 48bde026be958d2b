//! Application state shared across the UI layer.

use std::sync::{Arc, Mutex, PoisonError};

use crate::api::{ApiClient, ApiError};
use crate::cart::{AuthState, CartAction, CartLine, LocalCart, Reconciler};
use crate::checkout::{CheckoutSummary, summary};
use crate::config::StorefrontConfig;

/// Application state shared across all UI handlers.
///
/// Cheaply cloneable via `Arc`. The local cart and auth state are the only
/// mutable resources; they are mutated exclusively through [`dispatch`] and
/// [`set_auth`], mirroring the single-threaded event-handler discipline of
/// the UI.
///
/// [`dispatch`]: AppState::dispatch
/// [`set_auth`]: AppState::set_auth
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    cart: Mutex<LocalCart>,
    auth: Mutex<AuthState>,
}

impl AppState {
    /// Create the application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be constructed.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                cart: Mutex::new(LocalCart::new()),
                auth: Mutex::new(AuthState::Guest),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// The current authentication state.
    #[must_use]
    pub fn auth(&self) -> AuthState {
        *lock(&self.inner.auth)
    }

    /// Snapshot of the current cart lines.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLine> {
        lock(&self.inner.cart).lines().to_vec()
    }

    /// Checkout summary for the current cart.
    #[must_use]
    pub fn checkout_summary(&self) -> CheckoutSummary {
        summary(lock(&self.inner.cart).lines())
    }

    /// Apply a cart mutation.
    pub fn dispatch(&self, action: CartAction) {
        lock(&self.inner.cart).apply(action);
    }

    /// Switch authentication state and reconcile the local cart.
    ///
    /// The remote fetch runs without holding the cart lock, so a rapid
    /// sequence of transitions is last-write-wins - the same semantics the
    /// UI has for any superseding action.
    pub async fn set_auth(&self, auth: AuthState) {
        *lock(&self.inner.auth) = auth;

        let reconciler = Reconciler::new(self.inner.api.clone());
        if let Some(action) = reconciler.action_for(auth).await {
            lock(&self.inner.cart).apply(action);
        }
    }
}

/// Lock a mutex, recovering the data from a poisoned lock.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;
    use url::Url;

    use partshub_core::{Money, ProductId};

    use crate::cart::test_line;

    use super::*;

    fn test_state() -> AppState {
        AppState::new(StorefrontConfig {
            api_base_url: Url::parse("https://api.partshub.test/v1/").unwrap(),
            api_token: SecretString::from("tok_8fj29dkq0a"),
            request_timeout: Duration::from_secs(5),
            catalog_cache_ttl: Duration::from_secs(60),
        })
        .unwrap()
    }

    #[test]
    fn test_dispatch_updates_snapshot() {
        let state = test_state();
        state.dispatch(CartAction::Add(test_line(1, 2, 100_000)));

        let lines = state.cart_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, ProductId::new(1));
    }

    #[test]
    fn test_checkout_summary_follows_cart() {
        let state = test_state();
        assert!(state.checkout_summary().subtotal.is_zero());

        state.dispatch(CartAction::Add(test_line(1, 1, 600_000)));
        let summary = state.checkout_summary();
        assert_eq!(summary.subtotal, Money::vnd(600_000));
        assert!(summary.shipping_fee.is_zero());
    }

    #[test]
    fn test_default_auth_is_guest() {
        let state = test_state();
        assert_eq!(state.auth(), AuthState::Guest);
    }

    #[tokio::test]
    async fn test_logout_clears_cart() {
        let state = test_state();
        state.dispatch(CartAction::Add(test_line(1, 2, 100_000)));

        state.set_auth(AuthState::Guest).await;

        assert!(state.cart_lines().is_empty());
        assert_eq!(state.auth(), AuthState::Guest);
    }

    #[test]
    fn test_rapid_quantity_changes_are_last_write_wins() {
        // Each quantity change is an independent action; the last one to
        // land wins. This mirrors the uncoalesced request behavior of the
        // UI rather than fixing it.
        let state = test_state();
        state.dispatch(CartAction::Add(test_line(1, 1, 100_000)));

        for quantity in [5, 2, 9, 3] {
            state.dispatch(CartAction::SetQuantity {
                product_id: ProductId::new(1),
                quantity,
            });
        }

        assert_eq!(state.cart_lines()[0].quantity, 3);
    }
}

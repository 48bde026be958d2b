//! Cart reconciliation on authentication transitions.
//!
//! Remote always wins: logging in replaces the local cart with the account
//! cart (guest additions are discarded, a product decision), logging out
//! clears it. A failed remote fetch is swallowed - the visitor keeps the
//! current local cart until a later transition retries.

use tracing::{debug, warn};

use crate::api::RemoteCartSource;

use super::{AuthState, CartAction, CartLine, LocalCart};

/// Keeps the local cart consistent with the authenticated account's
/// remote cart.
pub struct Reconciler<S> {
    source: S,
}

impl<S: RemoteCartSource> Reconciler<S> {
    /// Create a reconciler over a remote cart source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Compute the cart action for an auth transition.
    ///
    /// `None` means leave the local cart untouched (the remote fetch
    /// failed and was swallowed).
    pub async fn action_for(&self, auth: AuthState) -> Option<CartAction> {
        match auth {
            AuthState::Guest => Some(CartAction::Clear),
            AuthState::Authenticated(account) => match self.source.fetch_cart(account).await {
                Ok(rows) => {
                    let fetched = rows.len();
                    let lines: Vec<CartLine> =
                        rows.into_iter().filter_map(CartLine::from_remote).collect();
                    debug!(
                        account = %account,
                        fetched,
                        kept = lines.len(),
                        "fetched remote cart"
                    );
                    Some(CartAction::Replace(lines))
                }
                Err(e) => {
                    warn!(account = %account, error = %e, "remote cart fetch failed, keeping local cart");
                    None
                }
            },
        }
    }

    /// Apply the transition to a cart in place.
    pub async fn reconcile(&self, cart: &mut LocalCart, auth: AuthState) {
        if let Some(action) = self.action_for(auth).await {
            if !cart.is_empty()
                && matches!(auth, AuthState::Authenticated(_))
            {
                // Guest lines made before login are discarded, not merged.
                warn!(discarded = cart.len(), "replacing guest cart lines with account cart");
            }
            cart.apply(action);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use rust_decimal::Decimal;

    use partshub_core::{AccountId, CartLineId, ProductId};

    use crate::api::ApiError;
    use crate::api::types::CartLineDto;
    use crate::cart::test_line;

    use super::*;

    struct ScriptedSource {
        responses: Mutex<Vec<Result<Vec<CartLineDto>, ApiError>>>,
        calls: Mutex<Vec<AccountId>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Vec<CartLineDto>, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl RemoteCartSource for &ScriptedSource {
        async fn fetch_cart(&self, account: AccountId) -> Result<Vec<CartLineDto>, ApiError> {
            self.calls.lock().unwrap().push(account);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn remote_row(id: i64, product_id: i64, quantity: i32) -> CartLineDto {
        CartLineDto {
            id: CartLineId::new(id),
            product_id: ProductId::new(product_id),
            product_name: format!("part-{product_id}"),
            unit_price: Decimal::from(100),
            quantity,
            thumbnail: None,
            available_stock: 50,
        }
    }

    #[tokio::test]
    async fn test_login_replaces_local_lines() {
        let source = ScriptedSource::new(vec![Ok(vec![remote_row(7, 1, 2)])]);
        let reconciler = Reconciler::new(&source);

        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(42, 3, 999)));

        reconciler
            .reconcile(&mut cart, AuthState::Authenticated(AccountId::new(5)))
            .await;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].product_id, ProductId::new(1));
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[0].remote_id, Some(CartLineId::new(7)));
    }

    #[tokio::test]
    async fn test_login_skips_non_positive_rows() {
        let source = ScriptedSource::new(vec![Ok(vec![
            remote_row(1, 1, 2),
            remote_row(2, 2, 0),
            remote_row(3, 3, -1),
        ])]);
        let reconciler = Reconciler::new(&source);

        let mut cart = LocalCart::new();
        reconciler
            .reconcile(&mut cart, AuthState::Authenticated(AccountId::new(5)))
            .await;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].product_id, ProductId::new(1));
    }

    #[tokio::test]
    async fn test_logout_clears_without_fetch() {
        let source = ScriptedSource::new(vec![]);
        let reconciler = Reconciler::new(&source);

        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(1, 1, 100)));

        reconciler.reconcile(&mut cart, AuthState::Guest).await;

        assert!(cart.is_empty());
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_swallowed() {
        let source = ScriptedSource::new(vec![Err(ApiError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        })]);
        let reconciler = Reconciler::new(&source);

        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(1, 1, 100)));

        reconciler
            .reconcile(&mut cart, AuthState::Authenticated(AccountId::new(5)))
            .await;

        // Local cart untouched until a later transition retries.
        assert_eq!(cart.len(), 1);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_login_with_empty_remote_empties_cart() {
        let source = ScriptedSource::new(vec![Ok(vec![])]);
        let reconciler = Reconciler::new(&source);

        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(1, 1, 100)));

        reconciler
            .reconcile(&mut cart, AuthState::Authenticated(AccountId::new(5)))
            .await;

        assert!(cart.is_empty());
    }
}

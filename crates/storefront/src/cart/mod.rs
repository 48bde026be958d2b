//! Local cart state.
//!
//! The local cart is the source of truth for guests. Once an account is
//! authenticated the remote cart is canonical and the local store becomes a
//! mirror, wholesale-replaced by the [`Reconciler`] on auth transitions.
//! Mutation goes through [`LocalCart::apply`] with explicit [`CartAction`]s
//! rather than ambient shared state.

mod reconciler;

pub use reconciler::Reconciler;

use partshub_core::{AccountId, CartLineId, CurrencyCode, Money, ProductId};

use crate::api::types::CartLineDto;

/// Authentication state of the visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Guest,
    Authenticated(AccountId),
}

impl AuthState {
    /// The account id, if authenticated.
    #[must_use]
    pub const fn account(&self) -> Option<AccountId> {
        match self {
            Self::Guest => None,
            Self::Authenticated(account) => Some(*account),
        }
    }
}

/// One product entry with a quantity in the cart.
///
/// `remote_id` is set only for lines mirrored from the account cart; guest
/// lines exist purely locally until checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub remote_id: Option<CartLineId>,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub thumbnail: Option<String>,
    pub available_stock: u32,
}

impl CartLine {
    /// Price of the full line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Convert a remote cart row, skipping rows with quantity <= 0.
    #[must_use]
    pub fn from_remote(dto: CartLineDto) -> Option<Self> {
        let quantity = u32::try_from(dto.quantity).ok().filter(|q| *q > 0)?;
        Some(Self {
            remote_id: Some(dto.id),
            product_id: dto.product_id,
            product_name: dto.product_name,
            unit_price: Money::new(dto.unit_price, CurrencyCode::VND),
            quantity,
            thumbnail: dto.thumbnail,
            available_stock: dto.available_stock,
        })
    }
}

/// Mutations accepted by [`LocalCart::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add a line; quantities merge if the product is already present.
    Add(CartLine),
    /// Set the quantity of a product's line; 0 removes the line.
    SetQuantity { product_id: ProductId, quantity: u32 },
    /// Remove a product's line.
    Remove { product_id: ProductId },
    /// Remove every line.
    Clear,
    /// Wholesale replacement (reconciliation).
    Replace(Vec<CartLine>),
}

/// In-memory cart store.
#[derive(Debug, Clone, Default)]
pub struct LocalCart {
    lines: Vec<CartLine>,
}

impl LocalCart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Apply a mutation.
    ///
    /// Quantities are clamped to the line's available stock; a line never
    /// survives with quantity 0.
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(line) => self.add(line),
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => self.set_quantity(product_id, quantity),
            CartAction::Remove { product_id } => {
                self.lines.retain(|line| line.product_id != product_id);
            }
            CartAction::Clear => self.lines.clear(),
            CartAction::Replace(lines) => {
                self.lines = lines
                    .into_iter()
                    .filter(|line| line.quantity > 0)
                    .collect();
            }
        }
    }

    fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            let merged = existing.quantity.saturating_add(line.quantity);
            existing.quantity = merged.min(existing.available_stock.max(1));
        } else {
            let mut line = line;
            line.quantity = line.quantity.min(line.available_stock.max(1));
            self.lines.push(line);
        }
    }

    fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.lines.retain(|line| line.product_id != product_id);
            return;
        }
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
        {
            line.quantity = quantity.min(line.available_stock.max(1));
        }
    }
}

#[cfg(test)]
pub(crate) fn test_line(product_id: i64, quantity: u32, unit_price: i64) -> CartLine {
    CartLine {
        remote_id: None,
        product_id: ProductId::new(product_id),
        product_name: format!("part-{product_id}"),
        unit_price: Money::vnd(unit_price),
        quantity,
        thumbnail: None,
        available_stock: 99,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_new_line() {
        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(1, 2, 100_000)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_units(), 2);
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(1, 2, 100_000)));
        cart.apply(CartAction::Add(test_line(1, 3, 100_000)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_clamps_to_stock() {
        let mut cart = LocalCart::new();
        let mut line = test_line(1, 5, 100_000);
        line.available_stock = 3;
        cart.apply(CartAction::Add(line));
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(1, 0, 100_000)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(1, 2, 100_000)));
        cart.apply(CartAction::SetQuantity {
            product_id: ProductId::new(1),
            quantity: 0,
        });
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_only_targets_product() {
        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(1, 1, 100_000)));
        cart.apply(CartAction::Add(test_line(2, 1, 200_000)));
        cart.apply(CartAction::Remove {
            product_id: ProductId::new(1),
        });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].product_id, ProductId::new(2));
    }

    #[test]
    fn test_replace_drops_zero_quantity_lines() {
        let mut cart = LocalCart::new();
        cart.apply(CartAction::Add(test_line(9, 1, 50_000)));
        cart.apply(CartAction::Replace(vec![
            test_line(1, 2, 100_000),
            test_line(2, 0, 200_000),
        ]));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].product_id, ProductId::new(1));
    }

    #[test]
    fn test_line_total() {
        let line = test_line(1, 3, 150_000);
        assert_eq!(line.line_total(), Money::vnd(450_000));
    }

    #[test]
    fn test_from_remote_skips_non_positive_quantity() {
        use rust_decimal::Decimal;

        let dto = CartLineDto {
            id: CartLineId::new(10),
            product_id: ProductId::new(1),
            product_name: "case fan".to_string(),
            unit_price: Decimal::from(90_000),
            quantity: 0,
            thumbnail: None,
            available_stock: 5,
        };
        assert!(CartLine::from_remote(dto.clone()).is_none());

        let dto = CartLineDto {
            quantity: -2,
            ..dto
        };
        assert!(CartLine::from_remote(dto).is_none());
    }

    #[test]
    fn test_from_remote_converts_fields() {
        use rust_decimal::Decimal;

        let dto = CartLineDto {
            id: CartLineId::new(10),
            product_id: ProductId::new(1),
            product_name: "case fan".to_string(),
            unit_price: Decimal::from(90_000),
            quantity: 2,
            thumbnail: Some("fan.webp".to_string()),
            available_stock: 5,
        };
        let line = CartLine::from_remote(dto).unwrap();
        assert_eq!(line.remote_id, Some(CartLineId::new(10)));
        assert_eq!(line.unit_price, Money::vnd(90_000));
        assert_eq!(line.quantity, 2);
    }
}

//! Checkout summary calculation.
//!
//! A pure function over a cart snapshot; safe to recompute on every render.

use partshub_core::{CurrencyCode, Money};

use crate::cart::CartLine;

/// Orders at or above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD_VND: i64 = 500_000;

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE_VND: i64 = 30_000;

/// Derived pricing breakdown for the current cart. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub subtotal: Money,
    /// Always zero: listed prices are VAT-inclusive. Kept for display.
    pub tax: Money,
    pub shipping_fee: Money,
    /// Always zero until a promotions engine exists.
    pub discount: Money,
    pub total: Money,
    /// Number of distinct lines. See [`CheckoutSummary::total_units`] for
    /// the sum-of-quantities reading.
    pub item_count: usize,
    /// Sum of quantities across all lines.
    pub total_units: u32,
}

/// Compute the checkout summary for a cart snapshot.
///
/// `subtotal = Σ(unit_price × quantity)`; shipping is free at or above
/// [`FREE_SHIPPING_THRESHOLD_VND`], otherwise [`FLAT_SHIPPING_FEE_VND`];
/// `total = subtotal + shipping − discount`.
#[must_use]
pub fn summary(lines: &[CartLine]) -> CheckoutSummary {
    let subtotal: Money = lines.iter().map(CartLine::line_total).sum();
    let currency = if lines.is_empty() {
        CurrencyCode::default()
    } else {
        subtotal.currency
    };

    let shipping_fee = if subtotal >= Money::vnd(FREE_SHIPPING_THRESHOLD_VND) {
        Money::zero(currency)
    } else {
        Money::vnd(FLAT_SHIPPING_FEE_VND)
    };
    let tax = Money::zero(currency);
    let discount = Money::zero(currency);

    CheckoutSummary {
        subtotal,
        tax,
        shipping_fee,
        discount,
        total: subtotal + shipping_fee - discount,
        item_count: lines.len(),
        total_units: lines.iter().map(|line| line.quantity).sum(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::cart::test_line;

    use super::*;

    #[test]
    fn test_subtotal_is_sum_of_line_totals() {
        let lines = vec![test_line(1, 2, 100_000), test_line(2, 1, 50_000)];
        let s = summary(&lines);
        assert_eq!(s.subtotal, Money::vnd(250_000));
    }

    #[test]
    fn test_flat_fee_below_threshold() {
        let lines = vec![test_line(1, 1, 499_999)];
        let s = summary(&lines);
        assert_eq!(s.shipping_fee, Money::vnd(FLAT_SHIPPING_FEE_VND));
        assert_eq!(s.total, Money::vnd(529_999));
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let lines = vec![test_line(1, 1, 500_000)];
        let s = summary(&lines);
        assert!(s.shipping_fee.is_zero());
        assert_eq!(s.total, Money::vnd(500_000));
    }

    #[test]
    fn test_free_shipping_above_threshold() {
        let lines = vec![test_line(1, 5, 2_000_000)];
        let s = summary(&lines);
        assert!(s.shipping_fee.is_zero());
        assert_eq!(s.total, s.subtotal);
    }

    #[test]
    fn test_total_formula_holds() {
        let lines = vec![test_line(1, 3, 120_000), test_line(2, 2, 80_000)];
        let s = summary(&lines);
        assert_eq!(s.total, s.subtotal + s.shipping_fee - s.discount);
        assert!(s.discount.is_zero());
        assert!(s.tax.is_zero());
    }

    #[test]
    fn test_item_count_is_distinct_lines() {
        let lines = vec![test_line(1, 3, 10_000), test_line(2, 4, 10_000)];
        let s = summary(&lines);
        assert_eq!(s.item_count, 2);
        assert_eq!(s.total_units, 7);
    }

    #[test]
    fn test_empty_cart() {
        let s = summary(&[]);
        assert!(s.subtotal.is_zero());
        assert_eq!(s.shipping_fee, Money::vnd(FLAT_SHIPPING_FEE_VND));
        assert_eq!(s.total, Money::vnd(FLAT_SHIPPING_FEE_VND));
        assert_eq!(s.item_count, 0);
    }

    #[test]
    fn test_deterministic() {
        let lines = vec![test_line(1, 2, 123_456)];
        assert_eq!(summary(&lines), summary(&lines));
    }
}

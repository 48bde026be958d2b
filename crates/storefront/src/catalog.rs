//! Catalog access and the PC builder configurator.
//!
//! Catalog reads go straight through the cached [`ApiClient`] methods; the
//! builder keeps one selected part per component slot and turns a finished
//! configuration into cart actions.
//!
//! [`ApiClient`]: crate::api::ApiClient

use std::collections::BTreeMap;

use partshub_core::{CurrencyCode, Money, ProductId};

use crate::api::types::ProductDto;
use crate::cart::{CartAction, CartLine};

/// Component slot categories in the PC builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentCategory {
    Cpu,
    Mainboard,
    Ram,
    Gpu,
    Storage,
    Psu,
    Case,
    Cooler,
}

impl ComponentCategory {
    /// Slots that must be filled before a build is complete. Gpu and
    /// Cooler are optional (integrated graphics, stock coolers).
    pub const REQUIRED: &'static [Self] = &[
        Self::Cpu,
        Self::Mainboard,
        Self::Ram,
        Self::Storage,
        Self::Psu,
        Self::Case,
    ];

    /// Category slug used by the backend product listing.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Mainboard => "mainboard",
            Self::Ram => "ram",
            Self::Gpu => "gpu",
            Self::Storage => "storage",
            Self::Psu => "psu",
            Self::Case => "case",
            Self::Cooler => "cooler",
        }
    }
}

impl std::fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// A part chosen for one builder slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartPick {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub thumbnail: Option<String>,
    pub available_stock: u32,
}

impl From<&ProductDto> for PartPick {
    fn from(product: &ProductDto) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: Money::new(product.unit_price, CurrencyCode::VND),
            thumbnail: product.thumbnail.clone(),
            available_stock: product.available_stock,
        }
    }
}

/// The PC builder configurator: at most one part per component slot.
#[derive(Debug, Clone, Default)]
pub struct PcBuilder {
    slots: BTreeMap<ComponentCategory, PartPick>,
}

impl PcBuilder {
    /// An empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a part in its slot, replacing any previous pick.
    pub fn select(&mut self, category: ComponentCategory, pick: PartPick) {
        self.slots.insert(category, pick);
    }

    /// Empty a slot.
    pub fn clear_slot(&mut self, category: ComponentCategory) {
        self.slots.remove(&category);
    }

    /// The current pick for a slot.
    #[must_use]
    pub fn selection(&self, category: ComponentCategory) -> Option<&PartPick> {
        self.slots.get(&category)
    }

    /// Running total over all selected parts.
    #[must_use]
    pub fn total(&self) -> Money {
        self.slots.values().map(|pick| pick.unit_price).sum()
    }

    /// Required slots that are still empty.
    #[must_use]
    pub fn missing_required(&self) -> Vec<ComponentCategory> {
        ComponentCategory::REQUIRED
            .iter()
            .copied()
            .filter(|category| !self.slots.contains_key(category))
            .collect()
    }

    /// Whether every required slot is filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Cart actions that add one of each selected part.
    #[must_use]
    pub fn add_to_cart_actions(&self) -> Vec<CartAction> {
        self.slots
            .values()
            .map(|pick| {
                CartAction::Add(CartLine {
                    remote_id: None,
                    product_id: pick.product_id,
                    product_name: pick.name.clone(),
                    unit_price: pick.unit_price,
                    quantity: 1,
                    thumbnail: pick.thumbnail.clone(),
                    available_stock: pick.available_stock,
                })
            })
            .collect()
    }
}

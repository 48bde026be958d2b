//! Partshub Core - Shared types library.
//!
//! Strongly typed building blocks used across the Partshub storefront:
//! entity ids, money, contact types, and status enums. This crate has no
//! I/O; everything here is plain data with validation at the boundaries.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::{
    AccountId, CartLineId, CurrencyCode, Email, EmailError, Money, OrderId, OrderStatus, Phone,
    PhoneError, ProductId, ProductUnitId, WarrantyId, WarrantyStatus,
};

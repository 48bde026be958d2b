//! Partshub Storefront application core.
//!
//! This crate implements the storefront logic that sits between the UI layer
//! and the remote Partshub REST backend: the typed API client, local cart
//! state and its reconciliation with the account cart, checkout summary and
//! order/payment orchestration, warranty lookup, and the PC builder
//! configurator. Rendering and routing live in the embedding application.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod state;
pub mod warranty;

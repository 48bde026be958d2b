//! Core types for Partshub.

mod email;
mod id;
mod money;
mod phone;
mod status;

pub use email::{Email, EmailError};
pub use id::{AccountId, CartLineId, OrderId, ProductId, ProductUnitId, WarrantyId};
pub use money::{CurrencyCode, Money};
pub use phone::{Phone, PhoneError};
pub use status::{OrderStatus, WarrantyStatus};

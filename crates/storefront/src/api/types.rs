//! Wire types for the Partshub backend.
//!
//! Field names follow the backend's camelCase JSON. Everything here is a
//! plain DTO; conversions into domain types live next to the domain modules.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partshub_core::{AccountId, CartLineId, OrderId, OrderStatus, ProductId, ProductUnitId, WarrantyId, WarrantyStatus};

use super::ApiError;

/// Application-level success code used by the backend envelope.
pub const SUCCESS_CODE: i32 = 1000;

/// Standard response envelope: `{ code?, message, result }`.
///
/// The backend omits `code` on some success paths, so absence is treated
/// as success alongside [`SUCCESS_CODE`].
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub code: Option<i32>,
    #[serde(default)]
    pub message: String,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the envelope into its payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] for a non-success code and
    /// [`ApiError::NotFound`] when a success envelope has no result.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self.code {
            Some(code) if code != SUCCESS_CODE => Err(ApiError::Backend {
                code,
                message: self.message,
            }),
            _ => self.result.ok_or(ApiError::NotFound(self.message)),
        }
    }

    /// Unwrap an envelope whose payload is optional (mutations that return
    /// no body on success).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Backend`] for a non-success code.
    pub fn into_unit(self) -> Result<(), ApiError> {
        match self.code {
            Some(code) if code != SUCCESS_CODE => Err(ApiError::Backend {
                code,
                message: self.message,
            }),
            _ => Ok(()),
        }
    }
}

/// Paginated list wrapper:
/// `{ items, currentPage, pageSize, totalPages, totalCount }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_count: u64,
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub thumbnail: Option<String>,
    pub available_stock: u32,
    pub category: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

// =============================================================================
// Cart
// =============================================================================

/// A server-held cart row for an authenticated account.
///
/// `quantity` is signed: the backend has historically emitted zero or
/// negative rows for stock corrections, which reconciliation must skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineDto {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub thumbnail: Option<String>,
    pub available_stock: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartLineRequest {
    pub account_id: AccountId,
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartLineRequest {
    pub quantity: u32,
}

// =============================================================================
// Orders & payment
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDto {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Order-creation payload: cart snapshot plus validated customer info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub district: String,
    pub ward: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub lines: Vec<OrderLineDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Order code also carried by the payment provider's return redirect.
    pub order_code: String,
    /// Where to send the browser to complete payment.
    pub payment_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: OrderId,
    pub account_id: AccountId,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub is_paid: bool,
    pub phone_number: String,
    pub address: String,
    pub customer_name: String,
}

// =============================================================================
// Account
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: AccountId,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

// =============================================================================
// Warranty
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyRecordDto {
    pub id: WarrantyId,
    pub product_id: ProductId,
    pub product_unit_id: ProductUnitId,
    pub order_id: OrderId,
    /// Serial number or IMEI of the covered unit.
    pub serial_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: WarrantyStatus,
}

// =============================================================================
// Reviews
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i64,
    pub product_id: ProductId,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentRequest {
    pub product_id: ProductId,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRatingRequest {
    pub product_id: ProductId,
    /// 1 to 5 stars.
    pub stars: u8,
}

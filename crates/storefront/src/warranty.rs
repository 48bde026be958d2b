//! Warranty record lookup.
//!
//! The caller picks one of four identifier modes; input is validated
//! against a mode-specific format rule before any request is sent. Records
//! are read-only here - zero matches is a valid outcome, distinct from a
//! failed request.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use partshub_core::{OrderId, Phone, ProductId, ProductUnitId, WarrantyId, WarrantyStatus};

use crate::api::types::WarrantyRecordDto;
use crate::api::{ApiClient, ApiError};

static SERIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{5,19}$").expect("valid regex"));
static IMEI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{15}$").expect("valid regex"));

/// Minimum length of an order code search term.
const MIN_ORDER_CODE_LEN: usize = 4;

/// Identifier mode for a warranty lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    Serial,
    Imei,
    OrderCode,
    Phone,
}

impl LookupMode {
    /// The `mode` query parameter value the backend expects.
    #[must_use]
    pub const fn query_value(&self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Imei => "imei",
            Self::OrderCode => "order",
            Self::Phone => "phone",
        }
    }

    /// Validate a search term against this mode's format rule.
    ///
    /// # Errors
    ///
    /// Returns [`WarrantyError::InvalidTerm`] describing the rule that
    /// failed; the request must not be sent in that case.
    pub fn validate(&self, term: &str) -> Result<(), WarrantyError> {
        let term = term.trim();
        let valid = match self {
            Self::Serial => SERIAL_RE.is_match(term),
            Self::Imei => IMEI_RE.is_match(term),
            Self::OrderCode => term.len() >= MIN_ORDER_CODE_LEN,
            Self::Phone => Phone::parse(term).is_ok(),
        };
        if valid {
            Ok(())
        } else {
            Err(WarrantyError::InvalidTerm {
                mode: *self,
                message: self.format_rule(),
            })
        }
    }

    const fn format_rule(&self) -> &'static str {
        match self {
            Self::Serial => "serial numbers are 6-20 letters, digits, or dashes",
            Self::Imei => "an IMEI is exactly 15 digits",
            Self::OrderCode => "order codes have at least 4 characters",
            Self::Phone => "phone numbers have 9-11 digits",
        }
    }
}

impl std::fmt::Display for LookupMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.query_value())
    }
}

/// Errors from a warranty lookup.
#[derive(Debug, Error)]
pub enum WarrantyError {
    /// The search term does not fit the selected mode; no request was sent.
    #[error("invalid {mode} search term: {message}")]
    InvalidTerm {
        mode: LookupMode,
        message: &'static str,
    },

    /// The backend request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// A backend warranty entry linking a sold unit to its coverage period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarrantyRecord {
    pub id: WarrantyId,
    pub product_id: ProductId,
    pub product_unit_id: ProductUnitId,
    pub order_id: OrderId,
    pub serial_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: WarrantyStatus,
}

impl From<WarrantyRecordDto> for WarrantyRecord {
    fn from(dto: WarrantyRecordDto) -> Self {
        Self {
            id: dto.id,
            product_id: dto.product_id,
            product_unit_id: dto.product_unit_id,
            order_id: dto.order_id,
            serial_number: dto.serial_number,
            start_date: dto.start_date,
            end_date: dto.end_date,
            status: dto.status,
        }
    }
}

/// Backend capable of answering warranty queries.
#[allow(async_fn_in_trait)]
pub trait WarrantySource {
    async fn warranty_records(
        &self,
        mode: LookupMode,
        term: &str,
    ) -> Result<Vec<WarrantyRecordDto>, ApiError>;
}

impl WarrantySource for ApiClient {
    async fn warranty_records(
        &self,
        mode: LookupMode,
        term: &str,
    ) -> Result<Vec<WarrantyRecordDto>, ApiError> {
        self.lookup_warranty(mode, term).await
    }
}

/// Look up warranty records by a validated identifier.
///
/// # Errors
///
/// Returns [`WarrantyError::InvalidTerm`] without touching the network if
/// the term fails the mode's rule, or [`WarrantyError::Api`] if the
/// request itself fails. An unmatched term yields `Ok(vec![])`.
pub async fn lookup<S: WarrantySource>(
    source: &S,
    mode: LookupMode,
    term: &str,
) -> Result<Vec<WarrantyRecord>, WarrantyError> {
    mode.validate(term)?;
    let records = source.warranty_records(mode, term.trim()).await?;
    Ok(records.into_iter().map(WarrantyRecord::from).collect())
}

//! Search filters for car listings.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::car::{Car, CarStatus, FIELD_STATUS};
use crate::error::CoreError;

/// Filter values exactly as they arrived in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCarFilter {
    pub brand: Option<String>,
    pub status: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// Parsed search predicates. Every `None` means "no constraint".
///
/// Soft-deleted cars are never matched by a listing, whatever the filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CarFilter {
    /// Exact, case-sensitive brand match.
    pub brand: Option<String>,
    pub status: Option<CarStatus>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

impl CarFilter {
    /// Parse raw query values. Empty values are treated as absent; an
    /// unknown status or a non-numeric price is an error rather than an
    /// ignored filter.
    pub fn parse(raw: &RawCarFilter) -> Result<Self, CoreError> {
        let status = match non_empty(&raw.status) {
            Some(value) => Some(CarStatus::from_str(value).map_err(|_| {
                CoreError::InvalidEnumValue {
                    field: FIELD_STATUS,
                    value: value.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            // Kept verbatim: the match is exact.
            brand: raw
                .brand
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::to_string),
            status,
            min_price: parse_price_bound("min_price", &raw.min_price)?,
            max_price: parse_price_bound("max_price", &raw.max_price)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.status.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// Whether `car` satisfies every predicate. Does not look at the tombstone.
    pub fn matches(&self, car: &Car) -> bool {
        self.brand.as_ref().map_or(true, |brand| car.brand == *brand)
            && self.status.map_or(true, |status| car.status == status)
            && self.min_price.map_or(true, |min| car.price >= min)
            && self.max_price.map_or(true, |max| car.price <= max)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price_bound(name: &str, value: &Option<String>) -> Result<Option<Decimal>, CoreError> {
    non_empty(value)
        .map(|v| {
            Decimal::from_str(v).map_err(|_| {
                CoreError::MalformedRequest(format!("{name} must be a number, got '{v}'"))
            })
        })
        .transpose()
}

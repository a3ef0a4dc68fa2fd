//! The car record, its lifecycle status, and the candidate type used on writes.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Entity name used in not-found and conflict errors.
pub const ENTITY: &str = "Car";

pub const FIELD_BRAND: &str = "brand";
pub const FIELD_MODEL: &str = "model";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_PRODUCTION_YEAR: &str = "production_year";
pub const FIELD_STATUS: &str = "status";

/* --------------------------------------------------------------------------
Status
-------------------------------------------------------------------------- */

/// Sales status of a car. The wire form is the lowercase variant name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    /// Assigned to every newly created car.
    #[default]
    Available,
    Sold,
    Reserved,
    Maintenance,
}

impl CarStatus {
    pub const ALL: [CarStatus; 4] = [
        CarStatus::Available,
        CarStatus::Sold,
        CarStatus::Reserved,
        CarStatus::Maintenance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Sold => "sold",
            CarStatus::Reserved => "reserved",
            CarStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known status values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown car status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for CarStatus {
    type Err = UnknownStatus;

    /// Exact, case-sensitive match against the wire values. Anything else is
    /// an error; there is no fallback variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CarStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/* --------------------------------------------------------------------------
Record
-------------------------------------------------------------------------- */

/// A persisted car. `deleted_at` is the soft-delete tombstone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Car {
    pub id: DbId,
    pub brand: String,
    pub model: String,
    pub price: Decimal,
    pub status: CarStatus,
    pub production_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

impl Car {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Snapshot of the writable fields, used as the base of an update.
    pub fn to_draft(&self) -> CarDraft {
        CarDraft {
            brand: self.brand.clone(),
            model: self.model.clone(),
            production_year: self.production_year,
            price: self.price,
            status: self.status,
        }
    }
}

/// Candidate field values for a create or update, before validation.
///
/// Has no id and no tombstone: those are owned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CarDraft {
    pub brand: String,
    pub model: String,
    pub production_year: i32,
    pub price: Decimal,
    pub status: CarStatus,
}

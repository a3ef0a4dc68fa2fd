//! Row mapping for the `cars` table.

use std::str::FromStr;

use autolot_core::car::{Car, CarStatus};
use autolot_core::error::CoreError;
use autolot_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A `cars` row as stored. `status` is kept as text and checked on conversion.
#[derive(Debug, Clone, FromRow)]
pub struct CarRow {
    pub id: DbId,
    pub brand: String,
    pub model: String,
    pub production_year: i32,
    pub price: Decimal,
    pub status: String,
    pub deleted_at: Option<Timestamp>,
}

impl TryFrom<CarRow> for Car {
    type Error = CoreError;

    fn try_from(row: CarRow) -> Result<Self, Self::Error> {
        let status = CarStatus::from_str(&row.status).map_err(|e| {
            CoreError::Internal(format!("car {} has corrupt status: {e}", row.id))
        })?;
        Ok(Car {
            id: row.id,
            brand: row.brand,
            model: row.model,
            price: row.price,
            status,
            production_year: row.production_year,
            deleted_at: row.deleted_at,
        })
    }
}

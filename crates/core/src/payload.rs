//! Decoding of create/update request bodies.
//!
//! Works on an untyped JSON value so that "field absent", "field null" and
//! "field has the wrong type" can be told apart. Absent and null are both
//! treated as not provided; a wrong type is a malformed request.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};

use crate::car::{
    CarStatus, FIELD_BRAND, FIELD_MODEL, FIELD_PRICE, FIELD_PRODUCTION_YEAR, FIELD_STATUS,
};
use crate::error::CoreError;

/// Decimal places kept on prices (matches the `NUMERIC(10,2)` column).
pub const PRICE_SCALE: u32 = 2;

/// The fields a client may send for a car. `None` means not provided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarPayload {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub price: Option<Decimal>,
    pub production_year: Option<i32>,
    /// Kept raw: whether an unknown value is an error depends on the operation.
    pub status: Option<String>,
}

impl CarPayload {
    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|_| CoreError::MalformedRequest("Invalid JSON format".to_string()))?;
        Self::from_json(&value)
    }

    /// Decode an already-parsed JSON body. Unknown keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, CoreError> {
        let object = value.as_object().ok_or_else(|| {
            CoreError::MalformedRequest("Request body must be a JSON object".to_string())
        })?;

        Ok(Self {
            brand: string_field(object, FIELD_BRAND)?,
            model: string_field(object, FIELD_MODEL)?,
            price: price_field(object, FIELD_PRICE)?,
            production_year: year_field(object, FIELD_PRODUCTION_YEAR)?,
            status: string_field(object, FIELD_STATUS)?,
        })
    }

    /// Names of the fields required for a create or full replace that were
    /// not provided, in a stable order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.brand.is_none() {
            missing.push(FIELD_BRAND);
        }
        if self.model.is_none() {
            missing.push(FIELD_MODEL);
        }
        if self.price.is_none() {
            missing.push(FIELD_PRICE);
        }
        if self.production_year.is_none() {
            missing.push(FIELD_PRODUCTION_YEAR);
        }
        missing
    }

    /// The provided status, parsed strictly. `Ok(None)` when not provided.
    pub fn parsed_status(&self) -> Result<Option<CarStatus>, CoreError> {
        self.status
            .as_deref()
            .map(|value| {
                CarStatus::from_str(value).map_err(|_| CoreError::InvalidEnumValue {
                    field: FIELD_STATUS,
                    value: value.to_string(),
                })
            })
            .transpose()
    }
}

fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|v| !v.is_null())
}

fn wrong_type(field: &str, expected: &str) -> CoreError {
    CoreError::MalformedRequest(format!("Field '{field}' must be {expected}"))
}

fn string_field(object: &Map<String, Value>, field: &str) -> Result<Option<String>, CoreError> {
    match present(object, field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(wrong_type(field, "a string")),
    }
}

fn year_field(object: &Map<String, Value>, field: &str) -> Result<Option<i32>, CoreError> {
    match present(object, field) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|year| i32::try_from(year).ok())
            .map(Some)
            .ok_or_else(|| wrong_type(field, "an integer")),
        Some(_) => Err(wrong_type(field, "an integer")),
    }
}

/// Prices may arrive as JSON numbers or numeric strings. Numbers go through
/// their decimal text form, never through `f64`.
fn price_field(object: &Map<String, Value>, field: &str) -> Result<Option<Decimal>, CoreError> {
    let text = match present(object, field) {
        None => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err(wrong_type(field, "a number")),
    };

    match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        Ok(price) => Ok(Some(normalize_price(price))),
        Err(_) => saturated_price(&text)
            .map(Some)
            .ok_or_else(|| wrong_type(field, "a number")),
    }
}

/// A well-formed number that `Decimal` cannot hold: magnitudes of one or
/// more saturate to `Decimal::MAX`, smaller ones round to zero. The sign is
/// kept so the price rules still report it. `None` if `text` is not a number.
fn saturated_price(text: &str) -> Option<Decimal> {
    let numeric = text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !numeric {
        return None;
    }
    // Only the sign and the order of magnitude are read from the float.
    let approx: f64 = text.parse().ok()?;
    let magnitude = if approx.abs() >= 1.0 {
        Decimal::MAX
    } else {
        normalize_price(Decimal::ZERO)
    };
    Some(if approx.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    })
}

/// Round half away from zero to [`PRICE_SCALE`] places and pad to that scale.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut rounded =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

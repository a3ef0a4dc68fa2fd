//! Field rules for car records.
//!
//! Pure logic, no I/O. Every rule is evaluated on every call so a single
//! response can report all violations at once.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::car::{CarDraft, FIELD_BRAND, FIELD_MODEL, FIELD_PRICE, FIELD_PRODUCTION_YEAR};

/* --------------------------------------------------------------------------
Limits
-------------------------------------------------------------------------- */

/// Minimum length of `brand` and `model`, in characters.
pub const NAME_MIN_CHARS: usize = 2;

/// Maximum length of `brand` and `model`, in characters.
pub const NAME_MAX_CHARS: usize = 50;

/// Earliest accepted production year. The upper bound is the current year.
pub const MIN_PRODUCTION_YEAR: i32 = 1900;

/// Exclusive upper bound on price: 9,999,999.99.
pub fn max_price() -> Decimal {
    Decimal::new(999_999_999, 2)
}

/// The current UTC calendar year, read at call time.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/* --------------------------------------------------------------------------
Result types
-------------------------------------------------------------------------- */

/// A single field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Every violation found for one candidate, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    pub fn messages_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.field == field)
            .map(|v| v.message.as_str())
    }

    /// Field path -> message map for error envelopes. The first message
    /// recorded for a field wins.
    pub fn details(&self) -> BTreeMap<String, String> {
        let mut details = BTreeMap::new();
        for violation in &self.violations {
            details
                .entry(violation.field.clone())
                .or_insert_with(|| violation.message.clone());
        }
        details
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for v in &self.violations {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
            first = false;
        }
        Ok(())
    }
}

/// A draft that has passed [`validate_car`].
///
/// Stores accept only this type on writes, so nothing can be persisted
/// without going through the rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCar(CarDraft);

impl ValidCar {
    pub fn draft(&self) -> &CarDraft {
        &self.0
    }
}

/* --------------------------------------------------------------------------
Rules
-------------------------------------------------------------------------- */

/// Evaluate all rules against `draft`, with `current_year` as the upper
/// bound for the production year. Returns an empty set when valid.
pub fn check_car(draft: &CarDraft, current_year: i32) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_name(&mut errors, FIELD_BRAND, "Brand", &draft.brand);
    check_name(&mut errors, FIELD_MODEL, "Model", &draft.model);
    check_production_year(&mut errors, draft.production_year, current_year);
    check_price(&mut errors, draft.price);
    errors
}

/// Run [`check_car`] and wrap the draft in a [`ValidCar`] if it passes.
pub fn validate_car(draft: CarDraft, current_year: i32) -> Result<ValidCar, ValidationErrors> {
    let errors = check_car(&draft, current_year);
    if errors.is_empty() {
        Ok(ValidCar(draft))
    } else {
        Err(errors)
    }
}

fn check_name(errors: &mut ValidationErrors, field: &str, label: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, format!("Please enter a {}", label.to_lowercase()));
        return;
    }
    let len = value.chars().count();
    if len < NAME_MIN_CHARS {
        errors.add(
            field,
            format!("{label} must be at least {NAME_MIN_CHARS} characters"),
        );
    } else if len > NAME_MAX_CHARS {
        errors.add(
            field,
            format!("{label} can't exceed {NAME_MAX_CHARS} characters"),
        );
    }
}

fn check_production_year(errors: &mut ValidationErrors, year: i32, current_year: i32) {
    if !(MIN_PRODUCTION_YEAR..=current_year).contains(&year) {
        errors.add(
            FIELD_PRODUCTION_YEAR,
            "Production year must be between 1900 and the current year",
        );
    }
}

fn check_price(errors: &mut ValidationErrors, price: Decimal) {
    if price <= Decimal::ZERO {
        errors.add(FIELD_PRICE, "Price must be higher than 0");
    } else if price >= max_price() {
        errors.add(FIELD_PRICE, "Price must be lower than 9,999,999.99");
    }
}

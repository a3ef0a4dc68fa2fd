//! Query string types for the listing endpoints.
//!
//! Everything arrives as text so that empty values (`?page=`) can be treated
//! as absent instead of failing deserialization.

use autolot_core::error::CoreError;
use autolot_core::filter::RawCarFilter;
use autolot_core::pagination::PageRequest;
use serde::Deserialize;

/// `?page=&limit=`. Values are clamped by [`PageRequest`].
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PaginationParams {
    pub fn to_page_request(&self) -> Result<PageRequest, CoreError> {
        Ok(PageRequest::new(
            parse_int("page", &self.page)?,
            parse_int("limit", &self.limit)?,
        ))
    }
}

/// `?brand=&status=&min_price=&max_price=&page=&limit=`.
#[derive(Debug, Default, Deserialize)]
pub struct CarSearchParams {
    pub brand: Option<String>,
    pub status: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl CarSearchParams {
    pub fn raw_filter(&self) -> RawCarFilter {
        RawCarFilter {
            brand: self.brand.clone(),
            status: self.status.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
        }
    }

    pub fn to_page_request(&self) -> Result<PageRequest, CoreError> {
        Ok(PageRequest::new(
            parse_int("page", &self.page)?,
            parse_int("limit", &self.limit)?,
        ))
    }
}

/// Empty means absent; anything else must be an integer. Out-of-range
/// integers are left for clamping.
fn parse_int(name: &str, value: &Option<String>) -> Result<Option<i64>, CoreError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| {
            CoreError::MalformedRequest(format!("{name} must be an integer, got '{v}'"))
        }),
    }
}

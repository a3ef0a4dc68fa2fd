//! Shared response envelope types for API handlers.
//!
//! Single records are returned as flat JSON; collections are wrapped in
//! [`PaginatedResponse`].

use autolot_core::filter::CarFilter;
use autolot_core::pagination::{PageInfo, Paginated};
use serde::Serialize;

/// `{ "data": [...], "pagination": {...} }`, plus the applied `filter` on
/// search responses.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<CarFilter>,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(page: Paginated<T>) -> Self {
        Self {
            data: page.items,
            pagination: page.pagination,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: CarFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// `{ "message": "..." }` for operations with nothing else to return.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

//! The persistence seam for car records.

use async_trait::async_trait;

use crate::car::Car;
use crate::error::CoreError;
use crate::filter::CarFilter;
use crate::pagination::PageRequest;
use crate::types::{DbId, Timestamp};
use crate::validation::ValidCar;

/// Storage operations the query and mutation pipelines need.
///
/// Implementations decide how records are kept; the pipelines decide what a
/// tombstone means for each operation. Failures of the backend itself are
/// reported as [`CoreError::Unavailable`] or [`CoreError::Internal`].
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Look up a record by id, tombstoned or not.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Car>, CoreError>;

    /// Live records matching `filter`, ordered by id ascending, windowed by
    /// `page`.
    async fn list(&self, filter: &CarFilter, page: PageRequest) -> Result<Vec<Car>, CoreError>;

    /// Number of live records matching `filter`.
    async fn count(&self, filter: &CarFilter) -> Result<i64, CoreError>;

    /// Persist a new record and return it with its assigned id.
    async fn insert(&self, car: &ValidCar) -> Result<Car, CoreError>;

    /// Overwrite the writable fields of a live record.
    ///
    /// Returns `None` when no live record has this id.
    async fn update(&self, id: DbId, car: &ValidCar) -> Result<Option<Car>, CoreError>;

    /// Set the tombstone on a live record.
    ///
    /// Returns `None` when the record is missing or already tombstoned; an
    /// existing tombstone is never overwritten.
    async fn mark_deleted(&self, id: DbId, at: Timestamp) -> Result<Option<Car>, CoreError>;

    /// Cheap reachability check for the health endpoint.
    async fn ping(&self) -> Result<(), CoreError>;
}

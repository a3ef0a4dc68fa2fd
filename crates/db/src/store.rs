//! [`CarStore`] implementation over PostgreSQL.

use async_trait::async_trait;
use autolot_core::car::Car;
use autolot_core::error::CoreError;
use autolot_core::filter::CarFilter;
use autolot_core::pagination::PageRequest;
use autolot_core::store::CarStore;
use autolot_core::types::{DbId, Timestamp};
use autolot_core::validation::ValidCar;

use crate::repositories::CarRepo;
use crate::DbPool;

/// Classify a driver error. Connection-level failures mean the database is
/// unreachable; everything else is an internal fault.
pub fn map_sqlx_error(err: sqlx::Error) -> CoreError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => CoreError::Unavailable(err.to_string()),
        other => CoreError::Internal(other.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct PgCarStore {
    pool: DbPool,
}

impl PgCarStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CarStore for PgCarStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Car>, CoreError> {
        CarRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(Car::try_from)
            .transpose()
    }

    async fn list(&self, filter: &CarFilter, page: PageRequest) -> Result<Vec<Car>, CoreError> {
        CarRepo::list(&self.pool, filter, page)
            .await
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(Car::try_from)
            .collect()
    }

    async fn count(&self, filter: &CarFilter) -> Result<i64, CoreError> {
        CarRepo::count(&self.pool, filter)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert(&self, car: &ValidCar) -> Result<Car, CoreError> {
        let row = CarRepo::create(&self.pool, car.draft())
            .await
            .map_err(map_sqlx_error)?;
        Car::try_from(row)
    }

    async fn update(&self, id: DbId, car: &ValidCar) -> Result<Option<Car>, CoreError> {
        CarRepo::update(&self.pool, id, car.draft())
            .await
            .map_err(map_sqlx_error)?
            .map(Car::try_from)
            .transpose()
    }

    async fn mark_deleted(&self, id: DbId, at: Timestamp) -> Result<Option<Car>, CoreError> {
        CarRepo::soft_delete(&self.pool, id, at)
            .await
            .map_err(map_sqlx_error)?
            .map(Car::try_from)
            .transpose()
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool).await.map_err(map_sqlx_error)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pool_failures_are_unavailable() {
        assert_matches!(map_sqlx_error(sqlx::Error::PoolTimedOut), CoreError::Unavailable(_));
        assert_matches!(map_sqlx_error(sqlx::Error::PoolClosed), CoreError::Unavailable(_));
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_matches!(map_sqlx_error(sqlx::Error::Io(io)), CoreError::Unavailable(_));
    }

    #[test]
    fn other_failures_are_internal() {
        assert_matches!(map_sqlx_error(sqlx::Error::RowNotFound), CoreError::Internal(_));
        assert_matches!(
            map_sqlx_error(sqlx::Error::Protocol("bad".into())),
            CoreError::Internal(_)
        );
    }
}

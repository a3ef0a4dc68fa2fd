//! In-process [`CarStore`] backed by an ordered map.
//!
//! Used by the test suites and by `STORAGE_BACKEND=memory`. Contents are
//! lost when the process exits.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::car::Car;
use crate::error::CoreError;
use crate::filter::CarFilter;
use crate::pagination::PageRequest;
use crate::store::CarStore;
use crate::types::{DbId, Timestamp};
use crate::validation::ValidCar;

#[derive(Debug)]
struct Inner {
    next_id: DbId,
    cars: BTreeMap<DbId, Car>,
}

#[derive(Debug)]
pub struct MemoryCarStore {
    inner: RwLock<Inner>,
}

impl Default for MemoryCarStore {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                cars: BTreeMap::new(),
            }),
        }
    }
}

impl MemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn live_matching<'a>(
    cars: &'a BTreeMap<DbId, Car>,
    filter: &'a CarFilter,
) -> impl Iterator<Item = &'a Car> + 'a {
    cars.values()
        .filter(|car| !car.is_deleted())
        .filter(move |car| filter.matches(car))
}

#[async_trait]
impl CarStore for MemoryCarStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Car>, CoreError> {
        Ok(self.inner.read().await.cars.get(&id).cloned())
    }

    async fn list(&self, filter: &CarFilter, page: PageRequest) -> Result<Vec<Car>, CoreError> {
        let inner = self.inner.read().await;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(0);
        Ok(live_matching(&inner.cars, filter)
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &CarFilter) -> Result<i64, CoreError> {
        let inner = self.inner.read().await;
        let count = live_matching(&inner.cars, filter).count();
        i64::try_from(count).map_err(|e| CoreError::Internal(e.to_string()))
    }

    async fn insert(&self, car: &ValidCar) -> Result<Car, CoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let draft = car.draft();
        let created = Car {
            id,
            brand: draft.brand.clone(),
            model: draft.model.clone(),
            price: draft.price,
            status: draft.status,
            production_year: draft.production_year,
            deleted_at: None,
        };
        inner.cars.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: DbId, car: &ValidCar) -> Result<Option<Car>, CoreError> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.cars.get_mut(&id).filter(|c| !c.is_deleted()) else {
            return Ok(None);
        };

        let draft = car.draft();
        existing.brand = draft.brand.clone();
        existing.model = draft.model.clone();
        existing.price = draft.price;
        existing.status = draft.status;
        existing.production_year = draft.production_year;
        Ok(Some(existing.clone()))
    }

    async fn mark_deleted(&self, id: DbId, at: Timestamp) -> Result<Option<Car>, CoreError> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.cars.get_mut(&id).filter(|c| !c.is_deleted()) else {
            return Ok(None);
        };
        existing.deleted_at = Some(at);
        Ok(Some(existing.clone()))
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

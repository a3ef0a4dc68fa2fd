//! Read paths: single-record lookup and filtered, paginated listing.

use crate::car::{Car, ENTITY};
use crate::error::CoreError;
use crate::filter::CarFilter;
use crate::pagination::{PageRequest, Paginated};
use crate::store::CarStore;
use crate::types::DbId;

/// How a lookup treats a tombstoned record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletedPolicy {
    /// A tombstoned record is reported as not found.
    Hide,
    /// A tombstoned record is returned as is.
    Include,
}

/// Fetch one car, applying `policy` to tombstoned records.
pub async fn fetch_car<S>(store: &S, id: DbId, policy: DeletedPolicy) -> Result<Car, CoreError>
where
    S: CarStore + ?Sized,
{
    let not_found = CoreError::NotFound { entity: ENTITY, id };
    match store.find_by_id(id).await? {
        Some(car) if car.is_deleted() && policy == DeletedPolicy::Hide => Err(not_found),
        Some(car) => Ok(car),
        None => Err(not_found),
    }
}

/// One page of live cars matching `filter`, with metadata computed from the
/// filtered total.
pub async fn list_cars<S>(
    store: &S,
    filter: &CarFilter,
    page: PageRequest,
) -> Result<Paginated<Car>, CoreError>
where
    S: CarStore + ?Sized,
{
    let total = store.count(filter).await?;
    let items = store.list(filter, page).await?;
    tracing::debug!(total, returned = items.len(), page = page.page(), "Listed cars");
    Ok(Paginated::new(items, page, total))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal::Decimal;

    use super::*;
    use crate::car::{CarDraft, CarStatus};
    use crate::memory::MemoryCarStore;
    use crate::validation::validate_car;

    async fn seed(store: &MemoryCarStore, brand: &str, price: i64, status: CarStatus) -> Car {
        let valid = validate_car(
            CarDraft {
                brand: brand.into(),
                model: "Model".into(),
                production_year: 2019,
                price: Decimal::new(price, 0),
                status,
            },
            2025,
        )
        .unwrap();
        store.insert(&valid).await.unwrap()
    }

    #[tokio::test]
    async fn hide_policy_treats_tombstone_as_missing() {
        let store = MemoryCarStore::new();
        let car = seed(&store, "Audi", 1000, CarStatus::Available).await;
        store.mark_deleted(car.id, chrono::Utc::now()).await.unwrap();

        assert_matches!(
            fetch_car(&store, car.id, DeletedPolicy::Hide).await,
            Err(CoreError::NotFound { id, .. }) if id == car.id
        );
        let included = fetch_car(&store, car.id, DeletedPolicy::Include).await.unwrap();
        assert!(included.is_deleted());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = MemoryCarStore::new();
        assert_matches!(
            fetch_car(&store, 42, DeletedPolicy::Include).await,
            Err(CoreError::NotFound { entity: "Car", id: 42 })
        );
    }

    #[tokio::test]
    async fn fifteen_cars_paginate_into_two_pages() {
        let store = MemoryCarStore::new();
        for i in 0..15 {
            seed(&store, "Audi", 1000 + i, CarStatus::Available).await;
        }

        let first = list_cars(&store, &CarFilter::default(), PageRequest::new(Some(1), Some(10)))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.pagination.total_pages, 2);
        assert!(first.pagination.has_next);

        let second = list_cars(&store, &CarFilter::default(), PageRequest::new(Some(2), Some(10)))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 5);
        assert!(!second.pagination.has_next);
        assert!(second.pagination.has_previous);
    }

    #[tokio::test]
    async fn totals_reflect_the_filter() {
        let store = MemoryCarStore::new();
        seed(&store, "Audi", 1000, CarStatus::Sold).await;
        seed(&store, "Audi", 2000, CarStatus::Available).await;
        seed(&store, "BMW", 3000, CarStatus::Sold).await;

        let filter = CarFilter {
            status: Some(CarStatus::Sold),
            ..CarFilter::default()
        };
        let page = list_cars(&store, &filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.pagination.total_items, 2);
        assert!(page.items.iter().all(|c| c.status == CarStatus::Sold));
    }

    #[tokio::test]
    async fn empty_store_has_zero_pages() {
        let store = MemoryCarStore::new();
        let page = list_cars(&store, &CarFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
    }
}

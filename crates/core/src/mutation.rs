//! Write paths: create, full replace, partial merge and soft delete.
//!
//! Every write goes decode -> presence check -> candidate -> validate ->
//! persist. The store is called at most once per operation with a complete
//! [`ValidCar`], so a rejected update never partially commits.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::car::{Car, CarDraft, CarStatus, ENTITY};
use crate::error::CoreError;
use crate::payload::CarPayload;
use crate::query::{fetch_car, DeletedPolicy};
use crate::store::CarStore;
use crate::types::DbId;
use crate::validation::{current_year, validate_car, ValidCar};

/// HTTP update semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// PUT: all core fields required, status kept.
    Replace,
    /// PATCH: only provided fields applied, status included.
    Merge,
}

/* --------------------------------------------------------------------------
Candidate construction
-------------------------------------------------------------------------- */

type CoreFields = (String, String, Decimal, i32);

/// Brand, model, price and year, or the list of those missing.
fn require_core_fields(payload: CarPayload) -> Result<CoreFields, CoreError> {
    let missing = payload.missing_required();
    match (payload.brand, payload.model, payload.price, payload.production_year) {
        (Some(brand), Some(model), Some(price), Some(year)) => Ok((brand, model, price, year)),
        _ => Err(CoreError::MissingFields(missing)),
    }
}

/// Candidate for a new car. Any status in the payload is ignored.
pub fn draft_for_create(payload: CarPayload) -> Result<CarDraft, CoreError> {
    let (brand, model, price, production_year) = require_core_fields(payload)?;
    Ok(CarDraft {
        brand,
        model,
        production_year,
        price,
        status: CarStatus::Available,
    })
}

/// Candidate for a full replace of `current`. Status is carried over.
pub fn draft_for_replace(current: &Car, payload: CarPayload) -> Result<CarDraft, CoreError> {
    let (brand, model, price, production_year) = require_core_fields(payload)?;
    Ok(CarDraft {
        brand,
        model,
        production_year,
        price,
        status: current.status,
    })
}

/// Candidate for a partial merge onto `current`.
pub fn draft_for_merge(current: &Car, payload: CarPayload) -> Result<CarDraft, CoreError> {
    let status = payload.parsed_status()?;
    let mut draft = current.to_draft();
    if let Some(brand) = payload.brand {
        draft.brand = brand;
    }
    if let Some(model) = payload.model {
        draft.model = model;
    }
    if let Some(price) = payload.price {
        draft.price = price;
    }
    if let Some(year) = payload.production_year {
        draft.production_year = year;
    }
    if let Some(status) = status {
        draft.status = status;
    }
    Ok(draft)
}

fn validate(draft: CarDraft) -> Result<ValidCar, CoreError> {
    validate_car(draft, current_year()).map_err(CoreError::Validation)
}

/* --------------------------------------------------------------------------
Pipelines
-------------------------------------------------------------------------- */

/// Create a car from a JSON body.
pub async fn create_car<S>(store: &S, body: &Value) -> Result<Car, CoreError>
where
    S: CarStore + ?Sized,
{
    let payload = CarPayload::from_json(body)?;
    let valid = validate(draft_for_create(payload)?)?;
    let car = store.insert(&valid).await?;
    tracing::info!(car_id = car.id, brand = %car.brand, "Car created");
    Ok(car)
}

/// Update a live car from a raw JSON body, following `mode`.
///
/// The record is looked up before the body is decoded, so an unknown or
/// deleted id is reported as not found whatever the body holds.
pub async fn update_car<S>(
    store: &S,
    id: DbId,
    mode: UpdateMode,
    body: &[u8],
) -> Result<Car, CoreError>
where
    S: CarStore + ?Sized,
{
    let current = fetch_car(store, id, DeletedPolicy::Hide).await?;
    let payload = CarPayload::from_slice(body)?;
    let draft = match mode {
        UpdateMode::Replace => draft_for_replace(&current, payload)?,
        UpdateMode::Merge => draft_for_merge(&current, payload)?,
    };
    let valid = validate(draft)?;

    // Tombstoned between the lookup and the write.
    let car = store
        .update(id, &valid)
        .await?
        .ok_or(CoreError::NotFound { entity: ENTITY, id })?;
    tracing::info!(car_id = id, ?mode, "Car updated");
    Ok(car)
}

/// Soft delete a car. A second delete is a conflict and leaves the first
/// tombstone untouched.
pub async fn soft_delete_car<S>(store: &S, id: DbId) -> Result<Car, CoreError>
where
    S: CarStore + ?Sized,
{
    let current = fetch_car(store, id, DeletedPolicy::Include).await?;
    if current.is_deleted() {
        return Err(CoreError::AlreadyDeleted { entity: ENTITY, id });
    }

    let car = store
        .mark_deleted(id, chrono::Utc::now())
        .await?
        .ok_or(CoreError::AlreadyDeleted { entity: ENTITY, id })?;
    tracing::info!(car_id = id, "Car soft-deleted");
    Ok(car)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::memory::MemoryCarStore;

    fn raw(body: Value) -> Vec<u8> {
        serde_json::to_vec(&body).unwrap()
    }

    fn corolla() -> Value {
        json!({
            "brand": "Toyota",
            "model": "Corolla",
            "price": 20000,
            "production_year": 2020
        })
    }

    // -- create --------------------------------------------------------------

    #[tokio::test]
    async fn create_echoes_fields_and_defaults_status() {
        let store = MemoryCarStore::new();
        let car = create_car(&store, &corolla()).await.unwrap();

        assert_eq!(car.brand, "Toyota");
        assert_eq!(car.model, "Corolla");
        assert_eq!(car.price, Decimal::new(2_000_000, 2));
        assert_eq!(car.production_year, 2020);
        assert_eq!(car.status, CarStatus::Available);
        assert!(!car.is_deleted());

        let other = create_car(&store, &corolla()).await.unwrap();
        assert_ne!(car.id, other.id);
    }

    #[tokio::test]
    async fn create_ignores_supplied_status() {
        let store = MemoryCarStore::new();
        let mut body = corolla();
        body["status"] = json!("sold");
        assert_eq!(create_car(&store, &body).await.unwrap().status, CarStatus::Available);

        body["status"] = json!("flying");
        assert_eq!(create_car(&store, &body).await.unwrap().status, CarStatus::Available);
    }

    #[tokio::test]
    async fn create_reports_missing_fields() {
        let store = MemoryCarStore::new();
        assert_matches!(
            create_car(&store, &json!({ "brand": "Toyota", "price": null })).await,
            Err(CoreError::MissingFields(fields)) if fields == vec!["model", "price", "production_year"]
        );
    }

    #[tokio::test]
    async fn create_rejects_invalid_candidate_without_persisting() {
        let store = MemoryCarStore::new();
        let mut body = corolla();
        body["brand"] = json!("T");
        body["price"] = json!(0);

        let err = create_car(&store, &body).await.unwrap_err();
        assert_matches!(&err, CoreError::Validation(errors) if errors.len() == 2);
        assert_eq!(store.count(&Default::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn out_of_range_prices_reach_the_validator() {
        let store = MemoryCarStore::new();
        for (price, message) in [
            (json!(1e30), "Price must be lower than 9,999,999.99"),
            (json!("100000000000000000000000000000"), "Price must be lower than 9,999,999.99"),
            (json!(1e-30), "Price must be higher than 0"),
        ] {
            let mut body = corolla();
            body["price"] = price;
            let err = create_car(&store, &body).await.unwrap_err();
            assert_matches!(
                &err,
                CoreError::Validation(errors) if errors.details()["price"] == message,
                "{body}"
            );
        }
    }

    // -- update --------------------------------------------------------------

    #[tokio::test]
    async fn patch_price_leaves_other_fields() {
        let store = MemoryCarStore::new();
        let car = create_car(&store, &corolla()).await.unwrap();

        let updated = update_car(&store, car.id, UpdateMode::Merge, &raw(json!({ "price": 26000 })))
            .await
            .unwrap();
        assert_eq!(updated.price.to_string(), "26000.00");
        assert_eq!(updated.brand, car.brand);
        assert_eq!(updated.model, car.model);
        assert_eq!(updated.production_year, car.production_year);
        assert_eq!(updated.status, car.status);
    }

    #[tokio::test]
    async fn patch_applies_status_strictly() {
        let store = MemoryCarStore::new();
        let car = create_car(&store, &corolla()).await.unwrap();

        let updated = update_car(&store, car.id, UpdateMode::Merge, &raw(json!({ "status": "reserved" })))
            .await
            .unwrap();
        assert_eq!(updated.status, CarStatus::Reserved);

        assert_matches!(
            update_car(&store, car.id, UpdateMode::Merge, &raw(json!({ "status": "Reserved" }))).await,
            Err(CoreError::InvalidEnumValue { field: "status", .. })
        );
    }

    #[tokio::test]
    async fn put_requires_all_fields_and_keeps_status() {
        let store = MemoryCarStore::new();
        let car = create_car(&store, &corolla()).await.unwrap();
        update_car(&store, car.id, UpdateMode::Merge, &raw(json!({ "status": "sold" })))
            .await
            .unwrap();

        assert_matches!(
            update_car(&store, car.id, UpdateMode::Replace, &raw(json!({ "price": 1 }))).await,
            Err(CoreError::MissingFields(_))
        );

        let mut body = json!({
            "brand": "Honda",
            "model": "Civic",
            "price": "15000.5",
            "production_year": 2018,
            "status": "available"
        });
        let replaced = update_car(&store, car.id, UpdateMode::Replace, &raw(body.clone())).await.unwrap();
        assert_eq!(replaced.brand, "Honda");
        assert_eq!(replaced.price.to_string(), "15000.50");
        assert_eq!(replaced.status, CarStatus::Sold);

        body["production_year"] = json!(current_year() + 1);
        assert_matches!(
            update_car(&store, car.id, UpdateMode::Replace, &raw(body.clone())).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn failed_update_leaves_record_unchanged() {
        let store = MemoryCarStore::new();
        let car = create_car(&store, &corolla()).await.unwrap();

        let result = update_car(
            &store,
            car.id,
            UpdateMode::Merge,
            &raw(json!({ "brand": "Ford", "price": -1 })),
        )
        .await;
        assert_matches!(result, Err(CoreError::Validation(_)));

        let stored = store.find_by_id(car.id).await.unwrap().unwrap();
        assert_eq!(stored, car);
    }

    #[tokio::test]
    async fn update_of_deleted_car_is_not_found() {
        let store = MemoryCarStore::new();
        let car = create_car(&store, &corolla()).await.unwrap();
        soft_delete_car(&store, car.id).await.unwrap();

        for mode in [UpdateMode::Replace, UpdateMode::Merge] {
            assert_matches!(
                update_car(&store, car.id, mode, &raw(corolla())).await,
                Err(CoreError::NotFound { .. })
            );
        }
    }

    #[tokio::test]
    async fn update_of_unknown_car_is_not_found_before_body_is_read() {
        let store = MemoryCarStore::new();
        for mode in [UpdateMode::Replace, UpdateMode::Merge] {
            assert_matches!(
                update_car(&store, 999, mode, b"{bad").await,
                Err(CoreError::NotFound { id: 999, .. })
            );
        }

        let car = create_car(&store, &corolla()).await.unwrap();
        assert_matches!(
            update_car(&store, car.id, UpdateMode::Merge, b"{bad").await,
            Err(CoreError::MalformedRequest(msg)) if msg == "Invalid JSON format"
        );
    }

    // -- delete --------------------------------------------------------------

    #[tokio::test]
    async fn double_delete_conflicts_and_keeps_first_tombstone() {
        let store = MemoryCarStore::new();
        let car = create_car(&store, &corolla()).await.unwrap();

        let deleted = soft_delete_car(&store, car.id).await.unwrap();
        assert!(deleted.is_deleted());

        assert_matches!(
            soft_delete_car(&store, car.id).await,
            Err(CoreError::AlreadyDeleted { id, .. }) if id == car.id
        );
        let stored = store.find_by_id(car.id).await.unwrap().unwrap();
        assert_eq!(stored.deleted_at, deleted.deleted_at);
    }

    #[tokio::test]
    async fn delete_of_unknown_car_is_not_found() {
        let store = MemoryCarStore::new();
        assert_matches!(
            soft_delete_car(&store, 7).await,
            Err(CoreError::NotFound { id: 7, .. })
        );
    }
}

//! Handlers for the car resource.

use autolot_core::car::Car;
use autolot_core::error::CoreError;
use autolot_core::filter::CarFilter;
use autolot_core::mutation::{create_car, soft_delete_car, update_car, UpdateMode};
use autolot_core::query::{fetch_car, list_cars, DeletedPolicy};
use autolot_core::types::DbId;
use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::query::{CarSearchParams, PaginationParams};
use crate::response::{MessageResponse, PaginatedResponse};
use crate::state::AppState;

/* --------------------------------------------------------------------------
Extractor rejections
-------------------------------------------------------------------------- */

/// A non-numeric id cannot name a car, so it is a miss rather than a bad
/// request.
fn car_id(path: Result<Path<DbId>, PathRejection>) -> AppResult<DbId> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::NotFound("Car not found".to_string()))
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> AppResult<Value> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(rejection)) => {
            Err(AppError::BadRequest(rejection.body_text()))
        }
        Err(_) => Err(CoreError::MalformedRequest("Invalid JSON format".to_string()).into()),
    }
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/* --------------------------------------------------------------------------
Reads
-------------------------------------------------------------------------- */

/// GET /api/cars
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> AppResult<Json<PaginatedResponse<Car>>> {
    let params = query_params(query)?;
    let page = params.to_page_request()?;
    let result = list_cars(state.store.as_ref(), &CarFilter::default(), page).await?;
    Ok(Json(PaginatedResponse::new(result)))
}

/// GET /api/cars/search
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<CarSearchParams>, QueryRejection>,
) -> AppResult<Json<PaginatedResponse<Car>>> {
    let params = query_params(query)?;
    let filter = CarFilter::parse(&params.raw_filter())?;
    let page = params.to_page_request()?;
    let result = list_cars(state.store.as_ref(), &filter, page).await?;
    Ok(Json(PaginatedResponse::new(result).with_filter(filter)))
}

/// GET /api/car/{id}
pub async fn show(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<Car>> {
    let id = car_id(path)?;
    let car = fetch_car(state.store.as_ref(), id, DeletedPolicy::Hide).await?;
    Ok(Json(car))
}

/* --------------------------------------------------------------------------
Writes
-------------------------------------------------------------------------- */

/// POST /api/car
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Car>)> {
    let body = json_body(payload)?;
    let car = create_car(state.store.as_ref(), &body).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

// Updates decode the body themselves, after the id has been resolved.

/// PUT /api/car/{id}
pub async fn replace(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    body: Bytes,
) -> AppResult<Json<Car>> {
    let id = car_id(path)?;
    let car = update_car(state.store.as_ref(), id, UpdateMode::Replace, &body).await?;
    Ok(Json(car))
}

/// PATCH /api/car/{id}
pub async fn patch(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
    body: Bytes,
) -> AppResult<Json<Car>> {
    let id = car_id(path)?;
    let car = update_car(state.store.as_ref(), id, UpdateMode::Merge, &body).await?;
    Ok(Json(car))
}

/// DELETE /api/car/{id}
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let id = car_id(path)?;
    soft_delete_car(state.store.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Car deleted successfully",
    }))
}

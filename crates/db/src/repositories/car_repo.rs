//! Repository for the `cars` table.

use autolot_core::car::CarDraft;
use autolot_core::filter::CarFilter;
use autolot_core::pagination::PageRequest;
use autolot_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::car::CarRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, brand, model, production_year, price, status, deleted_at";

/// Build the WHERE clause for a filter. Live rows only; placeholders are
/// numbered from `$1` in the order brand, status, min_price, max_price.
///
/// Returns the clause and the next free placeholder index.
fn filter_clause(filter: &CarFilter) -> (String, u32) {
    let mut conditions = vec!["deleted_at IS NULL".to_string()];
    let mut bind_idx = 1u32;

    if filter.brand.is_some() {
        conditions.push(format!("brand = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.status.is_some() {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.min_price.is_some() {
        conditions.push(format!("price >= ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.max_price.is_some() {
        conditions.push(format!("price <= ${bind_idx}"));
        bind_idx += 1;
    }

    (format!("WHERE {}", conditions.join(" AND ")), bind_idx)
}

/// Provides persistence operations for cars.
pub struct CarRepo;

impl CarRepo {
    /// Insert a new car, returning the created row.
    pub async fn create(pool: &PgPool, input: &CarDraft) -> Result<CarRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO cars (brand, model, production_year, price, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarRow>(&query)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(input.production_year)
            .bind(input.price)
            .bind(input.status.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a car by id. Includes soft-deleted rows; callers decide how to
    /// treat the tombstone.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CarRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars WHERE id = $1");
        sqlx::query_as::<_, CarRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List live cars matching `filter`, ordered by id.
    pub async fn list(
        pool: &PgPool,
        filter: &CarFilter,
        page: PageRequest,
    ) -> Result<Vec<CarRow>, sqlx::Error> {
        let (where_clause, bind_idx) = filter_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM cars {where_clause} \
             ORDER BY id ASC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, CarRow>(&query);

        // Bind dynamic parameters in the order `filter_clause` numbered them.
        if let Some(ref brand) = filter.brand {
            q = q.bind(brand);
        }
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(min_price) = filter.min_price {
            q = q.bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            q = q.bind(max_price);
        }

        q = q.bind(page.limit()).bind(page.offset());
        q.fetch_all(pool).await
    }

    /// Count live cars matching `filter`.
    pub async fn count(pool: &PgPool, filter: &CarFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = filter_clause(filter);
        let query = format!("SELECT COUNT(*) FROM cars {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(ref brand) = filter.brand {
            q = q.bind(brand);
        }
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(min_price) = filter.min_price {
            q = q.bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            q = q.bind(max_price);
        }
        q.fetch_one(pool).await
    }

    /// Overwrite every writable column of a live car.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CarDraft,
    ) -> Result<Option<CarRow>, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET
                brand = $2,
                model = $3,
                production_year = $4,
                price = $5,
                status = $6
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarRow>(&query)
            .bind(id)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(input.production_year)
            .bind(input.price)
            .bind(input.status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a car, stamping `at`. An existing tombstone is never
    /// overwritten: returns `None` if the row is missing or already deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<CarRow>, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarRow>(&query)
            .bind(id)
            .bind(at)
            .fetch_optional(pool)
            .await
    }
}

/// Car ids, assigned by the store: `BIGSERIAL` in PostgreSQL, a counter in
/// memory.
pub type DbId = i64;

/// Soft-delete stamps. Always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

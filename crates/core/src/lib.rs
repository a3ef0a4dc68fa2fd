//! Domain core for the car inventory service.
//!
//! Holds the car record, its validation rules, search filters, pagination
//! arithmetic and the query/mutation pipelines. Persistence is reached only
//! through the [`store::CarStore`] trait, so this crate has no database or
//! HTTP dependencies.

pub mod car;
pub mod error;
pub mod filter;
pub mod memory;
pub mod mutation;
pub mod pagination;
pub mod payload;
pub mod query;
pub mod store;
pub mod types;
pub mod validation;

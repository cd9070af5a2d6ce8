//! Storage crate: persistence of accepted estimates.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – EstimateRecord, EstimateStats
//! - [`repository`] – Repository trait
//! - [`estimate_repo`] – EstimateRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod estimate_repo;
mod models;
mod repository;
mod sqlite_pool;

pub use error::StorageError;
pub use estimate_repo::EstimateRepository;
pub use models::{EstimateRecord, EstimateStats};
pub use repository::Repository;
pub use sqlite_pool::SqlitePoolManager;

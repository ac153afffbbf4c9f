//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and the transient criteria
//! - `schema.rs`: SQL DDL for initializing the databases (SQLite-first)
//! - `users.rs`: credential store
//! - `records.rs`: vaccination dataset store

pub mod models;
pub mod records;
pub mod schema;
pub mod users;

pub use models::{FilterCriteria, NewVaccinationRecord, User, VaccinationRecord};
pub use records::DatasetStore;
pub use schema::{RECORDS_INIT, USERS_INIT};
pub use users::{CredentialStore, SqlitePool};

use crate::error::VaxError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Open a SQLite pool for the given URL, creating the file if missing.
pub async fn connect(url: &str) -> Result<SqlitePool, VaxError> {
    let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(opts).await?;
    Ok(pool)
}

//! SQL DDL for the two persisted stores.
//! SQLite-first design, mirroring the credential/dataset database split.

/// Credential database schema:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `username` UNIQUE — the signup race is settled here, by the storage
///   layer's insert-or-reject, not by an application check
pub const USERS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);
"#;

/// Vaccination dataset schema. No uniqueness constraint; rows are
/// bulk-loaded once and read-only afterwards.
pub const RECORDS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS vaccination_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    state TEXT NOT NULL,
    city TEXT NOT NULL,
    age_group TEXT NOT NULL,
    gender TEXT NOT NULL,
    ethnicity TEXT NOT NULL,
    vaccinated INTEGER NOT NULL,
    year INTEGER NOT NULL,
    description TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_vaccination_records_state_city
    ON vaccination_records(state, city);
"#;

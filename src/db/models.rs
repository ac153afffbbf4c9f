use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeSet;

/// A registered dashboard user. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// One row of the vaccination dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct VaccinationRecord {
    pub id: i64,
    pub state: String,
    pub city: String,
    pub age_group: String,
    pub gender: String,
    pub ethnicity: String,
    pub vaccinated: bool,
    pub year: i64,
    pub description: String,
}

/// A dataset row before insertion (no identity yet).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewVaccinationRecord {
    pub state: String,
    pub city: String,
    pub age_group: String,
    pub gender: String,
    pub ethnicity: String,
    pub vaccinated: bool,
    pub year: i64,
    pub description: String,
}

/// Transient selection constraints built per interaction; never persisted.
/// `city` is expected to belong to `state` (the presentation layer draws it
/// from `cities(state)`), but a stray pair simply matches nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterCriteria {
    pub state: String,
    pub city: String,
    pub vaccine_descriptions: BTreeSet<String>,
}

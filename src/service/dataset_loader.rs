use crate::db::models::NewVaccinationRecord;
use crate::db::records::DatasetStore;
use crate::error::VaxError;
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::info;

/// One row of the exported source table. Field names match the export's
/// case-sensitive column headers exactly.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceRow {
    #[serde(rename = "STATE")]
    pub state: String,
    #[serde(rename = "CITY")]
    pub city: String,
    #[serde(rename = "AGE_GROUP")]
    pub age_group: String,
    #[serde(rename = "GENDER")]
    pub gender: String,
    #[serde(rename = "ETHNICITY")]
    pub ethnicity: String,
    #[serde(rename = "VACCINATED")]
    pub vaccinated: bool,
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "DESCRIPTION")]
    pub description: String,
}

impl From<SourceRow> for NewVaccinationRecord {
    fn from(row: SourceRow) -> Self {
        Self {
            state: row.state,
            city: row.city,
            age_group: row.age_group,
            gender: row.gender,
            ethnicity: row.ethnicity,
            vaccinated: row.vaccinated,
            year: row.year,
            description: row.description,
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum LoadOutcome {
    /// The store already held data; nothing was read or written.
    AlreadyPopulated,
    /// The store was empty and this many rows were ingested.
    Loaded(u64),
}

/// Ingest the dataset export at most once. A populated store makes this a
/// no-op, so repeated startups never duplicate rows.
pub async fn load_if_empty(store: &DatasetStore, path: &Path) -> Result<LoadOutcome, VaxError> {
    if store.is_populated().await? {
        return Ok(LoadOutcome::AlreadyPopulated);
    }

    let rows = read_source(path)?;
    let inserted = store.bulk_load(&rows).await?;
    info!(path = %path.display(), rows = inserted, "dataset ingested");
    Ok(LoadOutcome::Loaded(inserted))
}

/// Parse the JSON export into dataset rows. Any deviation from the expected
/// column set or types is a schema mismatch, not a silent skip.
pub fn read_source(path: &Path) -> Result<Vec<NewVaccinationRecord>, VaxError> {
    if !path.exists() {
        return Err(VaxError::SourceNotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    let rows: Vec<SourceRow> =
        serde_json::from_str(&contents).map_err(|e| VaxError::SchemaMismatch(e.to_string()))?;
    Ok(rows.into_iter().map(Into::into).collect())
}

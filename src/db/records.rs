use crate::db::models::{FilterCriteria, NewVaccinationRecord, VaccinationRecord};
use crate::db::schema::RECORDS_INIT;
use crate::db::users::SqlitePool;
use crate::error::VaxError;
use sqlx::Row;

/// Storage for the vaccination dataset. Rows are bulk-loaded once and never
/// mutated afterwards; all reads order by `id` so identical inputs yield
/// identical output order.
#[derive(Clone)]
pub struct DatasetStore {
    pool: SqlitePool,
}

impl DatasetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), VaxError> {
        for stmt in RECORDS_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// True iff at least one record exists.
    pub async fn is_populated(&self) -> Result<bool, VaxError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vaccination_records")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0 > 0)
    }

    /// Insert all rows in a single transaction. Returns the number inserted.
    /// The at-most-once guard lives in the loader service, which checks
    /// `is_populated` before calling this.
    pub async fn bulk_load(&self, rows: &[NewVaccinationRecord]) -> Result<u64, VaxError> {
        let mut tx = self.pool.begin().await?;
        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO vaccination_records (
                    state, city, age_group, gender, ethnicity,
                    vaccinated, year, description
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&row.state)
            .bind(&row.city)
            .bind(&row.age_group)
            .bind(&row.gender)
            .bind(&row.ethnicity)
            .bind(row.vaccinated)
            .bind(row.year)
            .bind(&row.description)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(rows.len() as u64)
    }

    /// Full read of the dataset, ordered by id.
    pub async fn all_records(&self) -> Result<Vec<VaccinationRecord>, VaxError> {
        let rows = sqlx::query_as::<_, VaccinationRecord>(
            r#"SELECT id, state, city, age_group, gender, ethnicity,
               vaccinated, year, description
               FROM vaccination_records ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Distinct non-empty state values.
    pub async fn states(&self) -> Result<Vec<String>, VaxError> {
        let rows = sqlx::query(
            "SELECT DISTINCT state FROM vaccination_records WHERE state <> '' ORDER BY state",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|r| r.try_get::<String, _>("state").map_err(Into::into))
            .collect()
    }

    /// Distinct non-empty city values within one state.
    pub async fn cities(&self, state: &str) -> Result<Vec<String>, VaxError> {
        let rows = sqlx::query(
            r#"SELECT DISTINCT city FROM vaccination_records
               WHERE state = ? AND city <> '' ORDER BY city"#,
        )
        .bind(state)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|r| r.try_get::<String, _>("city").map_err(Into::into))
            .collect()
    }

    /// Distinct non-empty vaccine descriptions across the dataset.
    pub async fn vaccine_descriptions(&self) -> Result<Vec<String>, VaxError> {
        let rows = sqlx::query(
            r#"SELECT DISTINCT description FROM vaccination_records
               WHERE description <> '' ORDER BY description"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|r| r.try_get::<String, _>("description").map_err(Into::into))
            .collect()
    }

    /// Records matching state AND city AND description membership.
    /// An empty result is a valid answer, not an error.
    pub async fn filter(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<VaccinationRecord>, VaxError> {
        if criteria.vaccine_descriptions.is_empty() {
            // Membership in the empty set matches nothing.
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; criteria.vaccine_descriptions.len()].join(", ");
        let sql = format!(
            r#"SELECT id, state, city, age_group, gender, ethnicity,
               vaccinated, year, description
               FROM vaccination_records
               WHERE state = ? AND city = ? AND description IN ({placeholders})
               ORDER BY id"#,
        );

        let mut query = sqlx::query_as::<_, VaccinationRecord>(&sql)
            .bind(&criteria.state)
            .bind(&criteria.city);
        for description in &criteria.vaccine_descriptions {
            query = query.bind(description);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Per-year count of vaccinated records matching the criteria, ordered
    /// chronologically. This is the series handed to the forecast engine.
    pub async fn yearly_vaccinated_counts(
        &self,
        criteria: &FilterCriteria,
    ) -> Result<Vec<(i64, f64)>, VaxError> {
        if criteria.vaccine_descriptions.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; criteria.vaccine_descriptions.len()].join(", ");
        let sql = format!(
            r#"SELECT year, COUNT(*) AS vaccinated_count
               FROM vaccination_records
               WHERE state = ? AND city = ? AND vaccinated = 1
                 AND description IN ({placeholders})
               GROUP BY year ORDER BY year"#,
        );

        let mut query = sqlx::query(&sql)
            .bind(&criteria.state)
            .bind(&criteria.city);
        for description in &criteria.vaccine_descriptions {
            query = query.bind(description);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|r| {
                let year: i64 = r.try_get("year")?;
                let count: i64 = r.try_get("vaccinated_count")?;
                Ok((year, count as f64))
            })
            .collect()
    }
}

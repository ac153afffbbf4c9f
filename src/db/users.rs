use crate::db::models::User;
use crate::db::schema::USERS_INIT;
use crate::error::VaxError;
use sqlx::{Pool, Sqlite};

pub type SqlitePool = Pool<Sqlite>;

/// Storage for username/password-hash pairs. Owns the `users` table
/// exclusively; nothing else writes to it.
#[derive(Clone)]
pub struct CredentialStore {
    pool: SqlitePool,
}

impl CredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), VaxError> {
        for stmt in USERS_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert a new user. The UNIQUE constraint on `username` rejects
    /// duplicates atomically; that rejection surfaces as
    /// `VaxError::DuplicateUsername` rather than a raw storage error.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<i64, VaxError> {
        let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(VaxError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by name. Absence is not an error.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, VaxError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

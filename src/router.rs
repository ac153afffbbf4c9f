use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::Key;

use crate::db::{CredentialStore, DatasetStore};
use crate::handlers;
use crate::service::{Authenticator, ForecastEngine};

/// Shared application state: the stores, the engines, and the private
/// cookie key. Everything here is cheap to clone per request.
#[derive(Clone)]
pub struct VaxState {
    pub auth: Authenticator,
    pub datasets: DatasetStore,
    pub forecast: ForecastEngine,
    key: Key,
}

impl VaxState {
    pub fn new(
        users: CredentialStore,
        datasets: DatasetStore,
        forecast: ForecastEngine,
        session_key: &str,
    ) -> Self {
        Self {
            auth: Authenticator::new(users),
            datasets,
            forecast,
            key: Key::derive_from(session_key.as_bytes()),
        }
    }
}

// PrivateCookieJar pulls its key out of the state.
impl FromRef<VaxState> for Key {
    fn from_ref(state: &VaxState) -> Self {
        state.key.clone()
    }
}

pub fn vaxtrack_router(state: VaxState) -> Router {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/records", get(handlers::records::all_records))
        .route("/records/filter", post(handlers::records::filter))
        .route("/filters/states", get(handlers::records::states))
        .route("/filters/cities", get(handlers::records::cities))
        .route("/filters/vaccines", get(handlers::records::vaccine_descriptions))
        .route("/forecast", post(handlers::forecast::forecast))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    // Key material shorter than a full 64-byte signing/encryption pair is
    // still usable: the key is expanded, not taken verbatim.
    #[tokio::test]
    async fn state_derives_its_cookie_key_from_short_material() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let users = CredentialStore::new(pool.clone());
        let datasets = DatasetStore::new(pool);

        let state = VaxState::new(
            users,
            datasets,
            ForecastEngine::new(100),
            "thirty-two-bytes-of-key-material",
        );
        let _ = Key::from_ref(&state);
        let _app = vaxtrack_router(state);
    }
}

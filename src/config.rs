//! Runtime configuration, merged from defaults and `VAX_`-prefixed
//! environment variables.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SQLite URL of the credential database.
    pub user_db_url: String,
    /// SQLite URL of the vaccination dataset database.
    pub data_db_url: String,
    /// Optional path to the tabular dataset export ingested at startup.
    pub dataset_path: Option<PathBuf>,
    pub listen_addr: String,
    pub loglevel: String,
    /// Key material for the private session cookie; at least 32 bytes.
    pub session_key: String,
    pub session_ttl_minutes: i64,
    /// Iteration budget for the forecast optimizer.
    pub forecast_max_iter: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_db_url: "sqlite:users.db".to_string(),
            data_db_url: "sqlite:vaccination_data.db".to_string(),
            dataset_path: None,
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            session_key: "vaxtrack-dev-session-key-change-me-0123456789abcdef0123456789abcdef"
                .to_string(),
            session_ttl_minutes: 12 * 60,
            forecast_max_iter: 500,
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("VAX_"))
        .extract()
        .expect("FATAL: invalid VAX_* configuration")
});

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vaxtrack::db::{self, CredentialStore, DatasetStore};
use vaxtrack::router::{VaxState, vaxtrack_router};
use vaxtrack::service::ForecastEngine;
use vaxtrack::service::dataset_loader::{self, LoadOutcome};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &vaxtrack::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        user_db_url = %cfg.user_db_url,
        data_db_url = %cfg.data_db_url,
        dataset_path = %cfg
            .dataset_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".to_string()),
        loglevel = %cfg.loglevel,
    );

    let users = CredentialStore::new(db::connect(&cfg.user_db_url).await?);
    users.init_schema().await?;

    let datasets = DatasetStore::new(db::connect(&cfg.data_db_url).await?);
    datasets.init_schema().await?;

    if let Some(dataset_path) = cfg.dataset_path.as_ref() {
        match dataset_loader::load_if_empty(&datasets, dataset_path).await {
            Ok(LoadOutcome::Loaded(rows)) => {
                info!(path = %dataset_path.display(), rows, "dataset loaded into the database");
            }
            Ok(LoadOutcome::AlreadyPopulated) => {
                info!("dataset already present; skipping ingestion");
            }
            Err(e) => {
                warn!(
                    path = %dataset_path.display(),
                    error = %e,
                    "failed to ingest dataset; continuing with existing data"
                );
            }
        }
    } else {
        info!("no dataset path configured; skipping ingestion");
    }

    let forecast = ForecastEngine::new(cfg.forecast_max_iter);
    let state = VaxState::new(users, datasets, forecast, &cfg.session_key);
    let app = vaxtrack_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

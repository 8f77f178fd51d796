use sea_orm::Database;
use tracing::info;

use ihealth_api::config::ApiConfig;
use ihealth_api::infra::storage::DicomStorage;
use ihealth_api::router::build_router;
use ihealth_api::state::AppState;
use ihealth_api::usecase::admin::seed_default_settings;

#[tokio::main]
async fn main() {
    ihealth_core::tracing::init_tracing();

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret.clone(),
        storage: DicomStorage::new(&config.dicom_storage_root),
    };

    seed_default_settings(&state.settings_repo())
        .await
        .expect("failed to seed default settings");

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}

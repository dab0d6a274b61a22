use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info};

use clinic_api::{build_router, auth::JwtManager, state::AppState};
use clinic_core::repositories::MemoryStorage;
use clinic_infrastructure::{create_pool, JsonFileStorage, PgClinicRepository, PgRoleRepository};
use clinic_shared::{AppConfig, AppError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    clinic_shared::telemetry::init_telemetry();

    info!("Clinic server starting...");

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        AppError::from(e)
    })?;

    // Connect to Database
    info!("Connecting to database...");
    let pool = create_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.acquire_timeout_seconds,
    )
    .await?;
    info!("Database connection established.");

    // Durable client storage
    let storage = JsonFileStorage::open(&config.storage.path)
        .map_err(|e| AppError::StartupError(format!("client storage unavailable: {}", e)))?;
    info!("Client storage at {}", storage.path().display());

    // Create App State
    let state = AppState::new(
        JwtManager::new(&config.jwt.secret, config.jwt.access_token_expiry),
        Arc::new(PgRoleRepository::new(pool.clone())),
        Arc::new(PgClinicRepository::new(pool)),
        Arc::new(storage),
        Arc::new(MemoryStorage::new()),
    );

    // Build router
    let app = build_router(state, &config.app.allowed_origin);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("{} listening on {}", config.app.name, addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

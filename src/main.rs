//! VenuePulse Server — live venue occupancy and reservations
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use venuepulse_api::auth::JwtVerifier;
use venuepulse_api::middleware::admission::AdmissionGate;
use venuepulse_api::state::AppState;
use venuepulse_congestion::{HourWeightPolicy, RealTimeEstimator};
use venuepulse_core::config::AppConfig;
use venuepulse_core::error::AppError;
use venuepulse_counter::client::RedisClient;
use venuepulse_counter::occupancy::OccupancyStore;
use venuepulse_database::connection::DatabasePool;
use venuepulse_database::repositories::reservation::ReservationRepository;
use venuepulse_database::repositories::space::SpaceRepository;
use venuepulse_pipeline::consumer::CheckInWorker;
use venuepulse_pipeline::producer::CheckInProducer;
use venuepulse_service::congestion::CongestionService;
use venuepulse_service::notification::LogAlertNotifier;
use venuepulse_service::reservation::ReservationService;

#[tokio::main]
async fn main() {
    let env = std::env::var("VENUEPULSE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting VenuePulse v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    db.run_migrations().await?;

    // ── Step 2: Counter store ────────────────────────────────────
    let redis_client = RedisClient::connect(&config.redis).await?;
    let occupancy = OccupancyStore::new(redis_client.clone());

    // ── Step 3: Repositories ─────────────────────────────────────
    let reservation_repo = ReservationRepository::new(db.pool().clone());
    let space_repo = Arc::new(SpaceRepository::new(db.pool().clone()));

    // ── Step 4: Congestion estimator ─────────────────────────────
    let policy = HourWeightPolicy::from_config(&config.congestion.hour_weighting)?;
    let estimator = Arc::new(RealTimeEstimator::new(policy));

    // ── Step 5: Services ─────────────────────────────────────────
    let reservation_service = Arc::new(ReservationService::new(
        reservation_repo,
        SpaceRepository::new(db.pool().clone()),
    ));
    let congestion_service = Arc::new(CongestionService::new(
        occupancy.clone(),
        SpaceRepository::new(db.pool().clone()),
        estimator,
        config.congestion.ema_alpha,
    ));
    let checkin_producer = Arc::new(CheckInProducer::new(redis_client.clone()));

    // ── Step 6: Shutdown channel + pipeline worker ───────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let worker = CheckInWorker::new(
        redis_client.clone(),
        occupancy.clone(),
        Arc::new(LogAlertNotifier),
        config.pipeline.clone(),
    );
    let worker_cancel = shutdown_rx.clone();
    let worker_handle = tokio::spawn(async move {
        worker.run(worker_cancel).await;
    });

    // ── Step 7: Build and start HTTP server ──────────────────────
    let jwt_verifier = Arc::new(JwtVerifier::new(&config.auth));
    let admission_gate = Arc::new(AdmissionGate::new(config.server.max_concurrent_requests));
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);

    let app_state = AppState {
        config: Arc::new(config.clone()),
        db: db.clone(),
        occupancy,
        space_repo,
        reservation_service,
        congestion_service,
        checkin_producer,
        jwt_verifier,
        admission_gate,
    };

    let app = venuepulse_api::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("VenuePulse server listening on {addr}");

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // ── Step 8: Wait for the pipeline worker (bounded) ───────────
    tracing::info!("Waiting for background tasks to complete...");
    let _ = tokio::time::timeout(grace, worker_handle).await;

    db.close().await;
    tracing::info!("VenuePulse server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

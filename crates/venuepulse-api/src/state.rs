//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use venuepulse_core::config::AppConfig;
use venuepulse_counter::occupancy::OccupancyStore;
use venuepulse_database::connection::DatabasePool;
use venuepulse_database::repositories::space::SpaceRepository;
use venuepulse_pipeline::producer::CheckInProducer;
use venuepulse_service::congestion::CongestionService;
use venuepulse_service::reservation::ReservationService;

use crate::auth::JwtVerifier;
use crate::middleware::admission::AdmissionGate;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped or internally reference-counted for cheap
/// cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool wrapper.
    pub db: DatabasePool,
    /// Live occupancy counter store.
    pub occupancy: OccupancyStore,
    /// Space repository.
    pub space_repo: Arc<SpaceRepository>,
    /// Reservation service.
    pub reservation_service: Arc<ReservationService>,
    /// Congestion read service.
    pub congestion_service: Arc<CongestionService>,
    /// Check-in event producer.
    pub checkin_producer: Arc<CheckInProducer>,
    /// JWT verifier for presented tokens.
    pub jwt_verifier: Arc<JwtVerifier>,
    /// Admission gate limiting concurrent requests.
    pub admission_gate: Arc<AdmissionGate>,
}

//! # venuepulse-api
//!
//! HTTP API layer for VenuePulse built on Axum.
//!
//! Provides the REST endpoints, the admission gate middleware, the JWT
//! auth extractor, DTOs, and error mapping.

pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;

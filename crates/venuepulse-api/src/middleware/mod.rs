//! Axum middleware stack.

pub mod admission;

//! Integration tests.
//!
//! These exercise the full stack against live PostgreSQL and Redis and are
//! ignored by default; run them with `cargo test -- --ignored` against the
//! instances named by `VENUEPULSE_TEST_DATABASE_URL` and
//! `VENUEPULSE_TEST_REDIS_URL`.

mod helpers;

mod congestion_test;
mod counter_test;
mod pipeline_test;
mod reservation_test;

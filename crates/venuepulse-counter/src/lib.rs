//! Redis-backed stores: the live occupancy counter, the idempotency dedup
//! store, and key builders shared with the pipeline crate.

pub mod client;
pub mod dedup;
pub mod keys;
pub mod occupancy;

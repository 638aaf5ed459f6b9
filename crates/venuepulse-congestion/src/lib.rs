//! The congestion estimator: pure functions from occupancy counts to a
//! normalized [0, 1] congestion ratio, plus EMA smoothing for display.
//!
//! Nothing in this crate performs I/O or reads a clock — the hour of day is
//! always passed in explicitly, so every function is deterministic given
//! its inputs and the active policy.

pub mod ema;
pub mod estimator;

pub use ema::apply_ema;
pub use estimator::{CongestionEstimator, HourWeightPolicy, RealTimeEstimator, ratio};

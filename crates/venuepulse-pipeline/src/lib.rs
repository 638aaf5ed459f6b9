//! Check-in event pipeline.
//!
//! Entry/exit scans are enqueued onto per-space Redis Streams by
//! [`producer::CheckInProducer`] and drained by [`consumer::CheckInWorker`],
//! which applies them to the live occupancy counters. One stream per space
//! gives FIFO ordering within a space while different spaces are processed
//! in parallel; delivery is at-least-once with idempotent application,
//! exponential-backoff redelivery, and a dead-letter stream.

pub mod alert;
pub mod consumer;
pub mod producer;

pub use consumer::CheckInWorker;
pub use producer::CheckInProducer;

//! Application services gluing the reservation ledger, occupancy counters,
//! and the congestion estimator together behind the HTTP layer.

pub mod congestion;
pub mod context;
pub mod notification;
pub mod reservation;

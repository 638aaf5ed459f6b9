//! Domain entity models shared across VenuePulse crates.

pub mod checkin;
pub mod occupancy;
pub mod reservation;
pub mod space;
pub mod user;

//! Route handlers organized by domain.

pub mod checkin;
pub mod congestion;
pub mod health;
pub mod reservation;
pub mod space;

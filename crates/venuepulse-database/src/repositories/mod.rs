//! Repository implementations.

pub mod reservation;
pub mod space;

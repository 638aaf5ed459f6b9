pub mod model;

pub use model::{CreateReservation, Reservation, ReservationStatus};

pub mod event;

pub use event::{CheckInAction, CheckInEvent};

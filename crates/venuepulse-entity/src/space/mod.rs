pub mod model;

pub use model::{Space, SpaceStatus};

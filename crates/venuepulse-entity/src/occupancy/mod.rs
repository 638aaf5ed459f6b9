pub mod model;

pub use model::OccupancySnapshot;

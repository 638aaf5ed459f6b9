pub mod role;

pub use role::UserRole;

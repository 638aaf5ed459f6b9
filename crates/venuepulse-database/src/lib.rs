//! PostgreSQL persistence layer: pool management, migrations, and the
//! reservation ledger.

pub mod connection;
pub mod repositories;

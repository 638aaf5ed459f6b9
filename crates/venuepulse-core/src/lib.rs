//! Core building blocks shared by every VenuePulse crate.
//!
//! Contains the unified error type, configuration schemas, and typed
//! identifiers. This crate has no knowledge of HTTP, PostgreSQL, or Redis
//! beyond what the configuration structs describe.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

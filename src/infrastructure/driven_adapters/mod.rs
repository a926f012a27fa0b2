//! Driven Adapters
//!
//! Implementations of gateway traits for external systems:
//! - Configuration binding
//! - Database pools

pub mod config;
pub mod database;

pub use database::{DataSourcePool, DataSourceRegistry};

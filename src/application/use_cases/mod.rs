//! Use Cases
//!
//! Application-specific rules.

pub mod data_sources;

pub use data_sources::{DataSourceBuilder, DATA_SOURCE_PREFIX};

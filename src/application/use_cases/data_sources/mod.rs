//! DataSource Use Cases
//!
//! Turning bound `db.*` properties into pooled datasources.

mod build_data_sources;

pub use build_data_sources::{DataSourceBuilder, DATA_SOURCE_PREFIX};

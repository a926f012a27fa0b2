//! Domain Layer
//!
//! Contains the datasource models and gateway traits (ports).
//! This layer has no dependencies on infrastructure.

pub mod gateways;
pub mod models;

pub use gateways::property_binder::PropertyBinder;
pub use models::datasource::{DataSourceSettings, JdbcDriver, PoolDefaults, PooledDataSource};
pub use models::properties::DataSourceProperties;

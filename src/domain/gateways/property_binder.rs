//! Property Binder Gateway
//!
//! Abstract trait for the configuration-binding service.

use crate::domain::models::properties::DataSourceProperties;
use crate::shared::errors::ConfigurationError;

/// Binds a configuration namespace onto [`DataSourceProperties`]
pub trait PropertyBinder {
    /// Bind the keys under `prefix` (e.g. `db.num`, `db.url[0]`).
    ///
    /// Absent keys leave the field empty; only unconvertible values fail.
    fn bind_data_source_properties(
        &self,
        prefix: &str,
    ) -> Result<DataSourceProperties, ConfigurationError>;
}

impl PropertyBinder for DataSourceProperties {
    fn bind_data_source_properties(
        &self,
        _prefix: &str,
    ) -> Result<DataSourceProperties, ConfigurationError> {
        Ok(self.clone())
    }
}

//! Build DataSources Use Case
//!
//! Binds the `db.*` namespace and creates one pooled datasource per index.

use std::sync::Arc;

use crate::domain::gateways::PropertyBinder;
use crate::domain::models::datasource::{DataSourceSettings, PoolDefaults, PooledDataSource};
use crate::shared::errors::ConfigurationError;

/// Configuration namespace the datasource properties are bound from
pub const DATA_SOURCE_PREFIX: &str = "db";

/// Builds pooled datasources from indexed `db.*` properties
#[derive(Debug, Clone, Default)]
pub struct DataSourceBuilder {
    defaults: PoolDefaults,
}

impl DataSourceBuilder {
    /// Create a builder with the standard pool defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder applying `defaults` instead of the standard ones
    #[must_use]
    pub fn with_defaults(defaults: PoolDefaults) -> Self {
        Self { defaults }
    }

    /// Build `db.num` datasources.
    ///
    /// `on_created` is called once per datasource, in index order, right
    /// after it is configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when binding fails, when `db.num` is
    /// missing, when `db.user` or `db.password` is empty, when `db.url` has
    /// fewer than `db.num` entries, or when no datasource was produced.
    /// Datasources handed to `on_created` before a failure are not revoked.
    pub fn build<B, F>(
        &self,
        binder: &B,
        mut on_created: F,
    ) -> Result<Vec<Arc<PooledDataSource>>, ConfigurationError>
    where
        B: PropertyBinder + ?Sized,
        F: FnMut(&Arc<PooledDataSource>),
    {
        let prefix = DATA_SOURCE_PREFIX;
        let properties = binder.bind_data_source_properties(prefix)?;
        tracing::debug!(?properties, "Bound datasource properties");

        let num = properties.num.ok_or_else(|| ConfigurationError::MissingNum {
            prefix: prefix.to_string(),
        })?;
        if properties.user.is_empty() {
            return Err(ConfigurationError::EmptyUser {
                prefix: prefix.to_string(),
            });
        }
        if properties.password.is_empty() {
            return Err(ConfigurationError::EmptyPassword {
                prefix: prefix.to_string(),
            });
        }

        let driver = properties.driver.unwrap_or(self.defaults.driver);
        // num is untrusted; never reserve more than there are urls for
        let mut data_sources = Vec::with_capacity(properties.url.len().min(num as usize));

        for index in 0..num as usize {
            let url = properties
                .url_at(index)
                .ok_or_else(|| ConfigurationError::MissingUrl {
                    prefix: prefix.to_string(),
                    index,
                })?;
            let username = properties
                .user_at(index)
                .ok_or_else(|| ConfigurationError::EmptyUser {
                    prefix: prefix.to_string(),
                })?;
            let password = properties
                .password_at(index)
                .ok_or_else(|| ConfigurationError::EmptyPassword {
                    prefix: prefix.to_string(),
                })?;

            let data_source = Arc::new(PooledDataSource::new(DataSourceSettings {
                index,
                driver,
                jdbc_url: url.trim().to_string(),
                username: username.trim().to_string(),
                password: password.trim().to_string().into(),
                connection_timeout: self.defaults.connection_timeout,
                max_pool_size: properties.max_pool_size_at(index, self.defaults.max_pool_size),
                min_idle: properties.min_idle_at(index, self.defaults.min_idle),
                validation_timeout: self.defaults.validation_timeout,
                test_query: self.defaults.test_query.clone(),
            }));

            tracing::info!(
                index,
                driver = data_source.driver_class_name(),
                url = data_source.jdbc_url(),
                username = data_source.username(),
                max_pool_size = data_source.max_pool_size(),
                min_idle = data_source.min_idle(),
                "DataSource configured"
            );

            on_created(&data_source);
            data_sources.push(data_source);
        }

        if data_sources.is_empty() {
            return Err(ConfigurationError::NoDataSource);
        }

        Ok(data_sources)
    }
}

//! Database Connection Management
//!
//! Turns configured datasources into lazily opened `sqlx` pools.

use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::{AnyPool, Executor};
use url::Url;

use crate::domain::models::datasource::PooledDataSource;
use crate::shared::errors::DataSourceError;

const JDBC_PREFIX: &str = "jdbc:";

/// Translate a JDBC url into a sqlx url carrying the credentials
///
/// # Errors
///
/// Returns `DataSourceError::InvalidUrl` for urls without a `jdbc:` prefix
/// or that cannot be parsed, and `DataSourceError::SchemeMismatch` when the
/// driver does not accept the url scheme.
pub fn connection_url(data_source: &PooledDataSource) -> Result<Url, DataSourceError> {
    let jdbc_url = data_source.jdbc_url();
    let invalid = |reason: &str| DataSourceError::InvalidUrl {
        url: jdbc_url.to_string(),
        reason: reason.to_string(),
    };

    let rest = jdbc_url
        .strip_prefix(JDBC_PREFIX)
        .ok_or_else(|| invalid("missing jdbc: prefix"))?;
    let (scheme, remainder) = rest
        .split_once("://")
        .ok_or_else(|| invalid("missing scheme"))?;

    let driver = data_source.driver();
    if !driver
        .jdbc_schemes()
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(scheme))
    {
        return Err(DataSourceError::SchemeMismatch {
            driver: driver.class_name().to_string(),
            scheme: scheme.to_string(),
        });
    }

    let mut url = Url::parse(&format!("{}://{remainder}", driver.sqlx_scheme()))
        .map_err(|err| invalid(&err.to_string()))?;
    url.set_username(data_source.username())
        .map_err(|()| invalid("url cannot carry a username"))?;
    url.set_password(Some(data_source.password()))
        .map_err(|()| invalid("url cannot carry a password"))?;

    Ok(url)
}

/// Pool options for a datasource.
///
/// Minimum idle is capped at the maximum pool size. Idle connections are
/// checked with the test query once they have idled for the validation
/// timeout.
#[must_use]
pub fn pool_options(data_source: &PooledDataSource) -> AnyPoolOptions {
    let max = data_source.max_pool_size();
    let min = data_source.min_idle();
    if min > max {
        tracing::warn!(
            index = data_source.index(),
            min_idle = min,
            max_pool_size = max,
            "min_idle exceeds max_pool_size, capping to max_pool_size"
        );
    }

    let test_query: Arc<str> = Arc::from(data_source.test_query());
    let validation_timeout = data_source.validation_timeout();

    AnyPoolOptions::new()
        .max_connections(max)
        .min_connections(min.min(max))
        .acquire_timeout(data_source.connection_timeout())
        .test_before_acquire(false)
        .before_acquire(move |conn, meta| {
            let test_query = Arc::clone(&test_query);
            Box::pin(async move {
                if meta.idle_for < validation_timeout {
                    return Ok(true);
                }
                conn.execute(&*test_query).await?;
                Ok::<_, sqlx::Error>(true)
            })
        })
}

/// Create a pool without opening any connection
///
/// Must be called within a Tokio runtime.
///
/// # Errors
///
/// Returns `DataSourceError` when the JDBC url cannot be translated.
pub fn open_lazy(data_source: &PooledDataSource) -> Result<AnyPool, DataSourceError> {
    sqlx::any::install_default_drivers();
    let url = connection_url(data_source)?;
    let options = AnyConnectOptions::from_str(url.as_str())?;
    Ok(pool_options(data_source).connect_lazy_with(options))
}

/// A datasource together with its pool, opened on first use
#[derive(Debug)]
pub struct DataSourcePool {
    data_source: Arc<PooledDataSource>,
    pool: OnceCell<AnyPool>,
}

impl DataSourcePool {
    #[must_use]
    pub fn new(data_source: Arc<PooledDataSource>) -> Self {
        Self {
            data_source,
            pool: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn data_source(&self) -> &Arc<PooledDataSource> {
        &self.data_source
    }

    /// Whether the pool has been created yet
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.pool.get().is_some()
    }

    /// The pool, created on the first call
    ///
    /// # Errors
    ///
    /// Returns `DataSourceError` when the pool cannot be created.
    pub fn pool(&self) -> Result<&AnyPool, DataSourceError> {
        self.pool.get_or_try_init(|| {
            tracing::debug!(index = self.data_source.index(), "Opening datasource pool");
            open_lazy(&self.data_source)
        })
    }

    /// Run the test query once on a pooled connection
    ///
    /// # Errors
    ///
    /// Returns `DataSourceError` when no connection can be acquired or the
    /// test query fails.
    pub async fn check_connection(&self) -> Result<(), DataSourceError> {
        let pool = self.pool()?;
        pool.execute(self.data_source.test_query()).await?;
        Ok(())
    }

    /// Close the pool if it was opened
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }
}

/// Tracks every datasource handed out by a build, in index order
#[derive(Debug, Default)]
pub struct DataSourceRegistry {
    pools: Vec<DataSourcePool>,
}

impl DataSourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a built datasource; suitable as the build callback
    pub fn register(&mut self, data_source: &Arc<PooledDataSource>) {
        tracing::debug!(index = data_source.index(), "Registering datasource");
        self.pools.push(DataSourcePool::new(Arc::clone(data_source)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DataSourcePool> {
        self.pools.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataSourcePool> {
        self.pools.iter()
    }

    /// Check every datasource, returning one result per index
    pub async fn check_all(&self) -> Vec<Result<(), DataSourceError>> {
        let mut results = Vec::with_capacity(self.pools.len());
        for pool in &self.pools {
            let result = pool.check_connection().await;
            if let Err(err) = &result {
                tracing::warn!(index = pool.data_source().index(), error = %err, "DataSource check failed");
            }
            results.push(result);
        }
        results
    }

    pub async fn close_all(&self) {
        for pool in &self.pools {
            pool.close().await;
        }
        tracing::info!(count = self.pools.len(), "DataSource pools closed");
    }
}

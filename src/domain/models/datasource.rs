//! Pooled DataSource Domain Model
//!
//! A fully configured, not yet opened, connection pool description.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::shared::errors::ConfigurationError;

/// Connection timeout applied to every pool
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_millis(3000);

/// Interval after which an idle connection is checked again (10 minutes)
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// Query used to check a connection
pub const DEFAULT_TEST_QUERY: &str = "SELECT 1 FROM dual";

pub const DEFAULT_MAX_POOL_SIZE: u32 = 20;

pub const DEFAULT_MINIMUM_IDLE: u32 = 50;

/// Database driver a datasource connects through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JdbcDriver {
    /// Kingbase (KingbaseES), PostgreSQL wire compatible
    #[default]
    Kingbase,
    MySql,
    PostgreSql,
}

impl JdbcDriver {
    /// JDBC driver class name
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Kingbase => "com.kingbase8.Driver",
            Self::MySql => "com.mysql.cj.jdbc.Driver",
            Self::PostgreSql => "org.postgresql.Driver",
        }
    }

    /// Url schemes (after the `jdbc:` prefix) this driver accepts
    #[must_use]
    pub fn jdbc_schemes(self) -> &'static [&'static str] {
        match self {
            Self::Kingbase => &["kingbase8", "kingbase", "postgresql"],
            Self::MySql => &["mysql"],
            Self::PostgreSql => &["postgresql", "postgres"],
        }
    }

    /// Url scheme understood by the sqlx `Any` driver
    #[must_use]
    pub fn sqlx_scheme(self) -> &'static str {
        match self {
            Self::Kingbase | Self::PostgreSql => "postgres",
            Self::MySql => "mysql",
        }
    }
}

impl fmt::Display for JdbcDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl FromStr for JdbcDriver {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "kingbase" | "kingbase8" | "com.kingbase8.driver" => Ok(Self::Kingbase),
            "mysql" | "com.mysql.cj.jdbc.driver" => Ok(Self::MySql),
            "postgresql" | "postgres" | "org.postgresql.driver" => Ok(Self::PostgreSql),
            _ => Err(ConfigurationError::UnsupportedDriver(value.to_string())),
        }
    }
}

/// Fixed values a builder applies to every datasource it creates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolDefaults {
    pub driver: JdbcDriver,
    pub connection_timeout: Duration,
    pub validation_timeout: Duration,
    pub test_query: String,
    pub max_pool_size: u32,
    pub min_idle: u32,
}

impl Default for PoolDefaults {
    fn default() -> Self {
        Self {
            driver: JdbcDriver::default(),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            validation_timeout: DEFAULT_VALIDATION_TIMEOUT,
            test_query: DEFAULT_TEST_QUERY.to_string(),
            max_pool_size: DEFAULT_MAX_POOL_SIZE,
            min_idle: DEFAULT_MINIMUM_IDLE,
        }
    }
}

/// Data required to create a PooledDataSource
#[derive(Clone)]
pub struct DataSourceSettings {
    pub index: usize,
    pub driver: JdbcDriver,
    pub jdbc_url: String,
    pub username: String,
    pub password: Zeroizing<String>,
    pub connection_timeout: Duration,
    pub max_pool_size: u32,
    pub min_idle: u32,
    pub validation_timeout: Duration,
    pub test_query: String,
}

/// One configured connection pool.
///
/// Connections are opened lazily by the infrastructure layer; holding a
/// `PooledDataSource` costs no database resources.
#[derive(Clone)]
pub struct PooledDataSource {
    index: usize,
    driver: JdbcDriver,
    jdbc_url: String,
    username: String,
    password: Zeroizing<String>,
    connection_timeout: Duration,
    max_pool_size: u32,
    min_idle: u32,
    validation_timeout: Duration,
    test_query: String,
}

impl PooledDataSource {
    #[must_use]
    pub fn new(settings: DataSourceSettings) -> Self {
        Self {
            index: settings.index,
            driver: settings.driver,
            jdbc_url: settings.jdbc_url,
            username: settings.username,
            password: settings.password,
            connection_timeout: settings.connection_timeout,
            max_pool_size: settings.max_pool_size,
            min_idle: settings.min_idle,
            validation_timeout: settings.validation_timeout,
            test_query: settings.test_query,
        }
    }

    /// Position of this datasource in the `db.*` lists
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn driver(&self) -> JdbcDriver {
        self.driver
    }

    /// Driver class name, e.g. `com.kingbase8.Driver`
    #[must_use]
    pub fn driver_class_name(&self) -> &'static str {
        self.driver.class_name()
    }

    #[must_use]
    pub fn jdbc_url(&self) -> &str {
        &self.jdbc_url
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    #[must_use]
    pub fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }

    #[must_use]
    pub fn min_idle(&self) -> u32 {
        self.min_idle
    }

    #[must_use]
    pub fn validation_timeout(&self) -> Duration {
        self.validation_timeout
    }

    #[must_use]
    pub fn test_query(&self) -> &str {
        &self.test_query
    }
}

impl fmt::Debug for PooledDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledDataSource")
            .field("index", &self.index)
            .field("driver", &self.driver.class_name())
            .field("jdbc_url", &self.jdbc_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("connection_timeout", &self.connection_timeout)
            .field("max_pool_size", &self.max_pool_size)
            .field("min_idle", &self.min_idle)
            .field("validation_timeout", &self.validation_timeout)
            .field("test_query", &self.test_query)
            .finish()
    }
}

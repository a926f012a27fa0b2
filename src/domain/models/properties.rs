//! DataSource Properties
//!
//! The typed target of the `db.*` configuration namespace.

use std::fmt;

use zeroize::Zeroizing;

use super::datasource::JdbcDriver;

/// Indexed datasource properties.
///
/// Every list is indexed by datasource position; `user` and `password` fall
/// back to their first entry, `max_pool_size` and `min_idle` to fixed
/// defaults.
#[derive(Clone, Default)]
pub struct DataSourceProperties {
    pub num: Option<u32>,
    pub url: Vec<String>,
    pub user: Vec<String>,
    pub password: Vec<Zeroizing<String>>,
    pub max_pool_size: Vec<u32>,
    pub min_idle: Vec<u32>,
    pub driver: Option<JdbcDriver>,
}

impl DataSourceProperties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    #[must_use]
    pub fn with_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.url = urls.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user = users.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_passwords<I, S>(mut self, passwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.password = passwords
            .into_iter()
            .map(|p| Zeroizing::new(p.into()))
            .collect();
        self
    }

    #[must_use]
    pub fn with_max_pool_sizes(mut self, sizes: impl IntoIterator<Item = u32>) -> Self {
        self.max_pool_size = sizes.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_min_idles(mut self, idles: impl IntoIterator<Item = u32>) -> Self {
        self.min_idle = idles.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_driver(mut self, driver: JdbcDriver) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Url at `index`; there is no fallback for urls
    #[must_use]
    pub fn url_at(&self, index: usize) -> Option<&str> {
        self.url.get(index).map(String::as_str)
    }

    /// User at `index`, or the first user
    #[must_use]
    pub fn user_at(&self, index: usize) -> Option<&str> {
        self.user.get(index).or_else(|| self.user.first()).map(String::as_str)
    }

    /// Password at `index`, or the first password
    #[must_use]
    pub fn password_at(&self, index: usize) -> Option<&str> {
        self.password
            .get(index)
            .or_else(|| self.password.first())
            .map(|p| p.as_str())
    }

    #[must_use]
    pub fn max_pool_size_at(&self, index: usize, default: u32) -> u32 {
        self.max_pool_size.get(index).copied().unwrap_or(default)
    }

    #[must_use]
    pub fn min_idle_at(&self, index: usize, default: u32) -> u32 {
        self.min_idle.get(index).copied().unwrap_or(default)
    }
}

impl fmt::Debug for DataSourceProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSourceProperties")
            .field("num", &self.num)
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &format_args!("[***; {}]", self.password.len()))
            .field("max_pool_size", &self.max_pool_size)
            .field("min_idle", &self.min_idle)
            .field("driver", &self.driver)
            .finish()
    }
}

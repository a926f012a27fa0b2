//! Application Configuration
//!
//! Loads configuration from files and environment variables and binds the
//! `db.*` namespace onto [`DataSourceProperties`].

use config::{Config, ConfigError, Environment, File, Map, Value, ValueKind};
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;

use crate::domain::gateways::PropertyBinder;
use crate::domain::models::datasource::JdbcDriver;
use crate::domain::models::properties::DataSourceProperties;
use crate::shared::errors::ConfigurationError;

/// Load configuration from files and environment
///
/// # Errors
///
/// Returns `ConfigError` when `config/default` is missing or a source cannot
/// be parsed.
pub fn load() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "default".into());

    Config::builder()
        // Start with default config
        .add_source(File::with_name("config/default").required(true))
        // Merge environment-specific config if it exists
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Override with environment variables (e.g., APP__DB__URL__0)
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()
}

impl PropertyBinder for Config {
    fn bind_data_source_properties(
        &self,
        prefix: &str,
    ) -> Result<DataSourceProperties, ConfigurationError> {
        let table = match self.get_table(prefix) {
            Ok(table) => table,
            Err(ConfigError::NotFound(_)) => return Ok(DataSourceProperties::default()),
            Err(err) => return Err(ConfigurationError::invalid_value(prefix, err)),
        };
        let section = Section {
            prefix,
            table: &table,
        };

        let driver = section
            .scalar::<String>("driver")?
            .map(|name| name.parse::<JdbcDriver>())
            .transpose()?;

        Ok(DataSourceProperties {
            num: section.scalar("num")?,
            // multi-host urls contain commas, so urls are never split
            url: section.list("url", Split::Never)?,
            user: section.list("user", Split::Commas)?,
            password: section
                .list::<String>("password", Split::Commas)?
                .into_iter()
                .map(Zeroizing::new)
                .collect(),
            max_pool_size: section.list("maxPoolSize", Split::Commas)?,
            min_idle: section.list("minIdle", Split::Commas)?,
            driver,
        })
    }
}

/// How a scalar string bound to a list field is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Split {
    /// `"a,b"` binds as `["a", "b"]`
    Commas,
    /// `"a,b"` binds as `["a,b"]`
    Never,
}

/// One bound namespace, matched with relaxed key names
struct Section<'a> {
    prefix: &'a str,
    table: &'a Map<String, Value>,
}

impl Section<'_> {
    /// Entry whose key equals `name` ignoring case, `-` and `_`
    ///
    /// Two spellings of the same key are rejected rather than picking one.
    fn lookup(&self, name: &str) -> Result<Option<(&String, &Value)>, ConfigurationError> {
        let wanted = canonical(name);
        let mut matches: Vec<(&String, &Value)> = self
            .table
            .iter()
            .filter(|(key, _)| canonical(key) == wanted)
            .collect();

        if matches.len() > 1 {
            let mut keys: Vec<&str> = matches.iter().map(|(key, _)| key.as_str()).collect();
            keys.sort_unstable();
            return Err(ConfigurationError::invalid_value(
                format!("{}.{name}", self.prefix),
                format!("conflicting keys {}", keys.join(", ")),
            ));
        }

        Ok(matches.pop().filter(|(_, value)| !is_nil(value)))
    }

    fn scalar<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ConfigurationError> {
        let Some((key, value)) = self.lookup(name)? else {
            return Ok(None);
        };
        value
            .clone()
            .try_deserialize()
            .map(Some)
            .map_err(|err| ConfigurationError::invalid_value(format!("{}.{key}", self.prefix), err))
    }

    /// Array, `0`/`1`/... keyed table, or a single scalar
    fn list<T: DeserializeOwned>(
        &self,
        name: &str,
        split: Split,
    ) -> Result<Vec<T>, ConfigurationError> {
        let Some((key, value)) = self.lookup(name)? else {
            return Ok(Vec::new());
        };

        let elements = match &value.kind {
            ValueKind::Array(items) => items.iter().take_while(|v| !is_nil(v)).cloned().collect(),
            ValueKind::Table(entries) => indexed_entries(entries),
            ValueKind::String(text) if split == Split::Commas => text
                .split(',')
                .map(|part| Value::from(part.trim().to_string()))
                .collect(),
            _ => vec![value.clone()],
        };

        elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                element.try_deserialize().map_err(|err| {
                    ConfigurationError::invalid_value(format!("{}.{key}[{index}]", self.prefix), err)
                })
            })
            .collect()
    }
}

/// Values keyed `0, 1, ...`, stopping at the first missing index
fn indexed_entries(entries: &Map<String, Value>) -> Vec<Value> {
    (0_usize..)
        .map_while(|index| {
            entries
                .get(index.to_string().as_str())
                .filter(|value| !is_nil(value))
                .cloned()
        })
        .collect()
}

fn is_nil(value: &Value) -> bool {
    matches!(value.kind, ValueKind::Nil)
}

fn canonical(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

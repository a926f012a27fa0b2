//! Common test utilities for integration tests
//!
//! Builds `config::Config` values from TOML snippets and fake environment
//! variables, and starts PostgreSQL containers for the e2e tests.

#![allow(dead_code)]

use std::collections::HashMap;

use config::{Config, Environment, File, FileFormat};
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;

/// Configuration built from a TOML document
pub fn config_from_toml(toml: &str) -> Config {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()
        .expect("Failed to build config from TOML")
}

/// Configuration layered the way the binary layers it: TOML first, then
/// `APP__` prefixed environment variables
pub fn config_with_env(toml: &str, env: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = env
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();

    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .add_source(Environment::with_prefix("APP").separator("__").source(Some(vars)))
        .build()
        .expect("Failed to build layered config")
}

/// A running PostgreSQL container and the JDBC url pointing at it
pub struct TestDatabase {
    pub jdbc_url: String,
    _container: ContainerAsync<Postgres>,
}

impl TestDatabase {
    pub async fn start() -> Self {
        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await
            .expect("Failed to start PostgreSQL container");

        let host = container.get_host().await.expect("Failed to get host");
        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("Failed to get port");

        Self {
            jdbc_url: format!("jdbc:postgresql://{host}:{port}/postgres"),
            _container: container,
        }
    }
}

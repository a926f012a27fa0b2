//! Integration tests for building datasources from layered configuration

mod common;

use std::sync::Arc;

use external_datasource::application::use_cases::DataSourceBuilder;
use external_datasource::domain::JdbcDriver;
use external_datasource::infrastructure::driven_adapters::DataSourceRegistry;
use external_datasource::shared::ConfigurationError;

use common::{config_from_toml, config_with_env};

// ============================================================================
// Successful builds
// ============================================================================

#[test]
fn test_build_two_datasources_sharing_credentials() {
    let config = config_from_toml(
        r#"
        [db]
        num = 2
        url = ["jdbc:db://a", "jdbc:db://b"]
        user = ["u"]
        password = ["p"]
        "#,
    );
    let mut registry = DataSourceRegistry::new();

    let data_sources = DataSourceBuilder::new()
        .build(&config, |ds| registry.register(ds))
        .unwrap();

    assert_eq!(data_sources.len(), 2);
    assert_eq!(registry.len(), 2);
    assert_eq!(data_sources[0].jdbc_url(), "jdbc:db://a");
    assert_eq!(data_sources[1].jdbc_url(), "jdbc:db://b");
    for (index, ds) in data_sources.iter().enumerate() {
        assert_eq!(ds.index(), index);
        assert_eq!(ds.username(), "u");
        assert_eq!(ds.password(), "p");
        assert_eq!(ds.max_pool_size(), 20);
        assert_eq!(ds.min_idle(), 50);
        assert!(Arc::ptr_eq(registry.get(index).unwrap().data_source(), ds));
    }
}

#[test]
fn test_build_three_datasources_with_single_user() {
    let config = config_from_toml(
        r#"
        [db]
        num = 3
        url = [" jdbc:kingbase8://a:54321/nacos ", "jdbc:kingbase8://b:54321/nacos", "jdbc:kingbase8://c:54321/nacos"]
        user = "  nacos  "
        password = ["  pw  "]
        maxPoolSize = [5, 6]
        minIdle = [1]
        "#,
    );

    let data_sources = DataSourceBuilder::new().build(&config, |_| {}).unwrap();

    assert_eq!(data_sources.len(), 3);
    assert_eq!(data_sources[0].jdbc_url(), "jdbc:kingbase8://a:54321/nacos");
    assert!(data_sources.iter().all(|ds| ds.username() == "nacos"));
    assert!(data_sources.iter().all(|ds| ds.password() == "pw"));
    assert_eq!(
        data_sources.iter().map(|ds| ds.max_pool_size()).collect::<Vec<_>>(),
        vec![5, 6, 20]
    );
    assert_eq!(
        data_sources.iter().map(|ds| ds.min_idle()).collect::<Vec<_>>(),
        vec![1, 50, 50]
    );
}

#[test]
fn test_environment_overrides_file_values() {
    let config = config_with_env(
        r#"
        [db]
        num = 1
        url = ["jdbc:mysql://file:3306/nacos"]
        user = ["file-user"]
        password = ["file-pass"]
        "#,
        &[
            ("APP__DB__DRIVER", "mysql"),
            ("APP__DB__PASSWORD", "env-pass"),
        ],
    );

    let data_sources = DataSourceBuilder::new().build(&config, |_| {}).unwrap();

    assert_eq!(data_sources.len(), 1);
    assert_eq!(data_sources[0].driver(), JdbcDriver::MySql);
    assert_eq!(data_sources[0].username(), "file-user");
    assert_eq!(data_sources[0].password(), "env-pass");
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_missing_num_is_reported() {
    let config = config_from_toml(
        r#"
        [db]
        url = ["jdbc:db://a"]
        user = ["u"]
        password = ["p"]
        "#,
    );

    let err = DataSourceBuilder::new().build(&config, |_| {}).unwrap_err();

    assert!(err.to_string().contains("db.num"));
}

#[test]
fn test_missing_user_is_reported() {
    let config = config_from_toml(
        r#"
        [db]
        num = 1
        url = ["jdbc:db://a"]
        password = ["p"]
        "#,
    );

    let err = DataSourceBuilder::new().build(&config, |_| {}).unwrap_err();

    assert!(matches!(err, ConfigurationError::EmptyUser { .. }));
}

#[test]
fn test_missing_password_is_reported() {
    let config = config_from_toml(
        r#"
        [db]
        num = 1
        url = ["jdbc:db://a"]
        user = ["u"]
        password = []
        "#,
    );

    let err = DataSourceBuilder::new().build(&config, |_| {}).unwrap_err();

    assert!(matches!(err, ConfigurationError::EmptyPassword { .. }));
}

#[test]
fn test_short_url_list_names_missing_index() {
    let config = config_from_toml(
        r#"
        [db]
        num = 2
        url = ["jdbc:db://a"]
        user = ["u"]
        password = ["p"]
        "#,
    );
    let mut created = Vec::new();

    let err = DataSourceBuilder::new()
        .build(&config, |ds| created.push(ds.index()))
        .unwrap_err();

    assert_eq!(err.to_string(), "db.url.1 is null");
    assert_eq!(created, vec![0]);
}

#[test]
fn test_huge_num_reports_missing_url_instead_of_aborting() {
    let config = config_from_toml(
        r#"
        [db]
        num = 4294967295
        url = ["jdbc:db://a"]
        user = ["u"]
        password = ["p"]
        "#,
    );

    let err = DataSourceBuilder::new().build(&config, |_| {}).unwrap_err();

    assert!(matches!(err, ConfigurationError::MissingUrl { index: 1, .. }));
    assert_eq!(err.to_string(), "db.url.1 is null");
}

#[test]
fn test_comma_separated_credentials_bind_per_index() {
    let config = config_from_toml(
        r#"
        [db]
        num = 2
        url = ["jdbc:mysql://a,b:3306/nacos", "jdbc:mysql://c:3306/nacos"]
        user = "first, second"
        password = "p0,p1"
        maxPoolSize = "8,9"
        "#,
    );

    let data_sources = DataSourceBuilder::new().build(&config, |_| {}).unwrap();

    assert_eq!(data_sources[0].jdbc_url(), "jdbc:mysql://a,b:3306/nacos");
    assert_eq!(data_sources[0].username(), "first");
    assert_eq!(data_sources[1].username(), "second");
    assert_eq!(data_sources[1].password(), "p1");
    assert_eq!(data_sources[1].max_pool_size(), 9);
}

#[test]
fn test_unknown_driver_is_reported() {
    let config = config_from_toml(
        r#"
        [db]
        num = 1
        driver = "db2"
        url = ["jdbc:db2://a"]
        user = ["u"]
        password = ["p"]
        "#,
    );

    let err = DataSourceBuilder::new().build(&config, |_| {}).unwrap_err();

    assert!(matches!(err, ConfigurationError::UnsupportedDriver(ref name) if name == "db2"));
}

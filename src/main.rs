//! External DataSource - Main Entry Point

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use external_datasource::application::use_cases::DataSourceBuilder;
use external_datasource::infrastructure::driven_adapters::config;
use external_datasource::infrastructure::driven_adapters::DataSourceRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "external_datasource=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::load()?;
    tracing::info!("Configuration loaded successfully");

    // Build datasources, registering each one as it is created
    let mut registry = DataSourceRegistry::new();
    let data_sources = DataSourceBuilder::new().build(&config, |ds| registry.register(ds))?;
    tracing::info!(count = data_sources.len(), "DataSources built");

    // Check every datasource once
    let results = registry.check_all().await;
    let healthy = results.iter().filter(|result| result.is_ok()).count();
    tracing::info!(healthy, total = results.len(), "DataSource check completed");

    registry.close_all().await;

    if healthy < results.len() {
        anyhow::bail!(
            "{} of {} datasources failed the connection check",
            results.len() - healthy,
            results.len()
        );
    }

    Ok(())
}

use std::sync::Arc;

use catalog_core::catalog::ids::generator_for;
use catalog_core::config::{AppConfig, ConfigError};
use catalog_core::{CatalogError, CatalogService};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub catalog: Arc<CatalogService>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("demo catalog seeding failed: {0}")]
    Seed(#[source] CatalogError),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        id_strategy = ?config.catalog.id_strategy,
        "starting application bootstrap"
    );

    let ids = generator_for(config.catalog.id_strategy, config.catalog.id_length);
    let catalog = Arc::new(CatalogService::new(ids));

    if config.catalog.seed_demo {
        let seeded = catalog.seed_demo().await.map_err(BootstrapError::Seed)?;
        info!(
            event_name = "system.bootstrap.catalog_seeded",
            correlation_id = "bootstrap",
            product_count = seeded,
            "demo catalog seeded"
        );
    }

    Ok(Application { config, catalog })
}

#[cfg(test)]
mod tests {
    use catalog_core::config::{AppConfig, ConfigOverrides, IdStrategy, LoadOptions};

    use crate::bootstrap::{bootstrap_with_config, Application, BootstrapError};

    async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
        let config = AppConfig::load(options)?;
        bootstrap_with_config(config).await
    }

    #[tokio::test]
    async fn bootstrap_starts_with_empty_catalog_by_default() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides { seed_demo: Some(false), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should succeed with defaults");

        assert!(app.catalog.is_empty().await);
    }

    #[tokio::test]
    async fn bootstrap_seeds_demo_catalog_when_enabled() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                seed_demo: Some(true),
                id_strategy: Some(IdStrategy::Sequential),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await
        .expect("bootstrap should seed");

        let products = app.catalog.list().await;
        assert_eq!(products.len(), 10);
        assert_eq!(products[0].id.as_str(), "p-1");
    }

    #[tokio::test]
    async fn bootstrap_surfaces_config_errors() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides { port: Some(0), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        })
        .await;

        let message = result.err().map(|error| error.to_string()).unwrap_or_default();
        assert!(message.contains("server.port"));
    }
}

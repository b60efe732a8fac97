use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::config::AppConfig;
use crate::services::properties::PropertyStore;
use crate::services::statement::OwnerStatement;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub http: reqwest::Client,
    pub properties: Arc<PropertyStore>,
    pub statement_cache: Cache<String, Arc<OwnerStatement>>,
}

impl AppState {
    pub fn build(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_seconds))
            .build()?;

        let properties = match &config.properties_file {
            Some(path) => {
                let store = PropertyStore::from_file(Path::new(path))?;
                tracing::info!(path = %path, count = store.len(), "Loaded property directory");
                store
            }
            None => {
                tracing::warn!(
                    "PROPERTIES_FILE is not set — property directory is empty, all statement \
                     requests will return 404"
                );
                PropertyStore::default()
            }
        };

        let statement_cache = Cache::builder()
            .max_capacity(config.statement_cache_max_entries)
            .time_to_live(Duration::from_secs(config.statement_cache_ttl_seconds))
            .build();

        Ok(Self {
            config: Arc::new(config),
            http,
            properties: Arc::new(properties),
            statement_cache,
        })
    }
}

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

use crate::clients::{AppwriteClient, MovieCatalog, TmdbClient};
use crate::config::{Config, TrendBackend};
use crate::db::Store;
use crate::domain::NotificationEvent;
use crate::services::{
    AppwriteTrendStore, SeaOrmTrendStore, SearchService, TrendRecorder, TrendStore,
    TrendingService,
};

/// Build a shared HTTP client reused by the catalog and the remote trend store.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent("Marquee/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    /// Present only with the SQLite trend backend.
    pub store: Option<Store>,

    pub catalog: Arc<dyn MovieCatalog>,

    pub trending: Arc<TrendingService>,

    pub search: Arc<SearchService>,

    pub event_bus: broadcast::Sender<NotificationEvent>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let http_client =
            build_shared_http_client(config.catalog.request_timeout_seconds.into())?;

        let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbClient::with_shared_client(
            http_client.clone(),
            &config.catalog,
        ));

        let image_base = config.catalog.image_base_url.clone();
        let (store, trend_store): (Option<Store>, Arc<dyn TrendStore>) =
            match config.trending.backend {
                TrendBackend::Sqlite => {
                    let store = Store::new(&config.trending.database_path).await?;
                    let trend_store = Arc::new(SeaOrmTrendStore::new(store.clone(), image_base));
                    (Some(store), trend_store)
                }
                TrendBackend::Appwrite => {
                    let appwrite = &config.trending.appwrite;
                    let client = AppwriteClient::with_shared_client(http_client, appwrite);
                    (
                        None,
                        Arc::new(AppwriteTrendStore::new(client, appwrite, image_base)),
                    )
                }
            };

        info!(backend = trend_store.backend_name(), "Trend store ready");

        Ok(Self::from_parts(config, store, catalog, trend_store))
    }

    /// Assembles the services around an existing catalog and trend store.
    /// Spawns the trend recorder, so it must run inside a runtime.
    #[must_use]
    pub fn from_parts(
        config: Config,
        store: Option<Store>,
        catalog: Arc<dyn MovieCatalog>,
        trend_store: Arc<dyn TrendStore>,
    ) -> Self {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size.max(1));

        let trending = Arc::new(TrendingService::new(trend_store, config.trending.limit));
        let (recorder, _worker) = TrendRecorder::spawn(
            Arc::clone(&trending),
            config.trending.queue_capacity,
            event_bus.clone(),
        );
        let search = Arc::new(SearchService::new(Arc::clone(&catalog), recorder));

        Self {
            config: Arc::new(config),
            store,
            catalog,
            trending,
            search,
            event_bus,
        }
    }

    #[must_use]
    pub fn image_base(&self) -> &str {
        &self.config.catalog.image_base_url
    }
}

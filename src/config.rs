use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,

    pub search: SearchConfig,

    pub trending: TrendingConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human readable format
    pub json_logs: bool,

    /// Event bus buffer size (default: 100)
    pub event_bus_buffer_size: usize,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            event_bus_buffer_size: 100,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,

    /// TMDB v4 read access token, sent as a bearer credential
    pub api_token: String,

    /// Prefix joined with a poster path to build poster URLs
    pub image_base_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_token: String::new(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a typed term is sent to the catalog
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendBackend {
    Sqlite,
    Appwrite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendingConfig {
    pub backend: TrendBackend,

    /// Number of records shown in the trending section
    pub limit: u32,

    /// Pending upserts held by the background recorder before new ones are dropped
    pub queue_capacity: usize,

    pub database_path: String,

    pub appwrite: AppwriteConfig,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            backend: TrendBackend::Sqlite,
            limit: 5,
            queue_capacity: 64,
            database_path: "sqlite:data/marquee.db".to_string(),
            appwrite: AppwriteConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppwriteConfig {
    pub endpoint: String,

    pub project_id: String,

    pub database_id: String,

    pub table_id: String,

    /// Server API key. Leave empty when the table grants access to guests.
    pub api_key: Option<String>,
}

impl Default for AppwriteConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: String::new(),
            database_id: String::new(),
            table_id: String::new(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Idle live-search sessions are dropped after this many seconds
    pub session_idle_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 6790,
            cors_allowed_origins: vec![
                "http://localhost:6790".to_string(),
                "http://127.0.0.1:6790".to_string(),
            ],
            session_idle_seconds: 30 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            catalog: CatalogConfig::default(),
            search: SearchConfig::default(),
            trending: TrendingConfig::default(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Loads the first config file found, then applies environment overrides.
    pub fn load() -> Result<Self> {
        // A missing .env is the common case.
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    /// Overrides credentials and identifiers from the environment.
    ///
    /// Both plain names and the `VITE_` names used by the browser build are
    /// accepted; the plain name wins when both are set.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| {
            lookup(name)
                .or_else(|| lookup(&format!("VITE_{name}")))
                .filter(|v| !v.trim().is_empty())
        };

        if let Some(token) = get("TMDB_API_KEY") {
            self.catalog.api_token = token;
        }

        let appwrite = &mut self.trending.appwrite;
        if let Some(endpoint) = get("APPWRITE_ENDPOINT") {
            appwrite.endpoint = endpoint;
        }
        if let Some(project) = get("APPWRITE_PROJECT_ID") {
            appwrite.project_id = project;
        }
        if let Some(database) = get("APPWRITE_DATABASE_ID") {
            appwrite.database_id = database;
        }
        if let Some(table) = get("APPWRITE_TABLE_ID") {
            appwrite.table_id = table;
        }
        if let Some(key) = get("APPWRITE_API_KEY") {
            appwrite.api_key = Some(key);
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("marquee").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".marquee").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.api_token.trim().is_empty() {
            anyhow::bail!("Catalog API token is missing (set TMDB_API_KEY or catalog.api_token)");
        }

        if self.search.debounce_ms == 0 {
            anyhow::bail!("search.debounce_ms must be > 0");
        }

        if self.trending.limit == 0 {
            anyhow::bail!("trending.limit must be > 0");
        }

        if self.trending.backend == TrendBackend::Appwrite {
            let appwrite = &self.trending.appwrite;
            if appwrite.project_id.is_empty()
                || appwrite.database_id.is_empty()
                || appwrite.table_id.is_empty()
            {
                anyhow::bail!(
                    "Appwrite backend requires project_id, database_id and table_id to be set"
                );
            }
        }

        Ok(())
    }

    #[must_use]
    pub const fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.search.debounce_ms)
    }
}

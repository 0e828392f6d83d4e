use anyhow::Result;
use sea_orm::sqlx::ConnectOptions as _;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, SqlxSqliteConnector, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::search_counts::Model as SearchCountRow;

/// Every connection to `sqlite::memory:` is its own database, so the pool
/// holds exactly one and never recycles it.
fn memory_pool_options() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(None)
        .max_lifetime(None)
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let (conn, min_connections, max_connections) = if in_memory {
            let connect = db_url
                .parse::<SqliteConnectOptions>()?
                .disable_statement_logging();
            let pool = memory_pool_options().connect_with(connect).await?;
            (SqlxSqliteConnector::from_sqlx_sqlite_pool(pool), 1, 1)
        } else {
            let mut opt = ConnectOptions::new(db_url.to_string());
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .connect_timeout(Duration::from_secs(10))
                .acquire_timeout(Duration::from_secs(10))
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600))
                .sqlx_logging(false);
            (Database::connect(opt).await?, min_connections, max_connections)
        };

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn search_count_repo(&self) -> repositories::search_counts::SearchCountRepository {
        repositories::search_counts::SearchCountRepository::new(self.conn.clone())
    }

    pub async fn increment_search_count(
        &self,
        term: &str,
        movie_id: i64,
        poster_url: &str,
    ) -> Result<()> {
        self.search_count_repo()
            .increment_or_create(term, movie_id, poster_url)
            .await
    }

    pub async fn get_search_count(&self, term: &str) -> Result<Option<SearchCountRow>> {
        self.search_count_repo().find_by_term(term).await
    }

    pub async fn top_search_counts(&self, limit: u64) -> Result<Vec<SearchCountRow>> {
        self.search_count_repo().top(limit).await
    }

    pub async fn search_count_total(&self) -> Result<u64> {
        self.search_count_repo().count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_increment_creates_then_bumps() {
        let store = memory_store().await;

        store.increment_search_count("dune", 1, "p/1").await.unwrap();
        let row = store.get_search_count("dune").await.unwrap().unwrap();
        assert_eq!(row.count, 1);
        assert_eq!(row.movie_id, 1);
        assert_eq!(row.poster_url, "p/1");

        store.increment_search_count("dune", 99, "p/99").await.unwrap();
        let row = store.get_search_count("dune").await.unwrap().unwrap();
        assert_eq!(row.count, 2);
        // The sample movie is fixed by the first search.
        assert_eq!(row.movie_id, 1);
        assert_eq!(store.search_count_total().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_top_orders_by_count_then_insertion() {
        let store = memory_store().await;

        for (term, times) in [("a", 1), ("b", 3), ("c", 1), ("d", 2)] {
            for _ in 0..times {
                store.increment_search_count(term, 0, "").await.unwrap();
            }
        }

        let top: Vec<String> = store
            .top_search_counts(3)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.search_term)
            .collect();
        assert_eq!(top, vec!["b", "d", "a"]);
    }

    #[tokio::test]
    async fn test_ping() {
        memory_store().await.ping().await.unwrap();
    }

    #[test]
    fn test_memory_pool_keeps_its_only_connection() {
        let opts = memory_pool_options();
        assert_eq!(opts.get_max_connections(), 1);
        assert_eq!(opts.get_min_connections(), 1);
        assert_eq!(opts.get_idle_timeout(), None);
        assert_eq!(opts.get_max_lifetime(), None);
    }

    #[tokio::test]
    async fn test_memory_store_is_migrated_across_calls() {
        let store = memory_store().await;

        for _ in 0..20 {
            store.increment_search_count("alien", 7, "").await.unwrap();
            store.ping().await.unwrap();
        }
        assert_eq!(store.get_search_count("alien").await.unwrap().unwrap().count, 20);
    }
}

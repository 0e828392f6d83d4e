use serde::{Deserialize, Serialize};
use tracing::debug;

use super::trend_store::{TrendError, TrendStore};
use crate::clients::appwrite::{AppwriteClient, Query};
use crate::config::AppwriteConfig;
use crate::db::{SearchCountRow, Store};
use crate::models::{Movie, SearchCountRecord};

fn sample_poster_url(movie: &Movie, image_base: &str) -> String {
    movie.poster_url(image_base).unwrap_or_default()
}

/// Trend store kept in the local SQLite database.
pub struct SeaOrmTrendStore {
    store: Store,
    image_base: String,
}

impl SeaOrmTrendStore {
    #[must_use]
    pub fn new(store: Store, image_base: impl Into<String>) -> Self {
        Self {
            store,
            image_base: image_base.into(),
        }
    }
}

impl From<SearchCountRow> for SearchCountRecord {
    fn from(row: SearchCountRow) -> Self {
        Self {
            id: row.id.to_string(),
            search_term: row.search_term,
            count: row.count,
            movie_id: row.movie_id,
            poster_url: row.poster_url,
        }
    }
}

#[async_trait::async_trait]
impl TrendStore for SeaOrmTrendStore {
    async fn upsert_search(&self, term: &str, movie: &Movie) -> Result<(), TrendError> {
        let poster_url = sample_poster_url(movie, &self.image_base);
        self.store
            .increment_search_count(term, movie.id, &poster_url)
            .await?;
        Ok(())
    }

    async fn top_trending(&self, limit: u32) -> Result<Vec<SearchCountRecord>, TrendError> {
        let rows = self.store.top_search_counts(limit.into()).await?;
        Ok(rows.into_iter().map(SearchCountRecord::from).collect())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SearchCountData {
    search_term: String,
    count: i64,
    movie_id: i64,
    #[serde(default)]
    poster_url: String,
}

#[derive(Serialize)]
struct CountPatch {
    count: i64,
}

/// Trend store in an Appwrite table.
///
/// The upsert is a lookup followed by a separate create or update, so two
/// clients searching the same new term at the same moment can both create
/// a row.
pub struct AppwriteTrendStore {
    client: AppwriteClient,
    database_id: String,
    table_id: String,
    image_base: String,
}

impl AppwriteTrendStore {
    #[must_use]
    pub fn new(client: AppwriteClient, config: &AppwriteConfig, image_base: impl Into<String>) -> Self {
        Self {
            client,
            database_id: config.database_id.clone(),
            table_id: config.table_id.clone(),
            image_base: image_base.into(),
        }
    }
}

#[async_trait::async_trait]
impl TrendStore for AppwriteTrendStore {
    async fn upsert_search(&self, term: &str, movie: &Movie) -> Result<(), TrendError> {
        let existing = self
            .client
            .list_rows::<SearchCountData>(
                &self.database_id,
                &self.table_id,
                &[Query::equal("search_term", term)],
            )
            .await?;

        if let Some(row) = existing.rows.into_iter().next() {
            debug!(term, row_id = %row.id, "Incrementing existing search count");
            self.client
                .update_row(
                    &self.database_id,
                    &self.table_id,
                    &row.id,
                    &CountPatch {
                        count: row.data.count + 1,
                    },
                )
                .await?;
        } else {
            debug!(term, movie_id = movie.id, "Creating search count");
            let data = SearchCountData {
                search_term: term.to_string(),
                count: 1,
                movie_id: movie.id,
                poster_url: sample_poster_url(movie, &self.image_base),
            };
            self.client
                .create_row(
                    &self.database_id,
                    &self.table_id,
                    &AppwriteClient::unique_id(),
                    &data,
                )
                .await?;
        }

        Ok(())
    }

    async fn top_trending(&self, limit: u32) -> Result<Vec<SearchCountRecord>, TrendError> {
        let list = self
            .client
            .list_rows::<SearchCountData>(
                &self.database_id,
                &self.table_id,
                &[Query::order_desc("count"), Query::limit(limit)],
            )
            .await?;

        Ok(list
            .rows
            .into_iter()
            .filter(|row| row.data.count > 0)
            .take(limit as usize)
            .map(|row| SearchCountRecord {
                id: row.id,
                search_term: row.data.search_term,
                count: row.data.count,
                movie_id: row.data.movie_id,
                poster_url: row.data.poster_url,
            })
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "appwrite"
    }
}

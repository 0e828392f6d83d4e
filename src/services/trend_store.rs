//! Storage abstraction for trending search counters.

use crate::clients::appwrite::AppwriteError;
use crate::models::{Movie, SearchCountRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendError {
    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Remote(#[from] AppwriteError),
}

impl From<anyhow::Error> for TrendError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Backing store for "search term -> count, sample movie" records.
///
/// # Examples
///
/// ```rust,ignore
/// use marquee::services::TrendStore;
///
/// async fn example(store: &dyn TrendStore, movie: &marquee::models::Movie) {
///     store.upsert_search("dune", movie).await.ok();
///     let top = store.top_trending(5).await.unwrap_or_default();
///     assert!(top.len() <= 5);
/// }
/// ```
#[async_trait::async_trait]
pub trait TrendStore: Send + Sync {
    /// Increments the counter for `term`, creating it with a count of one and
    /// `movie` as its sample when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError`] when the store cannot be read or written.
    async fn upsert_search(&self, term: &str, movie: &Movie) -> Result<(), TrendError>;

    /// Up to `limit` records with a positive count, highest count first.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError`] when the store cannot be read.
    async fn top_trending(&self, limit: u32) -> Result<Vec<SearchCountRecord>, TrendError>;

    fn backend_name(&self) -> &'static str;
}

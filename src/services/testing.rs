//! In-memory doubles for the catalog and the trend store.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::trend_store::{TrendError, TrendStore};
use crate::clients::{CatalogError, MovieCatalog};
use crate::models::{Movie, SearchCountRecord};

pub fn movie(id: i64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/{id}.jpg")),
        popularity: 1.0,
        vote_average: Some(7.0),
        release_date: Some("2010-07-15".to_string()),
        original_language: Some("en".to_string()),
        overview: None,
    }
}

#[derive(Default)]
pub struct MemoryTrendStore {
    pub records: Mutex<Vec<SearchCountRecord>>,
    pub fail: bool,
}

impl MemoryTrendStore {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn count_for(&self, term: &str) -> Option<i64> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.search_term == term)
            .map(|r| r.count)
    }
}

#[async_trait::async_trait]
impl TrendStore for MemoryTrendStore {
    async fn upsert_search(&self, term: &str, movie: &Movie) -> Result<(), TrendError> {
        if self.fail {
            return Err(TrendError::Database("offline".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        if let Some(r) = records.iter_mut().find(|r| r.search_term == term) {
            r.count += 1;
        } else {
            let id = records.len().to_string();
            records.push(SearchCountRecord {
                id,
                search_term: term.to_string(),
                count: 1,
                movie_id: movie.id,
                poster_url: String::new(),
            });
        }
        Ok(())
    }

    /// Ignores `limit` so callers have to enforce it themselves.
    async fn top_trending(&self, _limit: u32) -> Result<Vec<SearchCountRecord>, TrendError> {
        if self.fail {
            return Err(TrendError::Database("offline".to_string()));
        }
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(records)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Catalog that answers a search with one movie titled after the term and
/// discovery with a fixed "Popular" movie.
#[derive(Default)]
pub struct StubCatalog {
    pub delays: HashMap<String, Duration>,
    pub rejected: HashMap<String, Option<String>>,
    pub empty: Vec<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StubCatalog {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn respond(&self, key: &str) -> Result<Vec<Movie>, CatalogError> {
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        self.calls.lock().unwrap().push(key.to_string());

        if let Some(message) = self.rejected.get(key) {
            return Err(CatalogError::Rejected(message.clone()));
        }
        if self.empty.iter().any(|e| e == key) {
            return Ok(Vec::new());
        }
        Ok(vec![movie(key.len() as i64, key)])
    }
}

#[async_trait::async_trait]
impl MovieCatalog for StubCatalog {
    async fn search(&self, term: &str) -> Result<Vec<Movie>, CatalogError> {
        self.respond(term).await
    }

    async fn discover(&self) -> Result<Vec<Movie>, CatalogError> {
        if let Some(delay) = self.delays.get("") {
            tokio::time::sleep(*delay).await;
        }
        self.calls.lock().unwrap().push(String::new());
        Ok(vec![movie(100, "Popular")])
    }
}

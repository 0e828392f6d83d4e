use std::sync::Arc;
use tracing::{debug, error};

use super::trending::TrendRecorder;
use crate::clients::{CatalogError, MovieCatalog};
use crate::models::Movie;

/// One catalog fetch cycle: query the catalog and, when a real search found
/// something, queue a trend update for its first result.
pub struct SearchService {
    catalog: Arc<dyn MovieCatalog>,
    recorder: TrendRecorder,
}

impl SearchService {
    #[must_use]
    pub fn new(catalog: Arc<dyn MovieCatalog>, recorder: TrendRecorder) -> Self {
        Self { catalog, recorder }
    }

    pub async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        let result = self.catalog.fetch_movies(query).await;

        match &result {
            Ok(movies) => {
                debug!(query, count = movies.len(), "Catalog fetch finished");
                if !query.is_empty()
                    && let Some(first) = movies.first()
                {
                    self.recorder.enqueue(query, first);
                }
            }
            Err(CatalogError::Rejected(message)) => {
                debug!(query, message = ?message, "Catalog rejected query");
            }
            Err(e) => {
                error!(query, error = %e, "Error fetching movies");
            }
        }

        result
    }
}

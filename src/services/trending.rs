use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::trend_store::{TrendError, TrendStore};
use crate::domain::NotificationEvent;
use crate::models::{Movie, SearchCountRecord};

/// Trend store access with the failure policy applied: every error is
/// logged and then dropped, nothing reaches the caller.
pub struct TrendingService {
    store: Arc<dyn TrendStore>,
    default_limit: u32,
}

impl TrendingService {
    #[must_use]
    pub fn new(store: Arc<dyn TrendStore>, default_limit: u32) -> Self {
        Self {
            store,
            default_limit,
        }
    }

    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Upserts without swallowing the error. Used by the background recorder,
    /// which reports outcomes on its own channel.
    pub async fn try_record(&self, term: &str, movie: &Movie) -> Result<(), TrendError> {
        let result = self.store.upsert_search(term, movie).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::counter!(
            "trend_upserts_total",
            "backend" => self.store.backend_name(),
            "outcome" => outcome
        )
        .increment(1);

        result
    }

    pub async fn record_search(&self, term: &str, movie: &Movie) {
        if let Err(e) = self.try_record(term, movie).await {
            error!(term, error = %e, "Error updating search count");
        }
    }

    /// Top records using the configured limit. `None` when the store failed.
    pub async fn top_trending(&self) -> Option<Vec<SearchCountRecord>> {
        self.top_trending_with_limit(self.default_limit).await
    }

    pub async fn top_trending_with_limit(&self, limit: u32) -> Option<Vec<SearchCountRecord>> {
        match self.store.top_trending(limit).await {
            Ok(mut records) => {
                records.retain(|r| r.count > 0);
                records.truncate(limit as usize);
                Some(records)
            }
            Err(e) => {
                error!(error = %e, "Error fetching trending movies");
                None
            }
        }
    }
}

struct TrendJob {
    term: String,
    movie: Movie,
}

/// Background queue for trend upserts.
///
/// Searches hand their first result to the queue and move on. The worker
/// performs the upsert and publishes the outcome on the event bus.
#[derive(Clone)]
pub struct TrendRecorder {
    tx: mpsc::Sender<TrendJob>,
    event_bus: broadcast::Sender<NotificationEvent>,
}

impl TrendRecorder {
    pub fn spawn(
        service: Arc<TrendingService>,
        capacity: usize,
        event_bus: broadcast::Sender<NotificationEvent>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<TrendJob>(capacity.max(1));
        let bus = event_bus.clone();

        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let event = match service.try_record(&job.term, &job.movie).await {
                    Ok(()) => {
                        debug!(term = %job.term, "Search count recorded");
                        NotificationEvent::SearchRecorded { term: job.term }
                    }
                    Err(e) => {
                        error!(term = %job.term, error = %e, "Error updating search count");
                        NotificationEvent::SearchRecordFailed {
                            term: job.term,
                            message: e.to_string(),
                        }
                    }
                };

                // No subscribers is fine.
                let _ = bus.send(event);
            }
            info!("Trend recorder stopped");
        });

        (Self { tx, event_bus }, handle)
    }

    /// Queues an upsert for `term`. Returns `false` when the job was dropped
    /// because the queue is full or the worker is gone.
    pub fn enqueue(&self, term: &str, movie: &Movie) -> bool {
        let job = TrendJob {
            term: term.to_string(),
            movie: movie.clone(),
        };

        match self.tx.try_send(job) {
            Ok(()) => true,
            Err(e) => {
                warn!(term, error = %e, "Dropping search count update");
                let _ = self.event_bus.send(NotificationEvent::SearchRecordDropped {
                    term: term.to_string(),
                });
                false
            }
        }
    }
}

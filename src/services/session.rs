//! Live search sessions.
//!
//! A session owns the state of one search page: raw input goes through the
//! debouncer, each settled term starts a catalog fetch, and observers follow
//! the resulting [`ViewState`] through a `watch` channel.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::search::SearchService;
use super::trending::TrendingService;
use crate::debounce::debounce;
use crate::view::ViewState;

pub struct SearchSession {
    input: watch::Sender<String>,
    view: Arc<watch::Sender<ViewState>>,
    task: JoinHandle<()>,
}

impl SearchSession {
    /// Starts the session task and loads the trending list once.
    #[must_use]
    pub fn start(
        search: Arc<SearchService>,
        trending: Arc<TrendingService>,
        debounce_delay: Duration,
    ) -> Self {
        let (input, input_rx) = watch::channel(String::new());
        let view = Arc::new(watch::channel(ViewState::default()).0);

        let task = tokio::spawn(run(
            search,
            trending,
            input_rx,
            Arc::clone(&view),
            debounce_delay,
        ));

        Self { input, view, task }
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.view.send_modify(|v| v.input.clone_from(&text));
        self.input.send_replace(text);
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> ViewState {
        self.view.borrow().clone()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    search: Arc<SearchService>,
    trending: Arc<TrendingService>,
    input: watch::Receiver<String>,
    view: Arc<watch::Sender<ViewState>>,
    debounce_delay: Duration,
) {
    // Dropping the set aborts whatever is still in flight.
    let mut tasks = JoinSet::new();

    {
        let view = Arc::clone(&view);
        tasks.spawn(async move {
            if let Some(records) = trending.top_trending().await {
                view.send_modify(|v| v.trending = records);
            }
        });
    }

    let generation = Arc::new(AtomicU64::new(0));
    let mut terms = debounce(input, debounce_delay);

    while let Some(term) = terms.recv().await {
        let current = generation.fetch_add(1, Ordering::SeqCst) + 1;
        view.send_modify(|v| v.begin_fetch(&term));

        let search = Arc::clone(&search);
        let view = Arc::clone(&view);
        let generation = Arc::clone(&generation);

        tasks.spawn(async move {
            let result = search.fetch_movies(&term).await;

            // Checked under the watch lock so a newer fetch cannot start in between.
            let applied = view.send_if_modified(|v| {
                if generation.load(Ordering::SeqCst) != current {
                    return false;
                }
                v.apply_fetch(&result);
                true
            });

            if !applied {
                debug!(term = %term, "Discarding superseded catalog response");
            }
        });

        while tasks.try_join_next().is_some() {}
    }
}

struct SessionEntry {
    session: Arc<SearchSession>,
    last_seen: Instant,
}

/// Sessions created through the HTTP API, keyed by id.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    search: Arc<SearchService>,
    trending: Arc<TrendingService>,
    debounce_delay: Duration,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(
        search: Arc<SearchService>,
        trending: Arc<TrendingService>,
        debounce_delay: Duration,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            search,
            trending,
            debounce_delay,
        }
    }

    pub async fn create(&self) -> (Uuid, Arc<SearchSession>) {
        let id = Uuid::new_v4();
        let session = Arc::new(SearchSession::start(
            Arc::clone(&self.search),
            Arc::clone(&self.trending),
            self.debounce_delay,
        ));

        self.sessions.write().await.insert(
            id,
            SessionEntry {
                session: Arc::clone(&session),
                last_seen: Instant::now(),
            },
        );
        metrics::gauge!("live_sessions").increment(1.0);
        debug!(%id, "Search session created");

        (id, session)
    }

    /// Looks up a session and marks it as used.
    pub async fn get(&self, id: Uuid) -> Option<Arc<SearchSession>> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&id).map(|entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.session)
        })
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            metrics::gauge!("live_sessions").decrement(1.0);
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions unused for longer than `idle`. Returns how many went.
    pub async fn sweep_idle(&self, idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < idle);
        let swept = before - sessions.len();

        if swept > 0 {
            metrics::gauge!("live_sessions").decrement(swept as f64);
            info!(swept, "Dropped idle search sessions");
        }
        swept
    }

    /// Runs [`Self::sweep_idle`] every `every` until the task is aborted.
    pub fn start_sweeper(&self, every: Duration, idle: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                registry.sweep_idle(idle).await;
            }
        })
    }
}

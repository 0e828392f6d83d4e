use serde::{Deserialize, Serialize};

/// Per-term search counter plus a sample movie for the trending list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCountRecord {
    pub id: String,
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

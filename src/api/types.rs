use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Movie, SearchCountRecord};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub id: i64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_year: Option<String>,
    pub rating: String,
    pub original_language: Option<String>,
    pub overview: Option<String>,
}

impl MovieDto {
    #[must_use]
    pub fn from_movie(movie: &Movie, image_base: &str) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: movie.poster_url(image_base),
            release_year: movie.release_year().map(str::to_string),
            rating: movie.rating_label(),
            original_language: movie.original_language.clone(),
            overview: movie.overview.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoviesDto {
    pub query: String,
    pub results: Vec<MovieDto>,
    /// Message from the catalog when it declined the query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrendingDto {
    pub rank: usize,
    pub id: String,
    pub search_term: String,
    pub count: i64,
    pub movie_id: i64,
    pub poster_url: String,
}

impl TrendingDto {
    #[must_use]
    pub fn ranked(records: Vec<SearchCountRecord>) -> Vec<Self> {
        records
            .into_iter()
            .enumerate()
            .map(|(index, r)| Self {
                rank: index + 1,
                id: r.id,
                search_term: r.search_term,
                count: r.count,
                movie_id: r.movie_id,
                poster_url: r.poster_url,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SessionInput {
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MoviesQuery {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<u32>,
}

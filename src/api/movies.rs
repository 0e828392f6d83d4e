use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MovieDto, MoviesDto, MoviesQuery, TrendingDto, TrendingQuery};
use crate::clients::CatalogError;
use crate::constants::{limits, messages};

/// `GET /api/movies?query=`
///
/// An empty query returns the discovery list. A query the catalog declines
/// is still a successful response, with no results and the catalog's notice.
pub async fn search_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoviesQuery>,
) -> Result<Json<ApiResponse<MoviesDto>>, ApiError> {
    let image_base = state.shared.image_base();

    let (movies, notice) = match state.shared.search.fetch_movies(&params.query).await {
        Ok(movies) => (movies, None),
        Err(CatalogError::Rejected(message)) => (
            Vec::new(),
            Some(message.unwrap_or_else(|| messages::FETCH_FAILED.to_string())),
        ),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(ApiResponse::success(MoviesDto {
        query: params.query,
        results: movies
            .iter()
            .map(|m| MovieDto::from_movie(m, image_base))
            .collect(),
        notice,
    })))
}

/// `GET /api/trending?limit=`
///
/// The limit is clamped to `1..=20`. A failing trend store yields an empty
/// list; the failure is only logged.
pub async fn get_trending(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendingQuery>,
) -> Json<ApiResponse<Vec<TrendingDto>>> {
    let limit = params
        .limit
        .unwrap_or_else(|| state.shared.trending.default_limit())
        .clamp(1, limits::MAX_TRENDING_LIMIT);

    let records = state
        .shared
        .trending
        .top_trending_with_limit(limit)
        .await
        .unwrap_or_default();

    Json(ApiResponse::success(TrendingDto::ranked(records)))
}

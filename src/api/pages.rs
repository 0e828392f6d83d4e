use axum::{
    extract::{Query, State},
    response::Html,
};
use std::sync::Arc;

use super::{AppState, MoviesQuery};
use crate::view::{ViewState, render_page};

/// `GET /?query=`
///
/// Renders the whole page on the server so it works without scripts. The
/// script in `app.js` takes over with a live session once loaded.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoviesQuery>,
) -> Html<String> {
    let shared = &state.shared;

    let (result, trending) = tokio::join!(
        shared.search.fetch_movies(&params.query),
        shared.trending.top_trending()
    );

    let mut view = ViewState {
        input: params.query.clone(),
        trending: trending.unwrap_or_default(),
        ..Default::default()
    };
    view.begin_fetch(&params.query);
    view.apply_fetch(&result);

    Html(render_page(&view, shared.image_base()))
}

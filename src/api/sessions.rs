//! Live search sessions over HTTP.
//!
//! The browser creates a session, posts every keystroke to it and follows
//! the rendered results area through a server-sent event stream.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use std::{convert::Infallible, sync::Arc};
use tokio::sync::watch;
use uuid::Uuid;

use super::{ApiError, ApiResponse, AppState, SessionCreated, SessionInput};
use crate::constants::intervals;
use crate::view::{ViewState, render_html};

pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<SessionCreated>>) {
    let (id, _session) = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(ApiResponse::success(SessionCreated { id })),
    )
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ViewState>>, ApiError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::session_not_found(id))?;

    Ok(Json(ApiResponse::success(session.snapshot())))
}

pub async fn post_input(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(input): Json<SessionInput>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::session_not_found(id))?;

    session.set_input(input.text);
    Ok(Json(ApiResponse::success(())))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if state.sessions.remove(id).await {
        Ok(Json(ApiResponse::success(())))
    } else {
        Err(ApiError::session_not_found(id))
    }
}

/// `GET /api/sessions/{id}/view`
///
/// Sends the current rendering first, then one `view` event per change.
/// The stream ends when the session goes away.
pub async fn view_stream(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| ApiError::session_not_found(id))?;

    let mut rx = session.subscribe();
    drop(session);
    rx.mark_changed();

    let image_base = state.shared.image_base().to_string();

    let stream = stream::unfold(
        (rx, image_base),
        |(mut rx, image_base): (watch::Receiver<ViewState>, String)| async move {
            rx.changed().await.ok()?;
            let html = render_html(&rx.borrow_and_update(), &image_base);
            Some((Ok(Event::default().event("view").data(html)), (rx, image_base)))
        },
    );

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(intervals::SSE_KEEP_ALIVE)))
}

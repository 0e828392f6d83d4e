use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use marquee::api::AppState;
use marquee::config::Config;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_app(server: &MockServer) -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.catalog.base_url = server.uri();
    config.catalog.api_token = "test-token".to_string();
    config.trending.database_path = "sqlite::memory:".to_string();
    config.search.debounce_ms = 50;

    let state = marquee::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    (marquee::api::router(state.clone()), state)
}

async fn mount_discover(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("sort_by", "popularity.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [{
                "id": 550,
                "title": "Fight Club",
                "poster_path": "/fc.jpg",
                "vote_average": 8.4,
                "release_date": "1999-10-15",
                "original_language": "en"
            }]
        })))
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, query: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", query))
        .and(header_eq("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "id": 27205,
                "title": title,
                "poster_path": "/inception.jpg",
                "vote_average": 8.369,
                "release_date": "2010-07-15",
                "original_language": "en"
            }]
        })))
        .mount(server)
        .await;
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn wait_for_trending(app: &Router) -> Value {
    for _ in 0..50 {
        let (_, body) = get_json(app, "/api/trending").await;
        if body["data"].as_array().is_some_and(|a| !a.is_empty()) {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("trending list never filled");
}

#[tokio::test]
async fn test_search_movies_records_trend() {
    let server = MockServer::start().await;
    mount_search(&server, "inception", "Inception").await;
    let (app, _) = spawn_app(&server).await;

    let (status, body) = get_json(&app, "/api/movies?query=inception").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["query"], "inception");
    let first = &body["data"]["results"][0];
    assert_eq!(first["title"], "Inception");
    assert_eq!(first["rating"], "8.4");
    assert_eq!(first["release_year"], "2010");
    assert_eq!(
        first["poster_url"],
        "https://image.tmdb.org/t/p/w500//inception.jpg"
    );
    assert!(body["data"].get("notice").is_none());

    let trending = wait_for_trending(&app).await;
    let top = &trending["data"][0];
    assert_eq!(top["rank"], 1);
    assert_eq!(top["search_term"], "inception");
    assert_eq!(top["count"], 1);
    assert_eq!(top["movie_id"], 27205);
}

#[tokio::test]
async fn test_empty_query_uses_discovery() {
    let server = MockServer::start().await;
    mount_discover(&server).await;
    let (app, _) = spawn_app(&server).await;

    let (status, body) = get_json(&app, "/api/movies?query=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["results"][0]["title"], "Fight Club");

    let (_, body) = get_json(&app, "/api/movies").await;
    assert_eq!(body["data"]["results"][0]["title"], "Fight Club");

    // Discovery never counts toward trending.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let (_, body) = get_json(&app, "/api/trending").await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_rejected_query_returns_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Response": "False",
            "Error": "Too many results."
        })))
        .mount(&server)
        .await;
    let (app, _) = spawn_app(&server).await;

    let (status, body) = get_json(&app, "/api/movies?query=a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["results"], json!([]));
    assert_eq!(body["data"]["notice"], "Too many results.");
}

#[tokio::test]
async fn test_catalog_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let (app, _) = spawn_app(&server).await;

    let (status, body) = get_json(&app, "/api/movies?query=dune").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Error fetching movies. Please try again later."
    );
}

#[tokio::test]
async fn test_trending_limit_is_clamped() {
    let server = MockServer::start().await;
    let (app, state) = spawn_app(&server).await;

    let movie: marquee::models::Movie =
        serde_json::from_value(json!({"id": 1, "title": "Any", "poster_path": "/a.jpg"})).unwrap();
    for i in 0..25 {
        for _ in 0..=i {
            state
                .shared
                .trending
                .record_search(&format!("term{i}"), &movie)
                .await;
        }
    }

    let (_, body) = get_json(&app, "/api/trending").await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["search_term"], "term24");
    assert_eq!(rows[0]["count"], 25);
    assert_eq!(
        rows[0]["poster_url"],
        "https://image.tmdb.org/t/p/w500//a.jpg"
    );

    let (_, body) = get_json(&app, "/api/trending?limit=100").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 20);

    let (_, body) = get_json(&app, "/api/trending?limit=0").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_session_lifecycle() {
    let server = MockServer::start().await;
    mount_discover(&server).await;
    mount_search(&server, "inception", "Inception").await;
    let (app, _) = spawn_app(&server).await;

    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/sessions")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri(format!("/api/sessions/{id}/input"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"text":"inception"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let mut view = Value::Null;
    for _ in 0..100 {
        let (_, body) = get_json(&app, &format!("/api/sessions/{id}")).await;
        view = body["data"].clone();
        if view["debounced"] == "inception" && view["loading"] == false {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(view["input"], "inception");
    assert_eq!(view["debounced"], "inception");
    assert_eq!(view["error"], Value::Null);
    assert_eq!(view["movies"][0]["title"], "Inception");

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/sessions/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(&app, &format!("/api/sessions/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_session_view_stream_sends_rendered_html() {
    let server = MockServer::start().await;
    mount_discover(&server).await;
    let (app, state) = spawn_app(&server).await;
    let (id, _session) = state.sessions.create().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/sessions/{id}/view"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut body = response.into_body();
    let frame = body.frame().await.unwrap().unwrap();
    let text = String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap();
    assert!(text.starts_with("event: view\n"));
    assert!(text.contains("All Movies"));
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let server = MockServer::start().await;
    let (app, _) = spawn_app(&server).await;
    let id = uuid::Uuid::new_v4();

    let (status, _) = get_json(&app, &format!("/api/sessions/{id}/view")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri(format!("/api/sessions/{id}/input"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"text":"x"}"#))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], format!("Session {id} not found"));
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let (app, _) = spawn_app(&server).await;

    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["trend_backend"], "sqlite");
    assert_eq!(body["data"]["live_sessions"], 0);
}

#[tokio::test]
async fn test_index_page_renders_results() {
    let server = MockServer::start().await;
    mount_discover(&server).await;
    mount_search(&server, "inception", "Inception").await;
    let (app, _) = spawn_app(&server).await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.starts_with("<!doctype html>"));
    assert!(html.contains("Fight Club"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/?query=inception")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("value=\"inception\""));
    assert!(html.contains("<h3>Inception</h3>"));
}

#[tokio::test]
async fn test_embedded_assets() {
    let server = MockServer::start().await;
    let (app, _) = spawn_app(&server).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/assets/style.css")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");

    let (status, _) = get_json(&app, "/assets/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get_json(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let server = MockServer::start().await;
    let (app, _) = spawn_app(&server).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&bytes).contains("Metrics not enabled"));
}

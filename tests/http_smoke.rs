use std::sync::Arc;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use quotegif::{
    Renderer,
    SrtFiles,
    clip_id::ClipId,
    library,
    server::{AppState, create_router},
};
use tower::util::ServiceExt;

const SRT: &str =
    "1\n00:00:10,000 --> 00:00:12,000\nHello there\nGeneral Kenobi\n";

fn setup_state(tmp: &tempfile::TempDir) -> Arc<AppState> {
    let library_dir = tmp.path().join("library");
    let render_dir = tmp.path().join("renders");
    std::fs::create_dir_all(&library_dir).unwrap();
    std::fs::create_dir_all(&render_dir).unwrap();
    std::fs::write(library_dir.join("ep.mp4"), b"").unwrap();
    std::fs::write(library_dir.join("ep.en.srt"), SRT).unwrap();

    let store = library::build_index(&library_dir, &SrtFiles).unwrap();
    // Any attempt to encode fails, so only cached clips can be served.
    let renderer =
        Renderer::new(render_dir).with_ffmpeg(tmp.path().join("no-ffmpeg"));
    Arc::new(AppState { store, renderer })
}

async fn get(
    state: &Arc<AppState>,
    uri: &str,
) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = create_router(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, content_type, body)
}

#[tokio::test]
async fn health() {
    let tmp = tempfile::tempdir().unwrap();
    let state = setup_state(&tmp);

    let (status, _, body) = get(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn search_returns_results_body() {
    let tmp = tempfile::tempdir().unwrap();
    let state = setup_state(&tmp);

    let (status, _, body) = get(&state, "/api/search?q=kenobi").await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["caption"]["text"][1], "General Kenobi");
    assert_eq!(results[0]["caption"]["start"], 10_000);
    assert_eq!(results[0]["caption"]["end"], 12_000);
    assert!(results[0]["confidence"].as_f64().unwrap() > 0.0);
    assert!(results[0]["episode_id"].is_string());
}

#[tokio::test]
async fn search_without_query_is_a_bad_request() {
    let tmp = tempfile::tempdir().unwrap();
    let state = setup_state(&tmp);

    let (status, _, _) = get(&state, "/api/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn render_serves_cached_gif() {
    let tmp = tempfile::tempdir().unwrap();
    let state = setup_state(&tmp);

    let hit = state.store.search("kenobi").unwrap().remove(0);
    let episode = state.store.episode(&hit.episode_id).unwrap();
    let id = ClipId::new(
        &episode.path,
        &hit.caption.text.join("\n"),
        hit.caption.start,
        hit.caption.end,
    );
    std::fs::write(state.renderer.output_path(&id), b"GIF89a-fake").unwrap();

    let uri = format!(
        "/api/render?episode_id={}&caption_id={}",
        hit.episode_id, hit.caption.id
    );
    let (status, content_type, body) = get(&state, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/gif"));
    assert_eq!(body, b"GIF89a-fake");
}

#[tokio::test]
async fn render_unknown_caption_is_not_found() {
    let tmp = tempfile::tempdir().unwrap();
    let state = setup_state(&tmp);

    let (status, _, _) =
        get(&state, "/api/render?episode_id=nope&caption_id=nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn render_failure_is_a_server_error() {
    let tmp = tempfile::tempdir().unwrap();
    let state = setup_state(&tmp);

    let hit = state.store.search("kenobi").unwrap().remove(0);
    let uri = format!(
        "/api/render?episode_id={}&caption_id={}&text=uncached",
        hit.episode_id, hit.caption.id
    );
    let (status, _, body) = get(&state, &uri).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("render error"));
}

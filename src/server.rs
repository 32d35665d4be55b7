//! HTTP delivery layer.
//!
//! Routes:
//! - `GET /api/search?q=...` shaped quote search results as JSON
//! - `GET /api/render?episode_id=...&caption_id=...` the caption as a GIF
//! - `GET /health`

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    error::Error,
    render::Renderer,
    search::{self, SearchResponse},
    store::Store,
};

/// Everything a request handler can reach. Built once, never mutated.
#[derive(Debug)]
pub struct AppState {
    pub store: Store,
    pub renderer: Renderer,
}

/// Error returned by handlers.
#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(serde_json::json!({ "error": message })))
            .into_response()
    }
}

impl From<Error> for HttpError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { .. } => HttpError::NotFound(err.to_string()),
            Error::Render(_) | Error::Subtitle { .. } => {
                tracing::warn!(error = %err, "request failed");
                HttpError::Internal(err.to_string())
            }
            _ => {
                tracing::error!(error = %err, "request failed");
                HttpError::Internal(err.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderParams {
    pub episode_id: String,
    pub caption_id: String,
    /// Burned-in text; defaults to the caption's lines.
    pub text: Option<String>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/search", get(quote_search))
        .route("/api/render", get(render_gif))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(
    addr: SocketAddr,
    state: Arc<AppState>,
) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn quote_search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, HttpError> {
    tracing::info!(query = %params.q, "handling search");

    let results = tokio::task::spawn_blocking(move || {
        search::execute_search(&state.store, &params.q)
    })
    .await
    .map_err(|e| HttpError::Internal(format!("search task failed: {e}")))??;

    Ok(Json(SearchResponse { results }))
}

async fn render_gif(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RenderParams>,
) -> Result<Response, HttpError> {
    let episode = state
        .store
        .episode_for_caption(&params.caption_id)
        .filter(|e| e.id == params.episode_id)
        .ok_or_else(|| {
            HttpError::NotFound(format!(
                "caption {} not found in episode {}",
                params.caption_id, params.episode_id
            ))
        })?;
    let caption = state.store.caption(&params.caption_id).ok_or_else(|| {
        HttpError::NotFound(format!("caption {} not found", params.caption_id))
    })?;

    let text = match params.text {
        Some(text) if !text.trim().is_empty() => text,
        Some(_) => {
            return Err(HttpError::BadRequest("text must not be blank".into()));
        }
        None => caption.text.join("\n"),
    };

    let path = state
        .renderer
        .render(&episode.path, &text, caption.start, caption.end)
        .await?;
    let body = tokio::fs::read(&path).await.map_err(Error::from)?;

    Ok(([(header::CONTENT_TYPE, "image/gif")], body).into_response())
}

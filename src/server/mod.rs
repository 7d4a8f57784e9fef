//! Read-only JSON API over the content repository

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::{ContentRepository, Post, SearchScope};
use crate::Folio;

/// Server state
struct ServerState {
    repository: ContentRepository,
}

type SharedState = Arc<ServerState>;

/// Query string of `/api/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    /// Also search post bodies
    #[serde(default)]
    pub full: bool,
}

/// Build the API router
pub fn router(repository: ContentRepository) -> Router {
    let state = Arc::new(ServerState { repository });

    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/categories", get(list_categories))
        .route("/api/categories/:category", get(posts_by_category))
        .route("/api/tags", get(list_tags))
        .route("/api/tags/:tag", get(posts_by_tag))
        .route("/api/search", get(search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let app = router(folio.repository());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Serving {:?} at http://{}:{}", folio.content_dir, ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run a repository query off the async runtime; it reads files synchronously
async fn query<T, F>(state: &SharedState, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&ContentRepository) -> T + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state.repository))
        .await
        .map_err(|e| {
            tracing::error!("Query task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn list_posts(State(state): State<SharedState>) -> Result<Json<Vec<Post>>, StatusCode> {
    query(&state, |repo| repo.all()).await.map(Json)
}

async fn get_post(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, StatusCode> {
    query(&state, move |repo| repo.by_slug(&slug))
        .await?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_categories(
    State(state): State<SharedState>,
) -> Result<Json<Vec<String>>, StatusCode> {
    query(&state, |repo| repo.categories()).await.map(Json)
}

async fn posts_by_category(
    State(state): State<SharedState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Post>>, StatusCode> {
    query(&state, move |repo| repo.by_category(&category))
        .await
        .map(Json)
}

async fn list_tags(State(state): State<SharedState>) -> Result<Json<Vec<String>>, StatusCode> {
    query(&state, |repo| repo.tags()).await.map(Json)
}

async fn posts_by_tag(
    State(state): State<SharedState>,
    Path(tag): Path<String>,
) -> Result<Json<Vec<Post>>, StatusCode> {
    query(&state, move |repo| repo.by_tag(&tag)).await.map(Json)
}

async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Post>>, StatusCode> {
    let Some(q) = params.q.filter(|q| !q.trim().is_empty()) else {
        return Ok(Json(Vec::new()));
    };
    let scope = if params.full {
        SearchScope::FullText
    } else {
        SearchScope::Metadata
    };
    query(&state, move |repo| repo.search_with(&q, scope))
        .await
        .map(Json)
}

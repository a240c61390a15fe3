//! Preview server
//!
//! Serves the vault over HTTP without a prior export: notes render on
//! demand through the shared render cache, attachments stream from the
//! vault directory, and the search/graph artifacts are built per request.
//! The vault sits behind a mutex — renders mutate the graph, and the
//! single-writer model requires one render at a time.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use bellows_core::{slugify, Vault};
use bellows_parser::VaultRenderer;
use parking_lot::Mutex;

use crate::error::{Result, SiteError};
use crate::{assets, graph, search, template};

/// Extensions streamed from the vault directory as-is.
const RESOURCE_EXTENSIONS: [&str; 7] = ["pdf", "png", "jpeg", "jpg", "gif", "svg", "webp"];

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

struct SiteState {
    vault: Mutex<Vault>,
    renderer: VaultRenderer,
}

/// Serve the vault until the process is stopped.
pub async fn serve(vault: Vault, renderer: VaultRenderer, config: &ServerConfig) -> Result<()> {
    let state = Arc::new(SiteState {
        vault: Mutex::new(vault),
        renderer,
    });

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| SiteError::Address(format!("{}:{} ({e})", config.host, config.port)))?;
    tracing::info!("serving vault on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: Arc<SiteState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/{*path}", get(page_handler))
        .with_state(state)
}

async fn index_handler(State(state): State<Arc<SiteState>>) -> Html<String> {
    let vault = state.vault.lock();
    Html(template::index_page(&vault))
}

async fn page_handler(
    State(state): State<Arc<SiteState>>,
    UrlPath(raw): UrlPath<String>,
) -> Response {
    let path = match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    };
    let path = path.trim_start_matches('/');

    if let Some(response) = embedded_asset(path) {
        return response;
    }

    match path {
        "graph.html" => {
            let vault = state.vault.lock();
            return Html(template::graph_page(&vault)).into_response();
        }
        "search.json" => {
            let mut vault = state.vault.lock();
            let index = search::build_index(&mut vault, &state.renderer);
            return json_response(&index);
        }
        "graph.json" => {
            // complete the backlink sets before reporting them
            let mut vault = state.vault.lock();
            let ids: Vec<_> = vault.ids().collect();
            for id in ids {
                state.renderer.render_note(&mut vault, id);
            }
            let graph = graph::build_graph(&vault);
            return json_response(&graph);
        }
        _ => {}
    }

    if let Some(slug) = path
        .strip_prefix("tags/")
        .map(|rest| rest.trim_end_matches("index.html").trim_end_matches('/'))
    {
        return tag_response(&state, slug);
    }

    if is_resource_path(path) {
        return resource_response(&state, path).await;
    }

    note_response(&state, path)
}

fn embedded_asset(path: &str) -> Option<Response> {
    let data = assets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(([(header::CONTENT_TYPE, mime.to_string())], data).into_response())
}

fn json_response<T: serde::Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (
            [(header::CONTENT_TYPE, "application/json".to_string())],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "artifact serialization failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn tag_response(state: &SiteState, slug: &str) -> Response {
    let vault = state.vault.lock();
    let tag = vault
        .tags()
        .keys()
        .find(|t| slugify(t.as_str()) == slug)
        .cloned();
    match tag {
        Some(tag) => Html(template::tag_page(&vault, &tag)).into_response(),
        None => not_found(),
    }
}

fn is_resource_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    RESOURCE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

/// Stream a vault attachment: the literal path first, then the attachment
/// directory by file name.
async fn resource_response(state: &SiteState, path: &str) -> Response {
    let (root, attachment_dir) = {
        let vault = state.vault.lock();
        (vault.root().to_path_buf(), vault.attachment_dir().to_string())
    };

    let mut candidates: Vec<PathBuf> = vec![root.join(path)];
    if let Some(name) = path.rsplit('/').next() {
        candidates.push(root.join(&attachment_dir).join(name));
    }

    for candidate in candidates {
        if let Ok(body) = tokio::fs::read(&candidate).await {
            let mime = mime_guess::from_path(&candidate).first_or_octet_stream();
            return ([(header::CONTENT_TYPE, mime.to_string())], body).into_response();
        }
    }
    not_found()
}

fn note_response(state: &SiteState, path: &str) -> Response {
    let note_path = path.strip_suffix(".html").unwrap_or(path);
    let mut vault = state.vault.lock();
    let Some(id) = vault.find_by_path(note_path) else {
        return not_found();
    };
    let html = state.renderer.render_note(&mut vault, id);
    Html(template::note_page(&vault, id, &html)).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

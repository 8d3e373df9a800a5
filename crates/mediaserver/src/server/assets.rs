use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::Response;
use std::path::Path;
use std::sync::Arc;

use media_index::media_content_type;

use crate::server::error::ApiError;
use crate::server::ServerState;

const INDEX_PAGE: &str = "index.html";

/// GET /
pub(crate) async fn index_page(
    State(state): State<Arc<ServerState>>,
) -> Result<Response<Body>, ApiError> {
    serve_static(&state.static_dir, INDEX_PAGE).await
}

/// Fallback for every unrouted path: a file from the static directory.
pub(crate) async fn static_asset(
    State(state): State<Arc<ServerState>>,
    uri: Uri,
) -> Result<Response<Body>, ApiError> {
    let raw = uri.path().trim_start_matches('/');
    let asset_path = urlencoding::decode(raw)
        .map_err(|_| ApiError::not_found("asset not found"))?;
    if asset_path.is_empty() {
        return serve_static(&state.static_dir, INDEX_PAGE).await;
    }
    serve_static(&state.static_dir, &asset_path).await
}

async fn serve_static(static_dir: &Path, asset_path: &str) -> Result<Response<Body>, ApiError> {
    let base_dir = tokio::fs::canonicalize(static_dir)
        .await
        .map_err(|_| ApiError::not_found("asset not found"))?;
    let resolved = tokio::fs::canonicalize(base_dir.join(asset_path))
        .await
        .map_err(|_| ApiError::not_found("asset not found"))?;

    // Path traversal guard
    if !resolved.starts_with(&base_dir) {
        return Err(ApiError::forbidden("path traversal denied"));
    }

    let bytes = tokio::fs::read(&resolved)
        .await
        .map_err(|_| ApiError::not_found("asset not found"))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&resolved))
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(e.to_string()))
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "html" => "text/html; charset=utf-8",
        "json" => "application/json",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        _ => media_content_type(path).unwrap_or("application/octet-stream"),
    }
}

//! Media API endpoints. All of them run behind `require_auth`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, RawQuery, Request, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use media_index::{EntryPatch, MediaEntry, MediaFilter};

use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[utoipa::path(
    get,
    path = "/api/media",
    tag = "media",
    responses(
        (status = 200, description = "Full index keyed by relative path", body = HashMap<String, MediaEntry>),
        (status = 401, body = ApiErrorResponse),
    )
)]
pub(crate) async fn list_media(
    State(state): State<Arc<ServerState>>,
) -> Json<HashMap<String, MediaEntry>> {
    let index = state.index.read().await;
    Json(index.list_all().clone())
}

#[utoipa::path(
    get,
    path = "/api/media/filtered",
    tag = "media",
    params(
        ("rating" = Option<Vec<String>>, Query, description = "Accepted ratings; repeatable"),
        ("nickname" = Option<Vec<String>>, Query, description = "Accepted nicknames; repeatable"),
        ("category" = Option<Vec<String>>, Query, description = "Accepted categories; repeatable"),
        ("type" = Option<Vec<String>>, Query, description = "Accepted types (image, video); repeatable"),
    ),
    responses(
        (status = 200, description = "Matching relative paths in random order", body = [String]),
        (status = 400, body = ApiErrorResponse),
        (status = 401, body = ApiErrorResponse),
    )
)]
pub(crate) async fn filtered_media(
    State(state): State<Arc<ServerState>>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<String>>, ApiError> {
    let pairs = parse_query_pairs(query.as_deref().unwrap_or_default())?;
    let filter = MediaFilter::from_query_pairs(pairs);
    let index = state.index.read().await;
    Ok(Json(index.filter(&filter)))
}

#[utoipa::path(
    get,
    path = "/api/media/{path}",
    tag = "media",
    params(("path" = String, Path, description = "File path relative to the media root")),
    responses(
        (status = 200, description = "Raw file contents"),
        (status = 401, body = ApiErrorResponse),
        (status = 403, body = ApiErrorResponse),
        (status = 404, body = ApiErrorResponse),
    )
)]
pub(crate) async fn serve_media(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let resolved = run_blocking(move || state.index.blocking_read().resolve_file(&path)).await??;

    let response = match ServeFile::new(resolved).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    Ok(response.into_response())
}

#[utoipa::path(
    patch,
    path = "/api/media/{path}",
    tag = "media",
    params(("path" = String, Path, description = "Index key of the entry")),
    request_body = EntryPatch,
    responses(
        (status = 200, description = "Updated entry", body = MediaEntry),
        (status = 400, body = ApiErrorResponse),
        (status = 401, body = ApiErrorResponse),
        (status = 404, body = ApiErrorResponse),
    ),
    description = "Set the rating and/or category of an indexed file. The index file is rewritten before responding."
)]
#[tracing::instrument(skip_all)]
pub(crate) async fn update_media(
    State(state): State<Arc<ServerState>>,
    Path(path): Path<String>,
    Json(patch): Json<EntryPatch>,
) -> Result<Json<MediaEntry>, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::bad_request("nothing to update"));
    }

    let entry = run_blocking({
        let path = path.clone();
        move || state.index.blocking_write().update_entry(&path, &patch)
    })
    .await??;
    tracing::info!(path = %path, rating = entry.rating, category = %entry.category, "media entry updated");
    Ok(Json(entry))
}

/// Runs index filesystem work on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|error| {
        tracing::error!("media index task failed: {error}");
        ApiError::internal("media index task failed")
    })
}

/// Splits a raw query string into decoded key/value pairs, keeping repeats.
fn parse_query_pairs(query: &str) -> Result<Vec<(String, String)>, ApiError> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode_component(key)?, decode_component(value)?))
        })
        .collect()
}

fn decode_component(raw: &str) -> Result<String, ApiError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ApiError::bad_request("query string is not valid UTF-8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_keep_repeats_and_decode() {
        let pairs = parse_query_pairs("rating=1&rating=2&nickname=New+York&category=a%26b&type")
            .expect("parse");
        assert_eq!(
            pairs,
            vec![
                ("rating".to_string(), "1".to_string()),
                ("rating".to_string(), "2".to_string()),
                ("nickname".to_string(), "New York".to_string()),
                ("category".to_string(), "a&b".to_string()),
                ("type".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn empty_query_has_no_pairs() {
        assert!(parse_query_pairs("").expect("parse").is_empty());
        assert!(parse_query_pairs("&&").expect("parse").is_empty());
    }

    #[test]
    fn invalid_utf8_is_a_bad_request() {
        let err = parse_query_pairs("nickname=%FF").expect_err("invalid");
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}

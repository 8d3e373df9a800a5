use axum::Json;
use utoipa::OpenApi;

use media_index::{EntryPatch, MediaEntry, MediaType};

use crate::server::auth::{AuthRequest, AuthResponse};
use crate::server::error::{ApiErrorBody, ApiErrorResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Media Server API",
        version = "0.1.0",
        description = "Personal media index and file server"
    ),
    paths(
        crate::server::auth::login,
        crate::server::auth::logout,
        crate::server::media::list_media,
        crate::server::media::filtered_media,
        crate::server::media::serve_media,
        crate::server::media::update_media,
    ),
    components(schemas(
        // Error
        ApiErrorResponse,
        ApiErrorBody,
        // Auth
        AuthRequest,
        AuthResponse,
        // Media
        MediaEntry,
        MediaType,
        EntryPatch,
    ))
)]
pub struct ApiDoc;

/// GET /openapi.json
pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

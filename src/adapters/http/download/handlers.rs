//! HTTP handlers for download endpoints.

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::download::{GetLibraryQuery, RecordDownloadCommand};
use crate::domain::download::{DownloadError, ResourceType};
use crate::domain::foundation::ContentId;

use super::dto::{DownloadResponse, LibraryResponse};

/// POST /api/content/:id/downloads/:resource_type - Authorise and count a download
pub async fn record_download(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((content_id, resource_type)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;
    let content_id = ContentId::new(content_id).map_err(DownloadError::from)?;
    let resource_type = ResourceType::new(&resource_type).map_err(DownloadError::from)?;

    let resource = state
        .record_download_handler()
        .handle(RecordDownloadCommand {
            uid: account.id,
            content_id,
            resource_type,
            now: state.now(),
        })
        .await?;

    Ok(Json(DownloadResponse::from(resource)))
}

/// GET /api/library - Contents the caller has downloaded
pub async fn get_library(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.current_account(&user).await?;

    let entries = state
        .get_library_handler()
        .handle(GetLibraryQuery { uid: account.id })
        .await?;

    Ok(Json(LibraryResponse { entries }))
}

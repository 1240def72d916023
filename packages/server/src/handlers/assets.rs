use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::storage::ContentHash;
use sea_orm::*;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::entity::{blob_ref, challenge_phase};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::state::AppState;
use crate::utils::filename::content_disposition_value;
use crate::utils::teams::is_challenge_host;

use super::challenge::find_challenge;

#[utoipa::path(
    get,
    path = "/{path}",
    tag = "Assets",
    operation_id = "downloadChallengeAsset",
    summary = "Download a challenge asset",
    description = "Streams a challenge asset blob. `path` is `image` (any authenticated \
        user) or `evaluation_script` (hosts only). Supports ETag caching via If-None-Match.",
    params(
        ("pk" = i32, Path, description = "Challenge ID"),
        ("path" = String, Path, description = "Asset slot: image or evaluation_script"),
    ),
    responses(
        (status = 200, description = "Asset content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a host (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Asset not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, headers), fields(pk, path = %path))]
pub async fn download_challenge_asset(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((pk, path)): Path<(i32, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if path != "image" && path != "evaluation_script" {
        return Err(AppError::NotFound("Asset not found".into()));
    }

    let challenge_model = find_challenge(&state.db, pk).await?;
    if path == "evaluation_script"
        && !is_challenge_host(&state.db, auth_user.user_id, &challenge_model).await?
    {
        return Err(AppError::PermissionDenied);
    }

    let blob_ref_model = find_blob_ref(&state.db, "challenge", pk, &path).await?;
    build_blob_response(&blob_ref_model, &headers, &*state.blob_store).await
}

#[utoipa::path(
    get,
    path = "/{phase_pk}/annotation",
    tag = "Assets",
    operation_id = "downloadPhaseAnnotation",
    summary = "Download a phase's test annotation file",
    description = "Streams the annotation blob attached to a challenge phase. Hosts only. \
        Supports ETag caching via If-None-Match.",
    params(
        ("pk" = i32, Path, description = "Challenge ID"),
        ("phase_pk" = i32, Path, description = "Phase ID"),
    ),
    responses(
        (status = 200, description = "Annotation content"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a host (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Annotation not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, headers), fields(pk, phase_pk))]
pub async fn download_phase_annotation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((pk, phase_pk)): Path<(i32, i32)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let challenge_model = find_challenge(&state.db, pk).await?;
    if !is_challenge_host(&state.db, auth_user.user_id, &challenge_model).await? {
        return Err(AppError::PermissionDenied);
    }

    let phase = challenge_phase::Entity::find_by_id(phase_pk)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge phase not found".into()))?;
    if phase.challenge_id != pk {
        return Err(AppError::NotFound("Challenge phase not found".into()));
    }

    let blob_ref_model =
        find_blob_ref(&state.db, "challenge_phase", phase_pk, "test_annotation").await?;
    build_blob_response(&blob_ref_model, &headers, &*state.blob_store).await
}

async fn find_blob_ref<C: ConnectionTrait>(
    db: &C,
    owner_type: &str,
    owner_id: i32,
    path: &str,
) -> Result<blob_ref::Model, AppError> {
    blob_ref::Entity::find()
        .filter(blob_ref::Column::OwnerType.eq(owner_type))
        .filter(blob_ref::Column::OwnerId.eq(owner_id.to_string()))
        .filter(blob_ref::Column::Path.eq(path))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Asset not found".into()))
}

/// Build a streaming blob response from a `blob_ref::Model`.
async fn build_blob_response(
    blob_ref_model: &blob_ref::Model,
    headers: &HeaderMap,
    blob_store: &dyn common::storage::BlobStore,
) -> Result<Response, AppError> {
    let etag_value = format!("\"{}\"", blob_ref_model.content_hash);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let hash = ContentHash::from_hex(&blob_ref_model.content_hash)?;
    let reader = blob_store.get_stream(&hash).await?;
    let stream = ReaderStream::new(reader);
    let body = Body::from_stream(stream);

    let content_type = blob_ref_model
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, blob_ref_model.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&blob_ref_model.filename),
        )
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

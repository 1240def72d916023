use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::import::import_challenge;
use crate::models::challenge::ChallengeResponse;
use crate::models::import::{ImportChallengeRequest, validate_import_challenge};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/import",
    tag = "Import",
    operation_id = "importChallenge",
    summary = "Create a challenge from a zip archive",
    description = "Downloads the archive, extracts it, parses the YAML manifest and creates \
        the challenge with its leaderboards, phases, dataset splits, phase-splits and assets \
        in a single transaction. The caller must have created exactly one host team. All \
        failures after the precondition check return one generic payload; the specific cause \
        is logged server-side.",
    request_body = ImportChallengeRequest,
    responses(
        (status = 201, description = "Challenge created", body = ChallengeResponse),
        (status = 400, description = "Import failed (IMPORT_FAILED, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, archive_url = %payload.archive_url))]
pub async fn import_challenge_handler(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ImportChallengeRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_import_challenge(&payload)?;

    let model = import_challenge(
        &state.db,
        &*state.blob_store,
        &state.config.import,
        payload.archive_url.trim(),
        auth_user.user_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ChallengeResponse::from(model))))
}

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{blob_ref, challenge, challenge_phase, challenge_phase_split};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::extractors::json::AppJson;
use crate::models::phase::*;
use crate::state::AppState;
use crate::utils::teams::is_challenge_host;

use super::challenge::find_challenge;

#[utoipa::path(
    post,
    path = "/",
    tag = "Challenge Phases",
    operation_id = "createPhase",
    summary = "Create a phase for a challenge",
    description = "Appends a phase to the challenge. Only members of the creator host team \
        may create phases. The phase position is assigned by insertion order.",
    params(("pk" = i32, Path, description = "Challenge ID")),
    request_body = CreatePhaseRequest,
    responses(
        (status = 201, description = "Phase created", body = PhaseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a host (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(pk, name = %payload.name))]
pub async fn create_phase(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(pk): Path<i32>,
    AppJson(payload): AppJson<CreatePhaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_phase(&payload)?;

    let txn = state.db.begin().await?;
    let challenge_model = find_challenge(&txn, pk).await?;
    if !is_challenge_host(&txn, auth_user.user_id, &challenge_model).await? {
        return Err(AppError::PermissionDenied);
    }

    let position = next_phase_position(&txn, pk).await?;
    let now = chrono::Utc::now();

    let model = challenge_phase::ActiveModel {
        challenge_id: Set(pk),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        is_public: Set(payload.is_public),
        position: Set(position),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(PhaseResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Challenge Phases",
    operation_id = "listPhases",
    summary = "List phases of a challenge",
    description = "Public endpoint. Anonymous callers and non-hosts only see public phases; \
        members of the creator host team see every phase.",
    params(("pk" = i32, Path, description = "Challenge ID")),
    responses(
        (status = 200, description = "Phases in position order", body = Vec<PhaseResponse>),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, maybe_user), fields(pk))]
pub async fn list_phases(
    maybe_user: MaybeAuthUser,
    State(state): State<AppState>,
    Path(pk): Path<i32>,
) -> Result<Json<Vec<PhaseResponse>>, AppError> {
    let challenge_model = find_challenge(&state.db, pk).await?;
    let host = is_maybe_host(&state.db, &maybe_user, &challenge_model).await?;

    let mut select = challenge_phase::Entity::find()
        .filter(challenge_phase::Column::ChallengeId.eq(pk));
    if !host {
        select = select.filter(challenge_phase::Column::IsPublic.eq(true));
    }

    let phases = select
        .order_by_asc(challenge_phase::Column::Position)
        .all(&state.db)
        .await?;

    Ok(Json(phases.into_iter().map(PhaseResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/{phase_pk}",
    tag = "Challenge Phases",
    operation_id = "getPhase",
    summary = "Get a phase by ID",
    description = "Public endpoint. Non-public phases are only visible to the challenge hosts \
        and return 404 for everyone else.",
    params(
        ("pk" = i32, Path, description = "Challenge ID"),
        ("phase_pk" = i32, Path, description = "Phase ID"),
    ),
    responses(
        (status = 200, description = "Phase details", body = PhaseResponse),
        (status = 404, description = "Phase not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, maybe_user), fields(pk, phase_pk))]
pub async fn get_phase(
    maybe_user: MaybeAuthUser,
    State(state): State<AppState>,
    Path((pk, phase_pk)): Path<(i32, i32)>,
) -> Result<Json<PhaseResponse>, AppError> {
    let challenge_model = find_challenge(&state.db, pk).await?;
    let phase = find_phase(&state.db, pk, phase_pk).await?;

    if !phase.is_public && !is_maybe_host(&state.db, &maybe_user, &challenge_model).await? {
        return Err(AppError::NotFound("Challenge phase not found".into()));
    }

    Ok(Json(phase.into()))
}

#[utoipa::path(
    patch,
    path = "/{phase_pk}",
    tag = "Challenge Phases",
    operation_id = "updatePhase",
    summary = "Partially update a phase",
    description = "Updates a phase using PATCH semantics. An empty payload returns the current \
        resource unchanged. Only members of the creator host team may update.",
    params(
        ("pk" = i32, Path, description = "Challenge ID"),
        ("phase_pk" = i32, Path, description = "Phase ID"),
    ),
    request_body = UpdatePhaseRequest,
    responses(
        (status = 200, description = "Phase updated", body = PhaseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a host (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Phase not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(pk, phase_pk))]
pub async fn update_phase(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((pk, phase_pk)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdatePhaseRequest>,
) -> Result<Json<PhaseResponse>, AppError> {
    validate_update_phase(&payload)?;

    if payload == UpdatePhaseRequest::default() {
        let challenge_model = find_challenge(&state.db, pk).await?;
        if !is_challenge_host(&state.db, auth_user.user_id, &challenge_model).await? {
            return Err(AppError::PermissionDenied);
        }
        let existing = find_phase(&state.db, pk, phase_pk).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let challenge_model = find_challenge(&txn, pk).await?;
    if !is_challenge_host(&txn, auth_user.user_id, &challenge_model).await? {
        return Err(AppError::PermissionDenied);
    }
    let existing = find_phase(&txn, pk, phase_pk).await?;

    let effective_start = payload.start_date.unwrap_or(existing.start_date);
    let effective_end = payload.end_date.unwrap_or(existing.end_date);
    if effective_end <= effective_start {
        return Err(AppError::Validation(
            "end_date must be after start_date".into(),
        ));
    }

    let mut active: challenge_phase::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(is_public) = payload.is_public {
        active.is_public = Set(is_public);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{phase_pk}",
    tag = "Challenge Phases",
    operation_id = "deletePhase",
    summary = "Delete a phase",
    description = "Deletes the phase together with its phase-splits and annotation reference. \
        Only members of the creator host team may delete.",
    params(
        ("pk" = i32, Path, description = "Challenge ID"),
        ("phase_pk" = i32, Path, description = "Phase ID"),
    ),
    responses(
        (status = 204, description = "Phase deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a host (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Phase not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(pk, phase_pk))]
pub async fn delete_phase(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((pk, phase_pk)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let challenge_model = find_challenge(&txn, pk).await?;
    if !is_challenge_host(&txn, auth_user.user_id, &challenge_model).await? {
        return Err(AppError::PermissionDenied);
    }
    let phase = find_phase(&txn, pk, phase_pk).await?;

    challenge_phase_split::Entity::delete_many()
        .filter(challenge_phase_split::Column::ChallengePhaseId.eq(phase.id))
        .exec(&txn)
        .await?;
    blob_ref::Entity::delete_many()
        .filter(blob_ref::Column::OwnerType.eq("challenge_phase"))
        .filter(blob_ref::Column::OwnerId.eq(phase.id.to_string()))
        .exec(&txn)
        .await?;

    let active: challenge_phase::ActiveModel = phase.into();
    active.delete(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Phase Splits",
    operation_id = "listPhaseSplits",
    summary = "List phase-splits of a challenge",
    description = "Public endpoint. Anonymous callers and non-hosts only see publicly visible \
        phase-splits; members of the creator host team see every split.",
    params(("pk" = i32, Path, description = "Challenge ID")),
    responses(
        (status = 200, description = "Phase-splits of the challenge", body = Vec<PhaseSplitResponse>),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, maybe_user), fields(pk))]
pub async fn list_phase_splits(
    maybe_user: MaybeAuthUser,
    State(state): State<AppState>,
    Path(pk): Path<i32>,
) -> Result<Json<Vec<PhaseSplitResponse>>, AppError> {
    let challenge_model = find_challenge(&state.db, pk).await?;
    let host = is_maybe_host(&state.db, &maybe_user, &challenge_model).await?;

    let phase_ids: Vec<i32> = challenge_phase::Entity::find()
        .filter(challenge_phase::Column::ChallengeId.eq(pk))
        .select_only()
        .column(challenge_phase::Column::Id)
        .into_tuple::<i32>()
        .all(&state.db)
        .await?;

    if phase_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let mut select = challenge_phase_split::Entity::find()
        .filter(challenge_phase_split::Column::ChallengePhaseId.is_in(phase_ids));
    if !host {
        select = select.filter(
            challenge_phase_split::Column::Visibility
                .eq(crate::entity::challenge_phase_split::VISIBILITY_PUBLIC),
        );
    }

    let splits = select
        .order_by_asc(challenge_phase_split::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(
        splits.into_iter().map(PhaseSplitResponse::from).collect(),
    ))
}

async fn is_maybe_host<C: ConnectionTrait>(
    db: &C,
    maybe_user: &MaybeAuthUser,
    challenge_model: &challenge::Model,
) -> Result<bool, AppError> {
    match &maybe_user.0 {
        Some(user) => is_challenge_host(db, user.user_id, challenge_model).await,
        None => Ok(false),
    }
}

async fn find_phase<C: ConnectionTrait>(
    db: &C,
    challenge_id: i32,
    phase_id: i32,
) -> Result<challenge_phase::Model, AppError> {
    let phase = challenge_phase::Entity::find_by_id(phase_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge phase not found".into()))?;
    if phase.challenge_id != challenge_id {
        return Err(AppError::NotFound("Challenge phase not found".into()));
    }
    Ok(phase)
}

async fn next_phase_position<C: ConnectionTrait>(
    db: &C,
    challenge_id: i32,
) -> Result<i32, AppError> {
    let max_pos: Option<i32> = challenge_phase::Entity::find()
        .filter(challenge_phase::Column::ChallengeId.eq(challenge_id))
        .select_only()
        .column_as(challenge_phase::Column::Position.max(), "max_pos")
        .into_tuple::<Option<i32>>()
        .one(db)
        .await?
        .flatten();
    max_pos
        .unwrap_or(-1)
        .checked_add(1)
        .ok_or_else(|| AppError::Validation("Position overflow".into()))
}

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{
    blob_ref, challenge, challenge_participant_team, challenge_phase, challenge_phase_split,
};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::challenge::*;
use crate::models::shared::Pagination;
use crate::state::AppState;
use crate::utils::teams::{
    challenge_host_user_ids, find_participant_team, is_challenge_host, is_host_team_member,
    is_participant_team_member, participant_team_ids_of_users, participant_team_user_ids,
};

#[utoipa::path(
    post,
    path = "/",
    tag = "Challenges",
    operation_id = "createChallenge",
    summary = "Create a challenge under a host team",
    description = "Creates a challenge owned by the host team. The caller must be a team member.",
    params(("team_pk" = i32, Path, description = "Host team ID")),
    request_body = CreateChallengeRequest,
    responses(
        (status = 201, description = "Challenge created", body = ChallengeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a team member (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(team_pk, title = %payload.title))]
pub async fn create_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(team_pk): Path<i32>,
    AppJson(payload): AppJson<CreateChallengeRequest>,
) -> Result<impl IntoResponse, AppError> {
    require_host_team_member(&state.db, &auth_user, team_pk).await?;
    validate_create_challenge(&payload)?;

    let now = chrono::Utc::now();
    let new_challenge = challenge::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        terms_and_conditions: Set(payload.terms_and_conditions),
        submission_guidelines: Set(payload.submission_guidelines),
        start_date: Set(payload.start_date),
        end_date: Set(payload.end_date),
        creator_team_id: Set(team_pk),
        published: Set(payload.published),
        is_disabled: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_challenge.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(ChallengeResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Challenges",
    operation_id = "listTeamChallenges",
    summary = "List challenges created by a host team",
    params(
        ("team_pk" = i32, Path, description = "Host team ID"),
        ChallengeListQuery,
    ),
    responses(
        (status = 200, description = "Challenges owned by the team", body = ChallengeListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a team member (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(team_pk))]
pub async fn list_team_challenges(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(team_pk): Path<i32>,
    Query(query): Query<ChallengeListQuery>,
) -> Result<Json<ChallengeListResponse>, AppError> {
    require_host_team_member(&state.db, &auth_user, team_pk).await?;

    let select = challenge::Entity::find()
        .filter(challenge::Column::CreatorTeamId.eq(team_pk))
        .order_by_desc(challenge::Column::CreatedAt);

    paginate_challenges(&state.db, select, &query).await
}

#[utoipa::path(
    get,
    path = "/{pk}",
    tag = "Challenges",
    operation_id = "getTeamChallenge",
    summary = "Get a challenge owned by a host team",
    params(
        ("team_pk" = i32, Path, description = "Host team ID"),
        ("pk" = i32, Path, description = "Challenge ID"),
    ),
    responses(
        (status = 200, description = "Challenge details", body = ChallengeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a team member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(team_pk, pk))]
pub async fn get_team_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((team_pk, pk)): Path<(i32, i32)>,
) -> Result<Json<ChallengeResponse>, AppError> {
    require_host_team_member(&state.db, &auth_user, team_pk).await?;

    let model = find_team_challenge(&state.db, team_pk, pk).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    patch,
    path = "/{pk}",
    tag = "Challenges",
    operation_id = "updateChallenge",
    summary = "Partially update a challenge",
    description = "Updates a challenge using PATCH semantics. An empty payload returns the \
        current resource unchanged. Cross-field validation keeps end_date after start_date \
        even when updating only one of the two.",
    params(
        ("team_pk" = i32, Path, description = "Host team ID"),
        ("pk" = i32, Path, description = "Challenge ID"),
    ),
    request_body = UpdateChallengeRequest,
    responses(
        (status = 200, description = "Challenge updated", body = ChallengeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a team member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(team_pk, pk))]
pub async fn update_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((team_pk, pk)): Path<(i32, i32)>,
    AppJson(payload): AppJson<UpdateChallengeRequest>,
) -> Result<Json<ChallengeResponse>, AppError> {
    require_host_team_member(&state.db, &auth_user, team_pk).await?;
    validate_update_challenge(&payload)?;

    if payload == UpdateChallengeRequest::default() {
        let existing = find_team_challenge(&state.db, team_pk, pk).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;
    let existing = find_challenge_for_update(&txn, pk).await?;
    if existing.creator_team_id != team_pk {
        return Err(AppError::NotFound("Challenge not found".into()));
    }

    // Cross-field date validation against existing values
    let effective_start = payload.start_date.unwrap_or(existing.start_date);
    let effective_end = payload.end_date.unwrap_or(existing.end_date);
    if effective_end <= effective_start {
        return Err(AppError::Validation(
            "end_date must be after start_date".into(),
        ));
    }

    let mut active: challenge::ActiveModel = existing.into();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(terms) = payload.terms_and_conditions {
        active.terms_and_conditions = Set(terms);
    }
    if let Some(guidelines) = payload.submission_guidelines {
        active.submission_guidelines = Set(guidelines);
    }
    if let Some(start_date) = payload.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = payload.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(published) = payload.published {
        active.published = Set(published);
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{pk}",
    tag = "Challenges",
    operation_id = "deleteChallenge",
    summary = "Delete a challenge",
    description = "Permanently deletes a challenge with its phases, phase-splits, participant \
        registrations and asset references. Stored blobs are preserved for GC.",
    params(
        ("team_pk" = i32, Path, description = "Host team ID"),
        ("pk" = i32, Path, description = "Challenge ID"),
    ),
    responses(
        (status = 204, description = "Challenge deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a team member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(team_pk, pk))]
pub async fn delete_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((team_pk, pk)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    require_host_team_member(&state.db, &auth_user, team_pk).await?;

    let txn = state.db.begin().await?;
    let existing = find_challenge_for_update(&txn, pk).await?;
    if existing.creator_team_id != team_pk {
        return Err(AppError::NotFound("Challenge not found".into()));
    }

    let phase_ids: Vec<i32> = challenge_phase::Entity::find()
        .filter(challenge_phase::Column::ChallengeId.eq(pk))
        .select_only()
        .column(challenge_phase::Column::Id)
        .into_tuple::<i32>()
        .all(&txn)
        .await?;

    if !phase_ids.is_empty() {
        challenge_phase_split::Entity::delete_many()
            .filter(challenge_phase_split::Column::ChallengePhaseId.is_in(phase_ids.clone()))
            .exec(&txn)
            .await?;
        blob_ref::Entity::delete_many()
            .filter(blob_ref::Column::OwnerType.eq("challenge_phase"))
            .filter(
                blob_ref::Column::OwnerId
                    .is_in(phase_ids.iter().map(|id| id.to_string()).collect::<Vec<_>>()),
            )
            .exec(&txn)
            .await?;
    }

    challenge_phase::Entity::delete_many()
        .filter(challenge_phase::Column::ChallengeId.eq(pk))
        .exec(&txn)
        .await?;
    challenge_participant_team::Entity::delete_many()
        .filter(challenge_participant_team::Column::ChallengeId.eq(pk))
        .exec(&txn)
        .await?;
    blob_ref::Entity::delete_many()
        .filter(blob_ref::Column::OwnerType.eq("challenge"))
        .filter(blob_ref::Column::OwnerId.eq(pk.to_string()))
        .exec(&txn)
        .await?;
    challenge::Entity::delete_by_id(pk).exec(&txn).await?;

    txn.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{pk}/disable",
    tag = "Challenges",
    operation_id = "disableChallenge",
    summary = "Disable a challenge",
    description = "Marks the challenge as disabled, hiding it from public listings. \
        Only members of the creator host team may disable.",
    params(("pk" = i32, Path, description = "Challenge ID")),
    responses(
        (status = 204, description = "Challenge disabled"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a host (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(pk))]
pub async fn disable_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(pk): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;
    let existing = find_challenge_for_update(&txn, pk).await?;

    if !is_challenge_host(&txn, auth_user.user_id, &existing).await? {
        return Err(AppError::PermissionDenied);
    }

    let mut active: challenge::ActiveModel = existing.into();
    active.is_disabled = Set(true);
    active.updated_at = Set(chrono::Utc::now());
    active.update(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{pk}",
    tag = "Challenges",
    operation_id = "getChallenge",
    summary = "Get a challenge by ID",
    description = "Public single-challenge lookup. Disabled challenges return 404.",
    params(("pk" = i32, Path, description = "Challenge ID")),
    responses(
        (status = 200, description = "Challenge details", body = ChallengeResponse),
        (status = 404, description = "Challenge not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(pk))]
pub async fn get_challenge(
    State(state): State<AppState>,
    Path(pk): Path<i32>,
) -> Result<Json<ChallengeResponse>, AppError> {
    let model = find_challenge(&state.db, pk).await?;
    if model.is_disabled {
        return Err(AppError::NotFound("Challenge not found".into()));
    }
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/time/{challenge_time}",
    tag = "Challenges",
    operation_id = "listChallengesByTime",
    summary = "List published challenges filtered by time window",
    description = "Public listing of published, non-disabled challenges. `challenge_time` is \
        one of `all`, `past`, `present` or `future`; any other value is rejected.",
    params(
        ("challenge_time" = String, Path, description = "Time filter: all, past, present or future"),
        ChallengeListQuery,
    ),
    responses(
        (status = 200, description = "Matching challenges", body = ChallengeListResponse),
        (status = 400, description = "Unknown time filter (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(challenge_time = %challenge_time))]
pub async fn list_challenges_by_time(
    State(state): State<AppState>,
    Path(challenge_time): Path<String>,
    Query(query): Query<ChallengeListQuery>,
) -> Result<Json<ChallengeListResponse>, AppError> {
    let now = chrono::Utc::now();

    let mut select = challenge::Entity::find()
        .filter(challenge::Column::Published.eq(true))
        .filter(challenge::Column::IsDisabled.eq(false));

    select = match challenge_time.as_str() {
        "all" => select,
        "past" => select.filter(challenge::Column::EndDate.lt(now)),
        "present" => select
            .filter(challenge::Column::StartDate.lte(now))
            .filter(challenge::Column::EndDate.gte(now)),
        "future" => select.filter(challenge::Column::StartDate.gt(now)),
        _ => {
            return Err(AppError::Validation(
                "challenge_time must be one of: all, past, present, future".into(),
            ));
        }
    };

    let select = select.order_by_desc(challenge::Column::CreatedAt);
    paginate_challenges(&state.db, select, &query).await
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Challenges",
    operation_id = "listChallengesByTeam",
    summary = "List challenges filtered by team membership",
    description = "Returns challenges filtered by exactly one of: `participant_team` (joined by \
        that team), `host_team` (created by that team), or `mode` (`host` for challenges of all \
        the caller's host teams, `participant` for all joined challenges).",
    params(TeamChallengeQuery),
    responses(
        (status = 200, description = "Matching challenges", body = Vec<ChallengeResponse>),
        (status = 400, description = "Invalid filter combination (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a team member (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_challenges_by_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TeamChallengeQuery>,
) -> Result<Json<Vec<ChallengeResponse>>, AppError> {
    let filters_given = [
        query.participant_team.is_some(),
        query.host_team.is_some(),
        query.mode.is_some(),
    ]
    .iter()
    .filter(|set| **set)
    .count();
    if filters_given != 1 {
        return Err(AppError::Validation(
            "Exactly one of participant_team, host_team or mode must be given".into(),
        ));
    }

    let challenges = if let Some(team_id) = query.participant_team {
        if !is_participant_team_member(&state.db, auth_user.user_id, team_id).await? {
            return Err(AppError::PermissionDenied);
        }
        challenges_of_participant_teams(&state.db, vec![team_id]).await?
    } else if let Some(team_id) = query.host_team {
        if !is_host_team_member(&state.db, auth_user.user_id, team_id).await? {
            return Err(AppError::PermissionDenied);
        }
        challenge::Entity::find()
            .filter(challenge::Column::CreatorTeamId.eq(team_id))
            .order_by_desc(challenge::Column::CreatedAt)
            .all(&state.db)
            .await?
    } else {
        match query.mode.as_deref() {
            Some("host") => {
                let team_ids: Vec<i32> = crate::entity::host_team_member::Entity::find()
                    .filter(
                        crate::entity::host_team_member::Column::UserId.eq(auth_user.user_id),
                    )
                    .select_only()
                    .column(crate::entity::host_team_member::Column::TeamId)
                    .into_tuple::<i32>()
                    .all(&state.db)
                    .await?;
                challenge::Entity::find()
                    .filter(challenge::Column::CreatorTeamId.is_in(team_ids))
                    .order_by_desc(challenge::Column::CreatedAt)
                    .all(&state.db)
                    .await?
            }
            Some("participant") => {
                let team_ids =
                    participant_team_ids_of_users(&state.db, &[auth_user.user_id]).await?;
                challenges_of_participant_teams(&state.db, team_ids).await?
            }
            _ => {
                return Err(AppError::Validation(
                    "mode must be 'host' or 'participant'".into(),
                ));
            }
        }
    };

    Ok(Json(
        challenges.into_iter().map(ChallengeResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/{pk}/participant-teams/{team_pk}",
    tag = "Challenges",
    operation_id = "joinChallenge",
    summary = "Register a participant team for a challenge",
    description = "Joins a challenge with a participant team. Rejected when a team member \
        belongs to the hosting team, or when a member already participates via another team. \
        Re-joining with the same team is a no-op.",
    params(
        ("pk" = i32, Path, description = "Challenge ID"),
        ("team_pk" = i32, Path, description = "Participant team ID"),
    ),
    responses(
        (status = 200, description = "Team already registered"),
        (status = 201, description = "Team registered"),
        (status = 400, description = "Host overlap (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a team member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Challenge or team not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Member participates via another team (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(pk, team_pk))]
pub async fn join_challenge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((pk, team_pk)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let challenge_model = find_challenge_for_update(&txn, pk).await?;
    if challenge_model.is_disabled || !challenge_model.published {
        return Err(AppError::NotFound("Challenge not found".into()));
    }

    find_participant_team(&txn, team_pk).await?;
    if !is_participant_team_member(&txn, auth_user.user_id, team_pk).await? {
        return Err(AppError::PermissionDenied);
    }

    if challenge_participant_team::Entity::find_by_id((pk, team_pk))
        .one(&txn)
        .await?
        .is_some()
    {
        return Ok(StatusCode::OK);
    }

    let team_members = participant_team_user_ids(&txn, team_pk).await?;
    let host_members = challenge_host_user_ids(&txn, &challenge_model).await?;
    if team_members.iter().any(|id| host_members.contains(id)) {
        return Err(AppError::Validation(
            "You cannot participate in your own challenge".into(),
        ));
    }

    // Members must not already participate via another team.
    let member_team_ids = participant_team_ids_of_users(&txn, &team_members).await?;
    let other_team_ids: Vec<i32> = member_team_ids
        .into_iter()
        .filter(|id| *id != team_pk)
        .collect();
    if !other_team_ids.is_empty() {
        let already = challenge_participant_team::Entity::find()
            .filter(challenge_participant_team::Column::ChallengeId.eq(pk))
            .filter(challenge_participant_team::Column::TeamId.is_in(other_team_ids))
            .one(&txn)
            .await?;
        if already.is_some() {
            return Err(AppError::Conflict(
                "A team member already participates in this challenge".into(),
            ));
        }
    }

    let new_entry = challenge_participant_team::ActiveModel {
        challenge_id: Set(pk),
        team_id: Set(team_pk),
        created_at: Set(chrono::Utc::now()),
    };

    match new_entry.insert(&txn).await {
        Ok(_) => {
            txn.commit().await?;
            Ok(StatusCode::CREATED)
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Ok(StatusCode::OK)
        }
        Err(e) => Err(e.into()),
    }
}

async fn paginate_challenges(
    db: &DatabaseConnection,
    select: Select<challenge::Entity>,
    query: &ChallengeListQuery,
) -> Result<Json<ChallengeListResponse>, AppError> {
    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let total = select.clone().paginate(db, per_page).num_items().await?;
    let total_pages = total.div_ceil(per_page);

    let data = select
        .offset(Some((page - 1) * per_page))
        .limit(Some(per_page))
        .all(db)
        .await?;

    Ok(Json(ChallengeListResponse {
        data: data.into_iter().map(ChallengeResponse::from).collect(),
        pagination: Pagination {
            page,
            per_page,
            total,
            total_pages,
        },
    }))
}

async fn challenges_of_participant_teams<C: ConnectionTrait>(
    db: &C,
    team_ids: Vec<i32>,
) -> Result<Vec<challenge::Model>, AppError> {
    if team_ids.is_empty() {
        return Ok(Vec::new());
    }
    let challenge_ids: Vec<i32> = challenge_participant_team::Entity::find()
        .filter(challenge_participant_team::Column::TeamId.is_in(team_ids))
        .select_only()
        .column(challenge_participant_team::Column::ChallengeId)
        .into_tuple::<i32>()
        .all(db)
        .await?;

    Ok(challenge::Entity::find()
        .filter(challenge::Column::Id.is_in(challenge_ids))
        .order_by_desc(challenge::Column::CreatedAt)
        .all(db)
        .await?)
}

async fn require_host_team_member(
    db: &DatabaseConnection,
    auth_user: &AuthUser,
    team_id: i32,
) -> Result<(), AppError> {
    crate::entity::host_team::Entity::find_by_id(team_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Host team not found".into()))?;
    if !is_host_team_member(db, auth_user.user_id, team_id).await? {
        return Err(AppError::PermissionDenied);
    }
    Ok(())
}

pub(crate) async fn find_challenge<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<challenge::Model, AppError> {
    challenge::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge not found".into()))
}

async fn find_challenge_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<challenge::Model, AppError> {
    use sea_orm::sea_query::LockType;
    challenge::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge not found".into()))
}

async fn find_team_challenge(
    db: &DatabaseConnection,
    team_id: i32,
    id: i32,
) -> Result<challenge::Model, AppError> {
    let model = find_challenge(db, id).await?;
    if model.creator_team_id != team_id {
        return Err(AppError::NotFound("Challenge not found".into()));
    }
    Ok(model)
}

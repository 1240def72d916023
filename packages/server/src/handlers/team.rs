use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{host_team, host_team_member, participant, participant_team, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::team::{
    AddMemberRequest, CreateTeamRequest, TeamMemberResponse, TeamResponse, validate_create_team,
};
use crate::state::AppState;
use crate::utils::teams::{find_participant_team, is_host_team_member, is_participant_team_member};

#[utoipa::path(
    post,
    path = "/",
    tag = "Host Teams",
    operation_id = "createHostTeam",
    summary = "Create a host team",
    description = "Creates a host team with the caller as creator and first member.",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(team_name = %payload.team_name))]
pub async fn create_host_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_team(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let team = host_team::ActiveModel {
        team_name: Set(payload.team_name.trim().to_string()),
        created_by: Set(auth_user.user_id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    host_team_member::ActiveModel {
        team_id: Set(team.id),
        user_id: Set(auth_user.user_id),
        added_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(team))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Host Teams",
    operation_id = "listHostTeams",
    summary = "List the caller's host teams",
    responses(
        (status = 200, description = "Teams the caller belongs to", body = Vec<TeamResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_host_teams(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamResponse>>, AppError> {
    let team_ids: Vec<i32> = host_team_member::Entity::find()
        .filter(host_team_member::Column::UserId.eq(auth_user.user_id))
        .select_only()
        .column(host_team_member::Column::TeamId)
        .into_tuple::<i32>()
        .all(&state.db)
        .await?;

    let teams = host_team::Entity::find()
        .filter(host_team::Column::Id.is_in(team_ids))
        .order_by_asc(host_team::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(teams.into_iter().map(TeamResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/members",
    tag = "Host Teams",
    operation_id = "addHostTeamMember",
    summary = "Add a user to a host team",
    description = "Adds a user to a host team. Only existing members may add.",
    params(("id" = i32, Path, description = "Host team ID")),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = TeamMemberResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team or user not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already a member (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(team_id))]
pub async fn add_host_team_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    AppJson(payload): AppJson<AddMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    host_team::Entity::find_by_id(team_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Host team not found".into()))?;

    if !is_host_team_member(&txn, auth_user.user_id, team_id).await? {
        return Err(AppError::PermissionDenied);
    }

    let target = user::Entity::find_by_id(payload.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let new_member = host_team_member::ActiveModel {
        team_id: Set(team_id),
        user_id: Set(payload.user_id),
        added_at: Set(chrono::Utc::now()),
    };

    match new_member.insert(&txn).await {
        Ok(m) => {
            txn.commit().await?;
            Ok((
                StatusCode::CREATED,
                Json(TeamMemberResponse {
                    team_id: m.team_id,
                    user_id: m.user_id,
                    username: target.username,
                }),
            ))
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AppError::Conflict("User is already a member".into()))
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Participant Teams",
    operation_id = "createParticipantTeam",
    summary = "Create a participant team",
    description = "Creates a participant team with the caller as creator and first member.",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(team_name = %payload.team_name))]
pub async fn create_participant_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTeamRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_team(&payload)?;

    let now = chrono::Utc::now();
    let txn = state.db.begin().await?;

    let team = participant_team::ActiveModel {
        team_name: Set(payload.team_name.trim().to_string()),
        created_by: Set(auth_user.user_id),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    participant::ActiveModel {
        team_id: Set(team.id),
        user_id: Set(auth_user.user_id),
        joined_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(team))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Participant Teams",
    operation_id = "listParticipantTeams",
    summary = "List the caller's participant teams",
    responses(
        (status = 200, description = "Teams the caller belongs to", body = Vec<TeamResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_participant_teams(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamResponse>>, AppError> {
    let team_ids: Vec<i32> = participant::Entity::find()
        .filter(participant::Column::UserId.eq(auth_user.user_id))
        .select_only()
        .column(participant::Column::TeamId)
        .into_tuple::<i32>()
        .all(&state.db)
        .await?;

    let teams = participant_team::Entity::find()
        .filter(participant_team::Column::Id.is_in(team_ids))
        .order_by_asc(participant_team::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(teams.into_iter().map(TeamResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/{id}/members",
    tag = "Participant Teams",
    operation_id = "addParticipantTeamMember",
    summary = "Add a user to a participant team",
    description = "Adds a user to a participant team. Only existing members may add.",
    params(("id" = i32, Path, description = "Participant team ID")),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = TeamMemberResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Caller is not a member (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team or user not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already a member (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(team_id))]
pub async fn add_participant_team_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(team_id): Path<i32>,
    AppJson(payload): AppJson<AddMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    find_participant_team(&txn, team_id).await?;

    if !is_participant_team_member(&txn, auth_user.user_id, team_id).await? {
        return Err(AppError::PermissionDenied);
    }

    let target = user::Entity::find_by_id(payload.user_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let new_member = participant::ActiveModel {
        team_id: Set(team_id),
        user_id: Set(payload.user_id),
        joined_at: Set(chrono::Utc::now()),
    };

    match new_member.insert(&txn).await {
        Ok(m) => {
            txn.commit().await?;
            Ok((
                StatusCode::CREATED,
                Json(TeamMemberResponse {
                    team_id: m.team_id,
                    user_id: m.user_id,
                    username: target.username,
                }),
            ))
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(AppError::Conflict("User is already a member".into()))
        }
        Err(e) => Err(e.into()),
    }
}

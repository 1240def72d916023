use sea_orm::*;

use crate::entity::{challenge, host_team_member, participant, participant_team};
use crate::error::AppError;

/// Is the user a member of the given host team?
pub async fn is_host_team_member<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    team_id: i32,
) -> Result<bool, AppError> {
    Ok(host_team_member::Entity::find_by_id((team_id, user_id))
        .one(db)
        .await?
        .is_some())
}

/// Is the user a member of the given participant team?
pub async fn is_participant_team_member<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    team_id: i32,
) -> Result<bool, AppError> {
    Ok(participant::Entity::find_by_id((team_id, user_id))
        .one(db)
        .await?
        .is_some())
}

/// Is the user a member of the host team that created the challenge?
pub async fn is_challenge_host<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    challenge_model: &challenge::Model,
) -> Result<bool, AppError> {
    is_host_team_member(db, user_id, challenge_model.creator_team_id).await
}

/// User IDs belonging to the host team that created the challenge.
pub async fn challenge_host_user_ids<C: ConnectionTrait>(
    db: &C,
    challenge_model: &challenge::Model,
) -> Result<Vec<i32>, AppError> {
    Ok(host_team_member::Entity::find()
        .filter(host_team_member::Column::TeamId.eq(challenge_model.creator_team_id))
        .select_only()
        .column(host_team_member::Column::UserId)
        .into_tuple::<i32>()
        .all(db)
        .await?)
}

/// User IDs belonging to a participant team.
pub async fn participant_team_user_ids<C: ConnectionTrait>(
    db: &C,
    team_id: i32,
) -> Result<Vec<i32>, AppError> {
    Ok(participant::Entity::find()
        .filter(participant::Column::TeamId.eq(team_id))
        .select_only()
        .column(participant::Column::UserId)
        .into_tuple::<i32>()
        .all(db)
        .await?)
}

/// IDs of participant teams that any of the given users belong to.
pub async fn participant_team_ids_of_users<C: ConnectionTrait>(
    db: &C,
    user_ids: &[i32],
) -> Result<Vec<i32>, AppError> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(participant::Entity::find()
        .filter(participant::Column::UserId.is_in(user_ids.to_vec()))
        .select_only()
        .column(participant::Column::TeamId)
        .into_tuple::<i32>()
        .all(db)
        .await?)
}

/// Find a participant team by ID or fail with NOT_FOUND.
pub async fn find_participant_team<C: ConnectionTrait>(
    db: &C,
    team_id: i32,
) -> Result<participant_team::Model, AppError> {
    participant_team::Entity::find_by_id(team_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Participant team not found".into()))
}

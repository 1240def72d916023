use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{Pagination, validate_text_field, validate_title};
use crate::entity::challenge;
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateChallengeRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub terms_and_conditions: String,
    #[serde(default)]
    pub submission_guidelines: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub published: bool,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateChallengeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub terms_and_conditions: Option<String>,
    pub submission_guidelines: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub published: Option<bool>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ChallengeListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Query for the team-based challenge filter endpoint.
///
/// Exactly one of `participant_team`, `host_team`, or `mode` must be given.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct TeamChallengeQuery {
    pub participant_team: Option<i32>,
    pub host_team: Option<i32>,
    /// `host` or `participant`: all challenges visible to the caller in that role.
    pub mode: Option<String>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct ChallengeResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub terms_and_conditions: String,
    pub submission_guidelines: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub creator_team_id: i32,
    pub published: bool,
    pub is_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ChallengeListResponse {
    pub data: Vec<ChallengeResponse>,
    pub pagination: Pagination,
}

impl From<challenge::Model> for ChallengeResponse {
    fn from(m: challenge::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            terms_and_conditions: m.terms_and_conditions,
            submission_guidelines: m.submission_guidelines,
            start_date: m.start_date,
            end_date: m.end_date,
            creator_team_id: m.creator_team_id,
            published: m.published,
            is_disabled: m.is_disabled,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub fn validate_create_challenge(req: &CreateChallengeRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_text_field(&req.description, "Description")?;
    if req.end_date <= req.start_date {
        return Err(AppError::Validation(
            "end_date must be after start_date".into(),
        ));
    }
    Ok(())
}

pub fn validate_update_challenge(req: &UpdateChallengeRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(ref description) = req.description {
        validate_text_field(description, "Description")?;
    }
    if let (Some(start), Some(end)) = (req.start_date, req.end_date)
        && end <= start
    {
        return Err(AppError::Validation(
            "end_date must be after start_date".into(),
        ));
    }
    Ok(())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_text_field, validate_title};
use crate::entity::{challenge_phase, challenge_phase_split};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePhaseRequest {
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdatePhaseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_public: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PhaseResponse {
    pub id: i32,
    pub challenge_id: i32,
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_public: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PhaseSplitResponse {
    pub id: i32,
    pub challenge_phase_id: i32,
    pub dataset_split_id: i32,
    pub leaderboard_id: i32,
    pub visibility: i32,
}

impl From<challenge_phase::Model> for PhaseResponse {
    fn from(m: challenge_phase::Model) -> Self {
        Self {
            id: m.id,
            challenge_id: m.challenge_id,
            name: m.name,
            description: m.description,
            start_date: m.start_date,
            end_date: m.end_date,
            is_public: m.is_public,
            position: m.position,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<challenge_phase_split::Model> for PhaseSplitResponse {
    fn from(m: challenge_phase_split::Model) -> Self {
        Self {
            id: m.id,
            challenge_phase_id: m.challenge_phase_id,
            dataset_split_id: m.dataset_split_id,
            leaderboard_id: m.leaderboard_id,
            visibility: m.visibility,
        }
    }
}

pub fn validate_create_phase(req: &CreatePhaseRequest) -> Result<(), AppError> {
    validate_title(&req.name)?;
    validate_text_field(&req.description, "Description")?;
    if req.end_date <= req.start_date {
        return Err(AppError::Validation(
            "end_date must be after start_date".into(),
        ));
    }
    Ok(())
}

pub fn validate_update_phase(req: &UpdatePhaseRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_title(name)?;
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

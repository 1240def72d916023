use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_title;
use crate::entity::{host_team, participant_team};
use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTeamRequest {
    pub team_name: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddMemberRequest {
    pub user_id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamResponse {
    pub id: i32,
    pub team_name: String,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TeamMemberResponse {
    pub team_id: i32,
    pub user_id: i32,
    pub username: String,
}

impl From<host_team::Model> for TeamResponse {
    fn from(m: host_team::Model) -> Self {
        Self {
            id: m.id,
            team_name: m.team_name,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}

impl From<participant_team::Model> for TeamResponse {
    fn from(m: participant_team::Model) -> Self {
        Self {
            id: m.id,
            team_name: m.team_name,
            created_by: m.created_by,
            created_at: m.created_at,
        }
    }
}

pub fn validate_create_team(req: &CreateTeamRequest) -> Result<(), AppError> {
    validate_title(&req.team_name)
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "challenge_participant_team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub challenge_id: i32,
    #[sea_orm(primary_key)]
    pub team_id: i32,
    #[sea_orm(belongs_to, from = "challenge_id", to = "id")]
    pub challenge: Option<super::challenge::Entity>,
    #[sea_orm(belongs_to, from = "team_id", to = "id")]
    pub team: Option<super::participant_team::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

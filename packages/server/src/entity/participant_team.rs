use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "participant_team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub team_name: String,
    pub created_by: i32,

    #[sea_orm(has_many, via = "participant")]
    pub members: HasMany<super::user::Entity>,

    #[sea_orm(has_many, via = "challenge_participant_team")]
    pub challenges: HasMany<super::challenge::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

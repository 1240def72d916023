use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "host_team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub team_name: String,

    /// User who created the team. The challenge import precondition requires
    /// a user to have created exactly one host team.
    pub created_by: i32,

    #[sea_orm(has_many, via = "host_team_member")]
    pub members: HasMany<super::user::Entity>,

    #[sea_orm(has_many)]
    pub challenges: HasMany<super::challenge::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

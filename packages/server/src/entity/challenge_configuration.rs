use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit record for a challenge import attempt.
///
/// Inserted before the import transaction opens so it survives a failed
/// import. `challenge_id` stays NULL until the import commits; a row with a
/// NULL `challenge_id` marks an abandoned attempt.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "challenge_configuration")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub host_team_id: i32,
    #[sea_orm(belongs_to, from = "host_team_id", to = "id")]
    pub host_team: Option<super::host_team::Entity>,

    pub archive_url: String,

    pub challenge_id: Option<i32>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

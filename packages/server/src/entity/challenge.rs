use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "challenge")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String, // in Markdown
    pub terms_and_conditions: String,
    pub submission_guidelines: String,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,

    /// Host team that owns the challenge.
    pub creator_team_id: i32,
    #[sea_orm(belongs_to, from = "creator_team_id", to = "id")]
    pub creator_team: Option<super::host_team::Entity>,

    pub published: bool,
    pub is_disabled: bool,

    #[sea_orm(has_many)]
    pub phases: HasMany<super::challenge_phase::Entity>,

    #[sea_orm(has_many, via = "challenge_participant_team")]
    pub participant_teams: HasMany<super::participant_team::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

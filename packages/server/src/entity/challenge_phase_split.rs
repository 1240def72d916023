use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Leaderboard visible only to the challenge host.
pub const VISIBILITY_HOST: i32 = 1;
/// Visible to the submission owner and the host.
pub const VISIBILITY_OWNER_AND_HOST: i32 = 2;
/// Publicly visible.
pub const VISIBILITY_PUBLIC: i32 = 3;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "challenge_phase_split")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub challenge_phase_id: i32,
    #[sea_orm(belongs_to, from = "challenge_phase_id", to = "id")]
    pub challenge_phase: Option<super::challenge_phase::Entity>,

    pub dataset_split_id: i32,
    #[sea_orm(belongs_to, from = "dataset_split_id", to = "id")]
    pub dataset_split: Option<super::dataset_split::Entity>,

    pub leaderboard_id: i32,
    #[sea_orm(belongs_to, from = "leaderboard_id", to = "id")]
    pub leaderboard: Option<super::leaderboard::Entity>,

    pub visibility: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}

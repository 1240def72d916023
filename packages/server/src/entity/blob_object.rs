use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One stored asset payload, keyed by content hash. Imports carrying the
/// same logo or script bytes share a single row here; per-owner metadata
/// lives on `blob_ref`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blob_object")]
pub struct Model {
    /// Hex-encoded SHA-256 of the payload.
    #[sea_orm(primary_key, auto_increment = false)]
    pub content_hash: String,

    /// Payload size in bytes.
    pub size: i64,

    pub created_at: DateTimeUtc,

    #[sea_orm(has_many)]
    pub blob_refs: HasMany<super::blob_ref::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

pub mod archive;
pub mod manifest;

use chrono::Utc;
use common::storage::BlobStore;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::config::ImportConfig;
use crate::entity::{
    blob_object, blob_ref, challenge, challenge_configuration, challenge_phase,
    challenge_phase_split, dataset_split, host_team, leaderboard,
};
use archive::ArchiveWorkspace;
use manifest::{AssetKind, ChallengeManifest, ResolvedAsset, parse_manifest, resolve_asset};

/// Failure modes of the challenge import pipeline.
///
/// The HTTP layer collapses most of these into one generic response; the
/// variants exist so the server log names the actual cause.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// The caller does not satisfy the import preconditions. Carries a
    /// client-facing message.
    #[error("{0}")]
    Precondition(String),
    /// Fetching the remote archive failed.
    #[error("archive transfer failed: {0}")]
    Transfer(String),
    /// No YAML file anywhere in the archive.
    #[error("no YAML manifest found in archive")]
    ManifestMissing,
    /// The manifest exists but could not be decoded.
    #[error("manifest could not be parsed: {0}")]
    ManifestInvalid(String),
    /// A phase-split ordinal points outside its manifest list.
    #[error("{kind} reference {ordinal} is out of range (1..={len})")]
    ReferenceOutOfRange {
        kind: &'static str,
        ordinal: i64,
        len: usize,
    },
    /// Archive or manifest content violates a validation rule.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Storage(#[from] common::storage::StorageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Resolve a 1-based manifest ordinal against IDs collected in insertion order.
fn resolve_ordinal(ids: &[i32], ordinal: i64, kind: &'static str) -> Result<i32, ImportError> {
    if ordinal < 1 || ordinal as usize > ids.len() {
        return Err(ImportError::ReferenceOutOfRange {
            kind,
            ordinal,
            len: ids.len(),
        });
    }
    Ok(ids[(ordinal - 1) as usize])
}

/// Import a challenge from a remotely-hosted zip archive.
///
/// The challenge graph (challenge, leaderboards, phases, dataset splits,
/// phase-splits, asset references) is created inside a single transaction;
/// any failure rolls everything back. The `ChallengeConfiguration` audit row
/// is inserted before the transaction opens and therefore survives failure
/// with a NULL `challenge_id`.
#[instrument(skip(db, blob_store, cfg))]
pub async fn import_challenge(
    db: &DatabaseConnection,
    blob_store: &dyn BlobStore,
    cfg: &ImportConfig,
    archive_url: &str,
    user_id: i32,
) -> Result<challenge::Model, ImportError> {
    let team = sole_host_team(db, user_id).await?;

    let config_row = challenge_configuration::ActiveModel {
        host_team_id: Set(team.id),
        archive_url: Set(archive_url.to_string()),
        challenge_id: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut workspace = ArchiveWorkspace::create().await?;
    let result = run_import(db, blob_store, cfg, archive_url, &team, &config_row, &mut workspace).await;
    workspace.cleanup().await;
    result
}

async fn run_import(
    db: &DatabaseConnection,
    blob_store: &dyn BlobStore,
    cfg: &ImportConfig,
    archive_url: &str,
    team: &host_team::Model,
    config_row: &challenge_configuration::Model,
    workspace: &mut ArchiveWorkspace,
) -> Result<challenge::Model, ImportError> {
    let txn = db.begin().await?;

    workspace.fetch(archive_url, cfg).await?;
    workspace.extract(cfg).await?;

    let manifest_path = workspace.locate_manifest()?;
    let manifest_text = tokio::fs::read_to_string(&manifest_path).await?;
    let manifest = parse_manifest(&manifest_text)?;
    validate_manifest(&manifest)?;

    let contents = workspace.contents_dir();
    let image = resolve_asset(&contents, manifest.image.as_deref(), AssetKind::Image);
    let evaluation_script = resolve_asset(
        &contents,
        manifest.evaluation_script.as_deref(),
        AssetKind::EvaluationScript,
    );

    let now = Utc::now();

    let challenge_model = challenge::ActiveModel {
        title: Set(manifest.title.trim().to_string()),
        description: Set(manifest.description.clone()),
        terms_and_conditions: Set(manifest.terms_and_conditions.clone()),
        submission_guidelines: Set(manifest.submission_guidelines.clone()),
        start_date: Set(manifest.start_date),
        end_date: Set(manifest.end_date),
        creator_team_id: Set(team.id),
        published: Set(manifest.published),
        is_disabled: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    if let Some(asset) = image {
        attach_asset(&txn, blob_store, "challenge", challenge_model.id, "image", &asset).await?;
    }
    if let Some(asset) = evaluation_script {
        attach_asset(
            &txn,
            blob_store,
            "challenge",
            challenge_model.id,
            "evaluation_script",
            &asset,
        )
        .await?;
    }

    let mut leaderboard_ids = Vec::with_capacity(manifest.leaderboard.len());
    for spec in &manifest.leaderboard {
        let row = leaderboard::ActiveModel {
            schema: Set(spec.schema.to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        leaderboard_ids.push(row.id);
    }

    let mut phase_ids = Vec::with_capacity(manifest.challenge_phases.len());
    for (position, spec) in manifest.challenge_phases.iter().enumerate() {
        let row = challenge_phase::ActiveModel {
            challenge_id: Set(challenge_model.id),
            name: Set(spec.name.trim().to_string()),
            description: Set(spec.description.clone()),
            start_date: Set(spec.start_date),
            end_date: Set(spec.end_date),
            is_public: Set(spec.is_public),
            position: Set(position as i32),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(asset) = resolve_asset(
            &contents,
            spec.test_annotation_file.as_deref(),
            AssetKind::Annotation,
        ) {
            attach_asset(&txn, blob_store, "challenge_phase", row.id, "test_annotation", &asset)
                .await?;
        }

        phase_ids.push(row.id);
    }

    let mut split_ids = Vec::with_capacity(manifest.dataset_splits.len());
    for spec in &manifest.dataset_splits {
        let row = dataset_split::ActiveModel {
            name: Set(spec.name.trim().to_string()),
            codename: Set(spec.codename.trim().to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        split_ids.push(row.id);
    }

    for spec in &manifest.challenge_phase_splits {
        challenge_phase_split::ActiveModel {
            challenge_phase_id: Set(resolve_ordinal(
                &phase_ids,
                spec.challenge_phase_id,
                "challenge_phase",
            )?),
            leaderboard_id: Set(resolve_ordinal(
                &leaderboard_ids,
                spec.leaderboard_id,
                "leaderboard",
            )?),
            dataset_split_id: Set(resolve_ordinal(
                &split_ids,
                spec.dataset_split_id,
                "dataset_split",
            )?),
            visibility: Set(spec.visibility),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    let mut config_active: challenge_configuration::ActiveModel = config_row.clone().into();
    config_active.challenge_id = Set(Some(challenge_model.id));
    config_active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        challenge_id = challenge_model.id,
        leaderboards = manifest.leaderboard.len(),
        phases = manifest.challenge_phases.len(),
        splits = manifest.dataset_splits.len(),
        phase_splits = manifest.challenge_phase_splits.len(),
        "Imported challenge from archive"
    );

    Ok(challenge_model)
}

/// The import precondition: the user must have created exactly one host team.
async fn sole_host_team(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<host_team::Model, ImportError> {
    let mut teams = host_team::Entity::find()
        .filter(host_team::Column::CreatedBy.eq(user_id))
        .all(db)
        .await?;

    if teams.len() > 1 {
        return Err(ImportError::Precondition(
            "You have created multiple host teams; challenge import requires exactly one".into(),
        ));
    }
    teams.pop().ok_or_else(|| {
        ImportError::Precondition(
            "You must create a host team before importing a challenge".into(),
        )
    })
}

fn validate_manifest(manifest: &ChallengeManifest) -> Result<(), ImportError> {
    let title = manifest.title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(ImportError::Validation(
            "Manifest title must be 1-256 characters".into(),
        ));
    }
    if manifest.end_date <= manifest.start_date {
        return Err(ImportError::Validation(
            "Manifest end_date must be after start_date".into(),
        ));
    }
    for spec in &manifest.challenge_phases {
        let name = spec.name.trim();
        if name.is_empty() || name.chars().count() > 256 {
            return Err(ImportError::Validation(
                "Phase name must be 1-256 characters".into(),
            ));
        }
        if spec.description.trim().is_empty() || spec.description.len() > 1_000_000 {
            return Err(ImportError::Validation(format!(
                "Phase '{name}' description must be non-empty and at most 1MB"
            )));
        }
        if spec.end_date <= spec.start_date {
            return Err(ImportError::Validation(format!(
                "Phase '{name}' end_date must be after start_date"
            )));
        }
    }
    for spec in &manifest.dataset_splits {
        if spec.name.trim().is_empty() || spec.codename.trim().is_empty() {
            return Err(ImportError::Validation(
                "Dataset split name and codename must be non-empty".into(),
            ));
        }
    }
    for spec in &manifest.challenge_phase_splits {
        if !(1..=3).contains(&spec.visibility) {
            return Err(ImportError::Validation(format!(
                "Phase-split visibility must be 1, 2 or 3, got {}",
                spec.visibility
            )));
        }
    }
    Ok(())
}

/// Store an asset in the blob store and record its reference inside the
/// import transaction. The blob itself is content-addressed and survives a
/// rollback; only the reference rows are transactional.
async fn attach_asset<C: ConnectionTrait>(
    txn: &C,
    blob_store: &dyn BlobStore,
    owner_type: &str,
    owner_id: i32,
    slot: &str,
    asset: &ResolvedAsset,
) -> Result<(), ImportError> {
    let data = tokio::fs::read(&asset.path).await?;
    let size = data.len() as i64;
    let hash = blob_store.put(&data).await?;

    let now = Utc::now();
    blob_object::Entity::insert(blob_object::ActiveModel {
        content_hash: Set(hash.to_hex()),
        size: Set(size),
        created_at: Set(now),
    })
    .on_conflict(
        OnConflict::column(blob_object::Column::ContentHash)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await?;

    let content_type = mime_guess::from_path(&asset.filename)
        .first()
        .map(|m| m.to_string());

    blob_ref::Entity::insert(blob_ref::ActiveModel {
        id: Set(Uuid::now_v7()),
        owner_type: Set(owner_type.to_string()),
        owner_id: Set(owner_id.to_string()),
        path: Set(slot.to_string()),
        content_hash: Set(hash.to_hex()),
        filename: Set(asset.filename.clone()),
        content_type: Set(content_type),
        size: Set(size),
        created_at: Set(now),
    })
    .on_conflict(
        OnConflict::columns([
            blob_ref::Column::OwnerType,
            blob_ref::Column::OwnerId,
            blob_ref::Column::Path,
        ])
        .update_columns([
            blob_ref::Column::ContentHash,
            blob_ref::Column::Filename,
            blob_ref::Column::ContentType,
            blob_ref::Column::Size,
            blob_ref::Column::CreatedAt,
        ])
        .to_owned(),
    )
    .exec_without_returning(txn)
    .await?;

    Ok(())
}

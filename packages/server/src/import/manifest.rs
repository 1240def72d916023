use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ImportError;
use crate::utils::filename::{contains_path_traversal, split_dir_filename};

/// Challenge configuration manifest, decoded from the archive's YAML file.
///
/// Decoding is structural only; field-level validation happens in the
/// orchestrator against the same rules the CRUD endpoints use.
#[derive(Debug, Deserialize)]
pub struct ChallengeManifest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub terms_and_conditions: String,
    #[serde(default)]
    pub submission_guidelines: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub published: bool,

    /// Logo image path, relative to the archive root.
    #[serde(default)]
    pub image: Option<String>,
    /// Evaluation script path, relative to the archive root.
    #[serde(default)]
    pub evaluation_script: Option<String>,

    #[serde(default)]
    pub leaderboard: Vec<LeaderboardSpec>,
    #[serde(default)]
    pub challenge_phases: Vec<PhaseSpec>,
    #[serde(default)]
    pub dataset_splits: Vec<SplitSpec>,
    #[serde(default)]
    pub challenge_phase_splits: Vec<PhaseSplitSpec>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardSpec {
    /// Ranking schema, carried verbatim as JSON.
    pub schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct PhaseSpec {
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub is_public: bool,
    /// Per-phase annotation file path, relative to the archive root.
    #[serde(default)]
    pub test_annotation_file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SplitSpec {
    pub name: String,
    pub codename: String,
}

/// Cross-reference entry. The three `*_id` fields are 1-based ordinals into
/// the manifest's phase, leaderboard, and split lists, not database IDs.
#[derive(Debug, Deserialize)]
pub struct PhaseSplitSpec {
    pub challenge_phase_id: i64,
    pub leaderboard_id: i64,
    pub dataset_split_id: i64,
    pub visibility: i32,
}

pub fn parse_manifest(text: &str) -> Result<ChallengeManifest, ImportError> {
    serde_yaml::from_str(text).map_err(|e| ImportError::ManifestInvalid(e.to_string()))
}

/// Asset kinds referenced by the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    EvaluationScript,
    Annotation,
}

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An asset that exists on disk and is safe to attach.
#[derive(Debug)]
pub struct ResolvedAsset {
    pub path: PathBuf,
    pub filename: String,
}

/// Resolve a manifest asset reference against the extracted archive root.
///
/// Never fails: an absent declaration, empty value, traversal attempt,
/// unsupported image extension, or missing file all yield `None`. Whether a
/// missing asset is fatal is the caller's decision (it never is, today).
pub fn resolve_asset(root: &Path, declared: Option<&str>, kind: AssetKind) -> Option<ResolvedAsset> {
    let declared = declared?.trim();
    if declared.is_empty() {
        return None;
    }
    if declared.starts_with('/') || contains_path_traversal(declared) {
        return None;
    }

    if kind == AssetKind::Image {
        let ext = Path::new(declared).extension()?.to_str()?;
        if !IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        {
            return None;
        }
    }

    let path = root.join(declared);
    if !path.is_file() {
        return None;
    }

    let (_, filename) = split_dir_filename(declared);
    Some(ResolvedAsset {
        path,
        filename: filename.to_string(),
    })
}

use serde::Deserialize;

use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ImportChallengeRequest {
    /// HTTP(S) URL of the challenge configuration zip archive.
    pub archive_url: String,
}

pub fn validate_import_challenge(req: &ImportChallengeRequest) -> Result<(), AppError> {
    let url = req.archive_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AppError::Validation(
            "archive_url must be an http(s) URL".into(),
        ));
    }
    Ok(())
}

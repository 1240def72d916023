use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::ImportError;
use crate::config::ImportConfig;

/// Scratch directory for one import attempt.
///
/// Every invocation gets its own directory under the system temp dir, so
/// concurrent imports never share state. The directory is removed exactly
/// once, by `cleanup()` or as a last resort on drop; removal failure is
/// logged and never escalated.
pub struct ArchiveWorkspace {
    root: PathBuf,
    /// Extracted file paths relative to the contents dir, in archive index order.
    entries: Vec<String>,
    cleaned: bool,
}

impl ArchiveWorkspace {
    pub async fn create() -> Result<Self, ImportError> {
        let root = std::env::temp_dir().join(format!("evalhub-import-{}", Uuid::new_v4()));
        fs::create_dir_all(root.join("contents")).await?;
        Ok(Self {
            root,
            entries: Vec::new(),
            cleaned: false,
        })
    }

    fn archive_path(&self) -> PathBuf {
        self.root.join("challenge.zip")
    }

    /// Directory holding the extracted archive contents. Manifest asset paths
    /// are resolved relative to this.
    pub fn contents_dir(&self) -> PathBuf {
        self.root.join("contents")
    }

    /// Download the archive into the workspace, streaming to disk.
    ///
    /// The size cap is checked against the running byte total, so an
    /// oversized response aborts mid-transfer instead of being buffered.
    pub async fn fetch(&self, url: &str, cfg: &ImportConfig) -> Result<(), ImportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.fetch_timeout_secs))
            .build()
            .map_err(|e| ImportError::Transfer(e.to_string()))?;

        let mut response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ImportError::Transfer(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ImportError::Transfer(format!(
                "unexpected status {} fetching archive",
                response.status()
            )));
        }

        if let Some(declared) = response.content_length()
            && declared > cfg.max_archive_size
        {
            return Err(ImportError::Transfer(format!(
                "archive exceeds maximum size of {} bytes",
                cfg.max_archive_size
            )));
        }

        let mut file = fs::File::create(self.archive_path()).await?;
        let mut received: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ImportError::Transfer(e.to_string()))?
        {
            received += chunk.len() as u64;
            if received > cfg.max_archive_size {
                return Err(ImportError::Transfer(format!(
                    "archive exceeds maximum size of {} bytes",
                    cfg.max_archive_size
                )));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(())
    }

    /// Unpack the downloaded archive into the contents dir.
    ///
    /// Entries whose name escapes the extraction root are skipped; per-file
    /// and total decompression caps abort the import.
    pub async fn extract(&mut self, cfg: &ImportConfig) -> Result<(), ImportError> {
        let data = fs::read(self.archive_path()).await?;
        let contents_dir = self.contents_dir();

        let cursor = std::io::Cursor::new(data);
        let mut archive = zip::ZipArchive::new(cursor)
            .map_err(|e| ImportError::Validation(format!("Invalid ZIP archive: {e}")))?;

        let mut total_decompressed: u64 = 0;

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .map_err(|e| ImportError::Validation(format!("ZIP read error: {e}")))?;

            if file.is_dir() {
                continue;
            }

            // Reject entries with path traversal components (e.g. "../").
            let name = match file.enclosed_name() {
                Some(path) => path.to_string_lossy().to_string(),
                None => continue,
            };

            let mut buf = Vec::new();
            (&mut file)
                .take(cfg.max_decompressed_file_size + 1)
                .read_to_end(&mut buf)
                .map_err(|e| ImportError::Validation(format!("Failed to read '{name}': {e}")))?;

            if buf.len() as u64 > cfg.max_decompressed_file_size {
                return Err(ImportError::Validation(format!(
                    "File '{name}' exceeds the per-file decompressed size limit"
                )));
            }

            total_decompressed += buf.len() as u64;
            if total_decompressed > cfg.max_total_decompressed_size {
                return Err(ImportError::Validation(
                    "Total decompressed archive content exceeds the size limit".into(),
                ));
            }

            let out_path = contents_dir.join(&name);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&out_path, &buf).await?;

            self.entries.push(name);
        }

        Ok(())
    }

    /// Path of the challenge manifest: the first extracted entry, in archive
    /// index order, with a `.yaml`/`.yml` extension.
    pub fn locate_manifest(&self) -> Result<PathBuf, ImportError> {
        self.entries
            .iter()
            .find(|name| {
                Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
            })
            .map(|name| self.contents_dir().join(name))
            .ok_or(ImportError::ManifestMissing)
    }

    /// Remove the workspace directory. Best effort, at most once.
    pub async fn cleanup(&mut self) {
        if self.cleaned {
            return;
        }
        self.cleaned = true;
        if let Err(e) = fs::remove_dir_all(&self.root).await {
            tracing::warn!(path = %self.root.display(), "Failed to clean import workspace: {e}");
        }
    }
}

impl Drop for ArchiveWorkspace {
    fn drop(&mut self) {
        if !self.cleaned {
            self.cleaned = true;
            if let Err(e) = std::fs::remove_dir_all(&self.root) {
                tracing::warn!(path = %self.root.display(), "Failed to clean import workspace: {e}");
            }
        }
    }
}

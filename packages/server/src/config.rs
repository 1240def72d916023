use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory of the content-addressed blob store.
    pub blobs_dir: PathBuf,
    /// Maximum size of a single stored blob in bytes.
    pub max_blob_size: u64,
}

/// Limits for the challenge archive import pipeline.
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Timeout for fetching the remote archive, in seconds.
    pub fetch_timeout_secs: u64,
    /// Maximum size of the downloaded archive in bytes.
    pub max_archive_size: u64,
    /// Maximum decompressed size per file inside the archive.
    pub max_decompressed_file_size: u64,
    /// Maximum total decompressed size across the archive.
    pub max_total_decompressed_size: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
            max_archive_size: 256 * 1024 * 1024,
            max_decompressed_file_size: 128 * 1024 * 1024,
            max_total_decompressed_size: 1024 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.blobs_dir", "./blobs")?
            .set_default("storage.max_blob_size", 128 * 1024 * 1024)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., EVALHUB__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("EVALHUB").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

use std::env::vars;

use log::{info, warn};
use serde::Deserialize;

/// Front-end configuration, read once at startup and injected into the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StashConfig {
    bucket: String,
    storage_url: Option<String>,
    storage_api_key: Option<String>,
}

// Intermediate struct for deserializing environment variables
// before defaults and validation are applied.
#[derive(Deserialize)]
struct RawConfig {
    storage_bucket: Option<String>,
    storage_url: Option<String>,
    storage_api_key: Option<String>,
}

impl Default for StashConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUCKET)
    }
}

impl StashConfig {
    pub const DEFAULT_BUCKET: &'static str = "files";

    /// Configuration for `bucket` with no remote service (in-memory storage).
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            storage_url: None,
            storage_api_key: None,
        }
    }

    pub fn with_storage_url(mut self, url: impl Into<String>) -> Self {
        self.storage_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.storage_api_key = Some(key.into());
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn storage_url(&self) -> Option<&str> {
        self.storage_url.as_deref()
    }

    pub fn storage_api_key(&self) -> Option<&str> {
        self.storage_api_key.as_deref()
    }

    /// Reads `STORAGE_BUCKET`, `STORAGE_URL` and `STORAGE_API_KEY` from the environment.
    pub fn init() -> anyhow::Result<Self> {
        info!("Loading configuration from environment variables");
        let raw: RawConfig = serde_env::from_iter(vars())?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> anyhow::Result<Self> {
        let RawConfig {
            storage_bucket,
            storage_url,
            storage_api_key,
        } = raw;

        let bucket = match storage_bucket.map(|b| b.trim().to_owned()) {
            Some(bucket) if !bucket.is_empty() => bucket,
            _ => {
                info!(
                    "STORAGE_BUCKET not set, defaulting to {}",
                    Self::DEFAULT_BUCKET
                );
                Self::DEFAULT_BUCKET.to_owned()
            }
        };
        if bucket.contains('/') {
            anyhow::bail!("STORAGE_BUCKET must not contain '/': {bucket}");
        }

        let storage_url = storage_url
            .map(|url| url.trim().trim_end_matches('/').to_owned())
            .filter(|url| !url.is_empty());
        match &storage_url {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                anyhow::bail!("STORAGE_URL must be an http(s) URL, got {url}");
            }
            Some(url) => info!("Using storage service at {url}"),
            None => warn!("STORAGE_URL not set, files are kept in memory only"),
        }

        let storage_api_key = storage_api_key.filter(|key| !key.is_empty());

        Ok(Self {
            bucket,
            storage_url,
            storage_api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_env::from_iter;

    fn parse(vars: Vec<(&str, &str)>) -> anyhow::Result<StashConfig> {
        let raw: RawConfig = from_iter(vars).expect("RawConfig should deserialize");
        StashConfig::from_raw(raw)
    }

    #[test]
    fn bucket_defaults_to_files() {
        let config = parse(vec![]).expect("empty environment should build");
        assert_eq!(config.bucket(), "files");
        assert!(config.storage_url().is_none());
        assert_eq!(config, StashConfig::default());
    }

    #[test]
    fn blank_bucket_falls_back_to_default() {
        let config = parse(vec![("STORAGE_BUCKET", "  ")]).expect("blank bucket should build");
        assert_eq!(config.bucket(), "files");
    }

    #[test]
    fn all_values_from_environment() {
        let config = parse(vec![
            ("STORAGE_BUCKET", "uploads"),
            ("STORAGE_URL", "https://demo.storage.test/"),
            ("STORAGE_API_KEY", "anon-key"),
        ])
        .expect("full environment should build");

        assert_eq!(config.bucket(), "uploads");
        assert_eq!(config.storage_url(), Some("https://demo.storage.test"));
        assert_eq!(config.storage_api_key(), Some("anon-key"));
    }

    #[test]
    fn storage_url_must_be_http() {
        let result = parse(vec![("STORAGE_URL", "ftp://demo.storage.test")]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("STORAGE_URL"));
    }

    #[test]
    fn bucket_with_slash_is_rejected() {
        let result = parse(vec![("STORAGE_BUCKET", "a/b")]);
        assert!(result.unwrap_err().to_string().contains("STORAGE_BUCKET"));
    }
}

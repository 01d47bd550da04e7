//! Hosted storage REST API client.

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, Url, header};
use serde::{Deserialize, Deserializer, Serialize};

use super::traits::ObjectStore;
use super::types::{FileEntry, ListOptions, SortBy, StorageError, UploadOptions};

const API_ROOT: [&str; 3] = ["storage", "v1", "object"];
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Client for a hosted bucket service exposing the `storage/v1` REST API.
#[derive(Debug, Clone)]
pub struct RestObjectStore {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListBody<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
    sort_by: SortBy,
}

#[derive(Deserialize)]
struct RawEntry {
    name: String,
    /// Folder placeholders come back without an id.
    #[serde(default)]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    metadata: Option<RawMetadata>,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    mimetype: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "statusCode")]
    status_code: Option<String>,
}

/// Accepts RFC 3339 and offset-less timestamps (read as UTC).
///
/// Anything else becomes `None` so one odd entry cannot fail the whole listing.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f").map(|ts| ts.and_utc())
        });
    match parsed {
        Ok(ts) => Ok(Some(ts)),
        Err(e) => {
            debug!("Ignoring unreadable timestamp {raw:?}: {e}");
            Ok(None)
        }
    }
}

impl From<RawEntry> for FileEntry {
    fn from(raw: RawEntry) -> Self {
        let (size, content_type) = raw
            .metadata
            .map(|m| (m.size, m.mimetype))
            .unwrap_or_default();
        Self {
            name: raw.name,
            updated_at: raw.updated_at,
            size,
            content_type,
        }
    }
}

impl RestObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            client,
            base_url,
            api_key: None,
        }
    }

    /// Sends `key` as both `apikey` and bearer token on every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .header(header::AUTHORIZATION, format!("Bearer {key}")),
            None => request,
        }
    }

    /// Joins `segments` onto the base URL, percent-encoding each one.
    ///
    /// `/` inside an object path separates segments and is kept.
    fn endpoint(&self, segments: &[&str], object_path: Option<&str>) -> Result<Url, StorageError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| StorageError::InvalidConfig(format!("{}: {e}", self.base_url)))?;
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                StorageError::InvalidConfig(format!("{} cannot be a base URL", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(API_ROOT);
            path.extend(segments);
            if let Some(object_path) = object_path {
                path.extend(object_path.split('/'));
            }
        }
        Ok(url)
    }

    async fn error_from(response: Response) -> StorageError {
        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return StorageError::from(e),
        };

        let Ok(body) = serde_json::from_str::<ErrorBody>(&text) else {
            let message = if text.trim().is_empty() {
                format!("request failed with status {status}")
            } else {
                text
            };
            return StorageError::Api { status, message };
        };

        let message = body
            .message
            .or(body.error.clone())
            .unwrap_or_else(|| format!("request failed with status {status}"));

        // The service reports duplicates as 400 with `statusCode: "409"` in the body.
        let duplicate = status == 409
            || body.status_code.as_deref() == Some("409")
            || body.error.as_deref() == Some("Duplicate");
        if duplicate {
            StorageError::AlreadyExists(message)
        } else {
            StorageError::Api { status, message }
        }
    }
}

impl ObjectStore for RestObjectStore {
    async fn list(
        &self,
        bucket: &str,
        prefix: &str,
        options: &ListOptions,
    ) -> Result<Vec<FileEntry>, StorageError> {
        let url = self.endpoint(&["list", bucket], None)?;
        debug!("Listing {bucket}/{prefix} via {url}");

        let body = ListBody {
            prefix,
            limit: options.limit,
            offset: options.offset,
            sort_by: options.sort_by,
        };
        let response = self
            .authorize(self.client.post(url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let raw: Vec<RawEntry> = response.json().await?;
        let total = raw.len();
        let entries: Vec<FileEntry> = raw
            .into_iter()
            .filter(|entry| entry.id.is_some())
            .map(FileEntry::from)
            .collect();
        if entries.len() != total {
            debug!(
                "Skipped {} folder placeholders in {bucket}",
                total - entries.len()
            );
        }
        Ok(entries)
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        content: Bytes,
        options: &UploadOptions,
    ) -> Result<(), StorageError> {
        let url = self.endpoint(&[bucket], Some(path))?;
        debug!("Uploading {} bytes to {url}", content.len());

        let content_type = options
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE);
        let response = self
            .authorize(self.client.post(url))
            .header(
                header::CACHE_CONTROL,
                format!("max-age={}", options.cache_control),
            )
            .header("x-upsert", options.upsert.to_string())
            .header(header::CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from(response).await)
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        match self.endpoint(&["public", bucket], Some(path)) {
            Ok(url) => url.to_string(),
            Err(err) => {
                warn!("Falling back to plain public URL for {path}: {err}");
                format!("{}/storage/v1/object/public/{bucket}/{path}", self.base_url)
            }
        }
    }
}

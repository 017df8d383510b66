//! Image uploads for schedule entries.
//!
//! Uploads are a side step of saving a schedule entry: they never abort the
//! save. A failed upload leaves `image_url` untouched and comes back as a
//! warning next to the draft.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::RecitalConfig;
use crate::error::{UploadError, ValidationError};
use crate::record::{Record, ScheduleDraft, ScheduleRecord};
use crate::remote::protocol::{AssetUploaded, ErrorBody};

/// Folder that schedule images are uploaded into.
pub const SCHEDULE_ASSET_PREFIX: &str = "schedules";

/// Reference to a stored asset (its storage path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl ImageUpload {
    pub async fn from_file(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(ImageUpload { bytes, file_name })
    }
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload(&self, bytes: &[u8], path: &str) -> Result<AssetRef, UploadError>;
}

/// Select the asset store that matches the data source in `config`.
pub fn asset_store(config: &RecitalConfig) -> Arc<dyn AssetStore> {
    if config.use_mock_data {
        Arc::new(DirAssetStore::new(config.asset_path()))
    } else {
        Arc::new(HttpAssetStore::new(&config.api_url, config.request_timeout()))
    }
}

/// Build a storage path: `{prefix}/{unix millis}-{sanitized file name}`.
pub fn asset_path(prefix: &str, file_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "{}/{}-{}",
        prefix,
        now.timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Reject absolute paths and `..` so an asset can never escape its root.
pub fn validate_asset_path(path: &str) -> Result<PathBuf, UploadError> {
    let candidate = PathBuf::from(path);

    let is_relative_normal = !path.is_empty()
        && candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

    if is_relative_normal {
        Ok(candidate)
    } else {
        Err(UploadError::InvalidPath(path.to_string()))
    }
}

/// Find a path under `root` that is not taken yet, trying `name-2`, `name-3`, ...
pub fn unique_asset_path(root: &Path, path: &str) -> Result<PathBuf, UploadError> {
    let relative = validate_asset_path(path)?;

    if !root.join(&relative).exists() {
        return Ok(relative);
    }

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = relative
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    for n in 2..=100 {
        let candidate = relative.with_file_name(format!("{stem}-{n}{extension}"));
        if !root.join(&candidate).exists() {
            return Ok(candidate);
        }
    }

    Err(UploadError::InvalidPath(format!(
        "Too many asset name collisions for '{path}'"
    )))
}

/// Stores assets as files under a root directory.
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    pub fn new(root: PathBuf) -> Self {
        DirAssetStore { root }
    }
}

#[async_trait]
impl AssetStore for DirAssetStore {
    async fn upload(&self, bytes: &[u8], path: &str) -> Result<AssetRef, UploadError> {
        let relative = unique_asset_path(&self.root, path)?;
        let full = self.root.join(&relative);

        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;

        tracing::debug!("Stored asset at {}", full.display());
        Ok(AssetRef(relative.to_string_lossy().replace('\\', "/")))
    }
}

/// Uploads assets to recital-server with `PUT /assets/{path}`.
pub struct HttpAssetStore {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpAssetStore {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        HttpAssetStore {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(&self, bytes: &[u8], path: &str) -> Result<AssetRef, UploadError> {
        validate_asset_path(path)?;

        let response = self
            .client
            .put(format!("{}/assets/{}", self.base_url, path))
            .timeout(self.timeout)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let uploaded: AssetUploaded = response
            .json()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        Ok(AssetRef(uploaded.path))
    }
}

/// A draft after its image upload was attempted.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub draft: ScheduleDraft,
    /// Set when the upload failed; the draft then keeps its previous image.
    pub warning: Option<UploadError>,
}

impl ScheduleDraft {
    /// Validate the draft, then upload `image` and point `image_url` at it.
    ///
    /// Only the store is borrowed while the upload runs, so the collection
    /// stays usable in the meantime.
    pub async fn attach_image(
        mut self,
        store: &dyn AssetStore,
        image: ImageUpload,
    ) -> Result<ImageAttachment, ValidationError> {
        ScheduleRecord::validate(&self)?;

        let path = asset_path(SCHEDULE_ASSET_PREFIX, &image.file_name, Utc::now());

        let warning = match store.upload(&image.bytes, &path).await {
            Ok(asset) => {
                self.image_url = Some(asset.0);
                None
            }
            Err(e) => {
                tracing::warn!("Upload of {} failed: {}", image.file_name, e);
                Some(e)
            }
        };

        Ok(ImageAttachment {
            draft: self,
            warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    struct BrokenStore;

    #[async_trait]
    impl AssetStore for BrokenStore {
        async fn upload(&self, _bytes: &[u8], _path: &str) -> Result<AssetRef, UploadError> {
            Err(UploadError::Transport("connection refused".into()))
        }
    }

    fn image() -> ImageUpload {
        ImageUpload {
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
            file_name: "poster.png".into(),
        }
    }

    #[test]
    fn test_asset_path_is_timestamped_and_sanitized() {
        let now = Utc.with_ymd_and_hms(2025, 12, 1, 12, 0, 0).unwrap();
        let path = asset_path("schedules", "Spring Gala poster.png", now);
        assert_eq!(
            path,
            format!("schedules/{}-Spring-Gala-poster.png", now.timestamp_millis())
        );

        let hostile = asset_path("schedules", "../../etc/passwd", now);
        assert!(validate_asset_path(&hostile).is_ok());
        assert_eq!(hostile.matches('/').count(), 1);
        assert!(asset_path("schedules", "", now).ends_with("-upload"));
    }

    #[test]
    fn test_validate_asset_path() {
        assert!(validate_asset_path("schedules/1-a.png").is_ok());
        assert!(validate_asset_path("/etc/passwd").is_err());
        assert!(validate_asset_path("schedules/../../x").is_err());
        assert!(validate_asset_path("").is_err());
    }

    #[tokio::test]
    async fn test_dir_store_never_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = DirAssetStore::new(tmp.path().to_path_buf());

        let first = store.upload(b"one", "schedules/1-a.png").await.unwrap();
        let second = store.upload(b"two", "schedules/1-a.png").await.unwrap();

        assert_eq!(first.as_str(), "schedules/1-a.png");
        assert_eq!(second.as_str(), "schedules/1-a-2.png");
        assert_eq!(std::fs::read(tmp.path().join("schedules/1-a.png")).unwrap(), b"one");
    }

    #[tokio::test]
    async fn test_attach_image_sets_url() {
        let tmp = TempDir::new().unwrap();
        let store = DirAssetStore::new(tmp.path().to_path_buf());
        let draft = ScheduleDraft::new("2026-03-03", "Spring Gala");

        let attached = draft.attach_image(&store, image()).await.expect("Should validate");

        assert!(attached.warning.is_none());
        let url = attached.draft.image_url.expect("Should have image");
        assert!(url.starts_with("schedules/"));
        assert!(url.ends_with("-poster.png"));
    }

    #[tokio::test]
    async fn test_attach_image_failure_is_a_warning() {
        let draft = ScheduleDraft::new("2026-03-03", "Spring Gala");

        let attached = draft
            .attach_image(&BrokenStore, image())
            .await
            .expect("Should validate");

        assert_eq!(attached.draft.image_url, None);
        assert!(matches!(attached.warning, Some(UploadError::Transport(_))));
    }

    #[tokio::test]
    async fn test_attach_image_validates_first() {
        let draft = ScheduleDraft::new("", "Spring Gala");
        let result = draft.attach_image(&BrokenStore, image()).await;
        assert!(matches!(result, Err(ValidationError::EmptyDate)));
    }
}

//! Store, replace and discard image assets.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::resize::resize_image;
use super::{AssetError, AssetRules, ContentStore, UploadedFile};

/// Runs uploads through check, resize and write
#[derive(Clone)]
pub struct ImageProcessor {
    store: Arc<dyn ContentStore>,
}

impl std::fmt::Debug for ImageProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageProcessor").finish_non_exhaustive()
    }
}

impl ImageProcessor {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Checks, resizes and writes an upload, returning its new key
    pub async fn store(
        &self,
        upload: &UploadedFile,
        rules: &AssetRules,
    ) -> Result<String, AssetError> {
        let format = rules.check(upload)?;

        let bytes = upload.bytes.clone();
        let processed = tokio::task::spawn_blocking(move || resize_image(&bytes, format))
            .await
            .map_err(|e| AssetError::DecodeFailure(format!("resize task failed: {}", e)))??;

        let key = storage_key(&upload.file_name);
        self.store
            .put(&key, &processed.bytes)
            .await
            .map_err(|e| AssetError::StorageWriteFailure(e.to_string()))?;

        info!(
            key = %key,
            width = processed.width,
            height = processed.height,
            resized = processed.resized,
            "Stored image asset"
        );

        Ok(key)
    }

    /// Deletes the previous asset, if any, then stores the upload
    pub async fn replace(
        &self,
        previous: Option<&str>,
        upload: &UploadedFile,
        rules: &AssetRules,
    ) -> Result<String, AssetError> {
        if let Some(previous) = previous.filter(|key| !key.is_empty()) {
            self.discard(previous).await;
        }

        self.store(upload, rules).await
    }

    /// Deletes an asset if it is present; failures are logged, not returned
    ///
    /// Returns true if the asset existed and was removed.
    pub async fn discard(&self, key: &str) -> bool {
        match self.store.exists(key).await {
            Ok(true) => match self.store.delete(key).await {
                Ok(()) => {
                    debug!(key = %key, "Deleted image asset");
                    true
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Failed to delete image asset");
                    false
                }
            },
            Ok(false) => false,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to look up image asset");
                false
            }
        }
    }
}

/// Longest sanitized name; with the 33-byte key prefix a key stays below
/// the 255-byte file name limit
const MAX_FILE_NAME_LEN: usize = 200;

/// Longest extension kept when a name is shortened
const MAX_EXTENSION_LEN: usize = 16;

/// Replaces anything outside `[A-Za-z0-9._-]` with `_`
///
/// Only the last path component of the client filename is kept, and long
/// names are cut to [`MAX_FILE_NAME_LEN`] bytes with the extension kept.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // ".." must never survive into a key
    let cleaned = truncate_file_name(&cleaned).replace("..", "_");

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Cuts an ASCII name to [`MAX_FILE_NAME_LEN`] bytes, keeping a short extension
fn truncate_file_name(name: &str) -> String {
    if name.len() <= MAX_FILE_NAME_LEN {
        return name.to_string();
    }

    match name.rsplit_once('.') {
        Some((stem, extension)) if !extension.is_empty() && extension.len() <= MAX_EXTENSION_LEN => {
            let stem = &stem[..MAX_FILE_NAME_LEN - extension.len() - 1];
            format!("{}.{}", stem, extension)
        }
        _ => name[..MAX_FILE_NAME_LEN].to_string(),
    }
}

/// Fresh content-store key: `<32 hex uuid>_<sanitized name>`
pub fn storage_key(original: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitize_file_name(original))
}

//! Image assets: upload checks, resizing and the public content store.
//!
//! Company logos and employee profile photos go through the same pipeline:
//!
//! | Step | Implementation |
//! |---|---|
//! | **Check** (allow-list, size cap) | [`AssetRules::check`], before any decoding |
//! | **Resize** (300px wide, never upscale) | [`resize::resize_image`] on the blocking pool |
//! | **Write** (`<uuid>_<name>`) | [`ContentStore::put`] |
//!
//! The pipeline is not transactional with the database write that follows
//! it. A failed row insert leaves the stored file behind, and replacing an
//! asset deletes the old file before the new one is written.
//!
//! - **[`rules`]**: per-entity allow-lists and size caps
//! - **[`resize`]**: pure dimension math plus decode/resize/encode
//! - **[`store`]**: the [`ContentStore`] trait and the local-disk implementation
//! - **[`processor`]**: [`ImageProcessor`], combining the above

pub mod processor;
pub mod resize;
pub mod rules;
pub mod store;

use bytes::Bytes;

pub use processor::{sanitize_file_name, storage_key, ImageProcessor};
pub use rules::{AssetRules, LOGO, PROFILE_CREATE, PROFILE_UPDATE};
pub use store::{ContentStore, LocalContentStore};

/// A file received in a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the client (untrusted)
    pub file_name: String,

    /// Content type as sent by the client (untrusted, informational only)
    pub content_type: Option<String>,

    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        }
    }

    /// Browsers send an empty part for an untouched file input
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty() && self.file_name.is_empty()
    }

    /// Lower-cased extension of the client filename, if any
    pub fn extension(&self) -> Option<String> {
        let name = sanitize_file_name(&self.file_name);
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Error type for the image pipeline
///
/// Every variant is reported to the client as a validation error on the
/// upload field; see [`AssetError::field_message`].
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Content is empty or not a recognizable image
    #[error("upload is not an image")]
    NotAnImage,

    /// Extension or sniffed format outside the allow-list
    #[error("unsupported image format, expected one of: {}", .allowed.join(", "))]
    UnsupportedFormat { allowed: &'static [&'static str] },

    /// Upload larger than the cap
    #[error("upload is {size} bytes, limit is {max_kilobytes} KiB")]
    SizeExceeded { size: usize, max_kilobytes: u64 },

    /// Decoding, resizing or re-encoding failed
    #[error("failed to decode image: {0}")]
    DecodeFailure(String),

    /// The content store rejected the write
    #[error("failed to store image: {0}")]
    StorageWriteFailure(String),
}

impl AssetError {
    /// Client-facing message for the upload field `field`
    pub fn field_message(&self, field: &str) -> String {
        let attribute = field.replace('_', " ");
        match self {
            AssetError::NotAnImage => format!("The {} field must be an image.", attribute),
            AssetError::UnsupportedFormat { allowed } => format!(
                "The {} field must be a file of type: {}.",
                attribute,
                allowed.join(", ")
            ),
            AssetError::SizeExceeded { max_kilobytes, .. } => format!(
                "The {} field must not be greater than {} kilobytes.",
                attribute, max_kilobytes
            ),
            AssetError::DecodeFailure(_) | AssetError::StorageWriteFailure(_) => {
                format!("The {} failed to upload.", attribute)
            }
        }
    }
}

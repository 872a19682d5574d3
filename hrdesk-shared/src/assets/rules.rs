//! Per-entity upload constraints.
//!
//! The allow-lists and caps differ between entities and between create and
//! update on purpose; keep them as they are.

use image::ImageFormat;

use super::{AssetError, UploadedFile};

/// Allow-list and size cap for one upload field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetRules {
    /// Accepted extensions, in the order shown to clients
    pub extensions: &'static [&'static str],

    /// Maximum upload size in KiB
    pub max_kilobytes: u64,
}

/// Company logo (create and update)
pub const LOGO: AssetRules = AssetRules {
    extensions: &["jpeg", "png", "jpg", "gif"],
    max_kilobytes: 2048,
};

/// Employee profile photo on create
pub const PROFILE_CREATE: AssetRules = AssetRules {
    extensions: &["jpg", "png", "jpeg"],
    max_kilobytes: 10240,
};

/// Employee profile photo on update
pub const PROFILE_UPDATE: AssetRules = AssetRules {
    extensions: &["jpeg", "png", "jpg", "gif"],
    max_kilobytes: 2048,
};

/// Extensions a sniffed format may legitimately carry
fn format_extensions(format: ImageFormat) -> &'static [&'static str] {
    match format {
        ImageFormat::Jpeg => &["jpg", "jpeg"],
        ImageFormat::Png => &["png"],
        ImageFormat::Gif => &["gif"],
        _ => &[],
    }
}

impl AssetRules {
    fn allows(&self, extension: &str) -> bool {
        self.extensions.iter().any(|allowed| *allowed == extension)
    }

    pub fn max_bytes(&self) -> usize {
        usize::try_from(self.max_kilobytes.saturating_mul(1024)).unwrap_or(usize::MAX)
    }

    /// Checks an upload without decoding it
    ///
    /// Order: the content must sniff as an image, its format and the client
    /// extension must be allow-listed, and it must fit under the cap.
    /// Returns the sniffed format, which is also the output format.
    pub fn check(&self, upload: &UploadedFile) -> Result<ImageFormat, AssetError> {
        if upload.bytes.is_empty() {
            return Err(AssetError::NotAnImage);
        }

        let format = image::guess_format(&upload.bytes).map_err(|_| AssetError::NotAnImage)?;

        let format_allowed = format_extensions(format).iter().any(|ext| self.allows(ext));
        let extension_allowed = upload
            .extension()
            .map_or(true, |ext| self.allows(&ext));

        if !format_allowed || !extension_allowed {
            return Err(AssetError::UnsupportedFormat {
                allowed: self.extensions,
            });
        }

        if upload.bytes.len() > self.max_bytes() {
            return Err(AssetError::SizeExceeded {
                size: upload.bytes.len(),
                max_kilobytes: self.max_kilobytes,
            });
        }

        Ok(format)
    }
}

//! Resizing to a fixed width.
//!
//! [`target_dimensions`] is the pure part and carries the rules; the
//! decode/encode wrapper around it is CPU-bound and meant to run on the
//! blocking pool.

use image::{imageops::FilterType, GenericImageView, ImageFormat};
use std::io::Cursor;

use super::AssetError;

/// Width every stored image is scaled down to
pub const TARGET_WIDTH: u32 = 300;

/// Result of [`resize_image`]
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub resized: bool,
}

/// Dimensions after scaling to [`TARGET_WIDTH`], or `None` to keep the image
///
/// Height is `round(height * 300 / width)`, at least 1. Images already
/// 300px wide or narrower are never upscaled.
pub fn target_dimensions(width: u32, height: u32) -> Option<(u32, u32)> {
    if width <= TARGET_WIDTH {
        return None;
    }

    let (w, h, target) = (u64::from(width), u64::from(height), u64::from(TARGET_WIDTH));
    let scaled = (h * target + w / 2) / w;

    Some((TARGET_WIDTH, u32::try_from(scaled).unwrap_or(u32::MAX).max(1)))
}

/// Decodes, scales down if needed and re-encodes in the same format
///
/// Images that need no scaling are returned byte-for-byte after a
/// successful decode.
pub fn resize_image(bytes: &[u8], format: ImageFormat) -> Result<ProcessedImage, AssetError> {
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AssetError::DecodeFailure(e.to_string()))?;
    let (width, height) = img.dimensions();

    let Some((new_width, new_height)) = target_dimensions(width, height) else {
        return Ok(ProcessedImage {
            bytes: bytes.to_vec(),
            width,
            height,
            resized: false,
        });
    };

    let resized = img.resize_exact(new_width, new_height, FilterType::Lanczos3);

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, format)
        .map_err(|e| AssetError::DecodeFailure(format!("re-encode failed: {}", e)))?;

    Ok(ProcessedImage {
        bytes: out.into_inner(),
        width: new_width,
        height: new_height,
        resized: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb, Rgba};

    fn encode_rgb(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([10u8, 120, 200]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_target_dimensions_preserve_aspect_ratio() {
        assert_eq!(target_dimensions(600, 400), Some((300, 200)));
        assert_eq!(target_dimensions(1000, 333), Some((300, 100)));
        // 301 * 300 / 1000 = 90.3 -> 90
        assert_eq!(target_dimensions(1000, 301), Some((300, 90)));
        // 305 * 300 / 1000 = 91.5 -> 92
        assert_eq!(target_dimensions(1000, 305), Some((300, 92)));
    }

    #[test]
    fn test_target_dimensions_never_upscale() {
        assert_eq!(target_dimensions(300, 900), None);
        assert_eq!(target_dimensions(120, 80), None);
        assert_eq!(target_dimensions(0, 0), None);
    }

    #[test]
    fn test_target_dimensions_minimum_height() {
        assert_eq!(target_dimensions(5000, 1), Some((300, 1)));
    }

    #[test]
    fn test_resize_wide_png() {
        let bytes = encode_rgb(900, 600, ImageFormat::Png);
        let processed = resize_image(&bytes, ImageFormat::Png).unwrap();

        assert!(processed.resized);
        assert_eq!((processed.width, processed.height), (300, 200));

        let reloaded = image::load_from_memory_with_format(&processed.bytes, ImageFormat::Png).unwrap();
        assert_eq!(reloaded.dimensions(), (300, 200));
    }

    #[test]
    fn test_resize_keeps_format() {
        let bytes = encode_rgb(640, 480, ImageFormat::Jpeg);
        let processed = resize_image(&bytes, ImageFormat::Jpeg).unwrap();

        assert_eq!(image::guess_format(&processed.bytes).unwrap(), ImageFormat::Jpeg);
        assert_eq!((processed.width, processed.height), (300, 225));
    }

    #[test]
    fn test_resize_rgba_gif() {
        let img = ImageBuffer::from_pixel(400, 100, Rgba([1u8, 2, 3, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img).write_to(&mut out, ImageFormat::Gif).unwrap();

        let processed = resize_image(&out.into_inner(), ImageFormat::Gif).unwrap();
        assert_eq!((processed.width, processed.height), (300, 75));
    }

    #[test]
    fn test_narrow_image_is_untouched() {
        let bytes = encode_rgb(120, 80, ImageFormat::Png);
        let processed = resize_image(&bytes, ImageFormat::Png).unwrap();

        assert!(!processed.resized);
        assert_eq!(processed.bytes, bytes);
        assert_eq!((processed.width, processed.height), (120, 80));
    }

    #[test]
    fn test_corrupt_image_fails_to_decode() {
        let mut bytes = encode_rgb(50, 50, ImageFormat::Png);
        bytes.truncate(20);

        assert!(matches!(
            resize_image(&bytes, ImageFormat::Png),
            Err(AssetError::DecodeFailure(_))
        ));
    }
}

//! Inline image intake.
//!
//! Cover and profile images are stored inline on their rows as
//! `data:image/jpeg;base64,...` URLs rather than as blob-storage
//! references, so uploads are scaled down to a bounding box and re-encoded
//! as lossy JPEG before they ever reach the database. Pasted external URLs
//! are stored verbatim and never fetched.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::error::CoreError;

/// JPEG quality used when re-encoding uploads.
const JPEG_QUALITY: u8 = 80;

/// Bounding box for a resized upload.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub max_width: u32,
    pub max_height: u32,
}

/// Bounding box for event cover images.
pub const COVER_BOUNDS: Bounds = Bounds {
    max_width: 1080,
    max_height: 1080,
};

/// Bounding box for profile images.
pub const AVATAR_BOUNDS: Bounds = Bounds {
    max_width: 400,
    max_height: 400,
};

/// Compute output dimensions for fitting `(width, height)` inside `bounds`.
///
/// The larger original dimension is scaled to exactly its bound and the
/// other dimension proportionally. Images already inside the box are
/// returned unchanged -- never upscale.
pub fn fit_within(width: u32, height: u32, bounds: Bounds) -> (u32, u32) {
    if width <= bounds.max_width && height <= bounds.max_height {
        return (width, height);
    }

    let w_ratio = f64::from(bounds.max_width) / f64::from(width);
    let h_ratio = f64::from(bounds.max_height) / f64::from(height);
    let ratio = w_ratio.min(h_ratio);

    let out_w = (f64::from(width) * ratio).round().max(1.0) as u32;
    let out_h = (f64::from(height) * ratio).round().max(1.0) as u32;
    (out_w, out_h)
}

/// Decode an uploaded image, scale it into `bounds`, and re-encode it as an
/// inline JPEG data URL.
///
/// Accepts anything the `image` crate can sniff (jpeg/png/webp). Decode or
/// encode failure is a [`CoreError::Validation`] so the submitting form can
/// surface it inline and block submission.
pub fn process_upload(bytes: &[u8], bounds: Bounds) -> Result<String, CoreError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| CoreError::Validation(format!("Could not decode image: {e}")))?;

    let (width, height) = (img.width(), img.height());
    let (out_w, out_h) = fit_within(width, height, bounds);

    let img = if (out_w, out_h) != (width, height) {
        img.resize_exact(out_w, out_h, FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| CoreError::Validation(format!("Could not encode image: {e}")))?;

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&buf)))
}

/// Decode a base64 upload payload into raw bytes.
///
/// Tolerates an optional `data:<mime>;base64,` prefix so clients can submit
/// either a bare base64 string or a full data URL.
pub fn decode_upload(payload: &str) -> Result<Vec<u8>, CoreError> {
    let b64 = match payload.split_once(";base64,") {
        Some((_, rest)) => rest,
        None => payload,
    };
    STANDARD
        .decode(b64.trim())
        .map_err(|e| CoreError::Validation(format!("Invalid base64 image payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX_800_600: Bounds = Bounds {
        max_width: 800,
        max_height: 600,
    };

    #[test]
    fn landscape_scales_width_to_bound() {
        // 1600x900 into 800x600: width is the binding dimension.
        assert_eq!(fit_within(1600, 900, BOX_800_600), (800, 450));
    }

    #[test]
    fn portrait_scales_height_to_bound() {
        assert_eq!(fit_within(900, 1800, BOX_800_600), (300, 600));
    }

    #[test]
    fn never_upscales() {
        assert_eq!(fit_within(320, 240, BOX_800_600), (320, 240));
        assert_eq!(fit_within(800, 600, BOX_800_600), (800, 600));
    }

    #[test]
    fn extreme_aspect_ratio_keeps_at_least_one_pixel() {
        let (w, h) = fit_within(10_000, 2, BOX_800_600);
        assert_eq!(w, 800);
        assert!(h >= 1);
    }

    #[test]
    fn process_upload_resizes_and_emits_data_url() {
        // Solid 1600x900 PNG, well above the cover bounds.
        let img = image::RgbImage::from_pixel(1600, 900, image::Rgb([200, 40, 40]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("png encoding should succeed");

        let data_url = process_upload(&png, COVER_BOUNDS).expect("upload should process");
        assert!(data_url.starts_with("data:image/jpeg;base64,"));

        // Round-trip the payload and confirm the box was honored.
        let bytes = decode_upload(&data_url).expect("data url should decode");
        let out = image::load_from_memory(&bytes).expect("jpeg should decode");
        assert_eq!(out.width(), 1080);
        assert_eq!(out.height(), 608); // 900 * (1080/1600), rounded
    }

    #[test]
    fn process_upload_rejects_garbage() {
        let err = process_upload(b"definitely not an image", AVATAR_BOUNDS).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn decode_upload_accepts_bare_and_prefixed_payloads() {
        let encoded = STANDARD.encode(b"pixels");
        assert_eq!(decode_upload(&encoded).unwrap(), b"pixels");

        let prefixed = format!("data:image/png;base64,{encoded}");
        assert_eq!(decode_upload(&prefixed).unwrap(), b"pixels");

        assert!(decode_upload("%%%not-base64%%%").is_err());
    }
}

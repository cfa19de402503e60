use std::io::Cursor;

use image::imageops::FilterType;
use image::{ImageFormat, RgbaImage};

use crate::foundation::error::{LayerError, LayerResult};

/// Decode an uploaded PNG or JPEG into straight-alpha RGBA8.
///
/// Uploads that are empty, larger than `max_upload_bytes`, or not PNG/JPEG are rejected with
/// [`LayerError::Validation`]; undecodable payloads yield [`LayerError::Decode`].
pub fn decode_upload(bytes: &[u8], max_upload_bytes: usize) -> LayerResult<RgbaImage> {
    if bytes.is_empty() {
        return Err(LayerError::validation("upload is empty"));
    }
    if bytes.len() > max_upload_bytes {
        return Err(LayerError::validation(format!(
            "upload is {} bytes, limit is {max_upload_bytes} bytes",
            bytes.len()
        )));
    }

    let format = image::guess_format(bytes)
        .map_err(|e| LayerError::validation(format!("unrecognized image format: {e}")))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(LayerError::validation(format!(
            "unsupported image format {format:?}; expected PNG or JPEG"
        )));
    }

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| LayerError::decode(format!("decode {format:?} upload: {e}")))?;
    Ok(decoded.to_rgba8())
}

/// Shrink `image` to fit inside `max_side x max_side`, keeping its aspect ratio.
///
/// Images that already fit are returned untouched (never upscaled). `max_side == 0` disables
/// the limit.
pub fn optimize_image(image: RgbaImage, max_side: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    if max_side == 0 || (w <= max_side && h <= max_side) || w == 0 || h == 0 {
        return image;
    }

    let scale = f64::min(
        f64::from(max_side) / f64::from(w),
        f64::from(max_side) / f64::from(h),
    );
    let nw = ((f64::from(w) * scale).round() as u32).clamp(1, max_side);
    let nh = ((f64::from(h) * scale).round() as u32).clamp(1, max_side);
    tracing::debug!(from_w = w, from_h = h, to_w = nw, to_h = nh, "downscaling upload");
    image::imageops::resize(&image, nw, nh, FilterType::Lanczos3)
}

/// Encode an RGBA8 image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> LayerResult<Vec<u8>> {
    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| LayerError::decode(format!("encode png: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

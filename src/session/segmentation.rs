use std::path::Path;

use image::RgbaImage;

use crate::foundation::core::CanvasSize;
use crate::foundation::error::{LayerError, LayerResult};

/// Foreground extraction collaborator: image in, same-size RGBA cutout out.
///
/// The cutout keeps the subject's pixels and is transparent elsewhere. Implementations may call
/// out to a model or a remote service; the editor treats them as a black box.
pub trait BackgroundRemover {
    /// Produce the subject cutout for `image`.
    fn remove_background(&self, image: &RgbaImage) -> LayerResult<RgbaImage>;
}

impl<F> BackgroundRemover for F
where
    F: Fn(&RgbaImage) -> LayerResult<RgbaImage>,
{
    fn remove_background(&self, image: &RgbaImage) -> LayerResult<RgbaImage> {
        self(image)
    }
}

/// A cutout that was produced ahead of time (for example saved by an earlier segmentation run).
///
/// If the uploaded image was downscaled, the cutout is resized to match with the same filter
/// the upload went through.
#[derive(Clone, Debug)]
pub struct PrecomputedCutout {
    cutout: RgbaImage,
}

impl PrecomputedCutout {
    /// Wrap an already decoded cutout.
    pub fn from_image(cutout: RgbaImage) -> Self {
        Self { cutout }
    }

    /// Read and decode a cutout file (any format `image` can open).
    pub fn from_path(path: impl AsRef<Path>) -> LayerResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            LayerError::decode(format!("open cutout '{}': {e}", path.display()))
        })?;
        Ok(Self::from_image(img.to_rgba8()))
    }

    /// The stored cutout.
    pub fn image(&self) -> &RgbaImage {
        &self.cutout
    }
}

impl BackgroundRemover for PrecomputedCutout {
    fn remove_background(&self, image: &RgbaImage) -> LayerResult<RgbaImage> {
        let want = CanvasSize::of(image);
        if CanvasSize::of(&self.cutout) == want {
            return Ok(self.cutout.clone());
        }
        let (cw, ch) = self.cutout.dimensions();
        if want.is_empty() || cw == 0 || ch == 0 {
            return Err(LayerError::segmentation("precomputed cutout or image is empty"));
        }
        // Only a uniform rescale (the one upload normalization applies) is accepted, give or take
        // a rounded pixel.
        let scaled_h = (f64::from(ch) * f64::from(want.width) / f64::from(cw)).round();
        if (scaled_h - f64::from(want.height)).abs() > 1.0 {
            return Err(LayerError::segmentation(format!(
                "precomputed cutout is {cw}x{ch}, cannot match {}x{}",
                want.width, want.height
            )));
        }
        tracing::debug!(
            from_w = cw,
            from_h = ch,
            to_w = want.width,
            to_h = want.height,
            "resizing cutout"
        );
        Ok(image::imageops::resize(
            &self.cutout,
            want.width,
            want.height,
            image::imageops::FilterType::Lanczos3,
        ))
    }
}

/// Run `remover` and check its contract: a cutout of exactly the input's size.
pub(crate) fn extract_subject(
    remover: &dyn BackgroundRemover,
    image: &RgbaImage,
) -> LayerResult<RgbaImage> {
    let cutout = remover.remove_background(image).map_err(|e| match e {
        e @ LayerError::Segmentation(_) => e,
        other => LayerError::segmentation(other.to_string()),
    })?;
    CanvasSize::of(image).ensure_matches("subject cutout", &cutout)?;
    Ok(cutout)
}

#[cfg(test)]
#[path = "../../tests/unit/session/segmentation.rs"]
mod tests;

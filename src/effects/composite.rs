use image::{Rgba, RgbaImage};

use crate::foundation::core::CanvasSize;
use crate::foundation::error::{LayerError, LayerResult};
use crate::foundation::math::{
    mul_div255_u8, opacity_to_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};

/// Source-over of one premultiplied pixel; `coverage` scales the source before blending.
fn blend_px(dst: &mut [u8], src: &[u8], coverage: u8) {
    let src_a = mul_div255_u8(u16::from(src[3]), u16::from(coverage));
    if src_a == 0 {
        return;
    }
    let keep = u16::from(255 - src_a);
    for (d, &s) in dst.iter_mut().zip(src) {
        let lit = mul_div255_u8(u16::from(s), u16::from(coverage));
        *d = lit.saturating_add(mul_div255_u8(u16::from(*d), keep));
    }
}

/// Blend the premultiplied `layer` over `acc`, scaled by `opacity`.
pub(crate) fn stack_premul(acc: &mut [u8], layer: &[u8], opacity: f32) -> LayerResult<()> {
    if acc.len() != layer.len() || !acc.len().is_multiple_of(4) {
        return Err(LayerError::render(format!(
            "cannot stack a {}-byte layer on a {}-byte canvas",
            layer.len(),
            acc.len()
        )));
    }
    let coverage = opacity_to_u8(opacity);
    if coverage == 0 {
        return Ok(());
    }
    for (d, s) in acc.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        blend_px(d, s, coverage);
    }
    Ok(())
}

/// Premultiplied copy of a straight-alpha image.
pub(crate) fn to_premul(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = image.as_raw().clone();
    premultiply_rgba8_in_place(&mut bytes);
    bytes
}

/// Straight-alpha image from a premultiplied buffer of `size`.
pub(crate) fn from_premul(size: CanvasSize, mut bytes: Vec<u8>) -> LayerResult<RgbaImage> {
    unpremultiply_rgba8_in_place(&mut bytes);
    RgbaImage::from_raw(size.width, size.height, bytes)
        .ok_or_else(|| LayerError::render("premultiplied buffer does not match canvas size"))
}

/// Blend `top` over `bottom` ("over" operator, premultiplied math).
///
/// Both images must have the same dimensions.
pub fn alpha_composite(bottom: &RgbaImage, top: &RgbaImage) -> LayerResult<RgbaImage> {
    let size = CanvasSize::of(bottom);
    size.ensure_matches("top layer", top)?;

    let mut acc = to_premul(bottom);
    stack_premul(&mut acc, &to_premul(top), 1.0)?;
    from_premul(size, acc)
}

/// Stack the three editor layers: `base`, then `text_layer`, then `subject`.
///
/// The order is what lets text sit behind the subject while staying above the background. All
/// three images must share `base`'s dimensions; otherwise nothing is produced and
/// [`LayerError::DimensionMismatch`] is returned.
#[tracing::instrument(skip_all, fields(w = base.width(), h = base.height()))]
pub fn composite_final(
    base: &RgbaImage,
    text_layer: &RgbaImage,
    subject: &RgbaImage,
) -> LayerResult<RgbaImage> {
    let size = CanvasSize::of(base);
    size.ensure_matches("text layer", text_layer)?;
    size.ensure_matches("subject cutout", subject)?;

    let mut acc = to_premul(base);
    stack_premul(&mut acc, &to_premul(text_layer), 1.0)?;
    stack_premul(&mut acc, &to_premul(subject), 1.0)?;
    from_premul(size, acc)
}

/// Grayscale copy of `base` with the subject shown in color.
///
/// The subject's alpha channel selects between the subject pixel (alpha 255) and the opaque
/// luminance of `base` (alpha 0); intermediate alphas weight the two.
pub fn grayscale_with_subject(base: &RgbaImage, subject: &RgbaImage) -> LayerResult<RgbaImage> {
    let size = CanvasSize::of(base);
    size.ensure_matches("subject cutout", subject)?;

    let luma = image::imageops::grayscale(base);
    let mut out = RgbaImage::new(size.width, size.height);
    for ((o, l), s) in out
        .pixels_mut()
        .zip(luma.pixels())
        .zip(subject.pixels())
    {
        let l = l.0[0];
        let m = u16::from(s.0[3]);
        let mut px = [l, l, l, 255];
        for (out, &fg) in px.iter_mut().zip(&s.0) {
            let fg = mul_div255_u8(u16::from(fg), m);
            *out = fg.saturating_add(mul_div255_u8(u16::from(*out), 255 - m));
        }
        *o = Rgba(px);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;

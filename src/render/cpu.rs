use crate::foundation::core::{CanvasSize, Point};
use crate::foundation::error::{LayerError, LayerResult};
use crate::text::layout::GlyphPlan;

/// Opaque colors used for one paint pass. Opacity is applied later, when the pass is blended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ink {
    pub(crate) fill: [u8; 3],
    /// Outline width in pixels and its color; a width of 0 draws no outline.
    pub(crate) stroke: Option<(u32, [u8; 3])>,
}

impl Ink {
    pub(crate) fn solid(fill: [u8; 3]) -> Self {
        Self { fill, stroke: None }
    }
}

/// Paint `plan` with its top-left corner at `origin` into a fresh premultiplied RGBA8 buffer.
pub(crate) fn paint_plan(
    size: CanvasSize,
    plan: &GlyphPlan,
    origin: Point,
    ink: Ink,
) -> LayerResult<Vec<u8>> {
    match plan {
        GlyphPlan::Outline {
            font,
            font_size,
            glyphs,
            ..
        } => paint_outline(size, font, *font_size, glyphs, origin, ink),
        GlyphPlan::Cells { cells, scale, .. } => {
            let mut buf = vec![0u8; size.rgba_len()?];
            // Bitmap glyphs stay on the pixel grid.
            let ox = origin.x.round() as i64;
            let oy = origin.y.round() as i64;
            if let Some((width, color)) = ink.stroke.filter(|(w, _)| *w > 0) {
                blit_cells(&mut buf, size, cells, *scale, (ox, oy), width, opaque(color));
            }
            blit_cells(&mut buf, size, cells, *scale, (ox, oy), 0, opaque(ink.fill));
            Ok(buf)
        }
    }
}

fn paint_outline(
    size: CanvasSize,
    font: &vello_cpu::peniko::FontData,
    font_size: f32,
    glyphs: &[vello_cpu::Glyph],
    origin: Point,
    ink: Ink,
) -> LayerResult<Vec<u8>> {
    let width: u16 = size
        .width
        .try_into()
        .map_err(|_| LayerError::render("text layer width exceeds u16"))?;
    let height: u16 = size
        .height
        .try_into()
        .map_err(|_| LayerError::render("text layer height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));

    if let Some((stroke_width, [r, g, b])) = ink.stroke.filter(|(w, _)| *w > 0) {
        // The stroke is centered on the outline; the fill drawn on top hides the inner half.
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(f64::from(stroke_width) * 2.0));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 255));
        ctx.glyph_run(font)
            .font_size(font_size)
            .stroke_glyphs(glyphs.iter().copied());
    }

    let [r, g, b] = ink.fill;
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, 255));
    ctx.glyph_run(font)
        .font_size(font_size)
        .fill_glyphs(glyphs.iter().copied());

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

/// Fill each `scale x scale` cell block grown by `grow` pixels per side, clipped to the canvas.
fn blit_cells(
    buf: &mut [u8],
    size: CanvasSize,
    cells: &[(u32, u32)],
    scale: u32,
    origin: (i64, i64),
    grow: u32,
    px: [u8; 4],
) {
    let (w, h) = (i64::from(size.width), i64::from(size.height));
    let scale = i64::from(scale);
    let grow = i64::from(grow);
    for &(col, row) in cells {
        let x0 = (origin.0 + i64::from(col) * scale - grow).max(0);
        let y0 = (origin.1 + i64::from(row) * scale - grow).max(0);
        let x1 = (origin.0 + (i64::from(col) + 1) * scale + grow).min(w);
        let y1 = (origin.1 + (i64::from(row) + 1) * scale + grow).min(h);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = ((y * w + x) as usize) * 4;
                buf[idx..idx + 4].copy_from_slice(&px);
            }
        }
    }
}

fn opaque([r, g, b]: [u8; 3]) -> [u8; 4] {
    [r, g, b, 255]
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

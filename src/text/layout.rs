use std::borrow::Cow;
use std::collections::HashMap;

use crate::assets::fonts::{BuiltinFace, OutlineFace};
use crate::foundation::error::{LayerError, LayerResult};

/// Brush type carried through Parley layouts. Colors are applied at paint time, so this is a unit
/// marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrush;

/// Shaped text ready to paint, positioned relative to its own top-left corner.
pub(crate) enum GlyphPlan {
    Outline {
        font: vello_cpu::peniko::FontData,
        font_size: f32,
        glyphs: Vec<vello_cpu::Glyph>,
        width: f64,
        height: f64,
    },
    Cells {
        /// Inked cells as `(column, row)` in font units.
        cells: Vec<(u32, u32)>,
        scale: u32,
        width: f64,
        height: f64,
    },
}

impl GlyphPlan {
    pub(crate) fn size(&self) -> (f64, f64) {
        match self {
            Self::Outline { width, height, .. } | Self::Cells { width, height, .. } => {
                (*width, *height)
            }
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Self::Outline { glyphs, .. } => glyphs.is_empty(),
            Self::Cells { cells, .. } => cells.is_empty(),
        }
    }
}

/// Stateful helper for shaping text with Parley from raw font bytes.
///
/// Every distinct font file gets its own font collection, keyed by content hash. Two files that
/// declare the same family name (a regular and a bold cut, say) therefore never share a family,
/// and the face Parley shapes with is always the one whose bytes are painted.
pub(crate) struct TextLayoutEngine {
    layout_ctx: parley::LayoutContext<TextBrush>,
    slots: HashMap<u64, FontSlot>,
}

struct FontSlot {
    font_ctx: parley::FontContext,
    /// Family registered from the file, `None` when the bytes hold no usable font.
    family: Option<String>,
}

impl FontSlot {
    fn register(bytes: &[u8]) -> Self {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
        let family = families.first().and_then(|(id, _)| {
            font_ctx
                .collection
                .family_name(*id)
                .map(|n| n.to_string())
        });
        Self { font_ctx, family }
    }
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            layout_ctx: parley::LayoutContext::new(),
            slots: HashMap::new(),
        }
    }

    /// Shape `text` with an outline face.
    ///
    /// Returns `Ok(None)` when the font bytes cannot be registered; callers treat that like an
    /// unresolved family.
    pub(crate) fn layout_outline(
        &mut self,
        text: &str,
        face: &OutlineFace,
    ) -> LayerResult<Option<GlyphPlan>> {
        let size_px = face.size_px();
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(LayerError::validation("font size must be finite and > 0"));
        }

        let key = xxhash_rust::xxh3::xxh3_64(face.data());
        let slot = self
            .slots
            .entry(key)
            .or_insert_with(|| FontSlot::register(face.data()));
        let Some(family_name) = slot.family.clone() else {
            return Ok(None);
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut slot.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Center,
            parley::AlignmentOptions::default(),
        );

        let mut glyphs = Vec::new();
        let mut font_size = size_px;
        // Face within the file (non-zero only for collections).
        let mut face_index = 0;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                font_size = run.run().font_size();
                face_index = run.run().font().index;
                glyphs.extend(run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.data().to_vec()),
            face_index,
        );
        Ok(Some(GlyphPlan::Outline {
            font,
            font_size,
            glyphs,
            width: f64::from(layout.width()),
            height: f64::from(layout.height()),
        }))
    }
}

/// Lay out `text` with the built-in 8x8 face; each line is centered within the block.
pub(crate) fn layout_builtin(text: &str, face: BuiltinFace) -> GlyphPlan {
    let cell = BuiltinFace::CELL;
    let lines: Vec<Vec<char>> = text.split('\n').map(|l| l.chars().collect()).collect();
    let max_chars = lines.iter().map(Vec::len).max().unwrap_or(0) as u32;
    let unit = f64::from(cell) * f64::from(face.scale());

    let mut cells = Vec::new();
    for (row_idx, line) in lines.iter().enumerate() {
        let line_chars = line.len() as u32;
        // Center shorter lines on the widest one, in whole font units.
        let indent = (max_chars - line_chars) * cell / 2;
        let top = row_idx as u32 * cell;
        for (col_idx, &ch) in line.iter().enumerate() {
            let left = indent + col_idx as u32 * cell;
            for (row, bits) in BuiltinFace::glyph_rows(ch).into_iter().enumerate() {
                for col in 0..cell {
                    if (bits >> col) & 1 == 1 {
                        cells.push((left + col, top + row as u32));
                    }
                }
            }
        }
    }

    let scale = face.scale();
    GlyphPlan::Cells {
        cells,
        scale,
        width: f64::from(max_chars) * unit,
        height: lines.len() as f64 * unit,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;

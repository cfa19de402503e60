use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use font8x8::{BASIC_FONTS, BLOCK_FONTS, GREEK_FONTS, LATIN_FONTS, UnicodeFonts};

use crate::foundation::error::{LayerError, LayerResult};

/// A rasterizable font face at a concrete size.
#[derive(Clone, Debug)]
pub enum FontFace {
    /// TrueType/OpenType outlines shaped with `parley`.
    Outline(OutlineFace),
    /// The built-in 8x8 bitmap face used when a family cannot be resolved.
    Builtin(BuiltinFace),
}

/// Raw outline font bytes plus the requested pixel size.
#[derive(Clone, Debug)]
pub struct OutlineFace {
    data: Arc<Vec<u8>>,
    size_px: f32,
}

impl OutlineFace {
    /// Wrap font file bytes (TTF/OTF) at `size_px`.
    pub fn new(data: Arc<Vec<u8>>, size_px: f32) -> Self {
        Self { data, size_px }
    }

    /// Font file bytes.
    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }

    /// Requested size in pixels.
    pub fn size_px(&self) -> f32 {
        self.size_px
    }
}

/// Nearest-neighbor scaled 8x8 bitmap face.
///
/// The requested point size is approximated by an integer cell scale, so the rendered size only
/// matches the request for multiples of 8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltinFace {
    scale: u32,
}

impl BuiltinFace {
    /// Glyph cell side in font units.
    pub const CELL: u32 = 8;

    /// Pick the cell scale closest to `size_pt` (minimum 1).
    pub fn for_size(size_pt: u32) -> Self {
        let scale = ((f64::from(size_pt) / f64::from(Self::CELL)).round() as u32).max(1);
        Self { scale }
    }

    /// Pixels per font unit.
    pub fn scale(self) -> u32 {
        self.scale
    }

    /// Rendered glyph cell side in pixels.
    pub fn cell_px(self) -> u32 {
        Self::CELL.saturating_mul(self.scale)
    }

    /// 8 row bitmasks for `ch`; bit `n` set means column `n` (from the left) is inked.
    ///
    /// Unknown characters render as `?`.
    pub(crate) fn glyph_rows(ch: char) -> [u8; 8] {
        BASIC_FONTS
            .get(ch)
            .or_else(|| LATIN_FONTS.get(ch))
            .or_else(|| GREEK_FONTS.get(ch))
            .or_else(|| BLOCK_FONTS.get(ch))
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8])
    }
}

/// Resolve `(family, size)` into a face.
///
/// Returning `None` is not an error: the compositor substitutes [`BuiltinFace`] and reports a
/// [`crate::RenderWarning::FontFallback`].
pub trait FontResolver {
    /// Look up `family` at `size_pt`.
    fn resolve(&self, family: &str, size_pt: u32) -> Option<FontFace>;
}

impl<F> FontResolver for F
where
    F: Fn(&str, u32) -> Option<FontFace>,
{
    fn resolve(&self, family: &str, size_pt: u32) -> Option<FontFace> {
        self(family, size_pt)
    }
}

/// In-memory family-name -> font-bytes registry.
///
/// Family names are matched case-insensitively. Nothing is discovered implicitly: callers
/// register every face they want to offer.
#[derive(Clone, Debug, Default)]
pub struct FontRegistry {
    faces: HashMap<String, Arc<Vec<u8>>>,
}

impl FontRegistry {
    /// Empty registry; every lookup falls back to the built-in face.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font file bytes under `family`, replacing any previous entry.
    pub fn register(&mut self, family: &str, data: Vec<u8>) -> LayerResult<()> {
        let key = family_key(family);
        if key.is_empty() {
            return Err(LayerError::validation("font family name must be non-empty"));
        }
        if data.is_empty() {
            return Err(LayerError::validation(format!(
                "font data for family '{family}' is empty"
            )));
        }
        self.faces.insert(key, Arc::new(data));
        Ok(())
    }

    /// Read a font file and register it under `family`.
    pub fn register_file(&mut self, family: &str, path: impl AsRef<Path>) -> LayerResult<()> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            LayerError::validation(format!("read font file '{}': {e}", path.display()))
        })?;
        self.register(family, data)
    }

    /// Registered family keys, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut out: Vec<String> = self.faces.keys().cloned().collect();
        out.sort();
        out
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl FontResolver for FontRegistry {
    fn resolve(&self, family: &str, size_pt: u32) -> Option<FontFace> {
        if size_pt == 0 {
            return None;
        }
        self.faces
            .get(&family_key(family))
            .map(|data| FontFace::Outline(OutlineFace::new(Arc::clone(data), size_pt as f32)))
    }
}

fn family_key(family: &str) -> String {
    family.trim().to_lowercase()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;

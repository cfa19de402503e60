use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::color::Rgb8;
use crate::foundation::core::Offset;
use crate::foundation::error::{LayerError, LayerResult};

/// Case transform applied to annotation content before rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    /// Render content as typed.
    #[default]
    None,
    /// Full Unicode uppercase.
    Uppercase,
    /// Full Unicode lowercase.
    Lowercase,
    /// First character of the whole string uppercased, the rest lowercased.
    Capitalize,
}

impl TextTransform {
    /// Apply the transform. Case mapping is locale-independent.
    pub fn apply(self, content: &str) -> String {
        match self {
            Self::None => content.to_owned(),
            Self::Uppercase => content.to_uppercase(),
            Self::Lowercase => content.to_lowercase(),
            Self::Capitalize => {
                let mut chars = content.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => {
                        let mut out: String = first.to_uppercase().collect();
                        out.push_str(&chars.as_str().to_lowercase());
                        out
                    }
                }
            }
        }
    }
}

/// Requested font family and size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontRef {
    /// Family name handed to the [`crate::FontResolver`].
    pub family: String,
    /// Size in points (1pt = 1px).
    pub size_pt: u32,
}

impl FontRef {
    /// Largest size accepted by [`TextAnnotation::validate`].
    pub const MAX_SIZE_PT: u32 = 4096;
}

impl Default for FontRef {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_owned(),
            size_pt: 50,
        }
    }
}

/// Drop shadow drawn beneath an annotation's glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadow {
    /// Whether the shadow is drawn at all.
    pub enabled: bool,
    /// Shadow color; by default it is drawn fully opaque regardless of the text opacity.
    pub color: Rgb8,
    /// Offset from the text anchor.
    pub offset: Offset,
    /// Gaussian blur radius (standard deviation) in pixels; `0` draws a hard shadow.
    pub blur_radius: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: true,
            color: Rgb8::BLACK,
            offset: Offset::new(5, 5),
            blur_radius: 4.0,
        }
    }
}

/// One text overlay.
///
/// Annotations are plain values: build a fresh one (or a modified clone) for each render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextAnnotation {
    /// Raw text; `\n` starts a new line.
    pub content: String,
    /// Case transform applied to `content`.
    pub transform: TextTransform,
    /// Font family and size.
    pub font: FontRef,
    /// Fill color.
    pub fill: Rgb8,
    /// Opacity in `[0, 1]` applied to fill and stroke.
    pub opacity: f32,
    /// Outline width in pixels, drawn outside the glyph edge.
    pub stroke_width: u32,
    /// Outline color.
    pub stroke_color: Rgb8,
    /// Counter-clockwise rotation about the anchor, in degrees.
    pub rotation_deg: f32,
    /// Offset of the anchor from the canvas center.
    pub offset: Offset,
    /// Optional drop shadow.
    pub shadow: Option<Shadow>,
}

impl Default for TextAnnotation {
    fn default() -> Self {
        Self {
            content: "Your Custom Text".to_owned(),
            transform: TextTransform::None,
            font: FontRef::default(),
            fill: Rgb8::WHITE,
            opacity: 1.0,
            stroke_width: 0,
            stroke_color: Rgb8::BLACK,
            rotation_deg: 0.0,
            offset: Offset::default(),
            shadow: None,
        }
    }
}

impl TextAnnotation {
    /// Default-styled annotation with the given content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Content after the case transform.
    pub fn rendered_text(&self) -> String {
        self.transform.apply(&self.content)
    }

    /// Straight-alpha fill color with opacity folded into alpha.
    pub fn fill_rgba(&self) -> [u8; 4] {
        self.fill.with_opacity(self.opacity)
    }

    /// Straight-alpha stroke color with opacity folded into alpha.
    pub fn stroke_rgba(&self) -> [u8; 4] {
        self.stroke_color.with_opacity(self.opacity)
    }

    /// Shadow settings when a shadow is configured and enabled.
    pub fn active_shadow(&self) -> Option<&Shadow> {
        self.shadow.as_ref().filter(|s| s.enabled)
    }

    /// Reject values that cannot be rendered (non-finite or out-of-range numbers).
    pub fn validate(&self) -> LayerResult<()> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(LayerError::validation(format!(
                "text opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        if !self.rotation_deg.is_finite() {
            return Err(LayerError::validation("text rotation must be finite"));
        }
        if self.font.size_pt > FontRef::MAX_SIZE_PT {
            return Err(LayerError::validation(format!(
                "font size must be at most {}pt, got {}",
                FontRef::MAX_SIZE_PT,
                self.font.size_pt
            )));
        }
        if let Some(shadow) = self.active_shadow()
            && (!shadow.blur_radius.is_finite() || shadow.blur_radius < 0.0)
        {
            return Err(LayerError::validation(
                "shadow blur_radius must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

/// Ordered annotations; later entries paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextSet {
    annotations: Vec<TextAnnotation>,
}

impl TextSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an annotation (painted above everything already in the set).
    pub fn push(&mut self, annotation: TextAnnotation) {
        self.annotations.push(annotation);
    }

    /// Annotations in paint order.
    pub fn iter(&self) -> std::slice::Iter<'_, TextAnnotation> {
        self.annotations.iter()
    }

    /// Annotations in paint order.
    pub fn as_slice(&self) -> &[TextAnnotation] {
        &self.annotations
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Return `true` when there is nothing to paint.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Parse a JSON array of annotations.
    pub fn from_json_str(s: &str) -> LayerResult<Self> {
        serde_json::from_str(s).map_err(|e| LayerError::serde(format!("parse text set JSON: {e}")))
    }

    /// Parse a JSON array of annotations from a reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LayerResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| LayerError::serde(format!("parse text set JSON: {e}")))
    }

    /// Parse a JSON array of annotations from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LayerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LayerError::validation(format!("open text set JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> LayerResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LayerError::serde(format!("serialize text set JSON: {e}")))
    }
}

impl From<Vec<TextAnnotation>> for TextSet {
    fn from(annotations: Vec<TextAnnotation>) -> Self {
        Self { annotations }
    }
}

impl FromIterator<TextAnnotation> for TextSet {
    fn from_iter<I: IntoIterator<Item = TextAnnotation>>(iter: I) -> Self {
        Self {
            annotations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TextSet {
    type Item = &'a TextAnnotation;
    type IntoIter = std::slice::Iter<'a, TextAnnotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/annotation.rs"]
mod tests;

use std::fmt;

use image::RgbaImage;

use crate::assets::fonts::{BuiltinFace, FontFace, FontRegistry, FontResolver};
use crate::effects::blur::soften_shadow;
use crate::effects::composite::{from_premul, stack_premul};
use crate::effects::rotate::rotate_premul_about;
use crate::foundation::core::{CanvasSize, Point};
use crate::foundation::error::LayerResult;
use crate::render::cpu::{Ink, paint_plan};
use crate::text::annotation::{FontRef, TextAnnotation, TextSet};
use crate::text::layout::{GlyphPlan, TextLayoutEngine, layout_builtin};

pub use crate::effects::rotate::Resample;

/// Tunables for [`LayerCompositor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositorOpts {
    /// Scale the drop shadow by the annotation opacity.
    ///
    /// Off by default: the shadow is drawn with its raw color even under semi-transparent text.
    pub shadow_follows_opacity: bool,
    /// Filter used when rotating a text layer.
    pub resample: Resample,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            shadow_follows_opacity: false,
            resample: Resample::Bicubic,
        }
    }
}

impl CompositorOpts {
    /// Set [`CompositorOpts::shadow_follows_opacity`].
    pub fn with_shadow_follows_opacity(mut self, on: bool) -> Self {
        self.shadow_follows_opacity = on;
        self
    }

    /// Set [`CompositorOpts::resample`].
    pub fn with_resample(mut self, resample: Resample) -> Self {
        self.resample = resample;
        self
    }
}

/// Non-fatal condition hit while rendering a text layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderWarning {
    /// The requested font could not be used; the built-in face was drawn instead.
    FontFallback {
        /// Position of the annotation in its [`TextSet`].
        index: usize,
        /// Requested family.
        family: String,
        /// Requested size.
        size_pt: u32,
    },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontFallback {
                index,
                family,
                size_pt,
            } => write!(
                f,
                "text #{index}: font '{family}' at {size_pt}pt unavailable, used built-in face"
            ),
        }
    }
}

/// A rendered text layer and the warnings collected while producing it.
#[derive(Clone, Debug)]
pub struct TextLayer {
    /// Straight-alpha RGBA layer of the requested canvas size.
    pub image: RgbaImage,
    /// Recovered problems, in annotation order.
    pub warnings: Vec<RenderWarning>,
}

/// Renders text sets into transparent layers and stacks layers together.
///
/// The compositor holds only shaping scratch state; it never keeps annotations or images between
/// calls, so one instance can serve any number of renders. Use one instance per thread.
pub struct LayerCompositor {
    opts: CompositorOpts,
    fonts: Box<dyn FontResolver>,
    layout: TextLayoutEngine,
}

impl Default for LayerCompositor {
    fn default() -> Self {
        Self::new(CompositorOpts::default())
    }
}

impl fmt::Debug for LayerCompositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerCompositor")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl LayerCompositor {
    /// Compositor with no registered fonts; every annotation uses the built-in face.
    pub fn new(opts: CompositorOpts) -> Self {
        Self {
            opts,
            fonts: Box::new(FontRegistry::new()),
            layout: TextLayoutEngine::new(),
        }
    }

    /// Replace the font resolver.
    pub fn with_fonts(mut self, fonts: impl FontResolver + 'static) -> Self {
        self.fonts = Box::new(fonts);
        self
    }

    /// Active options.
    pub fn opts(&self) -> CompositorOpts {
        self.opts
    }

    /// Rasterize `texts` into a transparent layer of `size`.
    ///
    /// Annotations are painted in order, each one fully (shadow, outline, fill, rotation) before
    /// being blended over the previous ones. A font that cannot be resolved is replaced by the
    /// built-in face and reported in [`TextLayer::warnings`]; every other problem fails the whole
    /// render.
    #[tracing::instrument(
        skip(self, texts),
        fields(w = size.width, h = size.height, n = texts.len())
    )]
    pub fn render_text_layer(
        &mut self,
        size: CanvasSize,
        texts: &TextSet,
    ) -> LayerResult<TextLayer> {
        let mut acc = vec![0u8; size.rgba_len()?];
        let mut warnings = Vec::new();

        for (index, annotation) in texts.iter().enumerate() {
            annotation.validate()?;
            if size.is_empty() {
                continue;
            }

            let (plan, fell_back) = self.plan(annotation)?;
            if fell_back {
                tracing::warn!(
                    index,
                    family = %annotation.font.family,
                    size_pt = annotation.font.size_pt,
                    "font unavailable, using built-in face"
                );
                warnings.push(RenderWarning::FontFallback {
                    index,
                    family: annotation.font.family.clone(),
                    size_pt: annotation.font.size_pt,
                });
            }
            if plan.is_blank() {
                continue;
            }

            let layer = self.render_annotation(size, annotation, &plan)?;
            stack_premul(&mut acc, &layer, 1.0)?;
        }

        Ok(TextLayer {
            image: from_premul(size, acc)?,
            warnings,
        })
    }

    /// Stack `base`, `text_layer` and `subject`; see [`crate::composite_final`].
    pub fn composite_final(
        &self,
        base: &RgbaImage,
        text_layer: &RgbaImage,
        subject: &RgbaImage,
    ) -> LayerResult<RgbaImage> {
        crate::effects::composite::composite_final(base, text_layer, subject)
    }

    /// Grayscale background with the subject in color; see [`crate::grayscale_with_subject`].
    pub fn grayscale_with_subject(
        &self,
        base: &RgbaImage,
        subject: &RgbaImage,
    ) -> LayerResult<RgbaImage> {
        crate::effects::composite::grayscale_with_subject(base, subject)
    }

    /// Shape the annotation's text; the flag is set when the built-in face had to stand in.
    fn plan(&mut self, annotation: &TextAnnotation) -> LayerResult<(GlyphPlan, bool)> {
        let text = annotation.rendered_text();
        let FontRef { family, size_pt } = &annotation.font;

        match self.fonts.resolve(family, *size_pt) {
            Some(FontFace::Outline(face)) => {
                if let Some(plan) = self.layout.layout_outline(&text, &face)? {
                    return Ok((plan, false));
                }
            }
            Some(FontFace::Builtin(face)) => return Ok((layout_builtin(&text, face), false)),
            None => {}
        }
        Ok((layout_builtin(&text, BuiltinFace::for_size(*size_pt)), true))
    }

    fn render_annotation(
        &self,
        size: CanvasSize,
        annotation: &TextAnnotation,
        plan: &GlyphPlan,
    ) -> LayerResult<Vec<u8>> {
        let anchor = size.anchor_point(annotation.offset);
        let (w, h) = plan.size();
        let origin = Point::new(anchor.x - w / 2.0, anchor.y - h / 2.0);
        tracing::debug!(
            anchor_x = anchor.x,
            anchor_y = anchor.y,
            w,
            h,
            rotation = annotation.rotation_deg,
            "painting text"
        );

        let mut scratch = vec![0u8; size.rgba_len()?];

        if let Some(shadow) = annotation.active_shadow() {
            let shifted = Point::new(
                origin.x + f64::from(shadow.offset.dx),
                origin.y + f64::from(shadow.offset.dy),
            );
            let hard = paint_plan(size, plan, shifted, Ink::solid(shadow.color.channels()))?;
            let soft = soften_shadow(&hard, size, shadow.blur_radius)?;
            let shadow_opacity = if self.opts.shadow_follows_opacity {
                annotation.opacity
            } else {
                1.0
            };
            stack_premul(&mut scratch, &soft, shadow_opacity)?;
        }

        let ink = Ink {
            fill: annotation.fill.channels(),
            stroke: Some((annotation.stroke_width, annotation.stroke_color.channels())),
        };
        let glyphs = paint_plan(size, plan, origin, ink)?;
        stack_premul(&mut scratch, &glyphs, annotation.opacity)?;

        rotate_premul_about(
            &scratch,
            size.width,
            size.height,
            annotation.rotation_deg,
            anchor,
            self.opts.resample,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;

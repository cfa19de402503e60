use image::RgbaImage;

use crate::assets::decode::{decode_upload, optimize_image};
use crate::assets::fonts::FontResolver;
use crate::effects::composite::{composite_final, grayscale_with_subject};
use crate::foundation::core::CanvasSize;
use crate::foundation::error::LayerResult;
use crate::render::compositor::{CompositorOpts, LayerCompositor, RenderWarning};
use crate::session::segmentation::{BackgroundRemover, extract_subject};
use crate::text::annotation::TextSet;

/// Upload limits and compositor options for an [`Editor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EditorOpts {
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
    /// Uploads are shrunk to fit inside `max_side x max_side`; `0` keeps the original size.
    pub max_side: u32,
    /// Options forwarded to the [`LayerCompositor`].
    pub compositor: CompositorOpts,
}

impl Default for EditorOpts {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            max_side: 1024,
            compositor: CompositorOpts::default(),
        }
    }
}

impl EditorOpts {
    /// Defaults overridden by `LAYERTEXT_MAX_UPLOAD_BYTES`, `LAYERTEXT_MAX_SIDE` and
    /// `LAYERTEXT_SHADOW_FOLLOWS_OPACITY`. Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(n) = std::env::var("LAYERTEXT_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
        {
            opts.max_upload_bytes = n;
        }
        if let Some(n) = std::env::var("LAYERTEXT_MAX_SIDE")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
        {
            opts.max_side = n;
        }
        if let Some(on) = std::env::var("LAYERTEXT_SHADOW_FOLLOWS_OPACITY")
            .ok()
            .and_then(|v| parse_flag(&v))
        {
            opts.compositor.shadow_follows_opacity = on;
        }
        opts
    }

    /// Set [`EditorOpts::max_upload_bytes`].
    pub fn with_max_upload_bytes(mut self, n: usize) -> Self {
        self.max_upload_bytes = n;
        self
    }

    /// Set [`EditorOpts::max_side`].
    pub fn with_max_side(mut self, n: u32) -> Self {
        self.max_side = n;
        self
    }

    /// Set [`EditorOpts::compositor`].
    pub fn with_compositor(mut self, compositor: CompositorOpts) -> Self {
        self.compositor = compositor;
        self
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Every artifact produced by one [`Editor::process`] call.
#[derive(Clone, Debug)]
pub struct EditorOutput {
    /// Decoded and size-normalized upload.
    pub original: RgbaImage,
    /// Subject cutout, same size as `original`.
    pub subject: RgbaImage,
    /// Grayscale background with the subject in color.
    pub grayscale_subject: RgbaImage,
    /// Background, text and subject stacked together.
    pub composite: RgbaImage,
    /// Recovered problems from the text render.
    pub warnings: Vec<RenderWarning>,
}

/// Upload-to-composite pipeline around a [`LayerCompositor`].
#[derive(Debug)]
pub struct Editor {
    opts: EditorOpts,
    compositor: LayerCompositor,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorOpts::default())
    }
}

impl Editor {
    /// Editor with no registered fonts.
    pub fn new(opts: EditorOpts) -> Self {
        Self {
            opts,
            compositor: LayerCompositor::new(opts.compositor),
        }
    }

    /// Replace the font resolver used for text.
    pub fn with_fonts(mut self, fonts: impl FontResolver + 'static) -> Self {
        self.compositor = self.compositor.with_fonts(fonts);
        self
    }

    /// Active options.
    pub fn opts(&self) -> EditorOpts {
        self.opts
    }

    /// Decode `upload`, extract the subject with `remover` and composite `texts` behind it.
    ///
    /// Any failure aborts the whole call; no partial output is returned.
    #[tracing::instrument(skip_all, fields(bytes = upload.len(), texts = texts.len()))]
    pub fn process(
        &mut self,
        upload: &[u8],
        remover: &dyn BackgroundRemover,
        texts: &TextSet,
    ) -> LayerResult<EditorOutput> {
        let decoded = decode_upload(upload, self.opts.max_upload_bytes)?;
        self.process_image(decoded, remover, texts)
    }

    /// [`Editor::process`] for an already decoded image; size normalization still applies.
    pub fn process_image(
        &mut self,
        image: RgbaImage,
        remover: &dyn BackgroundRemover,
        texts: &TextSet,
    ) -> LayerResult<EditorOutput> {
        let original = optimize_image(image, self.opts.max_side);
        let size = CanvasSize::of(&original);
        tracing::debug!(w = size.width, h = size.height, "extracting subject");

        let subject = extract_subject(remover, &original)?;
        let layer = self.compositor.render_text_layer(size, texts)?;
        let composite = composite_final(&original, &layer.image, &subject)?;
        let grayscale_subject = grayscale_with_subject(&original, &subject)?;

        Ok(EditorOutput {
            original,
            subject,
            grayscale_subject,
            composite,
            warnings: layer.warnings,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;

//! Layertext places text *between* a photo's background and its foreground subject.
//!
//! The crate is built around one pure component, the [`LayerCompositor`]:
//!
//! - [`LayerCompositor::render_text_layer`] rasterizes an ordered [`TextSet`] into a transparent
//!   layer (fill, outline, blurred drop shadow, rotation about each annotation's anchor)
//! - [`composite_final`] stacks background, text layer and subject cutout with "over" blending
//! - [`grayscale_with_subject`] produces the grayscale-background / colored-subject side artifact
//!
//! Around it sits a thin [`Editor`] pipeline that decodes an upload, normalizes its size, asks a
//! [`BackgroundRemover`] for the subject cutout and returns every artifact in one [`EditorOutput`].
//!
//! Pixels cross the public API as straight-alpha [`image::RgbaImage`]s. Internally all blending
//! happens on premultiplied RGBA8.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod effects;
mod foundation;
mod render;
mod session;
mod text;

pub use crate::assets::color::Rgb8;
pub use crate::assets::decode::{decode_upload, encode_png, optimize_image};
pub use crate::assets::fonts::{BuiltinFace, FontFace, FontRegistry, FontResolver, OutlineFace};
pub use crate::effects::composite::{alpha_composite, composite_final, grayscale_with_subject};
pub use crate::foundation::core::{CanvasSize, Offset};
pub use crate::foundation::error::{LayerError, LayerResult};
pub use crate::render::compositor::{
    CompositorOpts, LayerCompositor, RenderWarning, Resample, TextLayer,
};
pub use crate::session::editor::{Editor, EditorOpts, EditorOutput};
pub use crate::session::segmentation::{BackgroundRemover, PrecomputedCutout};
pub use crate::text::annotation::{FontRef, Shadow, TextAnnotation, TextSet, TextTransform};

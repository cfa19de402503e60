/// Result alias used across the crate.
pub type LayerResult<T> = Result<T, LayerError>;

/// Structured failure surfaced by the compositor and the editor pipeline.
///
/// Every variant aborts the whole render; recoverable conditions (such as a font that could not
/// be resolved) are reported as [`crate::RenderWarning`]s instead.
#[derive(thiserror::Error, Debug)]
pub enum LayerError {
    /// Invalid caller input (annotation values, upload limits, unsupported formats).
    #[error("validation error: {0}")]
    Validation(String),

    /// Two images that must be stacked do not share the same dimensions.
    #[error(
        "dimension mismatch: {what} is {}x{}, expected {}x{}",
        actual.0, actual.1, expected.0, expected.1
    )]
    DimensionMismatch {
        /// Which input had the wrong size.
        what: &'static str,
        /// Width and height of the reference image.
        expected: (u32, u32),
        /// Width and height of the offending image.
        actual: (u32, u32),
    },

    /// The background-removal collaborator failed.
    #[error("segmentation error: {0}")]
    Segmentation(String),

    /// Encoded image bytes could not be decoded (or encoded).
    #[error("decode error: {0}")]
    Decode(String),

    /// The raster backend could not produce a layer.
    #[error("render error: {0}")]
    Render(String),

    /// A text set snapshot could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayerError {
    /// Build a [`LayerError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LayerError::Segmentation`].
    pub fn segmentation(msg: impl Into<String>) -> Self {
        Self::Segmentation(msg.into())
    }

    /// Build a [`LayerError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`LayerError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LayerError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`LayerError::DimensionMismatch`].
    pub fn dimension_mismatch(
        what: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    ) -> Self {
        Self::DimensionMismatch {
            what,
            expected,
            actual,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

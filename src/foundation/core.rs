use crate::foundation::error::{LayerError, LayerResult};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

pub(crate) use kurbo::Point;

/// Pixel dimensions of a layer; every layer stacked together must share one size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Create a canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Size of an existing image.
    pub fn of(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height }
    }

    /// `(width, height)` tuple.
    pub fn dims(self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Return `true` when either side is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Anchor point for an offset: `(width/2 + dx, height/2 + dy)`.
    pub fn anchor(self, offset: Offset) -> (f64, f64) {
        let p = self.anchor_point(offset);
        (p.x, p.y)
    }

    pub(crate) fn anchor_point(self, offset: Offset) -> Point {
        Point::new(
            f64::from(self.width) / 2.0 + f64::from(offset.dx),
            f64::from(self.height) / 2.0 + f64::from(offset.dy),
        )
    }

    /// Length of a tightly packed RGBA8 buffer of this size.
    pub(crate) fn rgba_len(self) -> LayerResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| LayerError::validation("canvas buffer size overflow"))
    }

    /// Fail with [`LayerError::DimensionMismatch`] unless `image` has exactly this size.
    pub(crate) fn ensure_matches(self, what: &'static str, image: &RgbaImage) -> LayerResult<()> {
        let actual = image.dimensions();
        if actual != self.dims() {
            return Err(LayerError::dimension_mismatch(what, self.dims(), actual));
        }
        Ok(())
    }
}

/// Integer pixel offset.
///
/// Deserializes from `[dx, dy]`, `{"dx": .., "dy": ..}` or `{"x": .., "y": ..}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Offset {
    /// Horizontal offset, positive to the right.
    pub dx: i32,
    /// Vertical offset, positive downwards.
    pub dy: i32,
}

impl Offset {
    /// Create an offset.
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl<'de> Deserialize<'de> for Offset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([i32; 2]),
            Delta { dx: i32, dy: i32 },
            Xy { x: i32, y: i32 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([dx, dy]) => Ok(Self { dx, dy }),
            Repr::Delta { dx, dy } => Ok(Self { dx, dy }),
            Repr::Xy { x, y } => Ok(Self { dx: x, dy: y }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

use std::str::FromStr;

use kurbo::Affine;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Point;
use crate::foundation::error::{LayerError, LayerResult};

/// Resampling filter used when a rotated layer is mapped back onto the pixel grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resample {
    /// 4x4 cubic convolution (`a = -0.5`).
    #[default]
    Bicubic,
    /// 2x2 linear interpolation.
    Bilinear,
    /// Nearest source pixel.
    Nearest,
}

impl FromStr for Resample {
    type Err = LayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bicubic" | "cubic" => Ok(Self::Bicubic),
            "bilinear" | "linear" => Ok(Self::Bilinear),
            "nearest" => Ok(Self::Nearest),
            other => Err(LayerError::validation(format!(
                "unknown resample filter '{other}' (expected bicubic, bilinear or nearest)"
            ))),
        }
    }
}

/// Rotate a premultiplied RGBA8 buffer by `degrees` about `pivot`, keeping the canvas size.
///
/// Positive angles turn the content counter-clockwise on screen. Content rotated outside the
/// canvas is clipped and uncovered pixels are transparent. Multiples of 360 return an exact copy.
pub(crate) fn rotate_premul_about(
    src: &[u8],
    width: u32,
    height: u32,
    degrees: f32,
    pivot: Point,
    resample: Resample,
) -> LayerResult<Vec<u8>> {
    if !degrees.is_finite() {
        return Err(LayerError::validation("rotation must be finite"));
    }
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| LayerError::render("rotate buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(LayerError::render(
            "rotate_premul_about expects src matching width*height*4",
        ));
    }

    let turn = f64::from(degrees).rem_euclid(360.0);
    if turn < 1e-9 || (360.0 - turn) < 1e-9 {
        return Ok(src.to_vec());
    }

    // Screen space is y-down, so a counter-clockwise turn of the content means every destination
    // pixel reads from the source rotated the other way, which is kurbo's positive angle.
    let inverse = Affine::rotate_about(turn.to_radians(), pivot);
    let sampler = Sampler {
        src,
        width: width as i64,
        height: height as i64,
    };

    let mut out = vec![0u8; expected_len];
    for y in 0..height {
        for x in 0..width {
            let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let px = match resample {
                Resample::Nearest => sampler.nearest(p.x, p.y),
                Resample::Bilinear => sampler.bilinear(p.x, p.y),
                Resample::Bicubic => sampler.bicubic(p.x, p.y),
            };
            let idx = ((y as usize) * (width as usize) + x as usize) * 4;
            out[idx..idx + 4].copy_from_slice(&px);
        }
    }
    Ok(out)
}

struct Sampler<'a> {
    src: &'a [u8],
    width: i64,
    height: i64,
}

impl Sampler<'_> {
    fn texel(&self, x: i64, y: i64) -> [f64; 4] {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return [0.0; 4];
        }
        let idx = ((y * self.width + x) as usize) * 4;
        let s = &self.src[idx..idx + 4];
        [
            f64::from(s[0]),
            f64::from(s[1]),
            f64::from(s[2]),
            f64::from(s[3]),
        ]
    }

    fn nearest(&self, sx: f64, sy: f64) -> [u8; 4] {
        let t = self.texel(sx.floor() as i64, sy.floor() as i64);
        finish(t)
    }

    fn bilinear(&self, sx: f64, sy: f64) -> [u8; 4] {
        let (ix, fx) = split(sx - 0.5);
        let (iy, fy) = split(sy - 0.5);
        let mut acc = [0.0f64; 4];
        for (dy, wy) in [(0, 1.0 - fy), (1, fy)] {
            for (dx, wx) in [(0, 1.0 - fx), (1, fx)] {
                let w = wx * wy;
                if w == 0.0 {
                    continue;
                }
                let t = self.texel(ix + dx, iy + dy);
                for c in 0..4 {
                    acc[c] += t[c] * w;
                }
            }
        }
        finish(acc)
    }

    fn bicubic(&self, sx: f64, sy: f64) -> [u8; 4] {
        let (ix, fx) = split(sx - 0.5);
        let (iy, fy) = split(sy - 0.5);
        let wx = cubic_weights(fx);
        let wy = cubic_weights(fy);
        let mut acc = [0.0f64; 4];
        for (j, wyj) in wy.iter().enumerate() {
            for (i, wxi) in wx.iter().enumerate() {
                let w = wxi * wyj;
                if w == 0.0 {
                    continue;
                }
                let t = self.texel(ix + i as i64 - 1, iy + j as i64 - 1);
                for c in 0..4 {
                    acc[c] += t[c] * w;
                }
            }
        }
        finish(acc)
    }
}

fn split(v: f64) -> (i64, f64) {
    let i = v.floor();
    (i as i64, v - i)
}

/// Keys cubic convolution weights for taps at offsets -1, 0, 1, 2 from the floor sample.
fn cubic_weights(t: f64) -> [f64; 4] {
    const A: f64 = -0.5;
    let k = |x: f64| {
        let x = x.abs();
        if x <= 1.0 {
            ((A + 2.0) * x - (A + 3.0)) * x * x + 1.0
        } else if x < 2.0 {
            ((A * x - 5.0 * A) * x + 8.0 * A) * x - 4.0 * A
        } else {
            0.0
        }
    };
    [k(1.0 + t), k(t), k(1.0 - t), k(2.0 - t)]
}

fn finish(acc: [f64; 4]) -> [u8; 4] {
    let a = acc[3].round().clamp(0.0, 255.0) as u8;
    let mut out = [0u8; 4];
    for c in 0..3 {
        // Cubic overshoot can push a premultiplied channel above its alpha.
        out[c] = (acc[c].round().clamp(0.0, 255.0) as u8).min(a);
    }
    out[3] = a;
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/rotate.rs"]
mod tests;

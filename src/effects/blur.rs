use std::f64::consts::TAU;

use crate::foundation::core::CanvasSize;
use crate::foundation::error::{LayerError, LayerResult};

const ONE_Q16: i64 = 1 << 16;

/// Share of a Gaussian's mass inside three standard deviations, `erf(3 / sqrt(2))`.
const MASS_WITHIN_3_SIGMA: f64 = 0.997_300_203_936_739_8;

/// Kernels at most this wide are normalized by summing their taps exactly.
const EXACT_SUM_REACH: f64 = 65_536.0;

/// Soften a premultiplied RGBA8 shadow mask with a Gaussian of standard deviation `sigma` pixels.
///
/// The kernel reaches `ceil(3 * sigma)` pixels to each side but never further than the longer
/// canvas side, since taps past it cannot land on the canvas. Pixels beyond the border count as
/// transparent, so shadows near an edge fade out. `sigma == 0` returns the mask unchanged.
pub(crate) fn soften_shadow(mask: &[u8], size: CanvasSize, sigma: f32) -> LayerResult<Vec<u8>> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(LayerError::validation(format!(
            "shadow blur must be finite and >= 0, got {sigma}"
        )));
    }
    let len = size.rgba_len()?;
    if mask.len() != len {
        return Err(LayerError::render(format!(
            "shadow mask holds {} bytes, canvas {}x{} needs {len}",
            mask.len(),
            size.width,
            size.height
        )));
    }
    if sigma == 0.0 || size.is_empty() {
        return Ok(mask.to_vec());
    }

    let longest = size.width.max(size.height) as usize;
    let kernel = GaussianKernel::new(f64::from(sigma), longest);
    let mut across = vec![0u8; len];
    let mut out = vec![0u8; len];
    kernel.convolve(mask, &mut across, size, Axis::Rows);
    kernel.convolve(&across, &mut out, size, Axis::Columns);
    Ok(out)
}

#[derive(Clone, Copy, Debug)]
enum Axis {
    Rows,
    Columns,
}

/// Symmetric Q16 weights, `taps[reach]` being the center.
#[derive(Debug)]
struct GaussianKernel {
    taps: Vec<u32>,
}

impl GaussianKernel {
    fn new(sigma: f64, reach_limit: usize) -> Self {
        let full_reach = (sigma * 3.0).ceil();
        let clipped = full_reach > reach_limit as f64;
        let reach = if clipped {
            reach_limit
        } else {
            full_reach as usize
        };
        let denom = 2.0 * sigma * sigma;
        let weight = |d: usize| {
            let d = d as f64;
            (-d * d / denom).exp()
        };

        // Normalize over the full kernel even when its outer taps are dropped.
        let total = if full_reach <= EXACT_SUM_REACH {
            (1..=full_reach as usize).fold(weight(0), |acc, d| acc + 2.0 * weight(d))
        } else {
            sigma * TAU.sqrt() * MASS_WITHIN_3_SIGMA
        };

        let mut taps: Vec<u32> = (0..=2 * reach)
            .map(|i| {
                let q = (weight(i.abs_diff(reach)) / total * ONE_Q16 as f64).round();
                q.clamp(0.0, ONE_Q16 as f64) as u32
            })
            .collect();

        if !clipped {
            // Rounding residue goes to the center tap so the weights sum to exactly one.
            let sum: i64 = taps.iter().map(|&t| i64::from(t)).sum();
            let center = &mut taps[reach];
            *center = (i64::from(*center) + ONE_Q16 - sum).clamp(0, ONE_Q16) as u32;
        }
        Self { taps }
    }

    fn reach(&self) -> usize {
        self.taps.len() / 2
    }

    fn convolve(&self, src: &[u8], dst: &mut [u8], size: CanvasSize, axis: Axis) {
        let (w, h) = (size.width as usize, size.height as usize);
        let (lane_len, step) = match axis {
            Axis::Rows => (w, 1),
            Axis::Columns => (h, w),
        };
        let reach = self.reach();

        for y in 0..h {
            for x in 0..w {
                let (pos, lane_start) = match axis {
                    Axis::Rows => (x, y * w),
                    Axis::Columns => (y, x),
                };
                let first = pos.saturating_sub(reach);
                let last = (pos + reach).min(lane_len - 1);

                let mut acc = [0u64; 4];
                for s in first..=last {
                    let weight = u64::from(self.taps[s + reach - pos]);
                    let idx = (lane_start + s * step) * 4;
                    for (a, &c) in acc.iter_mut().zip(&src[idx..idx + 4]) {
                        *a += weight * u64::from(c);
                    }
                }

                let out = (y * w + x) * 4;
                for (d, a) in dst[out..out + 4].iter_mut().zip(acc) {
                    *d = ((a + (1 << 15)) >> 16).min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;

//! Cubic convolution resampling kernel (Keys 1981, a = -0.5).
//!
//! Uses a 4×4 neighborhood with the classic Keys (Catmull-Rom) weight
//! function.

use super::{window_origin, SampleValue, WeightedSum};
use crate::error::WarpError;
use crate::raster::WorkingType;
use crate::warp::chunk::SourceChunk;

/// Cubic convolution weight function (Keys 1981, a = -0.5).
///
/// ```text
/// W(t) = (a+2)|t|³ - (a+3)|t|² + 1       for 0 ≤ |t| ≤ 1
/// W(t) = a|t|³ - 5a|t|² + 8a|t| - 4a     for 1 < |t| ≤ 2
/// W(t) = 0                                 for |t| > 2
/// ```
fn cubic_weight(t: f64) -> f64 {
    const A: f64 = -0.5;
    let t = t.abs();
    if t <= 1.0 {
        (A + 2.0) * t * t * t - (A + 3.0) * t * t + 1.0
    } else if t <= 2.0 {
        A * t * t * t - 5.0 * A * t * t + 8.0 * A * t - 4.0 * A
    } else {
        0.0
    }
}

/// Sample one band using cubic convolution interpolation.
///
/// Uses a 4×4 neighborhood centered on the sample point.
/// Corner-to-center conversion (-0.5 offset), anchor at `floor()`.
///
/// Neighbour weights are scaled by density and the result renormalized, as
/// for bilinear. Returns an empty sample if the window leaves the chunk or
/// the weight sum is not positive.
pub fn sample(
    src: &SourceChunk<'_>,
    working_type: WorkingType,
    band: usize,
    x: f64,
    y: f64,
) -> Result<SampleValue, WarpError> {
    let Some((x0, y0, dx, dy)) =
        window_origin(x, y, 1, 4, src.window.width, src.window.height)
    else {
        return Ok(SampleValue::EMPTY);
    };

    let wx: [f64; 4] = std::array::from_fn(|i| cubic_weight(dx - (i as f64 - 1.0)));
    let wy: [f64; 4] = std::array::from_fn(|j| cubic_weight(dy - (j as f64 - 1.0)));

    let mut acc = WeightedSum::default();
    for (j, &weight_y) in wy.iter().enumerate() {
        for (i, &weight_x) in wx.iter().enumerate() {
            let offset = src.window.offset(x0 + i, y0 + j);
            acc.add(weight_x * weight_y, src.fetch(working_type, band, offset)?);
        }
    }
    Ok(acc.finish())
}

//! Bilinear interpolation resampling kernel.

use super::{window_origin, SampleValue, WeightedSum};
use crate::error::WarpError;
use crate::raster::WorkingType;
use crate::warp::chunk::SourceChunk;

/// Sample one band using bilinear interpolation.
///
/// Subtracts 0.5 from input coordinates to center on pixel centers
/// (GDAL convention: pixel center at col+0.5, row+0.5).
///
/// Performs 2×2 area-weighted interpolation. Each neighbour's weight is
/// scaled by its density, so masked neighbours drop out and the remaining
/// ones are renormalized. Returns an empty sample if the 2×2 window leaves
/// the chunk or no neighbour carries weight.
pub fn sample(
    src: &SourceChunk<'_>,
    working_type: WorkingType,
    band: usize,
    x: f64,
    y: f64,
) -> Result<SampleValue, WarpError> {
    let Some((x0, y0, dx, dy)) =
        window_origin(x, y, 0, 2, src.window.width, src.window.height)
    else {
        return Ok(SampleValue::EMPTY);
    };

    let neighbours = [
        (0, 0, (1.0 - dx) * (1.0 - dy)),
        (1, 0, dx * (1.0 - dy)),
        (0, 1, (1.0 - dx) * dy),
        (1, 1, dx * dy),
    ];

    let mut acc = WeightedSum::default();
    for (i, j, weight) in neighbours {
        let offset = src.window.offset(x0 + i, y0 + j);
        acc.add(weight, src.fetch(working_type, band, offset)?);
    }
    Ok(acc.finish())
}

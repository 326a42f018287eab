//! Nearest-neighbor resampling kernel.

use super::SampleValue;
use crate::error::WarpError;
use crate::raster::WorkingType;
use crate::warp::chunk::SourceChunk;

/// Sample one band using nearest-neighbor interpolation.
///
/// Uses GDAL corner-based pixel convention: pixel (0,0) has its upper-left
/// corner at coordinate (0.0, 0.0) and its center at (0.5, 0.5), so
/// truncating the coordinate finds the containing pixel.
///
/// The density is the unified source density of that pixel, or zero if the
/// pixel is masked or outside the chunk.
pub fn sample(
    src: &SourceChunk<'_>,
    working_type: WorkingType,
    band: usize,
    x: f64,
    y: f64,
) -> Result<SampleValue, WarpError> {
    if !(x >= 0.0 && y >= 0.0) {
        return Ok(SampleValue::EMPTY);
    }
    let (col, row) = (x as usize, y as usize);
    if col >= src.window.width || row >= src.window.height {
        return Ok(SampleValue::EMPTY);
    }
    src.fetch(working_type, band, src.window.offset(col, row))
}

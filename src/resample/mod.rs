//! Resampling kernels for the warp engine.
//!
//! Every kernel takes a fractional source coordinate local to the source
//! chunk and yields one [`SampleValue`] for one band. A zero density means no
//! usable input was found and the destination sample must be left alone.

pub mod bilinear;
pub mod cubic;
pub mod nearest;

use crate::error::WarpError;
use crate::raster::WorkingType;
use crate::warp::chunk::SourceChunk;

/// Available resampling methods.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ResamplingMethod {
    #[default]
    Nearest,
    Bilinear,
    Cubic,
}

impl ResamplingMethod {
    /// Parse from a string name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nearest" | "near" => Some(Self::Nearest),
            "bilinear" => Some(Self::Bilinear),
            "cubic" => Some(Self::Cubic),
            _ => None,
        }
    }

    /// Gather window radius in pixels. Destination pixels mapping closer than
    /// this to a source chunk edge are skipped.
    pub fn window_radius(&self) -> usize {
        match self {
            Self::Nearest => 0,
            Self::Bilinear => 1,
            Self::Cubic => 2,
        }
    }
}

/// A resampled sample: density weight plus complex value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleValue {
    pub density: f64,
    pub real: f64,
    pub imag: f64,
}

impl SampleValue {
    /// No usable input.
    pub const EMPTY: SampleValue = SampleValue {
        density: 0.0,
        real: 0.0,
        imag: 0.0,
    };

    pub fn is_empty(&self) -> bool {
        self.density == 0.0
    }
}

/// Sample one band at local source coordinate `(x, y)` with `method`.
pub fn sample(
    method: ResamplingMethod,
    src: &SourceChunk<'_>,
    working_type: WorkingType,
    band: usize,
    x: f64,
    y: f64,
) -> Result<SampleValue, WarpError> {
    match method {
        ResamplingMethod::Nearest => nearest::sample(src, working_type, band, x, y),
        ResamplingMethod::Bilinear => bilinear::sample(src, working_type, band, x, y),
        ResamplingMethod::Cubic => cubic::sample(src, working_type, band, x, y),
    }
}

/// Weight sums below this are treated as "no usable input".
const MIN_WEIGHT: f64 = 1e-10;

/// Density-weighted accumulation over a gather window.
///
/// Each neighbour contributes `weight * density` to the weight sum and that
/// times its value to the colour sums, so invalid neighbours contribute
/// nothing. The result is normalized by the weight sum.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct WeightedSum {
    weight: f64,
    real: f64,
    imag: f64,
}

impl WeightedSum {
    #[inline]
    pub(crate) fn add(&mut self, weight: f64, value: SampleValue) {
        let w = weight * value.density;
        self.weight += w;
        self.real += w * value.real;
        self.imag += w * value.imag;
    }

    pub(crate) fn finish(self) -> SampleValue {
        if self.weight < MIN_WEIGHT {
            return SampleValue::EMPTY;
        }
        SampleValue {
            density: self.weight.min(1.0),
            real: self.real / self.weight,
            imag: self.imag / self.weight,
        }
    }
}

/// Locate the top-left pixel of a `size`×`size` window around `(x, y)` on
/// pixel centres, returning it with the fractional offsets. `None` when any
/// part of the window falls outside a `width`×`height` chunk.
#[inline]
pub(crate) fn window_origin(
    x: f64,
    y: f64,
    lead: usize,
    size: usize,
    width: usize,
    height: usize,
) -> Option<(usize, usize, f64, f64)> {
    let cx = x - 0.5;
    let cy = y - 0.5;
    let fx = cx.floor();
    let fy = cy.floor();
    let x0 = fx - lead as f64;
    let y0 = fy - lead as f64;
    if !(x0 >= 0.0 && y0 >= 0.0) {
        return None;
    }
    if x0 + size as f64 > width as f64 || y0 + size as f64 > height as f64 {
        return None;
    }
    Some((x0 as usize, y0 as usize, cx - fx, cy - fy))
}

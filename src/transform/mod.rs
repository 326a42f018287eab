//! Coordinate transformer contract consumed by the warp kernel.
//!
//! Transformers work in pixel/line coordinates of the outer images; the
//! kernel applies chunk offsets on both sides of the call.

pub mod affine;
pub mod approx;

pub use affine::{Affine, AffineTransformer};
pub use approx::ApproxTransformer;

/// Which way a batch of points is transformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Destination pixel/line to source pixel/line. The only direction the
    /// kernel requests.
    DstToSrc,
    SrcToDst,
}

/// Batch point transformer.
///
/// `x`, `y` and `z` are rewritten in place; `success[i]` reports whether
/// point `i` could be transformed. Failed points are skipped by the kernel,
/// never retried.
pub trait Transformer {
    fn transform(
        &self,
        direction: Direction,
        x: &mut [f64],
        y: &mut [f64],
        z: &mut [f64],
        success: &mut [bool],
    );
}

impl<F> Transformer for F
where
    F: Fn(Direction, &mut [f64], &mut [f64], &mut [f64], &mut [bool]),
{
    fn transform(
        &self,
        direction: Direction,
        x: &mut [f64],
        y: &mut [f64],
        z: &mut [f64],
        success: &mut [bool],
    ) {
        self(direction, x, y, z, success)
    }
}

//! Affine pixel/line transforms for resizing and rectification.

use super::{Direction, Transformer};
use crate::error::WarpError;

/// A 2D affine transform.
///
/// Maps (col, row) to (x, y):
///   x = a * col + b * row + c
///   y = d * col + e * row + f
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Scale both axes, then translate.
    pub fn scale_translate(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self::new(sx, 0.0, tx, 0.0, sy, ty)
    }

    /// Apply the forward transform: (col, row) -> (x, y).
    pub fn forward(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.a * col + self.b * row + self.c;
        let y = self.d * col + self.e * row + self.f;
        (x, y)
    }

    /// Compute the inverse affine transform.
    pub fn inverse(&self) -> Result<Affine, WarpError> {
        let det = self.a * self.e - self.b * self.d;
        if det.abs() < f64::EPSILON {
            return Err(WarpError::Affine(
                "Singular affine transform (determinant is zero)".into(),
            ));
        }
        let inv_det = 1.0 / det;
        Ok(Affine {
            a: self.e * inv_det,
            b: -self.b * inv_det,
            c: (self.b * self.f - self.e * self.c) * inv_det,
            d: -self.d * inv_det,
            e: self.a * inv_det,
            f: (self.d * self.c - self.a * self.f) * inv_det,
        })
    }
}

/// Transformer mapping destination pixel/line to source pixel/line through
/// an affine, with the inverse used for the opposite direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransformer {
    dst_to_src: Affine,
    src_to_dst: Affine,
}

impl AffineTransformer {
    pub fn new(dst_to_src: Affine) -> Result<Self, WarpError> {
        Ok(Self {
            dst_to_src,
            src_to_dst: dst_to_src.inverse()?,
        })
    }

    /// Source and destination share one pixel grid.
    pub const IDENTITY: AffineTransformer = AffineTransformer {
        dst_to_src: Affine::IDENTITY,
        src_to_dst: Affine::IDENTITY,
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Stretch a `src_size` (cols, rows) image over a `dst_size` grid.
    pub fn resize(src_size: (usize, usize), dst_size: (usize, usize)) -> Result<Self, WarpError> {
        let (src_cols, src_rows) = src_size;
        let (dst_cols, dst_rows) = dst_size;
        if dst_cols == 0 || dst_rows == 0 {
            return Err(WarpError::Affine("destination size must be > 0".into()));
        }
        Self::new(Affine::scale_translate(
            src_cols as f64 / dst_cols as f64,
            src_rows as f64 / dst_rows as f64,
            0.0,
            0.0,
        ))
    }

    pub fn dst_to_src(&self) -> &Affine {
        &self.dst_to_src
    }
}

impl Transformer for AffineTransformer {
    fn transform(
        &self,
        direction: Direction,
        x: &mut [f64],
        y: &mut [f64],
        _z: &mut [f64],
        success: &mut [bool],
    ) {
        let affine = match direction {
            Direction::DstToSrc => &self.dst_to_src,
            Direction::SrcToDst => &self.src_to_dst,
        };
        for ((xi, yi), ok) in x.iter_mut().zip(y.iter_mut()).zip(success.iter_mut()) {
            let (tx, ty) = affine.forward(*xi, *yi);
            *xi = tx;
            *yi = ty;
            *ok = tx.is_finite() && ty.is_finite();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_identity() {
        let aff = Affine::identity();
        let (x, y) = aff.forward(5.0, 10.0);
        assert_relative_eq!(x, 5.0);
        assert_relative_eq!(y, 10.0);
    }

    #[test]
    fn test_forward_with_offset_and_scale() {
        let aff = Affine::new(10.0, 0.0, 500000.0, 0.0, -10.0, 6000000.0);
        let (x, y) = aff.forward(0.0, 0.0);
        assert_relative_eq!(x, 500000.0);
        assert_relative_eq!(y, 6000000.0);

        let (x, y) = aff.forward(100.0, 100.0);
        assert_relative_eq!(x, 501000.0);
        assert_relative_eq!(y, 5999000.0);
    }

    #[test]
    fn test_inverse_roundtrip() {
        let aff = Affine::new(10.0, 0.0, 500000.0, 0.0, -10.0, 6000000.0);
        let inv = aff.inverse().unwrap();
        let (col, row) = inv.forward(501000.0, 5999000.0);
        assert_relative_eq!(col, 100.0, epsilon = 1e-10);
        assert_relative_eq!(row, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_singular_affine() {
        let aff = Affine::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(aff.inverse().is_err());
        assert!(AffineTransformer::new(aff).is_err());
    }

    #[test]
    fn test_resize_transformer() {
        // 8x4 source shown on a 4x2 grid: every dst pixel covers 2x2 src pixels
        let t = AffineTransformer::resize((8, 4), (4, 2)).unwrap();
        let mut x = [0.5, 3.5];
        let mut y = [0.5, 1.5];
        let mut z = [0.0; 2];
        let mut ok = [false; 2];
        t.transform(Direction::DstToSrc, &mut x, &mut y, &mut z, &mut ok);
        assert_eq!(ok, [true, true]);
        assert_relative_eq!(x[0], 1.0);
        assert_relative_eq!(y[0], 1.0);
        assert_relative_eq!(x[1], 7.0);
        assert_relative_eq!(y[1], 3.0);

        t.transform(Direction::SrcToDst, &mut x, &mut y, &mut z, &mut ok);
        assert_relative_eq!(x[1], 3.5, epsilon = 1e-12);
        assert_relative_eq!(y[1], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_non_finite_fails() {
        let t = AffineTransformer::identity();
        let mut x = [f64::NAN, 1.0];
        let mut y = [0.0, f64::INFINITY];
        let mut z = [0.0; 2];
        let mut ok = [true; 2];
        t.transform(Direction::DstToSrc, &mut x, &mut y, &mut z, &mut ok);
        assert_eq!(ok, [false, false]);
    }
}

//! Linear approximation wrapper for scanline transforms.
//!
//! Instead of transforming every point of a scanline, computes exact
//! coordinates at the ends and middle and linearly interpolates between them,
//! recursively subdividing when the interpolation error exceeds a tolerance
//! (default 0.125 px).

use super::{Direction, Transformer};

/// GDAL's default approximation error, in output pixels.
pub const DEFAULT_MAX_ERROR: f64 = 0.125;

const MAX_DEPTH: usize = 20;

type Point = (f64, f64, f64);

/// Scanline approximator around an exact transformer.
///
/// Only batches whose points all share one `y` are approximated; anything
/// else is handed to the wrapped transformer unchanged.
#[derive(Clone, Debug)]
pub struct ApproxTransformer<T> {
    base: T,
    /// Maximum allowed interpolation error in pixels.
    max_error: f64,
}

/// Untouched input coordinates of the scanline being approximated.
struct Scanline<'s> {
    direction: Direction,
    x: &'s [f64],
    y: f64,
    z: &'s [f64],
}

struct Output<'o> {
    x: &'o mut [f64],
    y: &'o mut [f64],
    z: &'o mut [f64],
    success: &'o mut [bool],
}

impl Output<'_> {
    #[inline]
    fn set(&mut self, i: usize, p: Point) {
        self.x[i] = p.0;
        self.y[i] = p.1;
        self.z[i] = p.2;
        self.success[i] = true;
    }
}

#[inline]
fn lerp(a: Point, b: Point, t: f64) -> Point {
    (
        a.0 + t * (b.0 - a.0),
        a.1 + t * (b.1 - a.1),
        a.2 + t * (b.2 - a.2),
    )
}

impl<T: Transformer> ApproxTransformer<T> {
    pub fn new(base: T, max_error: f64) -> Self {
        Self { base, max_error }
    }

    pub fn base(&self) -> &T {
        &self.base
    }

    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Transform a single point exactly.
    fn exact_point(&self, direction: Direction, x: f64, y: f64, z: f64) -> Option<Point> {
        let (mut xs, mut ys, mut zs) = ([x], [y], [z]);
        let mut ok = [false];
        self.base
            .transform(direction, &mut xs, &mut ys, &mut zs, &mut ok);
        ok[0].then_some((xs[0], ys[0], zs[0]))
    }

    /// Transform `left..=right` exactly, restoring the input coordinates first.
    fn exact_range(&self, line: &Scanline<'_>, out: &mut Output<'_>, left: usize, right: usize) {
        let range = left..=right;
        out.x[range.clone()].copy_from_slice(&line.x[range.clone()]);
        out.y[range.clone()].fill(line.y);
        out.z[range.clone()].copy_from_slice(&line.z[range.clone()]);
        self.base.transform(
            line.direction,
            &mut out.x[range.clone()],
            &mut out.y[range.clone()],
            &mut out.z[range.clone()],
            &mut out.success[range],
        );
    }

    /// Recursively subdivide and interpolate a scanline segment.
    ///
    /// `lp` and `rp` are the exact transformed points at `left` and `right`.
    #[allow(clippy::too_many_arguments)]
    fn subdivide(
        &self,
        line: &Scanline<'_>,
        out: &mut Output<'_>,
        left: usize,
        right: usize,
        lp: Point,
        rp: Point,
        depth: usize,
    ) {
        // Base case: adjacent or same point
        if right <= left + 1 {
            out.set(left, lp);
            if right > left {
                out.set(right, rp);
            }
            return;
        }

        let span = line.x[right] - line.x[left];
        let mid = (left + right) / 2;
        let mp = match self.exact_point(line.direction, line.x[mid], line.y, line.z[mid]) {
            Some(mp) if span != 0.0 => mp,
            _ => {
                self.exact_range(line, out, left, right);
                return;
            }
        };

        let t = (line.x[mid] - line.x[left]) / span;
        let interp = lerp(lp, rp, t);
        let err = (mp.0 - interp.0).abs().max((mp.1 - interp.1).abs());

        if err > self.max_error && depth < MAX_DEPTH {
            self.subdivide(line, out, left, mid, lp, mp, depth + 1);
            self.subdivide(line, out, mid, right, mp, rp, depth + 1);
        } else {
            // Linear interpolation is good enough for this segment
            for i in left..=right {
                let t = (line.x[i] - line.x[left]) / span;
                out.set(i, lerp(lp, rp, t));
            }
            // Keep the exact values at the known points
            out.set(left, lp);
            out.set(right, rp);
            out.set(mid, mp);
        }
    }
}

impl<T: Transformer> Transformer for ApproxTransformer<T> {
    fn transform(
        &self,
        direction: Direction,
        x: &mut [f64],
        y: &mut [f64],
        z: &mut [f64],
        success: &mut [bool],
    ) {
        let n = x.len();
        let row = y.first().copied().unwrap_or_default();
        if n < 3 || y.iter().any(|&v| v != row) {
            return self.base.transform(direction, x, y, z, success);
        }

        let x_in = x.to_vec();
        let z_in = z.to_vec();
        let line = Scanline {
            direction,
            x: &x_in,
            y: row,
            z: &z_in,
        };

        let ends = (
            self.exact_point(direction, x_in[0], row, z_in[0]),
            self.exact_point(direction, x_in[n - 1], row, z_in[n - 1]),
        );
        let (Some(lp), Some(rp)) = ends else {
            return self.base.transform(direction, x, y, z, success);
        };

        let mut out = Output { x, y, z, success };
        self.subdivide(&line, &mut out, 0, n - 1, lp, rp, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::AffineTransformer;
    use approx::assert_relative_eq;
    use std::cell::Cell;

    /// Mildly nonlinear transform that counts the points it transforms.
    struct Curved {
        calls: Cell<usize>,
    }

    impl Transformer for Curved {
        fn transform(
            &self,
            _direction: Direction,
            x: &mut [f64],
            y: &mut [f64],
            _z: &mut [f64],
            success: &mut [bool],
        ) {
            self.calls.set(self.calls.get() + x.len());
            for ((xi, yi), ok) in x.iter_mut().zip(y.iter_mut()).zip(success.iter_mut()) {
                let (px, py) = (*xi, *yi);
                *xi = px + 0.0005 * px * px;
                *yi = py + 0.01 * px;
                *ok = px < 1000.0;
            }
        }
    }

    fn scanline(width: usize, row: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<bool>) {
        let x = (0..width).map(|i| i as f64 + 0.5).collect();
        (x, vec![row; width], vec![0.0; width], vec![false; width])
    }

    #[test]
    fn test_linear_transform_is_exact() {
        let approx = ApproxTransformer::new(
            AffineTransformer::resize((100, 100), (64, 64)).unwrap(),
            DEFAULT_MAX_ERROR,
        );
        let (mut x, mut y, mut z, mut ok) = scanline(64, 3.5);
        approx.transform(Direction::DstToSrc, &mut x, &mut y, &mut z, &mut ok);

        let scale = 100.0 / 64.0;
        for i in 0..64 {
            assert!(ok[i]);
            assert_relative_eq!(x[i], (i as f64 + 0.5) * scale, epsilon = 1e-9);
            assert_relative_eq!(y[i], 3.5 * scale, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_within_tolerance_with_fewer_exact_calls() {
        let exact = Curved {
            calls: Cell::new(0),
        };
        let approx = ApproxTransformer::new(
            Curved {
                calls: Cell::new(0),
            },
            DEFAULT_MAX_ERROR,
        );
        let width = 512;

        let (mut ex, mut ey, mut ez, mut eok) = scanline(width, 10.5);
        exact.transform(Direction::DstToSrc, &mut ex, &mut ey, &mut ez, &mut eok);

        let (mut ax, mut ay, mut az, mut aok) = scanline(width, 10.5);
        approx.transform(Direction::DstToSrc, &mut ax, &mut ay, &mut az, &mut aok);

        let mut max_err = 0.0_f64;
        for i in 0..width {
            assert!(aok[i]);
            max_err = max_err.max((ax[i] - ex[i]).abs().max((ay[i] - ey[i]).abs()));
        }
        assert!(max_err < 0.2, "max error = {max_err:.6} pixels (want < 0.2)");
        assert!(approx.base().calls.get() < width / 2);
    }

    #[test]
    fn test_failed_endpoint_falls_back_to_exact() {
        let approx = ApproxTransformer::new(
            Curved {
                calls: Cell::new(0),
            },
            DEFAULT_MAX_ERROR,
        );
        let mut x = vec![998.0, 999.0, 1000.0, 1001.0];
        let mut y = vec![0.0; 4];
        let mut z = vec![0.0; 4];
        let mut ok = vec![true; 4];
        approx.transform(Direction::DstToSrc, &mut x, &mut y, &mut z, &mut ok);
        assert_eq!(ok, [true, true, false, false]);
        assert_relative_eq!(x[1], 999.0 + 0.0005 * 999.0 * 999.0);
    }

    #[test]
    fn test_non_scanline_passthrough() {
        let approx = ApproxTransformer::new(AffineTransformer::identity(), DEFAULT_MAX_ERROR);
        let mut x = vec![1.0, 2.0, 3.0];
        let mut y = vec![0.0, 1.0, 2.0];
        let mut z = vec![0.0; 3];
        let mut ok = vec![false; 3];
        approx.transform(Direction::DstToSrc, &mut x, &mut y, &mut z, &mut ok);
        assert_eq!(x, [1.0, 2.0, 3.0]);
        assert_eq!(y, [0.0, 1.0, 2.0]);
        assert_eq!(ok, [true; 3]);
    }

    #[test]
    fn test_single_point() {
        let approx = ApproxTransformer::new(AffineTransformer::identity(), DEFAULT_MAX_ERROR);
        let mut x = [0.5];
        let mut y = [0.5];
        let mut z = [0.0];
        let mut ok = [false];
        approx.transform(Direction::DstToSrc, &mut x, &mut y, &mut z, &mut ok);
        assert!(ok[0]);
        assert_relative_eq!(x[0], 0.5);
    }
}

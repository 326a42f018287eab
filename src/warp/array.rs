//! Whole-array warping on top of the chunk kernel.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use super::chunk::{DestChunk, SourceChunk};
use super::kernel::WarpKernel;
use crate::error::WarpError;
use crate::raster::mask::ValidityMask;
use crate::raster::{BandBuffer, BandBufferMut, Component, Window};
use crate::resample::ResamplingMethod;
use crate::transform::Transformer;

/// Warp a `(bands, rows, cols)` array onto a new `dst_shape` (rows, cols) grid.
///
/// Destination pixels nothing maps to keep `fill`. The returned mask marks
/// every pixel the kernel wrote.
pub fn warp_array<T: Component>(
    src: ArrayView3<'_, T>,
    src_valid: Option<ArrayView2<'_, bool>>,
    dst_shape: (usize, usize),
    transformer: &dyn Transformer,
    method: ResamplingMethod,
    fill: T,
) -> Result<(Array3<T>, Array2<bool>), WarpError> {
    let (bands, src_rows, src_cols) = src.dim();
    let (dst_rows, dst_cols) = dst_shape;
    if let Some(valid) = &src_valid {
        if valid.dim() != (src_rows, src_cols) {
            return Err(WarpError::Config(format!(
                "source mask shape {:?} does not match source shape {:?}",
                valid.dim(),
                (src_rows, src_cols)
            )));
        }
    }

    let src = src.as_standard_layout();
    let src_mask: Option<ValidityMask> = src_valid.map(|v| v.iter().copied().collect());

    let mut dst = Array3::from_elem((bands, dst_rows, dst_cols), fill);
    let mut dst_mask = ValidityMask::new(dst_rows * dst_cols);
    {
        let src_bands = src
            .outer_iter()
            .map(BandBuffer::from_view)
            .collect::<Result<Vec<_>, _>>()?;
        let dst_bands = dst
            .outer_iter_mut()
            .map(BandBufferMut::from_view_mut)
            .collect::<Result<Vec<_>, _>>()?;

        let mut source = SourceChunk::new(Window::sized(src_cols, src_rows), src_bands);
        if let Some(mask) = &src_mask {
            source = source.with_unified_validity(mask);
        }
        let dest = DestChunk::new(Window::sized(dst_cols, dst_rows), dst_bands)
            .with_validity(&mut dst_mask);

        WarpKernel::new(method, T::REAL, source, dest, transformer).perform_warp()?;
    }

    let dst_valid = Array2::from_shape_fn(dst_shape, |(row, col)| {
        dst_mask.is_valid(row * dst_cols + col)
    });
    Ok((dst, dst_valid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::AffineTransformer;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn ramp(rows: usize, cols: usize) -> Array3<f64> {
        Array3::from_shape_fn((1, rows, cols), |(_, r, c)| (r * cols + c) as f64)
    }

    #[test]
    fn test_identity_roundtrip() {
        let src = ramp(4, 4);
        let (dst, valid) = warp_array(
            src.view(),
            None,
            (4, 4),
            &AffineTransformer::IDENTITY,
            ResamplingMethod::Nearest,
            f64::NAN,
        )
        .unwrap();
        assert_eq!(dst, src);
        assert!(valid.iter().all(|&v| v));
    }

    #[test]
    fn test_downscale_nearest() {
        let src = ramp(4, 4);
        let t = AffineTransformer::resize((4, 4), (2, 2)).unwrap();
        let (dst, _) = warp_array(
            src.view(),
            None,
            (2, 2),
            &t,
            ResamplingMethod::Nearest,
            f64::NAN,
        )
        .unwrap();
        // Each destination centre lands on the corner shared by four sources
        assert_eq!(dst, array![[[5.0, 7.0], [13.0, 15.0]]]);
    }

    #[test]
    fn test_masked_pixel_keeps_fill() {
        let src = ramp(3, 3);
        let mut valid = Array2::from_elem((3, 3), true);
        valid[(1, 1)] = false;
        let (dst, dst_valid) = warp_array(
            src.view(),
            Some(valid.view()),
            (3, 3),
            &AffineTransformer::IDENTITY,
            ResamplingMethod::Nearest,
            -1.0,
        )
        .unwrap();
        assert_eq!(dst[(0, 1, 1)], -1.0);
        assert!(!dst_valid[(1, 1)]);
        assert_eq!(dst[(0, 2, 2)], 8.0);
        assert!(dst_valid[(2, 2)]);
    }

    #[test]
    fn test_bilinear_interior_only() {
        let src = Array3::from_elem((2, 4, 4), 3.0f64);
        let (dst, valid) = warp_array(
            src.view(),
            None,
            (4, 4),
            &AffineTransformer::IDENTITY,
            ResamplingMethod::Bilinear,
            f64::NAN,
        )
        .unwrap();
        for row in 0..4 {
            for col in 0..4 {
                let interior = (1..3).contains(&row) && (1..3).contains(&col);
                assert_eq!(valid[(row, col)], interior);
                for band in 0..2 {
                    if interior {
                        assert_relative_eq!(dst[(band, row, col)], 3.0);
                    } else {
                        assert!(dst[(band, row, col)].is_nan());
                    }
                }
            }
        }
    }

    #[test]
    fn test_non_standard_layout_input() {
        let src = ramp(2, 3);
        let transposed = src.view().permuted_axes([0, 2, 1]);
        let (dst, _) = warp_array(
            transposed,
            None,
            (3, 2),
            &AffineTransformer::IDENTITY,
            ResamplingMethod::Nearest,
            0.0,
        )
        .unwrap();
        assert_eq!(dst, transposed);
    }

    #[test]
    fn test_u8_bands() {
        let src = Array3::from_shape_fn((1, 2, 2), |(_, r, c)| (r * 2 + c) as u8 * 50);
        let (dst, _) = warp_array(
            src.view(),
            None,
            (2, 2),
            &AffineTransformer::IDENTITY,
            ResamplingMethod::Nearest,
            0u8,
        )
        .unwrap();
        assert_eq!(dst, src);
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let src = ramp(2, 2);
        let valid = Array2::from_elem((3, 3), true);
        let result = warp_array(
            src.view(),
            Some(valid.view()),
            (2, 2),
            &AffineTransformer::IDENTITY,
            ResamplingMethod::Nearest,
            0.0,
        );
        assert!(matches!(result, Err(WarpError::Config(_))));
    }
}

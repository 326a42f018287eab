//! PyO3 binding for warp_affine.

use ndarray::{Array2, Array3};
use numpy::{PyArray2, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::resample::ResamplingMethod;
use crate::transform::{Affine, AffineTransformer};
use crate::warp::warp_array;

/// Warp a (bands, rows, cols) f64 array through a pixel-space affine.
///
/// Args:
///     src: Input 3D array (f64).
///     dst_shape: Output shape as (rows, cols) tuple.
///     transform: Destination pixel to source pixel affine as a 6-element
///         tuple (a, b, c, d, e, f), with x = a * col + b * row + c and
///         y = d * col + e * row + f.
///     resampling: Resampling method name ("nearest", "bilinear" or "cubic").
///     src_valid: Optional 2D bool mask, False marks unusable source pixels.
///
/// Returns:
///     Tuple of the warped array (NaN where nothing was written) and a bool
///     mask of written destination pixels.
#[pyfunction]
#[pyo3(signature = (src, dst_shape, transform, resampling="nearest", src_valid=None))]
#[allow(clippy::type_complexity)]
pub fn warp_affine<'py>(
    py: Python<'py>,
    src: PyReadonlyArray3<'py, f64>,
    dst_shape: (usize, usize),
    transform: [f64; 6],
    resampling: &str,
    src_valid: Option<PyReadonlyArray2<'py, bool>>,
) -> PyResult<(Bound<'py, PyArray3<f64>>, Bound<'py, PyArray2<bool>>)> {
    let method = ResamplingMethod::from_name(resampling)
        .ok_or_else(|| PyValueError::new_err(format!("Unknown resampling method: {resampling}")))?;

    // Copy arrays to owned before releasing GIL
    let src_array: Array3<f64> = src.as_array().to_owned();
    let valid_array: Option<Array2<bool>> = src_valid.map(|v| v.as_array().to_owned());

    let (dst, dst_valid) = py.allow_threads(move || {
        let affine = Affine::new(
            transform[0],
            transform[1],
            transform[2],
            transform[3],
            transform[4],
            transform[5],
        );
        let transformer =
            AffineTransformer::new(affine).map_err(|e| PyValueError::new_err(e.to_string()))?;

        warp_array(
            src_array.view(),
            valid_array.as_ref().map(|v| v.view()),
            dst_shape,
            &transformer,
            method,
            f64::NAN,
        )
        .map_err(|e| PyValueError::new_err(e.to_string()))
    })?;

    Ok((
        PyArray3::from_owned_array(py, dst),
        PyArray2::from_owned_array(py, dst_valid),
    ))
}

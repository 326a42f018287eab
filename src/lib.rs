pub mod error;
pub mod raster;
pub mod resample;
pub mod transform;
pub mod warp;

#[cfg(feature = "python")]
mod py;

pub use error::WarpError;
pub use raster::{BandBuffer, BandBufferMut, Window, WorkingType};
pub use resample::ResamplingMethod;
pub use warp::{warp_array, DestChunk, SourceChunk, WarpKernel};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// A Python module implemented in Rust.
#[cfg(feature = "python")]
#[pymodule]
fn _rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    py::register(m)?;
    Ok(())
}

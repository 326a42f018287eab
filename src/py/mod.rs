use pyo3::prelude::*;

mod warp;

/// Register all Python-visible functions and types.
pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(warp::warp_affine, m)?)?;
    Ok(())
}

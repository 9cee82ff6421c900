pub mod adapters;
pub mod ops;
pub mod stitch;
pub mod types;

#[cfg(feature = "python")]
mod python;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule(name = "foldit_stitch")]
fn foldit_stitch(_py: Python, m: &Bound<PyModule>) -> PyResult<()> {
    // Window planning
    m.add_function(wrap_pyfunction!(python::plan_chunks, m)?)?;

    // Stitching of already-predicted windows
    m.add_function(wrap_pyfunction!(python::stitch_structures, m)?)?;

    Ok(())
}

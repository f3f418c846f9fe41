// In: src/ffi/python.rs

//! CPython bindings over the same boundary the C API uses.
//!
//! Inputs may be any object exposing a uint8 buffer (`bytes`, `bytearray`,
//! `memoryview`, numpy arrays). Failures raise `RuntimeError` whose message
//! starts with the stable error string of the mapped code. Codec work runs
//! with the GIL released.

use std::borrow::Cow;

use log::LevelFilter;
use pyo3::buffer::PyBuffer;
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::boundary;
use crate::ffi::default_codec;
use crate::observability::init_logging;
use crate::params::Workers;

/// Borrows `bytes` directly and copies any other uint8 buffer, so the codec
/// never reads memory another thread can mutate while the GIL is released.
fn payload<'a>(py: Python<'_>, obj: &'a Bound<'_, PyAny>) -> PyResult<Cow<'a, [u8]>> {
    if let Ok(bytes) = obj.downcast::<PyBytes>() {
        return Ok(Cow::Borrowed(bytes.as_bytes()));
    }
    let buffer = PyBuffer::<u8>::get_bound(obj)
        .map_err(|_| PyTypeError::new_err("Expected buffer of type uint8"))?;
    Ok(Cow::Owned(buffer.to_vec(py)?))
}

/// Compresses raw splat data with the specified compression level.
#[pyfunction]
#[pyo3(name = "compress", signature = (raw_data, compression_level = 1, workers = 1))]
pub fn compress_py<'py>(
    py: Python<'py>,
    raw_data: &Bound<'py, PyAny>,
    compression_level: i32,
    workers: i32,
) -> PyResult<Bound<'py, PyBytes>> {
    let data = payload(py, raw_data)?;
    let data = data.as_ref();
    let workers = Workers::normalize(workers);
    let buffer = py.allow_threads(move || {
        boundary::compress(default_codec(), data, compression_level, workers)
    })?;
    Ok(PyBytes::new_bound(py, buffer.as_slice()))
}

/// Decompresses input data. If include_normals is True, normals are included into the output.
#[pyfunction]
#[pyo3(name = "decompress", signature = (input, include_normals))]
pub fn decompress_py<'py>(
    py: Python<'py>,
    input: &Bound<'py, PyAny>,
    include_normals: bool,
) -> PyResult<Bound<'py, PyBytes>> {
    let data = payload(py, input)?;
    let data = data.as_ref();
    let buffer = py.allow_threads(move || {
        boundary::decompress(default_codec(), data, include_normals)
    })?;
    Ok(PyBytes::new_bound(py, buffer.as_slice()))
}

/// Sends the crate's log output to stderr, or appended to `log_file` when given.
#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) {
    init_logging(LevelFilter::Info, log_file.as_deref());
}

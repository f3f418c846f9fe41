//! This file is the root of the `spz` Rust crate.
//!
//! The crate is an allocation-safe foreign-call boundary around a gaussian splat
//! codec. Its responsibilities are strictly limited to:
//! 1.  Declaring the modules: the boundary pipeline (`params`, `boundary`,
//!     `buffer`), its error taxonomy (`error`), the codec seam (`traits`,
//!     `kernels`), and the foreign surfaces (`ffi`).
//! 2.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python (feature `python`).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[doc(hidden)]
pub use log as __log;

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod boundary;
pub mod buffer;
pub mod config;
pub mod error;
pub mod ffi;
pub mod kernels;
pub mod params;
pub mod traits;

pub use boundary::{compress, decompress};
pub use buffer::OwnedBuffer;
pub use config::CodecConfig;
pub use error::{describe, CodecError, SpzCode, SpzError, SpzResult};
pub use kernels::ZstdCodec;
pub use observability::{init_logging, level_from_verbosity};
pub use params::{CompressionLevel, Workers};
pub use traits::SplatCodec;

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `spz` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn spz(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::python::compress_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::python::decompress_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::python::enable_verbose_logging_py, m)?)?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    Ok(())
}

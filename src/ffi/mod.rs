//! This module serves as the public API for the Foreign Function Interface (FFI) layer.
//!
//! `c_api` is the flat `extern "C"` surface used by native and WebAssembly hosts;
//! `python` (behind the `python` feature) wraps the same boundary for CPython.
//! Both share one lazily built default codec.

use std::sync::OnceLock;

use crate::config::CodecConfig;
use crate::kernels::ZstdCodec;

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod c_api;

#[cfg(feature = "python")]
pub mod python;


//==================================================================================
// 2. Shared State
//==================================================================================

static DEFAULT_CODEC: OnceLock<ZstdCodec> = OnceLock::new();

/// The codec behind every foreign entry point, configured from
/// `SPZ_CODEC_CONFIG` on first use and read-only afterwards.
pub fn default_codec() -> &'static ZstdCodec {
    DEFAULT_CODEC.get_or_init(|| ZstdCodec::new(CodecConfig::from_env()))
}

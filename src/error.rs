// In: src/error.rs

//! This module defines the two error domains of the spz boundary.
//!
//! Internally every fallible operation returns a `SpzError`, a rich, `thiserror`
//! derived enum that carries context for logging. Foreign callers never see it:
//! at the outermost call site of each operation it is flattened into a `SpzCode`,
//! the flat integer taxonomy whose ordinals are part of the wire contract.

use std::ffi::{c_int, CStr};

use thiserror::Error;

//==================================================================================
// 1. Wire Codes (ABI stable)
//==================================================================================

/// Stable error codes that cross the FFI boundary.
///
/// The ordinal values are persisted by callers and must never be renumbered.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpzCode {
    Success = 0,
    InvalidParams = 1,
    MemoryAllocation = 2,
    CompressionFailed = 3,
    DecompressionFailed = 4,
    Internal = 5,
}

/// Returned by `describe` for any integer outside the defined codes.
pub const UNKNOWN_ERROR: &CStr = c"Unknown error";

impl SpzCode {
    /// Maps a raw wire value back onto the enumeration.
    pub const fn from_raw(raw: c_int) -> Option<Self> {
        match raw {
            0 => Some(Self::Success),
            1 => Some(Self::InvalidParams),
            2 => Some(Self::MemoryAllocation),
            3 => Some(Self::CompressionFailed),
            4 => Some(Self::DecompressionFailed),
            5 => Some(Self::Internal),
            _ => None,
        }
    }

    /// The raw wire value.
    pub const fn raw(self) -> c_int {
        self as c_int
    }

    /// Fixed, NUL-terminated description of the code.
    pub const fn description(self) -> &'static CStr {
        match self {
            Self::Success => c"Success",
            Self::InvalidParams => c"Invalid parameters provided",
            Self::MemoryAllocation => c"Memory allocation failed",
            Self::CompressionFailed => c"Compression operation failed",
            Self::DecompressionFailed => c"Decompression operation failed",
            Self::Internal => c"Internal error occurred",
        }
    }

    /// The description as a Rust string slice.
    pub fn as_str(self) -> &'static str {
        // Every literal above is ASCII.
        self.description().to_str().unwrap_or("Unknown error")
    }
}

/// Total lookup from any integer to a static description. Never allocates.
pub const fn describe(raw: c_int) -> &'static CStr {
    match SpzCode::from_raw(raw) {
        Some(code) => code.description(),
        None => UNKNOWN_ERROR,
    }
}

//==================================================================================
// 2. Internal Error Types
//==================================================================================

/// Failure signalled by a codec collaborator.
///
/// `Rejected` is the codec declining the input (malformed data, an unsupported
/// parameter, a zstd error). `OutOfMemory` is resource exhaustion and is reported
/// to callers as `MemoryAllocation` regardless of direction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("codec rejected the input: {0}")]
    Rejected(String),

    #[error("codec ran out of memory: {0}")]
    OutOfMemory(String),
}

impl From<std::collections::TryReserveError> for CodecError {
    fn from(err: std::collections::TryReserveError) -> Self {
        CodecError::OutOfMemory(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SpzError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(&'static str),

    #[error("Memory allocation failed: {0}")]
    MemoryAllocation(String),

    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    #[error("Internal error (this is a bug): {0}")]
    Internal(String),
}

/// Result alias used throughout the crate.
pub type SpzResult<T> = Result<T, SpzError>;

impl SpzError {
    /// Translates a codec failure raised while compressing.
    pub fn from_compress(err: CodecError) -> Self {
        match err {
            CodecError::OutOfMemory(msg) => SpzError::MemoryAllocation(msg),
            CodecError::Rejected(msg) => SpzError::CompressionFailed(msg),
        }
    }

    /// Translates a codec failure raised while decompressing.
    pub fn from_decompress(err: CodecError) -> Self {
        match err {
            CodecError::OutOfMemory(msg) => SpzError::MemoryAllocation(msg),
            CodecError::Rejected(msg) => SpzError::DecompressionFailed(msg),
        }
    }

    pub fn code(&self) -> SpzCode {
        SpzCode::from(self)
    }
}

impl From<&SpzError> for SpzCode {
    fn from(err: &SpzError) -> SpzCode {
        match err {
            SpzError::InvalidParams(_) => SpzCode::InvalidParams,
            SpzError::MemoryAllocation(_) => SpzCode::MemoryAllocation,
            SpzError::CompressionFailed(_) => SpzCode::CompressionFailed,
            SpzError::DecompressionFailed(_) => SpzCode::DecompressionFailed,
            SpzError::Internal(_) => SpzCode::Internal,
        }
    }
}

impl From<std::collections::TryReserveError> for SpzError {
    fn from(err: std::collections::TryReserveError) -> Self {
        SpzError::MemoryAllocation(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<SpzError> for pyo3::PyErr {
    fn from(err: SpzError) -> pyo3::PyErr {
        pyo3::exceptions::PyRuntimeError::new_err(format!(
            "{} ({})",
            err.code().as_str(),
            err
        ))
    }
}

//! Parameter validation for the boundary.
//!
//! Every check here runs before any allocation or codec call, so a rejected
//! request has no side effects. The types produced are the only way to reach
//! the codec: holding a `CompressionLevel` proves the level is in range, holding
//! an `InputView` proves the input is present and non-empty.

use std::ffi::c_int;

use crate::buffer::OwnedBuffer;
use crate::error::{SpzError, SpzResult};

//==================================================================================
// 1. Compression Level
//==================================================================================

/// A zstd compression level in the closed range `[1, 22]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CompressionLevel(i32);

impl CompressionLevel {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 22;

    /// Rejects anything outside `[MIN, MAX]`. Out-of-range levels are never clamped.
    pub fn new(level: i32) -> SpzResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(SpzError::InvalidParams("compression level must be within 1..=22"))
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

//==================================================================================
// 2. Worker Hint
//==================================================================================

/// Parallelism hint forwarded to the codec. Always at least one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Workers(u32);

impl Workers {
    /// The fixed hint used by single-threaded hosts.
    pub const SINGLE: Workers = Workers(1);

    /// Non-positive hints are silently treated as one worker; positive hints pass
    /// through unchanged.
    pub fn normalize(hint: i32) -> Self {
        if hint <= 0 {
            Self::SINGLE
        } else {
            Self(hint.unsigned_abs())
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Workers {
    fn default() -> Self {
        Self::SINGLE
    }
}

//==================================================================================
// 3. Input View
//==================================================================================

/// A borrowed, non-empty input buffer. Never mutated by the boundary.
#[derive(Copy, Clone, Debug)]
pub struct InputView<'a> {
    bytes: &'a [u8],
}

impl<'a> InputView<'a> {
    pub fn new(bytes: &'a [u8]) -> SpzResult<Self> {
        if bytes.is_empty() {
            return Err(SpzError::InvalidParams("input must not be empty"));
        }
        Ok(Self { bytes })
    }

    /// Builds a view from a foreign pointer/length pair.
    ///
    /// # Safety
    /// When `ptr` is non-null and `len` is positive, `ptr` must be valid for reads
    /// of `len` bytes for the lifetime `'a`, and the memory must not be written
    /// to during that lifetime.
    pub unsafe fn from_raw(ptr: *const u8, len: c_int) -> SpzResult<Self> {
        if ptr.is_null() {
            return Err(SpzError::InvalidParams("input pointer is null"));
        }
        if len <= 0 {
            return Err(SpzError::InvalidParams("input size must be positive"));
        }
        Self::new(std::slice::from_raw_parts(ptr, len.unsigned_abs() as usize))
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

//==================================================================================
// 4. Output Slots
//==================================================================================

/// The pair of caller-provided out-parameters a result is written into.
///
/// Nothing is written until `deliver` succeeds, so every failure path leaves the
/// caller's slots exactly as they were.
#[derive(Debug)]
pub struct OutSlots<'a> {
    ptr: &'a mut *mut u8,
    size: &'a mut c_int,
}

impl<'a> OutSlots<'a> {
    /// # Safety
    /// Non-null pointers must be valid for writes and stay valid for `'a`.
    pub unsafe fn from_raw(ptr: *mut *mut u8, size: *mut c_int) -> SpzResult<Self> {
        match (ptr.as_mut(), size.as_mut()) {
            (Some(ptr), Some(size)) => Ok(Self { ptr, size }),
            _ => Err(SpzError::InvalidParams("output pointer and size slots are required")),
        }
    }

    /// Transfers ownership of `buffer` to the caller through the slots.
    ///
    /// A payload whose length cannot be expressed in a C `int` is released here
    /// and reported as an internal error.
    pub fn deliver(self, buffer: OwnedBuffer) -> SpzResult<()> {
        let size = c_int::try_from(buffer.len()).map_err(|_| {
            SpzError::Internal(format!(
                "output of {} bytes does not fit the size slot",
                buffer.len()
            ))
        })?;
        let (raw, _) = buffer.into_raw();
        *self.ptr = raw;
        *self.size = size;
        Ok(())
    }
}

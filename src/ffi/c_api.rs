// In: src/ffi/c_api.rs

//! C-compatible API.
//!
//! # Safety
//!
//! Every `extern "C"` function here validates its pointer arguments and returns
//! `InvalidParams` for null pointers instead of dereferencing them. Non-null
//! pointers must be valid for the duration of the call: `input` readable for
//! `input_size` bytes, `output_ptr` and `output_size` writable.
//!
//! On success the caller owns `*output_ptr` and must release it with
//! `free_buffer_spz`. On failure neither out-parameter is written.

use std::ffi::{c_char, c_int};

use crate::boundary;
use crate::buffer;
use crate::error::{describe, SpzCode, SpzResult};
use crate::ffi::default_codec;
use crate::observability::{init_logging, level_from_verbosity};
use crate::params::{InputView, OutSlots, Workers};
use crate::traits::SplatCodec;

//==================================================================================
// I. Codec-Generic Entry Logic
//==================================================================================

/// Runs one entry point body with every panic contained, and flattens the
/// outcome to its wire code.
pub(crate) fn finish(entry: &'static str, body: impl FnOnce() -> SpzResult<()>) -> c_int {
    let result = boundary::guarded(entry, || {
        body().inspect_err(|err| log::warn!("{} failed: {}", entry, err))
    });
    match result {
        Ok(()) => SpzCode::Success.raw(),
        Err(err) => err.code().raw(),
    }
}

unsafe fn compress_into<C: SplatCodec + ?Sized>(
    codec: &C,
    input: *const u8,
    input_size: c_int,
    compression_level: c_int,
    workers: Workers,
    output_ptr: *mut *mut u8,
    output_size: *mut c_int,
) -> SpzResult<()> {
    let slots = OutSlots::from_raw(output_ptr, output_size)?;
    let input = InputView::from_raw(input, input_size)?;
    let buffer = boundary::compress(codec, input.as_slice(), compression_level, workers)?;
    slots.deliver(buffer)
}

unsafe fn decompress_into<C: SplatCodec + ?Sized>(
    codec: &C,
    input: *const u8,
    input_size: c_int,
    include_normals: c_int,
    output_ptr: *mut *mut u8,
    output_size: *mut c_int,
) -> SpzResult<()> {
    let slots = OutSlots::from_raw(output_ptr, output_size)?;
    let input = InputView::from_raw(input, input_size)?;
    let buffer = boundary::decompress(codec, input.as_slice(), include_normals != 0)?;
    slots.deliver(buffer)
}

/// Runs a compression with `codec` against raw foreign arguments.
///
/// # Safety
/// See the module documentation.
pub unsafe fn compress_with<C: SplatCodec + ?Sized>(
    codec: &C,
    input: *const u8,
    input_size: c_int,
    compression_level: c_int,
    workers: Workers,
    output_ptr: *mut *mut u8,
    output_size: *mut c_int,
) -> c_int {
    finish("compress_spz", || {
        compress_into(
            codec,
            input,
            input_size,
            compression_level,
            workers,
            output_ptr,
            output_size,
        )
    })
}

/// Runs a decompression with `codec` against raw foreign arguments.
///
/// # Safety
/// See the module documentation.
pub unsafe fn decompress_with<C: SplatCodec + ?Sized>(
    codec: &C,
    input: *const u8,
    input_size: c_int,
    include_normals: c_int,
    output_ptr: *mut *mut u8,
    output_size: *mut c_int,
) -> c_int {
    finish("decompress_spz", || {
        decompress_into(
            codec,
            input,
            input_size,
            include_normals,
            output_ptr,
            output_size,
        )
    })
}

//==================================================================================
// II. Exported Symbols
//==================================================================================

/// Compresses `input` into a newly allocated buffer. Single-threaded hosts do not
/// get a worker parameter; the codec always runs with one worker.
#[cfg(target_arch = "wasm32")]
#[no_mangle]
pub unsafe extern "C" fn compress_spz(
    input: *const u8,
    input_size: c_int,
    compression_level: c_int,
    output_ptr: *mut *mut u8,
    output_size: *mut c_int,
) -> c_int {
    finish("compress_spz", || {
        compress_into(
            default_codec(),
            input,
            input_size,
            compression_level,
            Workers::SINGLE,
            output_ptr,
            output_size,
        )
    })
}

/// Compresses `input` into a newly allocated buffer. A non-positive `workers`
/// hint is treated as one worker.
#[cfg(not(target_arch = "wasm32"))]
#[no_mangle]
pub unsafe extern "C" fn compress_spz(
    input: *const u8,
    input_size: c_int,
    compression_level: c_int,
    workers: c_int,
    output_ptr: *mut *mut u8,
    output_size: *mut c_int,
) -> c_int {
    finish("compress_spz", || {
        compress_into(
            default_codec(),
            input,
            input_size,
            compression_level,
            Workers::normalize(workers),
            output_ptr,
            output_size,
        )
    })
}

/// Decompresses `input` into a newly allocated buffer. Any non-zero
/// `include_normals` asks the codec for the normals channel.
#[no_mangle]
pub unsafe extern "C" fn decompress_spz(
    input: *const u8,
    input_size: c_int,
    include_normals: c_int,
    output_ptr: *mut *mut u8,
    output_size: *mut c_int,
) -> c_int {
    finish("decompress_spz", || {
        decompress_into(
            default_codec(),
            input,
            input_size,
            include_normals,
            output_ptr,
            output_size,
        )
    })
}

/// Static description of an error code. Never null; the string must not be freed.
#[no_mangle]
pub extern "C" fn get_error_string_spz(error_code: c_int) -> *const c_char {
    describe(error_code).as_ptr()
}

/// Releases a buffer returned by `compress_spz` or `decompress_spz`. Null is a no-op.
#[no_mangle]
pub unsafe extern "C" fn free_buffer_spz(buffer: *mut u8) {
    buffer::release(buffer);
}

/// Turns on logging to stderr. `verbosity` runs from 0 (off) to 5 (trace).
/// Only the first call has an effect.
#[no_mangle]
pub extern "C" fn enable_logging_spz(verbosity: c_int) {
    init_logging(level_from_verbosity(verbosity), None);
}

// In: src/boundary.rs

//! The boundary operations: validate, run the codec, hand the result over.
//!
//! Data Flow (both directions):
//!
//!   1. [Validator]  -> `InputView`, `CompressionLevel`, `Workers`
//!   2. [Codec]      -> `Vec<u8>` owned by Rust
//!   3. [Allocator]  -> `OwnedBuffer` in the C heap, ready to be given away
//!
//! Each operation runs inside `guarded`, which turns a panic into a `SpzError`.
//! Nothing else in the crate catches panics, so this is the single point where
//! internal faults are flattened.

use std::any::Any;
use std::collections::TryReserveError;
use std::panic::{self, AssertUnwindSafe};
#[cfg(debug_assertions)]
use std::time::Instant;

use crate::buffer::OwnedBuffer;
use crate::error::{SpzError, SpzResult};
use crate::params::{CompressionLevel, InputView, Workers};
use crate::traits::SplatCodec;

//==================================================================================
// 1. Fault Translation
//==================================================================================

/// Runs `op`, converting a panic into `MemoryAllocation` or `Internal`.
pub fn guarded<T>(operation: &'static str, op: impl FnOnce() -> SpzResult<T>) -> SpzResult<T> {
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(result) => result,
        Err(payload) => {
            let err = panic_to_error(payload.as_ref());
            log::error!("Caught panic in {}: {}", operation, err);
            Err(err)
        }
    }
}

fn panic_to_error(payload: &(dyn Any + Send)) -> SpzError {
    if let Some(err) = payload.downcast_ref::<TryReserveError>() {
        return SpzError::MemoryAllocation(err.to_string());
    }

    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_string()
    };

    if is_allocation_failure(&message) {
        SpzError::MemoryAllocation(message)
    } else {
        SpzError::Internal(message)
    }
}

/// Recognises the panic messages the standard library raises when a
/// collection cannot grow.
fn is_allocation_failure(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("capacity overflow")
        || message.contains("memory allocation")
        || message.contains("out of memory")
}

//==================================================================================
// 2. Operations
//==================================================================================

/// Compresses `input` with `codec`.
///
/// Rejects an empty input or a level outside `[1, 22]` before doing any work.
/// An empty compressed payload is never a valid artifact and is reported as a
/// compression failure.
pub fn compress<C: SplatCodec + ?Sized>(
    codec: &C,
    input: &[u8],
    level: i32,
    workers: Workers,
) -> SpzResult<OwnedBuffer> {
    let input = InputView::new(input)?;
    let level = CompressionLevel::new(level)?;

    guarded("compress", || {
        #[cfg(debug_assertions)]
        let start = Instant::now();
        log::debug!(
            "compress: {} bytes, level {}, {} worker(s)",
            input.len(),
            level.get(),
            workers.get()
        );

        // Capacity hint only; the codec may produce more or less.
        let mut output = Vec::new();
        output.try_reserve(input.len())?;

        codec
            .compress(input.as_slice(), level, workers, &mut output)
            .map_err(SpzError::from_compress)?;
        if output.is_empty() {
            return Err(SpzError::CompressionFailed(
                "codec produced an empty payload".to_string(),
            ));
        }

        log_metric!(
            "event" = "compress",
            "input_bytes" = input.len(),
            "output_bytes" = output.len(),
            "elapsed_us" = start.elapsed().as_micros()
        );
        OwnedBuffer::copy_from(&output)
    })
}

/// Decompresses `input` with `codec`.
///
/// Unlike compression, an empty decompressed payload is accepted.
pub fn decompress<C: SplatCodec + ?Sized>(
    codec: &C,
    input: &[u8],
    include_normals: bool,
) -> SpzResult<OwnedBuffer> {
    let input = InputView::new(input)?;

    guarded("decompress", || {
        #[cfg(debug_assertions)]
        let start = Instant::now();
        log::debug!(
            "decompress: {} bytes, include_normals={}",
            input.len(),
            include_normals
        );

        let mut output = Vec::new();
        codec
            .decompress(input.as_slice(), include_normals, &mut output)
            .map_err(SpzError::from_decompress)?;

        log_metric!(
            "event" = "decompress",
            "input_bytes" = input.len(),
            "output_bytes" = output.len(),
            "elapsed_us" = start.elapsed().as_micros()
        );
        OwnedBuffer::copy_from(&output)
    })
}

//! This module defines the seam between the boundary and the codec it wraps.

use crate::error::CodecError;
use crate::params::{CompressionLevel, Workers};

/// A splat compression codec, treated by the boundary as a black box.
///
/// Implementations replace the contents of `output` on success. They signal a
/// declined input with `CodecError::Rejected` and resource exhaustion with
/// `CodecError::OutOfMemory`; a panic is also tolerated and is reported to
/// foreign callers as an internal error. Codecs are shared across threads and
/// must not keep per-call state.
pub trait SplatCodec: Send + Sync {
    /// Compresses `input`. `workers` is a parallelism hint the codec may use.
    fn compress(
        &self,
        input: &[u8],
        level: CompressionLevel,
        workers: Workers,
        output: &mut Vec<u8>,
    ) -> Result<(), CodecError>;

    /// Decompresses `input`, reconstructing the normals channel if asked to.
    fn decompress(
        &self,
        input: &[u8],
        include_normals: bool,
        output: &mut Vec<u8>,
    ) -> Result<(), CodecError>;
}

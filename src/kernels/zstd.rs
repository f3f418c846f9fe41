//! This module contains the default codec: the Zstandard frame stage that SPZ
//! wraps its packed gaussian payload in.
//!
//! Compression writes a single frame that records its decompressed size.
//! Decompression trusts that size when present and otherwise falls back to an
//! expansion heuristic. This module is a panic-free wrapper around the `zstd`
//! crate; every failure surfaces as a `CodecError`.

use ::zstd::bulk::{Compressor, Decompressor};
use ::zstd::zstd_safe::{self, CParameter};

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::params::{CompressionLevel, Workers};
use crate::traits::SplatCodec;

//==================================================================================
// 1. Core Logic (The "Engine")
//==================================================================================

fn zstd_err(context: &str, err: std::io::Error) -> CodecError {
    CodecError::Rejected(format!("zstd {}: {}", context, err))
}

/// Compresses `input` as one frame into `output`, replacing its contents.
fn compress_frame(
    input: &[u8],
    level: i32,
    workers: u32,
    checksum: bool,
    output: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let mut cctx = Compressor::new(level).map_err(|e| zstd_err("context", e))?;
    #[cfg(not(target_arch = "wasm32"))]
    cctx.set_parameter(CParameter::NbWorkers(workers))
        .map_err(|e| zstd_err("workers", e))?;
    #[cfg(target_arch = "wasm32")]
    debug_assert_eq!(workers, 1);
    cctx.set_parameter(CParameter::ChecksumFlag(checksum))
        .map_err(|e| zstd_err("checksum", e))?;

    // `compress_to_buffer` writes into spare capacity, so it must cover the bound.
    let bound = zstd_safe::compress_bound(input.len());
    output.clear();
    output.try_reserve(bound)?;

    cctx.compress_to_buffer(input, output)
        .map_err(|e| zstd_err("compress", e))?;
    Ok(())
}

/// No zstd block regenerates more than this many bytes.
const BLOCK_SIZE_MAX: usize = 128 * 1024;

fn zstd_code_err(context: &str, code: usize) -> CodecError {
    CodecError::Rejected(format!("zstd {}: {}", context, zstd_safe::get_error_name(code)))
}

/// Checks that a declared content size is backed by the blocks of the first
/// frame. Every block header takes at least one input byte, so a frame of `n`
/// bytes can regenerate at most `n * BLOCK_SIZE_MAX` bytes.
fn backed_content_size(input: &[u8], declared: u64) -> Result<usize, CodecError> {
    let frame_len = zstd_safe::find_frame_compressed_size(input)
        .map_err(|code| zstd_code_err("frame", code))?;
    let ceiling = frame_len.saturating_mul(BLOCK_SIZE_MAX);
    match usize::try_from(declared) {
        Ok(size) if size <= ceiling => Ok(size),
        _ => Err(CodecError::Rejected(format!(
            "frame declares {} bytes but carries only {} compressed bytes",
            declared, frame_len
        ))),
    }
}

/// Decompresses every frame in `input` into `output`, replacing its contents.
fn decompress_frame(
    input: &[u8],
    config: &CodecConfig,
    output: &mut Vec<u8>,
) -> Result<(), CodecError> {
    let declared = zstd_safe::get_frame_content_size(input)
        .map_err(|_| CodecError::Rejected("not a valid zstd frame".to_string()))?;

    let capacity = match declared {
        Some(declared) => {
            let size = backed_content_size(input, declared)?;
            if let Some(max) = config.max_decompressed_size {
                if size > max {
                    return Err(CodecError::Rejected(format!(
                        "frame declares {} bytes, limit is {}",
                        size, max
                    )));
                }
            }
            size
        }
        None => {
            log::warn!("Decompressed size unknown, using a heuristic.");
            let guess = input.len().saturating_mul(config.unknown_size_expansion);
            config.max_decompressed_size.map_or(guess, |max| guess.min(max))
        }
    };

    output.clear();
    output.try_reserve(capacity)?;

    let mut dctx = Decompressor::new().map_err(|e| zstd_err("context", e))?;
    let produced = dctx
        .decompress_to_buffer(input, output)
        .map_err(|e| zstd_err("decompress", e))?;

    if let Some(expected) = declared {
        if produced as u64 != expected {
            return Err(CodecError::Rejected(format!(
                "decompressed size does not match header. Expected {}, got {}.",
                expected, produced
            )));
        }
    }
    Ok(())
}

//==================================================================================
// 2. Public API
//==================================================================================

/// The zstd-backed `SplatCodec`.
#[derive(Debug, Clone, Default)]
pub struct ZstdCodec {
    config: CodecConfig,
}

impl ZstdCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }
}

impl SplatCodec for ZstdCodec {
    fn compress(
        &self,
        input: &[u8],
        level: CompressionLevel,
        workers: Workers,
        output: &mut Vec<u8>,
    ) -> Result<(), CodecError> {
        compress_frame(
            input,
            level.get(),
            workers.get(),
            self.config.checksum,
            output,
        )
    }

    fn decompress(
        &self,
        input: &[u8],
        include_normals: bool,
        output: &mut Vec<u8>,
    ) -> Result<(), CodecError> {
        // The frame stage has no separate normals channel to rebuild.
        log::debug!("zstd decompress: include_normals={}", include_normals);
        decompress_frame(input, &self.config, output)
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn level(l: i32) -> CompressionLevel {
        CompressionLevel::new(l).unwrap()
    }

    #[test]
    fn test_zstd_roundtrip_simple_text() {
        let codec = ZstdCodec::default();
        let original =
            b"hello world, this is a test of zstd compression. hello world, this is a test."
                .to_vec();

        let mut compressed = Vec::new();
        codec
            .compress(&original, level(3), Workers::SINGLE, &mut compressed)
            .unwrap();
        assert!(compressed.len() < original.len());

        let mut decompressed = Vec::new();
        codec.decompress(&compressed, false, &mut decompressed).unwrap();
        assert_eq!(original, decompressed);
    }

    #[test]
    fn test_zstd_highly_compressible_data() {
        let codec = ZstdCodec::default();
        let original = vec![42u8; 10_000];

        let mut compressed = Vec::new();
        codec
            .compress(&original, level(5), Workers::SINGLE, &mut compressed)
            .unwrap();
        assert!(compressed.len() < 50);

        let mut decompressed = Vec::new();
        codec.decompress(&compressed, true, &mut decompressed).unwrap();
        assert_eq!(original, decompressed);
    }

    #[test]
    fn test_zstd_frame_records_content_size() {
        let codec = ZstdCodec::default();
        let original = vec![7u8; 1234];
        let mut compressed = Vec::new();
        codec
            .compress(&original, level(1), Workers::SINGLE, &mut compressed)
            .unwrap();

        assert_eq!(
            zstd_safe::get_frame_content_size(&compressed).unwrap(),
            Some(1234)
        );
    }

    #[test]
    fn test_zstd_workers_do_not_change_content() {
        let codec = ZstdCodec::default();
        let original: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();

        let mut single = Vec::new();
        let mut multi = Vec::new();
        codec
            .compress(&original, level(3), Workers::SINGLE, &mut single)
            .unwrap();
        codec
            .compress(&original, level(3), Workers::normalize(4), &mut multi)
            .unwrap();

        let mut a = Vec::new();
        let mut b = Vec::new();
        codec.decompress(&single, false, &mut a).unwrap();
        codec.decompress(&multi, false, &mut b).unwrap();
        assert_eq!(a, original);
        assert_eq!(b, original);
    }

    #[test]
    fn test_zstd_checksum_frames_roundtrip() {
        let codec = ZstdCodec::new(CodecConfig {
            checksum: true,
            ..Default::default()
        });
        let original = b"splat splat splat splat".to_vec();
        let mut compressed = Vec::new();
        codec
            .compress(&original, level(9), Workers::SINGLE, &mut compressed)
            .unwrap();

        let mut decompressed = Vec::new();
        codec.decompress(&compressed, false, &mut decompressed).unwrap();
        assert_eq!(original, decompressed);
    }

    /// Streams a frame without pledging its size, so the header omits it.
    fn stream_compress(input: &[u8]) -> Vec<u8> {
        use std::io::Write;
        let mut encoder = ::zstd::stream::Encoder::new(Vec::new(), 3).unwrap();
        encoder.write_all(input).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_zstd_unknown_size_uses_expansion_heuristic() {
        let mut state: u32 = 0x1234_5678;
        let noisy: Vec<u8> = (0..4096)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect();
        let frame = stream_compress(&noisy);
        assert_eq!(zstd_safe::get_frame_content_size(&frame).unwrap(), None);

        let mut out = Vec::new();
        ZstdCodec::default().decompress(&frame, false, &mut out).unwrap();
        assert_eq!(out, noisy);
    }

    #[test]
    fn test_zstd_unknown_size_beyond_heuristic_needs_more_expansion() {
        let zeros = vec![0u8; 100_000];
        let frame = stream_compress(&zeros);

        let mut out = Vec::new();
        assert!(ZstdCodec::default().decompress(&frame, false, &mut out).is_err());

        let roomy = ZstdCodec::new(CodecConfig {
            unknown_size_expansion: 100_000,
            ..Default::default()
        });
        roomy.decompress(&frame, false, &mut out).unwrap();
        assert_eq!(out, zeros);
    }

    #[test]
    fn test_zstd_decompress_invalid_data() {
        let codec = ZstdCodec::default();
        let mut out = Vec::new();
        let result = codec.decompress(&[1, 2, 3, 4, 5], false, &mut out);
        assert!(matches!(result, Err(CodecError::Rejected(_))));
    }

    #[test]
    fn test_zstd_decompress_truncated_frame() {
        let codec = ZstdCodec::default();
        let original = vec![3u8; 4096];
        let mut compressed = Vec::new();
        codec
            .compress(&original, level(3), Workers::SINGLE, &mut compressed)
            .unwrap();

        compressed.truncate(compressed.len() - 2);
        let mut out = Vec::new();
        assert!(codec.decompress(&compressed, false, &mut out).is_err());
    }

    /// Frame header with an 8-byte content size field and a 1 KiB window.
    fn header_declaring(size: u64) -> Vec<u8> {
        let mut frame = vec![0x28, 0xB5, 0x2F, 0xFD, 0xC0, 0x00];
        frame.extend_from_slice(&size.to_le_bytes());
        frame
    }

    #[test]
    fn test_zstd_header_only_frame_is_rejected() {
        let frame = header_declaring(1u64 << 62);
        let mut out = Vec::new();
        let result = ZstdCodec::default().decompress(&frame, false, &mut out);
        assert!(matches!(result, Err(CodecError::Rejected(_))));
        assert_eq!(out.capacity(), 0);
    }

    #[test]
    fn test_zstd_declared_size_must_be_backed_by_blocks() {
        // One last RLE block regenerating a single byte.
        let mut frame = header_declaring(1u64 << 40);
        frame.extend_from_slice(&[0x0B, 0x00, 0x00, 0x41]);

        let mut out = Vec::new();
        let result = ZstdCodec::default().decompress(&frame, false, &mut out);
        assert!(matches!(result, Err(CodecError::Rejected(_))));
        assert_eq!(out.capacity(), 0);
    }

    #[test]
    fn test_zstd_max_decompressed_size_is_enforced() {
        let original = vec![0u8; 10_000];
        let mut compressed = Vec::new();
        ZstdCodec::default()
            .compress(&original, level(3), Workers::SINGLE, &mut compressed)
            .unwrap();

        let capped = ZstdCodec::new(CodecConfig {
            max_decompressed_size: Some(1_000),
            ..Default::default()
        });
        let mut out = Vec::new();
        let result = capped.decompress(&compressed, false, &mut out);
        assert!(matches!(result, Err(CodecError::Rejected(_))));
    }
}

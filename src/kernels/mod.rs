//! Concrete codec kernels that plug into the boundary through `SplatCodec`.

pub mod zstd;

pub use self::zstd::ZstdCodec;

// In: src/config.rs

//! Tuning for the default zstd codec.
//!
//! `CodecConfig` is created once at the application boundary and is read-only
//! afterwards. The C surface builds it from the JSON held in the
//! `SPZ_CODEC_CONFIG` environment variable; Rust callers construct it directly or
//! through `from_json`. Every field has a default, so `{}` is a valid document.

use serde::{Deserialize, Serialize};

use crate::error::{SpzError, SpzResult};

/// Environment variable consulted by `CodecConfig::from_env`.
pub const CONFIG_ENV_VAR: &str = "SPZ_CODEC_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct CodecConfig {
    /// Output multiplier used when a frame does not record its decompressed size.
    #[serde(default = "default_unknown_size_expansion")]
    pub unknown_size_expansion: usize,

    /// Optional hard cap on the size of a decompressed payload, in bytes.
    #[serde(default)]
    pub max_decompressed_size: Option<usize>,

    /// If true, compressed frames carry a content checksum.
    #[serde(default)]
    pub checksum: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            unknown_size_expansion: default_unknown_size_expansion(),
            max_decompressed_size: None,
            checksum: false,
        }
    }
}

impl CodecConfig {
    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> SpzResult<Self> {
        let config: CodecConfig = serde_json::from_str(json)
            .map_err(|e| SpzError::Internal(format!("invalid codec config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `SPZ_CODEC_CONFIG`. Falls back to the defaults when the variable is
    /// unset or does not hold a valid document.
    pub fn from_env() -> Self {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(json) => Self::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring {}: {}", CONFIG_ENV_VAR, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn validate(&self) -> SpzResult<()> {
        if self.unknown_size_expansion == 0 {
            return Err(SpzError::Internal(
                "unknown_size_expansion must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Matches the 6x heuristic the SPZ loader has always used.
fn default_unknown_size_expansion() -> usize {
    6
}

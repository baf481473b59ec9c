// src/compression/mod.rs
//! Decompression of feed index payloads
//!
//! opkg feeds publish `Packages.gz` next to (or instead of) a plain
//! `Packages` file. Some mirrors serve the gzip body under the plain name,
//! so the format is taken from the magic bytes rather than trusted from the
//! URL.

use std::io::{self, Read};
use thiserror::Error;

/// Compression-related errors
#[derive(Error, Debug)]
pub enum CompressionError {
    #[error("Failed to decompress {format} data: {source}")]
    Decompression {
        format: &'static str,
        source: io::Error,
    },
}

/// Formats an index payload can arrive in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// No compression (raw data)
    None,
    /// Gzip compression (.gz)
    Gzip,
}

impl CompressionFormat {
    /// Detect compression format from magic bytes (`1f 8b` for gzip)
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x1f, 0x8b]) {
            Self::Gzip
        } else {
            Self::None
        }
    }

    /// Get a human-readable name for this format
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
        }
    }
}

impl std::fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decompress a byte slice using the specified format
pub fn decompress(data: &[u8], format: CompressionFormat) -> Result<Vec<u8>, CompressionError> {
    match format {
        CompressionFormat::None => Ok(data.to_vec()),
        CompressionFormat::Gzip => {
            let mut output = Vec::new();
            flate2::read::MultiGzDecoder::new(data)
                .read_to_end(&mut output)
                .map_err(|e| CompressionError::Decompression {
                    format: format.name(),
                    source: e,
                })?;
            Ok(output)
        }
    }
}

/// Decompress a byte slice, detecting the format from magic bytes
pub fn decompress_auto(data: &[u8]) -> Result<Vec<u8>, CompressionError> {
    decompress(data, CompressionFormat::from_magic_bytes(data))
}

/// Turn a downloaded index body into text
///
/// Only field keys are interpreted, so bytes outside UTF-8 (a Latin-1
/// `Description:`, say) are replaced instead of failing the whole feed.
pub fn decode_index(data: &[u8]) -> Result<String, CompressionError> {
    let bytes = decompress_auto(data)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

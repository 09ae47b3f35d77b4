use std::fmt::{Display, Formatter};

use crate::error::StreamError;

const MARKER_NONE: u8 = 0x02;
const MARKER_LZ4: u8 = 0x82;
const MARKER_ZSTD: u8 = 0x90;

/// Compression applied to the payload of each block, identified on the wire
/// by the marker byte following the checksum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde_impls", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressionMethod {
    /// Payload stored as-is
    None,
    /// Raw LZ4 block, without a frame or size prefix
    #[default]
    Lz4,
}

impl CompressionMethod {
    pub const fn marker(&self) -> u8 {
        match self {
            CompressionMethod::None => MARKER_NONE,
            CompressionMethod::Lz4 => MARKER_LZ4,
        }
    }

    pub fn from_marker(byte: u8) -> Result<Self, StreamError> {
        match byte {
            MARKER_NONE => Ok(CompressionMethod::None),
            MARKER_LZ4 => Ok(CompressionMethod::Lz4),
            MARKER_ZSTD => Err(StreamError::UnsupportedMethod("ZSTD")),
            other => Err(StreamError::UnknownMethod(other)),
        }
    }

    pub(crate) fn compress(&self, data: &[u8]) -> Vec<u8> {
        match self {
            CompressionMethod::None => data.to_vec(),
            CompressionMethod::Lz4 => lz4_flex::block::compress(data),
        }
    }

    /// Restores a payload whose header claims `size` uncompressed bytes.
    pub(crate) fn decompress(&self, payload: &[u8], size: usize) -> Result<Vec<u8>, StreamError> {
        let data = match self {
            CompressionMethod::None => payload.to_vec(),
            CompressionMethod::Lz4 => lz4_flex::block::decompress(payload, size)
                .map_err(|err| StreamError::CorruptBlock(format!("lz4: {err}")))?,
        };
        if data.len() != size {
            return Err(StreamError::CorruptBlock(format!(
                "header declares {size} uncompressed bytes, payload holds {}",
                data.len()
            )));
        }
        Ok(data)
    }
}

impl Display for CompressionMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressionMethod::None => f.write_str("NONE"),
            CompressionMethod::Lz4 => f.write_str("LZ4"),
        }
    }
}

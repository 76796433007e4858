use crate::error::Result;
use lz4_flex::{compress_prepend_size, decompress_size_prepended};

/// Compress a snapshot payload using LZ4.
pub fn compress(data: &[u8]) -> Vec<u8> {
    compress_prepend_size(data)
}

/// Decompress an LZ4 snapshot payload.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    Ok(decompress_size_prepended(data)?)
}

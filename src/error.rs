use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Decompression error: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Height {height} out of range for chain of length {length}")]
    OutOfRange { height: u32, length: u32 },

    #[error("Corruption: {0}")]
    Corruption(String),

    #[error("Chain storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, ChainError>;

use thiserror::Error;

use crate::decode::DecodeError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("page is {actual} bytes, limit is {max_bytes}")]
    TooLarge { max_bytes: u64, actual: u64 },
    #[error("invalid settings in {source_name}: {message}")]
    Settings {
        source_name: String,
        message: String,
    },
}

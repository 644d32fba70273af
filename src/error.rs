use thiserror::Error;

use crate::protocol::DecodeError;

pub type ViewerResult<T> = Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("malformed frame: {0}")]
    Decode(#[from] DecodeError),

    #[error("tile budget exceeded: {required} tiles required, {available} available")]
    TileBudgetExceeded { required: usize, available: usize },

    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    #[error("render backend failure: {0}")]
    Backend(String),
}

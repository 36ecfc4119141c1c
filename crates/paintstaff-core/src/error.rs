//! Error types for paintstaff

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlaybackError {
    #[error("Invalid tempo: {0} seconds per step")]
    InvalidTempo(f64),
    #[error("Button sprites are not attached")]
    MissingButtonSprites,
}

pub type Result<T> = std::result::Result<T, PlaybackError>;

use std::io;

use thiserror::Error;

/// Why a single line could not be turned into a [`Command`](crate::Command).
///
/// All variants are recoverable: the stream stays usable and the next line
/// can be decoded normally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed frame: {0}")]
    MalformedFrame(&'static str),

    #[error("protocol mismatch: expected {expected}, got {found:?}")]
    ProtocolMismatch { expected: String, found: String },

    #[error("unsupported command: {0:?}")]
    UnsupportedCommand(String),
}

/// Transport-level failure while framing commands.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

use crate::crypto::TokenError;
use thiserror::Error;

/// Errors generated by the core library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error generated when a quorum of zero is requested.
    #[error("quorum must be at least one, got {0}")]
    InvalidQuorum(usize),

    /// Error generated when too few shares are available
    /// to reconstruct the master secret.
    #[error("not enough shares to reconstruct, have {have}")]
    InsufficientShares {
        /// Number of shares that were available.
        have: usize,
    },

    /// Error generated when share bytes are not the expected length.
    #[error("share must be {expected} bytes, got {actual}")]
    ShareLength {
        /// Required length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// Error generated when a symmetric key is not 32 bytes
    /// of url-safe base64.
    #[error("symmetric key must be 32 bytes of url-safe base64")]
    InvalidKey,

    /// Error generated when a token fails to decode or verify.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenError),

    /// Error generated by the hex library.
    #[error(transparent)]
    Hex(#[from] hex::FromHexError),

    /// Error generated formatting a date and time.
    #[error(transparent)]
    TimeFormat(#[from] time::error::Format),

    /// Error generated parsing a date and time.
    #[error(transparent)]
    TimeParse(#[from] time::error::Parse),

    /// Error generated when a timestamp is out of range.
    #[error(transparent)]
    TimeRange(#[from] time::error::ComponentRange),
}

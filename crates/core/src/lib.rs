//! Core types for the edgefed share federation.
//!
//! Provides the [Share] held by each node, the combination
//! engine that turns a quorum of shares back into the
//! [MasterSecret], and the key derivation and token cipher
//! used to unlock the secure partition.
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod constants;
pub mod crypto;
mod date_time;
mod error;
mod share;

pub use constants::SHARE_LEN;
pub use crypto::{derive_key, SymmetricKey};
pub use date_time::UtcDateTime;
pub use error::Error;
pub use share::{combine, MasterSecret, Share};

/// Result type for the library.
pub(crate) type Result<T> = std::result::Result<T, Error>;

use rand::{rngs::OsRng, CryptoRng, Rng};

/// Exposes the default cryptographically secure RNG.
pub fn csprng() -> impl CryptoRng + Rng {
    OsRng
}

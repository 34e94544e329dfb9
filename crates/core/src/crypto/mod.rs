//! Key derivation and the partition cipher.
use crate::{Error, MasterSecret, Result};
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod fernet;

pub use fernet::TokenError;

/// Url-safe base64 that writes padding and accepts input
/// with or without it.
pub(crate) const URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Symmetric key for partition tokens.
///
/// The first half of the 32 key bytes signs tokens and the
/// second half encrypts them. The text form is url-safe base64
/// of all 32 bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    signing: [u8; 16],
    encryption: [u8; 16],
}

impl SymmetricKey {
    /// Random key for tests that need a key other than the
    /// derived one.
    #[cfg(test)]
    pub(crate) fn generate() -> Self {
        use rand::Rng;
        let bytes: [u8; 32] = crate::csprng().gen();
        Self::from_bytes(&bytes)
    }

    /// Decode a key from url-safe base64.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = URL_SAFE
            .decode(encoded.trim())
            .map_err(|_| Error::InvalidKey)?;
        let bytes: [u8; 32] =
            bytes.as_slice().try_into().map_err(|_| Error::InvalidKey)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Encode this key as url-safe base64.
    pub fn to_base64(&self) -> String {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&self.signing);
        bytes[16..].copy_from_slice(&self.encryption);
        let encoded = URL_SAFE.encode(bytes);
        bytes.zeroize();
        encoded
    }

    fn from_bytes(bytes: &[u8; 32]) -> Self {
        let mut signing = [0u8; 16];
        let mut encryption = [0u8; 16];
        signing.copy_from_slice(&bytes[..16]);
        encryption.copy_from_slice(&bytes[16..]);
        Self {
            signing,
            encryption,
        }
    }

    pub(crate) fn signing(&self) -> &[u8; 16] {
        &self.signing
    }

    pub(crate) fn encryption(&self) -> &[u8; 16] {
        &self.encryption
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SymmetricKey(<redacted>)")
    }
}

/// Derive the partition key from a master secret.
///
/// The key is the SHA-256 digest of the secret, so its text form is
/// `base64_urlsafe(sha256(secret))`.
pub fn derive_key(secret: &MasterSecret) -> SymmetricKey {
    let mut digest: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
    let key = SymmetricKey::from_bytes(&digest);
    digest.zeroize();
    key
}

//! Encrypt and decrypt partition tokens.
//!
//! A token is url-safe base64 of
//! `version (1) | timestamp (8, big endian) | iv (16) | ciphertext | hmac (32)`
//! where the ciphertext is AES-128-CBC with PKCS#7 padding and the
//! HMAC-SHA256 tag covers every preceding byte. This is the Fernet
//! format, so tokens interoperate with other Fernet implementations
//! given the same key.
use super::{SymmetricKey, URL_SAFE};
use crate::{
    constants::{MAX_CLOCK_SKEW, TOKEN_VERSION},
    csprng, Error, Result, UtcDateTime,
};
use aes::{
    cipher::{
        block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit,
    },
    Aes128,
};
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use std::time::Duration;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type HmacSha256 = Hmac<Sha256>;

const HEADER_LEN: usize = 1 + 8 + 16;
const TAG_LEN: usize = 32;

/// Reasons a token is rejected.
///
/// None of the variants carry token or key material.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Token is not url-safe base64 text.
    #[error("token is not url-safe base64")]
    Encoding,

    /// Token is shorter than the fixed fields.
    #[error("token is truncated")]
    Truncated,

    /// Version byte is not supported.
    #[error("unsupported token version {0:#04x}")]
    Version(u8),

    /// HMAC tag does not match.
    #[error("signature mismatch")]
    Signature,

    /// Ciphertext did not decrypt to valid padding.
    #[error("bad ciphertext padding")]
    Padding,

    /// Token is older than the allowed TTL.
    #[error("token has expired")]
    Expired,

    /// Token timestamp is too far in the future.
    #[error("token timestamp is in the future")]
    FutureTimestamp,
}

/// Encrypt plaintext to a token stamped with the current time
/// and a random IV.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<String> {
    let iv: [u8; 16] = csprng().gen();
    let timestamp = UtcDateTime::now().unix_timestamp() as u64;
    encrypt_at(key, plaintext, timestamp, iv)
}

/// Encrypt plaintext to a token with an explicit timestamp and IV.
pub fn encrypt_at(
    key: &SymmetricKey,
    plaintext: &[u8],
    timestamp: u64,
    iv: [u8; 16],
) -> Result<String> {
    let ciphertext = Aes128CbcEnc::new_from_slices(key.encryption(), &iv)
        .map_err(|_| Error::InvalidKey)?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut token =
        Vec::with_capacity(HEADER_LEN + ciphertext.len() + TAG_LEN);
    token.push(TOKEN_VERSION);
    token.extend_from_slice(&timestamp.to_be_bytes());
    token.extend_from_slice(&iv);
    token.extend_from_slice(&ciphertext);

    let mut mac = signer(key)?;
    mac.update(&token);
    token.extend_from_slice(&mac.finalize().into_bytes());

    Ok(URL_SAFE.encode(token))
}

/// Decrypt a token without enforcing a TTL.
pub fn decrypt(key: &SymmetricKey, token: &[u8]) -> Result<Vec<u8>> {
    decrypt_with_ttl(key, token, None)
}

/// Decrypt a token.
///
/// The signature is verified before any decryption is attempted and
/// no plaintext is returned unless every check passes. When a `ttl`
/// is given the token timestamp must be within the TTL and no more
/// than [MAX_CLOCK_SKEW] seconds in the future.
pub fn decrypt_with_ttl(
    key: &SymmetricKey,
    token: &[u8],
    ttl: Option<Duration>,
) -> Result<Vec<u8>> {
    let text =
        std::str::from_utf8(token).map_err(|_| TokenError::Encoding)?;
    let data = URL_SAFE
        .decode(text.trim())
        .map_err(|_| TokenError::Encoding)?;

    if data.len() < HEADER_LEN + TAG_LEN {
        return Err(TokenError::Truncated.into());
    }
    if data[0] != TOKEN_VERSION {
        return Err(TokenError::Version(data[0]).into());
    }

    let mut timestamp = [0u8; 8];
    timestamp.copy_from_slice(&data[1..9]);
    let timestamp = u64::from_be_bytes(timestamp);

    if let Some(ttl) = ttl {
        let now = UtcDateTime::now().unix_timestamp() as u64;
        if timestamp.saturating_add(ttl.as_secs()) < now {
            return Err(TokenError::Expired.into());
        }
        if now.saturating_add(MAX_CLOCK_SKEW) < timestamp {
            return Err(TokenError::FutureTimestamp.into());
        }
    }

    let (signed, tag) = data.split_at(data.len() - TAG_LEN);
    let mut mac = signer(key)?;
    mac.update(signed);
    mac.verify_slice(tag).map_err(|_| TokenError::Signature)?;

    let mut iv = [0u8; 16];
    iv.copy_from_slice(&signed[9..HEADER_LEN]);
    let ciphertext = &signed[HEADER_LEN..];

    let plaintext = Aes128CbcDec::new_from_slices(key.encryption(), &iv)
        .map_err(|_| Error::InvalidKey)?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| TokenError::Padding)?;
    Ok(plaintext)
}

fn signer(key: &SymmetricKey) -> Result<HmacSha256> {
    <HmacSha256 as Mac>::new_from_slice(key.signing())
        .map_err(|_| Error::InvalidKey)
}

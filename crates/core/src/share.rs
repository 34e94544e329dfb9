//! Shares of the master secret and the combination engine.
//!
//! The combination is a bitwise XOR fold over the first `quorum`
//! shares. This is not a (k, n) threshold scheme: any quorum of
//! shares combines to *some* value and only the provisioned pair
//! combines to the real master secret. Deployments that need
//! threshold guarantees should replace [combine] with polynomial
//! interpolation; the exchange protocol does not change.
use crate::{constants::SHARE_LEN, Error, Result};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// One node's fragment of the master secret.
///
/// Always exactly [SHARE_LEN] bytes.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct Share(Vec<u8>);

impl Share {
    /// Create a share from raw bytes.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() != SHARE_LEN {
            return Err(Error::ShareLength {
                expected: SHARE_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    /// Decode a share from hex, surrounding whitespace is ignored.
    pub fn from_hex(value: &str) -> Result<Self> {
        Share::new(hex::decode(value.trim())?)
    }

    /// Encode this share as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Raw share bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Share {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Share(<redacted>)")
    }
}

/// Master secret reconstructed from a quorum of shares.
///
/// Only ever held in memory; the bytes are wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret(Vec<u8>);

impl MasterSecret {
    /// Secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for MasterSecret {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(<redacted>)")
    }
}

/// Combine the first `quorum` shares into the master secret.
///
/// Shares are taken in the order given, any beyond the quorum
/// are ignored.
pub fn combine(shares: &[Share], quorum: usize) -> Result<MasterSecret> {
    if quorum == 0 {
        return Err(Error::InvalidQuorum(quorum));
    }

    if shares.len() < quorum {
        return Err(Error::InsufficientShares { have: shares.len() });
    }

    // Every share is SHARE_LEN bytes so the fold never truncates.
    let mut secret = vec![0u8; SHARE_LEN];
    for share in &shares[..quorum] {
        for (out, byte) in secret.iter_mut().zip(share.as_bytes()) {
            *out ^= byte;
        }
    }
    Ok(MasterSecret(secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn filled(byte: u8) -> Share {
        Share::new(vec![byte; SHARE_LEN]).unwrap()
    }

    #[test]
    fn combine_xor_pair() -> Result<()> {
        let secret = combine(&[filled(0x11), filled(0x22)], 2)?;
        assert_eq!(&[0x33; SHARE_LEN], secret.as_bytes());
        Ok(())
    }

    #[test]
    fn combine_is_order_independent() -> Result<()> {
        let a = Share::from_hex("000102030405060708090a0b0c0d0e0f")?;
        let b = Share::from_hex("f0e1d2c3b4a5968778695a4b3c2d1e0f")?;
        let ab = combine(&[a.clone(), b.clone()], 2)?;
        let ba = combine(&[b, a], 2)?;
        assert_eq!(ab.as_bytes(), ba.as_bytes());
        Ok(())
    }

    #[test]
    fn combine_ignores_shares_beyond_quorum() -> Result<()> {
        let secret =
            combine(&[filled(0x11), filled(0x22), filled(0xff)], 2)?;
        assert_eq!(&[0x33; SHARE_LEN], secret.as_bytes());
        Ok(())
    }

    #[test]
    fn combine_insufficient_shares() {
        let result = combine(&[filled(0x11)], 2);
        assert!(matches!(result, Err(Error::InsufficientShares { have: 1 })));

        let result = combine(&[], 2);
        assert!(matches!(result, Err(Error::InsufficientShares { have: 0 })));
    }

    #[test]
    fn combine_zero_quorum() {
        let result = combine(&[filled(0x11)], 0);
        assert!(matches!(result, Err(Error::InvalidQuorum(0))));
    }

    #[test]
    fn share_rejects_wrong_length() {
        let result = Share::from_hex("1111");
        assert!(matches!(
            result,
            Err(Error::ShareLength {
                expected: SHARE_LEN,
                actual: 2
            })
        ));
        assert!(matches!(Share::from_hex("zz"), Err(Error::Hex(_))));
    }

    #[test]
    fn share_hex_trims_whitespace() -> Result<()> {
        let share = Share::from_hex("  22222222222222222222222222222222\n")?;
        assert_eq!(filled(0x22), share);
        assert_eq!("22222222222222222222222222222222", share.to_hex());
        Ok(())
    }

    #[test]
    fn debug_is_redacted() -> Result<()> {
        let share = filled(0x11);
        assert!(!format!("{:?}", share).contains("11"));
        let secret = combine(&[filled(0x11), filled(0x22)], 2)?;
        assert!(!format!("{:?}", secret).contains("33"));
        Ok(())
    }
}

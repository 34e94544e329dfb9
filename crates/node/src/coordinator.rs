//! Gather shares, rebuild the master secret and unlock the
//! secure partition.
use crate::{exchange, Error, Node, Result};
use edgefed_audit::EventKind;
use edgefed_core::{combine, crypto::fernet, derive_key, Share};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

/// Outcome of a successful reconstruction.
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// File the plaintext was written to.
    pub output: PathBuf,
    /// Number of shares that were available.
    pub shares: usize,
}

impl Node {
    /// Pull shares from every neighbor.
    ///
    /// Failed pulls are audited and skipped. Successful pulls are
    /// recorded in the federation state in neighbor order.
    pub async fn gather_shares(&self) -> Result<Vec<Share>> {
        let neighbors = &self.config.federation.neighbors;
        let urls: Vec<Url> =
            neighbors.iter().map(|n| n.url().clone()).collect();
        let outcomes = exchange::gather_shares(
            self.peers.as_ref(),
            &urls,
            self.config.federation.peer_timeout(),
        )
        .await;

        let mut shares = Vec::with_capacity(outcomes.len());
        for (neighbor, outcome) in neighbors.iter().zip(outcomes) {
            let neighbor = neighbor.as_str();
            match outcome.result {
                Ok(share) => {
                    {
                        let mut federation = self.federation.write().await;
                        federation.record_received(neighbor);
                    }
                    self.audit(
                        EventKind::Request,
                        format!("got share from {}", neighbor),
                    )
                    .await?;
                    shares.push(share);
                }
                Err(error) => {
                    tracing::warn!(
                        neighbor = %neighbor,
                        error = %error,
                        "coordinator::pull_failed",
                    );
                    self.audit(
                        EventKind::Request,
                        format!(
                            "failed to get share from {}: {}",
                            neighbor, error
                        ),
                    )
                    .await?;
                }
            }
        }
        Ok(shares)
    }

    /// Reconstruct the master secret and decrypt the secure
    /// partition to the configured output file.
    ///
    /// Concurrent calls on the same node run one at a time.
    pub async fn reconstruct(&self) -> Result<Reconstruction> {
        let _guard = self.reconstruction.lock().await;

        let mut shares = self.gather_shares().await?;
        let own = self.store.read_own_share().await;
        {
            let mut federation = self.federation.write().await;
            federation.set_has_share(own.is_some());
        }
        if let Some(own) = own {
            shares.push(own);
        }

        let quorum = self.config.quorum();
        if shares.len() < quorum {
            self.audit(
                EventKind::Reconstruct,
                "not enough shares to reconstruct",
            )
            .await?;
            return Err(Error::InsufficientShares { have: shares.len() });
        }

        let secret = combine(&shares, quorum)?;
        self.audit(EventKind::Reconstruct, "master key reconstructed")
            .await?;
        let key = derive_key(&secret);
        drop(secret);

        let partition = &self.config.storage.partition;
        match tokio::fs::try_exists(partition).await {
            Ok(true) => {}
            Ok(false) => {
                self.audit(
                    EventKind::Decrypt,
                    format!(
                        "secure partition missing: {}",
                        partition.display()
                    ),
                )
                .await?;
                return Err(Error::PartitionMissing(partition.clone()));
            }
            Err(error) => {
                tracing::warn!(
                    path = %partition.display(),
                    error = %error,
                    "coordinator::partition_unreadable",
                );
                self.audit(
                    EventKind::Decrypt,
                    format!(
                        "secure partition unreadable: {}: {}",
                        partition.display(),
                        error
                    ),
                )
                .await?;
                return Err(Error::PartitionMissing(partition.clone()));
            }
        }

        let output = &self.config.storage.output;
        let ttl = self.config.storage.partition_ttl();
        if let Err(error) = unlock(&key, partition, output, ttl).await {
            self.audit(
                EventKind::Decrypt,
                format!("decrypt failed: {}", error),
            )
            .await?;
            return Err(Error::DecryptionFailed(error.to_string()));
        }

        self.audit(EventKind::Decrypt, "secure partition decrypted")
            .await?;
        Ok(Reconstruction {
            output: output.clone(),
            shares: shares.len(),
        })
    }
}

async fn unlock(
    key: &edgefed_core::SymmetricKey,
    partition: &Path,
    output: &Path,
    ttl: Option<Duration>,
) -> Result<()> {
    let token = tokio::fs::read(partition).await?;
    let plaintext = fernet::decrypt_with_ttl(key, &token, ttl)?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(output, plaintext).await?;
    Ok(())
}

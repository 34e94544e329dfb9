//! Durable storage for the share owned by a node.
use edgefed_core::Share;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons the local share is unavailable.
///
/// Kept distinct for diagnostics; callers of
/// [ShareStore::read_own_share] only see that no share exists.
#[derive(Debug, Error)]
pub enum ShareError {
    /// Share file does not exist.
    #[error("share file {0} does not exist")]
    Missing(PathBuf),

    /// Share file exists but is empty.
    #[error("share file {0} is empty")]
    Empty(PathBuf),

    /// Share file is not valid hex.
    #[error("share file {0} is not valid hex")]
    Malformed(PathBuf),

    /// Share file decodes to the wrong number of bytes.
    #[error("share file {path} decodes to {actual} bytes")]
    WrongLength {
        /// Share file.
        path: PathBuf,
        /// Decoded length.
        actual: usize,
    },

    /// Share file could not be read.
    #[error("share file {0} could not be read: {1}")]
    Unreadable(PathBuf, #[source] std::io::Error),
}

/// Reads the share provisioned for this node.
///
/// Provisioning writes the file out of band; the store never
/// writes it.
#[derive(Debug, Clone)]
pub struct ShareStore {
    path: PathBuf,
}

impl ShareStore {
    /// Create a store for the share at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path to the share file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the local share, folding every failure into `None`.
    pub async fn read_own_share(&self) -> Option<Share> {
        match self.load().await {
            Ok(share) => Some(share),
            Err(error) => {
                tracing::debug!(error = %error, "share_store::unavailable");
                None
            }
        }
    }

    /// Read the local share.
    pub async fn load(&self) -> Result<Share, ShareError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(ShareError::Missing(self.path.clone()));
            }
            Err(error) => {
                return Err(ShareError::Unreadable(self.path.clone(), error));
            }
        };

        let encoded = contents.trim();
        if encoded.is_empty() {
            return Err(ShareError::Empty(self.path.clone()));
        }

        let bytes = hex::decode(encoded)
            .map_err(|_| ShareError::Malformed(self.path.clone()))?;
        let actual = bytes.len();
        Share::new(bytes).map_err(|_| ShareError::WrongLength {
            path: self.path.clone(),
            actual,
        })
    }
}

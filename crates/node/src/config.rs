//! Node configuration.
use edgefed_core::constants::DEFAULT_QUORUM;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use url::Url;

use super::{Error, Result};

/// Configuration for a node.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Identity of this node.
    pub node: IdentityConfig,

    /// Share exchange settings.
    pub federation: FederationConfig,

    /// Locations of the share, partition, output and log files.
    pub storage: StorageConfig,

    /// Configuration for the network.
    pub net: NetworkConfig,

    /// Path the file was loaded from used to determine
    /// relative paths.
    #[serde(skip)]
    file: Option<PathBuf>,
}

/// Node identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Name reported in status responses and audit records.
    pub name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            name: "Node".to_owned(),
        }
    }
}

/// Share exchange configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FederationConfig {
    /// Neighbors to pull shares from, in order.
    pub neighbors: Vec<Neighbor>,

    /// Number of shares required to reconstruct.
    pub quorum: usize,

    /// Timeout for a single share pull in milliseconds.
    pub peer_timeout_ms: u64,
}

impl FederationConfig {
    /// Timeout for a single share pull.
    pub fn peer_timeout(&self) -> Duration {
        Duration::from_millis(self.peer_timeout_ms)
    }
}

/// Neighbor address.
///
/// Status responses and audit records name a neighbor exactly as it
/// was configured; requests go to the parsed URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Neighbor {
    label: String,
    url: Url,
}

impl Neighbor {
    /// Address as configured.
    pub fn as_str(&self) -> &str {
        &self.label
    }

    /// Parsed address.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FromStr for Neighbor {
    type Err = url::ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let label = s.trim();
        Ok(Self {
            url: label.parse()?,
            label: label.to_owned(),
        })
    }
}

impl TryFrom<String> for Neighbor {
    type Error = url::ParseError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Neighbor> for String {
    fn from(value: Neighbor) -> Self {
        value.label
    }
}

impl From<Url> for Neighbor {
    fn from(url: Url) -> Self {
        Self {
            label: url.to_string(),
            url,
        }
    }
}

impl fmt::Display for Neighbor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            neighbors: Vec::new(),
            quorum: DEFAULT_QUORUM,
            peer_timeout_ms: 5000,
        }
    }
}

/// Configuration for storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Hex encoded share owned by this node.
    pub share: PathBuf,

    /// Encrypted secure partition.
    pub partition: PathBuf,

    /// Plaintext written after a successful reconstruction.
    pub output: PathBuf,

    /// Append-only audit trail.
    pub log: PathBuf,

    /// Reject a partition token older than this many seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_ttl_secs: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            share: PathBuf::from("share.txt"),
            partition: PathBuf::from("/secure/secure_partition.bin"),
            output: PathBuf::from("/secure/data.txt"),
            log: PathBuf::from("logs/node.log"),
            partition_ttl_secs: None,
        }
    }
}

impl StorageConfig {
    /// Maximum age of the partition token, if any.
    pub fn partition_ttl(&self) -> Option<Duration> {
        self.partition_ttl_secs.map(Duration::from_secs)
    }

    /// Directory for diagnostic log files, next to the audit trail.
    pub fn logs_dir(&self) -> PathBuf {
        self.log
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Node network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub bind: SocketAddr,

    /// SSL configuration.
    pub ssl: SslConfig,

    /// Configuration for CORS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsConfig>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(
                IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
                5000,
            ),
            ssl: Default::default(),
            cors: None,
        }
    }
}

/// Server SSL configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslConfig {
    /// Default HTTP transport.
    #[default]
    None,
    /// Configuration for TLS certificate and private key.
    Tls(TlsConfig),
}

/// Certificate and key for TLS.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to the certificate.
    pub cert: PathBuf,
    /// Path to the certificate key file.
    pub key: PathBuf,
}

/// Configuration for CORS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsConfig {
    /// List of origins allowed to call the node, typically
    /// a dashboard.
    pub origins: Vec<Url>,
}

impl NodeConfig {
    /// Load a node config from a file path.
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !tokio::fs::try_exists(path.as_ref()).await? {
            return Err(Error::NotFile(path.as_ref().to_path_buf()));
        }

        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        let mut config: NodeConfig = toml::from_str(&contents)?;
        config.file = Some(path.as_ref().canonicalize()?);

        let dir = config.directory();
        config.resolve_paths(&dir);

        if let SslConfig::Tls(tls) = &mut config.net.ssl {
            tls.cert = tls.cert.canonicalize()?;
            tls.key = tls.key.canonicalize()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.node.name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "node name must not be empty".to_owned(),
            ));
        }
        if self.federation.quorum == 0 {
            return Err(Error::InvalidConfig(
                "quorum must be at least one".to_owned(),
            ));
        }
        if self.federation.peer_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "peer timeout must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Set the server bind address.
    pub fn set_bind_address(&mut self, addr: SocketAddr) {
        self.net.bind = addr;
    }

    /// Server bind address.
    pub fn bind_address(&self) -> &SocketAddr {
        &self.net.bind
    }

    /// Name of this node.
    pub fn name(&self) -> &str {
        &self.node.name
    }

    /// Number of shares required to reconstruct.
    pub fn quorum(&self) -> usize {
        self.federation.quorum
    }

    /// Parent directory of the configuration file.
    fn directory(&self) -> PathBuf {
        self.file
            .as_ref()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Make relative paths relative to `dir`.
    fn resolve_paths(&mut self, dir: &Path) {
        let storage = &mut self.storage;
        for path in [
            &mut storage.share,
            &mut storage.partition,
            &mut storage.output,
            &mut storage.log,
        ] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }

        if let SslConfig::Tls(tls) = &mut self.net.ssl {
            if tls.cert.is_relative() {
                tls.cert = dir.join(&tls.cert);
            }
            if tls.key.is_relative() {
                tls.key = dir.join(&tls.key);
            }
        }
    }
}

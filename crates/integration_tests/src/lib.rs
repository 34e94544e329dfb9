//! Test utilities.
#![deny(missing_docs)]
#![forbid(unsafe_code)]

use anyhow::Result;
use axum_server::Handle;
use edgefed_node::{Neighbor, Node, NodeConfig, Server};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
    thread,
};
use tokio::sync::oneshot;
use url::Url;

const ADDR: &str = "127.0.0.1:0";

/// Share held by the node that reconstructs in the two node scenario.
pub const SHARE_A: &str = "11111111111111111111111111111111";

/// Share held by the neighbor in the two node scenario.
pub const SHARE_B: &str = "22222222222222222222222222222222";

/// Partition encrypted with the key derived from the XOR
/// of [SHARE_A] and [SHARE_B].
pub const PARTITION_TOKEN: &str = "gAAAAABlU_EAAAECAwQFBgcICQoLDA0OD5JWWhUvXKkES-HwbPz7IB0tDTpOOyr1Fplu-20-prFGPyH0mLRwf04dDh_ASHFNHQ_Q7HJF8cjyvDvXx7AlQzdedvxPmMcr-Teh9-8rcIw8JM9MzYpeloG2gSKUnKLPXg==";

/// Plaintext of [PARTITION_TOKEN].
pub const PARTITION_PLAINTEXT: &str =
    "This is EDGE Secure Partition Data! (protected by federation)\n";

/// Initialize a tracing subscriber.
#[allow(dead_code)]
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "debug,hyper=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().without_time())
        .try_init();
}

/// Convert a socket address to a URL.
fn socket_addr_url(addr: &SocketAddr) -> Url {
    let node = format!("http://{}:{}", addr.ip(), addr.port());
    Url::parse(&node).expect("failed to parse node URL from socket addr")
}

/// Files and neighbors for a node under test.
#[derive(Debug, Clone, Default)]
pub struct NodeSetup {
    /// Node name.
    pub name: String,
    /// Hex share written to the share file.
    pub share: Option<String>,
    /// Token written to the partition file.
    pub partition: Option<String>,
    /// Neighbors to pull shares from.
    pub neighbors: Vec<Neighbor>,
}

impl NodeSetup {
    /// Node named `name` with no files and no neighbors.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Provision a share.
    pub fn share(mut self, share: impl Into<String>) -> Self {
        self.share = Some(share.into());
        self
    }

    /// Provision the secure partition.
    pub fn partition(mut self, token: impl Into<String>) -> Self {
        self.partition = Some(token.into());
        self
    }

    /// Add a neighbor.
    pub fn neighbor(mut self, neighbor: impl Into<Neighbor>) -> Self {
        self.neighbors.push(neighbor.into());
        self
    }
}

/// Ensure the node is shutdown when the handle is dropped.
pub struct ShutdownHandle(Handle);

impl Drop for ShutdownHandle {
    fn drop(&mut self) {
        tracing::info!("shutdown test node");
        self.0.shutdown();
    }
}

/// Test node information.
pub struct TestNode {
    /// Node name.
    pub name: String,
    /// Directory holding the node files.
    pub path: PathBuf,
    /// Bind address.
    pub addr: SocketAddr,
    /// Base URL of the node.
    pub url: Url,
    /// Configuration the node runs with.
    pub config: NodeConfig,
    /// Handle when dropped will shutdown the node.
    #[allow(dead_code)]
    handle: ShutdownHandle,
}

impl TestNode {
    /// URL of a route on this node.
    pub fn route(&self, route: &str) -> Result<Url> {
        Ok(self.url.join(route)?)
    }
}

/// Directory for the files of a node in a test.
fn node_dir(test_id: &str, name: &str) -> Result<PathBuf> {
    let current_dir = std::env::current_dir()?;
    Ok(current_dir
        .join("target/integration-test")
        .join(test_id)
        .join(name.to_lowercase()))
}

fn node_config(path: &Path, setup: &NodeSetup) -> Result<NodeConfig> {
    let mut config = NodeConfig::default();
    config.node.name = setup.name.clone();
    config.federation.neighbors = setup.neighbors.clone();
    config.federation.peer_timeout_ms = 2000;
    config.storage.share = path.join("share.txt");
    config.storage.partition = path.join("secure_partition.bin");
    config.storage.output = path.join("data.txt");
    config.storage.log = path.join("logs").join("node.log");
    config.set_bind_address(ADDR.parse()?);
    Ok(config)
}

/// Spawn a node and wait for it to be listening.
pub async fn spawn(test_id: &str, setup: NodeSetup) -> Result<TestNode> {
    let path = node_dir(test_id, &setup.name)?;

    // Ensure test runner is pristine
    let _ = tokio::fs::remove_dir_all(&path).await;
    tokio::fs::create_dir_all(&path).await?;

    let config = node_config(&path, &setup)?;
    if let Some(share) = &setup.share {
        tokio::fs::write(&config.storage.share, share).await?;
    }
    if let Some(token) = &setup.partition {
        tokio::fs::write(&config.storage.partition, token).await?;
    }

    let node = Node::open(config.clone())?;
    node.boot().await?;

    let (tx, rx) = oneshot::channel::<SocketAddr>();
    let handle = launch(node, tx);
    let addr = rx.await?;
    Ok(TestNode {
        name: setup.name,
        path,
        url: socket_addr_url(&addr),
        addr,
        config,
        handle,
    })
}

/// Run the node server in a separate thread.
fn launch(node: Node, tx: oneshot::Sender<SocketAddr>) -> ShutdownHandle {
    let handle = Handle::new();
    let listen_handle = handle.clone();
    let server_handle = handle.clone();

    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            if let Some(addr) = listen_handle.listening().await {
                tracing::info!("node has started {:#?}", addr);
                tx.send(addr)
                    .expect("failed to send listening notification");
            }
        });
    });

    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            Server::new()
                .start(Arc::new(node), server_handle)
                .await
                .expect("failed to start node");
        });
    });

    ShutdownHandle(handle)
}

/// Clean up test resources on disc.
pub async fn teardown(test_id: &str) {
    let Ok(current_dir) = std::env::current_dir() else {
        return;
    };
    let target = current_dir.join("target/integration-test").join(test_id);
    tracing::debug!(path = ?target, "teardown");
    let _ = tokio::fs::remove_dir_all(&target).await;
}

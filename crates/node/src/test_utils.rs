//! Helpers for unit tests.
use crate::{
    exchange::PeerClient, Error, Neighbor, Node, NodeConfig, Result,
};
use async_trait::async_trait;
use edgefed_audit::fs::AuditFileProvider;
use edgefed_core::{Share, SHARE_LEN};
use http::StatusCode;
use std::{collections::HashMap, path::Path, sync::Arc, time::Duration};
use url::Url;

/// Partition encrypted with the key derived from a master
/// secret of sixteen `0x33` bytes.
pub const PARTITION_TOKEN: &str = "gAAAAABlU_EAAAECAwQFBgcICQoLDA0OD5JWWhUvXKkES-HwbPz7IB0tDTpOOyr1Fplu-20-prFGPyH0mLRwf04dDh_ASHFNHQ_Q7HJF8cjyvDvXx7AlQzdedvxPmMcr-Teh9-8rcIw8JM9MzYpeloG2gSKUnKLPXg==";

/// Plaintext of [PARTITION_TOKEN].
pub const PARTITION_PLAINTEXT: &[u8] =
    b"This is EDGE Secure Partition Data! (protected by federation)\n";

/// Share filled with `byte`.
pub fn share(byte: u8) -> Share {
    Share::new(vec![byte; SHARE_LEN]).unwrap()
}

#[derive(Clone)]
enum Reply {
    Share(Share, Duration),
    Refuse,
    Hang,
}

/// Peer client answering from a fixed table.
///
/// Neighbors missing from the table answer 404 as a node
/// without a share would.
#[derive(Clone, Default)]
pub struct MockPeerClient {
    replies: HashMap<Url, Reply>,
}

impl MockPeerClient {
    pub fn reply(self, neighbor: &Url, share: Share) -> Self {
        self.delayed(neighbor, share, Duration::ZERO)
    }

    pub fn delayed(
        mut self,
        neighbor: &Url,
        share: Share,
        delay: Duration,
    ) -> Self {
        self.replies
            .insert(neighbor.clone(), Reply::Share(share, delay));
        self
    }

    pub fn refuse(mut self, neighbor: &Url) -> Self {
        self.replies.insert(neighbor.clone(), Reply::Refuse);
        self
    }

    pub fn hang(mut self, neighbor: &Url) -> Self {
        self.replies.insert(neighbor.clone(), Reply::Hang);
        self
    }
}

#[async_trait]
impl PeerClient for MockPeerClient {
    async fn fetch_share(
        &self,
        neighbor: &Url,
        _timeout: Duration,
    ) -> Result<Share> {
        match self.replies.get(neighbor).cloned() {
            Some(Reply::Share(share, delay)) => {
                tokio::time::sleep(delay).await;
                Ok(share)
            }
            Some(Reply::Refuse) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(Error::ResponseCode(StatusCode::NOT_FOUND)),
        }
    }
}

/// Config with every file inside `dir`.
pub fn node_config(dir: &Path, neighbors: Vec<Url>) -> NodeConfig {
    let mut config = NodeConfig::default();
    config.node.name = "Node1".to_owned();
    config.federation.neighbors =
        neighbors.into_iter().map(Neighbor::from).collect();
    config.federation.peer_timeout_ms = 200;
    config.storage.share = dir.join("share.txt");
    config.storage.partition = dir.join("secure_partition.bin");
    config.storage.output = dir.join("data.txt");
    config.storage.log = dir.join("logs").join("node.log");
    config
}

/// Node using `client` for pulls and a file audit trail.
pub fn mock_node(config: NodeConfig, client: MockPeerClient) -> Node {
    let audit = Arc::new(AuditFileProvider::new(&config.storage.log));
    Node::new(config, Arc::new(client), audit)
}

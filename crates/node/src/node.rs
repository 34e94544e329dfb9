//! A federation node and its local operations.
use crate::{
    exchange::{BoxedPeerClient, HttpPeerClient},
    federation::FederationState,
    protocol::{FederationStatus, JoinResponse, NodeStatus},
    share_store::ShareStore,
    NodeConfig, Result,
};
use edgefed_audit::{
    fs::AuditFileProvider, AuditEvent, AuditSink, BoxedAuditSink, EventKind,
};
use edgefed_core::Share;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

const ACTIVE: &str = "active";

/// Single node of the federation.
///
/// Federation state is guarded by a lock for reads and short
/// updates; reconstruction additionally holds a per-node mutex
/// for the whole gather and decrypt sequence.
pub struct Node {
    pub(crate) config: NodeConfig,
    pub(crate) store: ShareStore,
    pub(crate) federation: RwLock<FederationState>,
    pub(crate) reconstruction: Mutex<()>,
    pub(crate) peers: BoxedPeerClient,
    audit: BoxedAuditSink,
}

impl Node {
    /// Create a node with explicit transport and audit sink.
    pub fn new(
        config: NodeConfig,
        peers: BoxedPeerClient,
        audit: BoxedAuditSink,
    ) -> Self {
        let store = ShareStore::new(&config.storage.share);
        Self {
            config,
            store,
            federation: RwLock::new(FederationState::default()),
            reconstruction: Mutex::new(()),
            peers,
            audit,
        }
    }

    /// Create a node that pulls over HTTP and appends to the
    /// configured audit file.
    pub fn open(config: NodeConfig) -> Result<Self> {
        let peers = Arc::new(HttpPeerClient::new()?);
        let audit = Arc::new(AuditFileProvider::new(&config.storage.log));
        Ok(Self::new(config, peers, audit))
    }

    /// Node configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Node name.
    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Record that the node started.
    pub async fn boot(&self) -> Result<()> {
        let neighbors: Vec<_> = self
            .config
            .federation
            .neighbors
            .iter()
            .map(|n| n.as_str().to_owned())
            .collect();
        self.audit(
            EventKind::Boot,
            format!("Starting {} with neighbors {:?}", self.name(), neighbors),
        )
        .await
    }

    /// Liveness status.
    pub fn status(&self) -> NodeStatus {
        NodeStatus {
            node: self.name().to_owned(),
            status: ACTIVE.to_owned(),
        }
    }

    /// Exchange progress, refreshing whether the local share exists.
    pub async fn federation_status(&self) -> FederationStatus {
        let has_share = self.store.read_own_share().await.is_some();
        let mut federation = self.federation.write().await;
        federation.set_has_share(has_share);
        FederationStatus {
            node: self.name().to_owned(),
            status: ACTIVE.to_owned(),
            has_share,
            share_sent: federation.share_sent().to_vec(),
            share_received: federation.share_received().to_vec(),
            can_reconstruct: federation
                .can_reconstruct(self.config.quorum()),
            neighbors: self
                .config
                .federation
                .neighbors
                .iter()
                .map(|n| n.as_str().to_owned())
                .collect(),
        }
    }

    /// Serve the local share to a neighbor.
    pub async fn serve_share(&self) -> Result<Share> {
        let Some(share) = self.store.read_own_share().await else {
            self.audit(
                EventKind::Send,
                format!("{} has no share to send", self.name()),
            )
            .await?;
            return Err(crate::Error::NoShare);
        };

        {
            let mut federation = self.federation.write().await;
            federation.record_sent(self.name());
        }
        self.audit(
            EventKind::Send,
            format!("{} returned its share", self.name()),
        )
        .await?;
        Ok(share)
    }

    /// Acknowledge a join announcement.
    pub async fn join(&self, message: &str) -> Result<JoinResponse> {
        self.audit(
            EventKind::Join,
            format!("Received join message: {}", message),
        )
        .await?;
        Ok(JoinResponse {
            message: format!("{} joined", self.name()),
        })
    }

    /// Append to the audit trail and mirror to diagnostic logs.
    pub(crate) async fn audit(
        &self,
        kind: EventKind,
        message: impl Into<String>,
    ) -> Result<()> {
        let event = AuditEvent::new(kind, message);
        tracing::info!(
            node = %self.name(),
            kind = %event.event_kind(),
            "{}",
            event.message()
        );
        self.audit.append_audit_events(&[event]).await?;
        Ok(())
    }
}

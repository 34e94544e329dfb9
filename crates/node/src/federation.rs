//! Per-node record of share exchange progress.
//!
//! The state lives for the process lifetime and is not persisted.

/// Exchange progress of a node.
#[derive(Debug, Default, Clone)]
pub struct FederationState {
    has_share: bool,
    share_sent: Vec<String>,
    share_received: Vec<String>,
}

impl FederationState {
    /// Whether this node held a valid share when last checked.
    pub fn has_share(&self) -> bool {
        self.has_share
    }

    /// Update whether this node holds a valid share.
    pub fn set_has_share(&mut self, has_share: bool) {
        self.has_share = has_share;
    }

    /// Record that `node` served its share.
    ///
    /// Nodes record their own name here, so the list is a log of
    /// serve events rather than a ledger of recipients.
    pub fn record_sent(&mut self, node: impl Into<String>) {
        self.share_sent.push(node.into());
    }

    /// Record that a share was pulled from `neighbor`.
    pub fn record_received(&mut self, neighbor: impl Into<String>) {
        self.share_received.push(neighbor.into());
    }

    /// Serve events, oldest first.
    pub fn share_sent(&self) -> &[String] {
        &self.share_sent
    }

    /// Neighbors shares were pulled from, oldest first.
    pub fn share_received(&self) -> &[String] {
        &self.share_received
    }

    /// Whether the received shares plus our own meet `quorum`.
    ///
    /// Always computed from the current counts.
    pub fn can_reconstruct(&self, quorum: usize) -> bool {
        self.share_received.len() + usize::from(self.has_share) >= quorum
    }
}

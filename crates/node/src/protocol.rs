//! Request and response bodies exchanged with nodes.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Route a node serves its share on.
pub const SEND_SHARE: &str = "send-share";

/// Liveness of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NodeStatus {
    /// Node name.
    pub node: String,
    /// Always `active` while the node is serving.
    pub status: String,
}

/// Share exchange progress of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FederationStatus {
    /// Node name.
    pub node: String,
    /// Always `active` while the node is serving.
    pub status: String,
    /// Whether the node currently holds a valid share.
    pub has_share: bool,
    /// One entry each time this node served its share.
    pub share_sent: Vec<String>,
    /// Neighbors a share was pulled from, in pull order.
    pub share_received: Vec<String>,
    /// Whether enough shares are known to reconstruct.
    pub can_reconstruct: bool,
    /// Configured neighbors.
    pub neighbors: Vec<String>,
}

/// Share served to a neighbor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShareResponse {
    /// Hex encoded share bytes.
    pub share: String,
}

/// Successful reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReconstructResponse {
    /// Human readable outcome.
    pub message: String,
    /// Path the plaintext was written to.
    pub out: String,
}

/// Join announcement from another node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct JoinRequest {
    /// Free form message.
    #[serde(default)]
    pub message: String,
}

/// Reply to a join announcement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JoinResponse {
    /// Acknowledgement naming this node.
    pub message: String,
}

/// Error body returned with non-success status codes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
    /// Shares gathered when reconstruction lacked a quorum.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub have: Option<usize>,
    /// Cause of a decryption failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exc: Option<String>,
}

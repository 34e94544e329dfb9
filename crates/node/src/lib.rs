//! Node of an edge federation.
//!
//! Each node holds one share of a master secret. Nodes serve their
//! share to neighbors on request and any node can pull shares from
//! its neighbors, rebuild the master secret once a quorum is
//! available and use the derived key to decrypt a secure partition.
//!
//! Every step is recorded in an append-only audit trail that never
//! contains share bytes, the master secret or derived keys.
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::result_large_err)]

mod api_docs;
mod config;
mod coordinator;
mod error;
pub mod exchange;
mod federation;
mod handlers;
mod node;
pub mod protocol;
mod server;
mod share_store;

#[cfg(test)]
mod test_utils;

pub use config::*;
pub use coordinator::Reconstruction;
pub use error::Error;
pub use federation::FederationState;
pub use node::Node;
pub use server::{Server, ServerState};
pub use share_store::{ShareError, ShareStore};

/// Result type for the node module.
#[doc(hidden)]
pub type Result<T> = std::result::Result<T, error::Error>;

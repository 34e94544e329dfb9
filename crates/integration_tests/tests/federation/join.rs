//! Join announcements.
use anyhow::Result;
use edgefed_audit::{fs::AuditLogFile, EventKind};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{spawn, teardown, NodeSetup};

#[tokio::test]
async fn join_acknowledged() -> Result<()> {
    const TEST_ID: &str = "join_acknowledged";

    let node = spawn(TEST_ID, NodeSetup::new("Node1")).await?;

    let body: Value = reqwest::Client::new()
        .post(node.route("join")?)
        .json(&json!({ "message": "Node2 is online" }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(json!({ "message": "Node1 joined" }), body);

    let events = AuditLogFile::new(&node.config.storage.log)?
        .events(true, Some(1))?;
    assert_eq!(EventKind::Join, events[0].event_kind());
    assert_eq!("Received join message: Node2 is online", events[0].message());

    teardown(TEST_ID).await;

    Ok(())
}

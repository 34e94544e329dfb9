//! Reconstruction across real nodes.
use anyhow::Result;
use edgefed_audit::{fs::AuditLogFile, EventKind};
use edgefed_node::Neighbor;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::test_utils::{
    spawn, teardown, NodeSetup, PARTITION_PLAINTEXT, PARTITION_TOKEN,
    SHARE_A, SHARE_B,
};

/// Node A pulls the share of node B, combines it with its own
/// and decrypts the partition.
#[tokio::test]
async fn reconstruct_two_nodes() -> Result<()> {
    const TEST_ID: &str = "reconstruct_two_nodes";

    //crate::test_utils::init_tracing();

    let node_b = spawn(TEST_ID, NodeSetup::new("Node2").share(SHARE_B)).await?;
    let node_a = spawn(
        TEST_ID,
        NodeSetup::new("Node1")
            .share(SHARE_A)
            .partition(PARTITION_TOKEN)
            .neighbor(node_b.url.clone()),
    )
    .await?;

    let client = reqwest::Client::new();
    let response = client
        .post(node_a.route("request-and-reconstruct")?)
        .send()
        .await?;
    assert_eq!(StatusCode::OK, response.status());
    let body: Value = response.json().await?;
    assert_eq!(
        json!({
            "message": "reconstructed and decrypted",
            "out": node_a.config.storage.output.display().to_string(),
        }),
        body
    );

    let plaintext =
        tokio::fs::read_to_string(&node_a.config.storage.output).await?;
    assert_eq!(PARTITION_PLAINTEXT, plaintext);

    // Pull is recorded on both sides
    let status: Value = client
        .get(node_a.route("federation-status")?)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(json!([node_b.url.to_string()]), status["share_received"]);
    assert_eq!(json!(true), status["can_reconstruct"]);

    let status: Value = client
        .get(node_b.route("federation-status")?)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(json!(["Node2"]), status["share_sent"]);

    let events = AuditLogFile::new(&node_a.config.storage.log)?
        .events(false, None)?;
    let kinds: Vec<_> = events.iter().map(|e| e.event_kind()).collect();
    assert_eq!(
        vec![
            EventKind::Boot,
            EventKind::Request,
            EventKind::Reconstruct,
            EventKind::Decrypt,
        ],
        kinds
    );

    let log = tokio::fs::read_to_string(&node_a.config.storage.log).await?;
    assert!(!log.contains(SHARE_A));
    assert!(!log.contains(SHARE_B));
    assert!(!log.contains("33333333"));

    teardown(TEST_ID).await;

    Ok(())
}

/// A neighbor that refuses connections is skipped and the
/// attempt fails for lack of shares.
#[tokio::test]
async fn reconstruct_unreachable_neighbor() -> Result<()> {
    const TEST_ID: &str = "reconstruct_unreachable_neighbor";

    let node_a = spawn(
        TEST_ID,
        NodeSetup::new("Node1")
            .share(SHARE_A)
            .partition(PARTITION_TOKEN)
            .neighbor("http://127.0.0.1:9".parse::<Neighbor>()?),
    )
    .await?;

    let response = reqwest::Client::new()
        .post(node_a.route("request-and-reconstruct")?)
        .send()
        .await?;
    assert_eq!(StatusCode::BAD_REQUEST, response.status());
    let body: Value = response.json().await?;
    assert_eq!(json!({ "error": "not enough shares", "have": 1 }), body);
    assert!(!node_a.config.storage.output.exists());

    let events = AuditLogFile::new(&node_a.config.storage.log)?
        .events(true, Some(2))?;
    assert_eq!("not enough shares to reconstruct", events[0].message());
    assert!(events[1]
        .message()
        .starts_with("failed to get share from http://127.0.0.1:9: "));

    teardown(TEST_ID).await;

    Ok(())
}

/// A quorum without a partition file is a server error.
#[tokio::test]
async fn reconstruct_missing_partition() -> Result<()> {
    const TEST_ID: &str = "reconstruct_missing_partition";

    let node_b = spawn(TEST_ID, NodeSetup::new("Node2").share(SHARE_B)).await?;
    let node_a = spawn(
        TEST_ID,
        NodeSetup::new("Node1")
            .share(SHARE_A)
            .neighbor(node_b.url.clone()),
    )
    .await?;

    let response = reqwest::Client::new()
        .post(node_a.route("request-and-reconstruct")?)
        .send()
        .await?;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
    let body: Value = response.json().await?;
    assert_eq!(json!({ "error": "secure_partition not found" }), body);

    teardown(TEST_ID).await;

    Ok(())
}

/// Shares that do not combine to the partition key fail to
/// decrypt and write nothing.
#[tokio::test]
async fn reconstruct_wrong_shares() -> Result<()> {
    const TEST_ID: &str = "reconstruct_wrong_shares";

    let node_b = spawn(
        TEST_ID,
        NodeSetup::new("Node2").share("44444444444444444444444444444444"),
    )
    .await?;
    let node_a = spawn(
        TEST_ID,
        NodeSetup::new("Node1")
            .share(SHARE_A)
            .partition(PARTITION_TOKEN)
            .neighbor(node_b.url.clone()),
    )
    .await?;

    let response = reqwest::Client::new()
        .post(node_a.route("request-and-reconstruct")?)
        .send()
        .await?;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status());
    let body: Value = response.json().await?;
    assert_eq!(json!("decrypt failed"), body["error"]);
    assert!(body["exc"].is_string());
    assert!(!node_a.config.storage.output.exists());

    teardown(TEST_ID).await;

    Ok(())
}

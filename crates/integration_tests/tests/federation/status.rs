//! Status routes.
use anyhow::Result;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use edgefed_node::Neighbor;
use serde_json::{json, Value};

use crate::test_utils::{spawn, teardown, NodeSetup, SHARE_A};

#[tokio::test]
async fn status_active() -> Result<()> {
    const TEST_ID: &str = "status_active";

    let node = spawn(TEST_ID, NodeSetup::new("Node1")).await?;

    let body: Value = reqwest::get(node.route("status")?).await?.json().await?;
    assert_eq!(json!({ "node": "Node1", "status": "active" }), body);

    teardown(TEST_ID).await;

    Ok(())
}

#[tokio::test]
async fn status_federation() -> Result<()> {
    const TEST_ID: &str = "status_federation";

    let neighbor: Neighbor = "http://node2:5000".parse()?;
    let node = spawn(
        TEST_ID,
        NodeSetup::new("Node1").share(SHARE_A).neighbor(neighbor),
    )
    .await?;

    let body: Value = reqwest::get(node.route("federation-status")?)
        .await?
        .json()
        .await?;
    assert_eq!(
        json!({
            "node": "Node1",
            "status": "active",
            "has_share": true,
            "share_sent": [],
            "share_received": [],
            "can_reconstruct": false,
            "neighbors": ["http://node2:5000"],
        }),
        body
    );

    // Removing the share is noticed on the next query
    tokio::fs::remove_file(&node.config.storage.share).await?;
    let body: Value = reqwest::get(node.route("federation-status")?)
        .await?
        .json()
        .await?;
    assert_eq!(json!(false), body["has_share"]);

    teardown(TEST_ID).await;

    Ok(())
}

#[tokio::test]
async fn status_openapi() -> Result<()> {
    const TEST_ID: &str = "status_openapi";

    let node = spawn(TEST_ID, NodeSetup::new("Node1")).await?;

    let response = reqwest::get(node.route("docs/openapi.json")?).await?;
    assert_eq!(StatusCode::OK, response.status());
    let body: Value = response.json().await?;
    assert!(body["paths"]["/request-and-reconstruct"].is_object());

    teardown(TEST_ID).await;

    Ok(())
}

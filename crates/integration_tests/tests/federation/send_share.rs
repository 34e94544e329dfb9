//! Serving shares to neighbors.
use anyhow::Result;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::test_utils::{spawn, teardown, NodeSetup, SHARE_B};

#[tokio::test]
async fn send_share_served() -> Result<()> {
    const TEST_ID: &str = "send_share_served";

    let node = spawn(TEST_ID, NodeSetup::new("Node2").share(SHARE_B)).await?;

    let response = reqwest::get(node.route("send-share")?).await?;
    assert_eq!(StatusCode::OK, response.status());
    let body: Value = response.json().await?;
    assert_eq!(json!({ "share": SHARE_B }), body);

    teardown(TEST_ID).await;

    Ok(())
}

#[tokio::test]
async fn send_share_missing() -> Result<()> {
    const TEST_ID: &str = "send_share_missing";

    let node = spawn(TEST_ID, NodeSetup::new("Node3")).await?;

    let response = reqwest::get(node.route("send-share")?).await?;
    assert_eq!(StatusCode::NOT_FOUND, response.status());
    let body: Value = response.json().await?;
    assert_eq!(json!({ "error": "no share" }), body);

    // Refusing leaves the federation state alone
    let status: Value = reqwest::get(node.route("federation-status")?)
        .await?
        .json()
        .await?;
    assert_eq!(json!([]), status["share_sent"]);

    teardown(TEST_ID).await;

    Ok(())
}

#[tokio::test]
async fn send_share_malformed() -> Result<()> {
    const TEST_ID: &str = "send_share_malformed";

    let node =
        spawn(TEST_ID, NodeSetup::new("Node3").share("not a share")).await?;

    let response = reqwest::get(node.route("send-share")?).await?;
    assert_eq!(StatusCode::NOT_FOUND, response.status());

    let status: Value = reqwest::get(node.route("federation-status")?)
        .await?
        .json()
        .await?;
    assert_eq!(json!(false), status["has_share"]);

    teardown(TEST_ID).await;

    Ok(())
}

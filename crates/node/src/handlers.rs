//! HTTP handlers for the node API.
use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    protocol::{
        ErrorResponse, FederationStatus, JoinRequest, JoinResponse,
        NodeStatus, ReconstructResponse, ShareResponse,
    },
    ServerState,
};

/// Node liveness.
#[utoipa::path(
    get,
    path = "/status",
    responses(
        (
            status = StatusCode::OK,
            description = "Node is serving.",
            body = NodeStatus,
        ),
    ),
)]
pub(crate) async fn status(
    Extension(state): Extension<ServerState>,
) -> impl IntoResponse {
    Json(state.status())
}

/// Share exchange progress.
#[utoipa::path(
    get,
    path = "/federation-status",
    responses(
        (
            status = StatusCode::OK,
            description = "Current federation state of the node.",
            body = FederationStatus,
        ),
    ),
)]
pub(crate) async fn federation_status(
    Extension(state): Extension<ServerState>,
) -> impl IntoResponse {
    Json(state.federation_status().await)
}

/// Serve the local share to a neighbor.
#[utoipa::path(
    get,
    path = "/send-share",
    responses(
        (
            status = StatusCode::OK,
            description = "Hex encoded share.",
            body = ShareResponse,
        ),
        (
            status = StatusCode::NOT_FOUND,
            description = "Node has no valid share.",
            body = ErrorResponse,
        ),
    ),
)]
pub(crate) async fn send_share(
    Extension(state): Extension<ServerState>,
) -> impl IntoResponse {
    match state.serve_share().await {
        Ok(share) => Json(ShareResponse {
            share: share.to_hex(),
        })
        .into_response(),
        Err(error) => error.into_response(),
    }
}

/// Gather shares, reconstruct the master secret and decrypt the
/// secure partition.
#[utoipa::path(
    post,
    path = "/request-and-reconstruct",
    responses(
        (
            status = StatusCode::OK,
            description = "Partition decrypted to the output file.",
            body = ReconstructResponse,
        ),
        (
            status = StatusCode::BAD_REQUEST,
            description = "Not enough shares were gathered.",
            body = ErrorResponse,
        ),
        (
            status = StatusCode::INTERNAL_SERVER_ERROR,
            description = "Partition missing or decryption failed.",
            body = ErrorResponse,
        ),
    ),
)]
pub(crate) async fn request_and_reconstruct(
    Extension(state): Extension<ServerState>,
) -> impl IntoResponse {
    match state.reconstruct().await {
        Ok(result) => Json(ReconstructResponse {
            message: "reconstructed and decrypted".to_owned(),
            out: result.output.display().to_string(),
        })
        .into_response(),
        Err(error) => error.into_response(),
    }
}

/// Join announcement from another node.
#[utoipa::path(
    post,
    path = "/join",
    request_body = JoinRequest,
    responses(
        (
            status = StatusCode::OK,
            description = "Announcement recorded.",
            body = JoinResponse,
        ),
    ),
)]
pub(crate) async fn join(
    Extension(state): Extension<ServerState>,
    Json(request): Json<JoinRequest>,
) -> impl IntoResponse {
    match state.join(&request.message).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(error) => error.into_response(),
    }
}

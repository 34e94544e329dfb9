use crate::{handlers, protocol::*, server};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Edge federation node",
        description = "Share exchange and secure partition reconstruction.",
    ),
    paths(
        server::openapi,
        server::apidocs,
        handlers::status,
        handlers::federation_status,
        handlers::send_share,
        handlers::request_and_reconstruct,
        handlers::join,
    ),
    components(schemas(
        NodeStatus,
        FederationStatus,
        ShareResponse,
        ReconstructResponse,
        JoinRequest,
        JoinResponse,
        ErrorResponse,
    ))
)]
struct ApiDoc;

/// OpenAPI description of the node API.
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

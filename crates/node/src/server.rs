use crate::{
    config::TlsConfig,
    handlers::{
        federation_status, join, request_and_reconstruct, send_share, status,
    },
    Node, Result, SslConfig,
};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use colored::Colorize;
use edgefed_core::UtcDateTime;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// State for the server.
pub type ServerState = Arc<Node>;

/// Web server implementation.
#[derive(Default)]
pub struct Server;

impl Server {
    /// Create a new server.
    pub fn new() -> Self {
        Self
    }

    /// Start the server.
    ///
    /// Runs until the handle is told to shut down.
    pub async fn start(
        &self,
        state: ServerState,
        handle: Handle,
    ) -> Result<()> {
        let origins = Server::read_origins(&state)?;
        let ssl = state.config().net.ssl.clone();
        let addr = *state.config().bind_address();

        match ssl {
            SslConfig::Tls(tls) => {
                self.run_tls(addr, state, handle, origins, tls).await
            }
            SslConfig::None => self.run(addr, state, handle, origins).await,
        }
    }

    /// Start the server running on HTTPS.
    async fn run_tls(
        &self,
        addr: SocketAddr,
        state: ServerState,
        handle: Handle,
        origins: Vec<HeaderValue>,
        tls: TlsConfig,
    ) -> Result<()> {
        // Another component may have installed a provider already
        let _ = rustls::crypto::ring::default_provider().install_default();

        let tls = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
        let app = Server::router(Arc::clone(&state), origins);

        self.startup_message(&state, &addr, true)?;

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;
        Ok(())
    }

    /// Start the server running on HTTP.
    async fn run(
        &self,
        addr: SocketAddr,
        state: ServerState,
        handle: Handle,
        origins: Vec<HeaderValue>,
    ) -> Result<()> {
        let app = Server::router(Arc::clone(&state), origins);

        self.startup_message(&state, &addr, false)?;

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;
        Ok(())
    }

    fn startup_message(
        &self,
        state: &ServerState,
        addr: &SocketAddr,
        tls: bool,
    ) -> Result<()> {
        let now = UtcDateTime::now().to_rfc3339()?;
        println!("Started        {}", now.yellow());
        println!("Node           {}", state.name().yellow());
        println!("Listen         {}", addr.to_string().yellow());
        println!("TLS enabled    {}", tls.to_string().yellow());
        println!(
            "Quorum         {}",
            state.config().quorum().to_string().yellow()
        );
        for neighbor in &state.config().federation.neighbors {
            println!("Neighbor       {}", neighbor.to_string().green());
        }
        Ok(())
    }

    fn read_origins(state: &ServerState) -> Result<Vec<HeaderValue>> {
        let mut origins = Vec::new();
        if let Some(cors) = state.config().net.cors.as_ref() {
            for url in cors.origins.iter() {
                origins.push(HeaderValue::from_str(
                    url.as_str().trim_end_matches('/'),
                )?);
            }
        }
        Ok(origins)
    }

    /// Routes of the node API.
    pub fn router(state: ServerState, origins: Vec<HeaderValue>) -> Router {
        let cors = CorsLayer::new()
            .allow_methods(vec![Method::GET, Method::POST])
            .allow_headers(vec![CONTENT_TYPE])
            .allow_origin(origins);

        Router::new()
            .route("/docs", get(apidocs))
            .route("/docs/", get(apidocs))
            .route("/docs/openapi.json", get(openapi))
            .route("/status", get(status))
            .route("/federation-status", get(federation_status))
            .route("/send-share", get(send_share))
            .route(
                "/request-and-reconstruct",
                post(request_and_reconstruct),
            )
            .route("/join", post(join))
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(Extension(state))
    }
}

/// Get OpenAPI JSON definition.
#[utoipa::path(
    get,
    path = "/docs/openapi.json",
    responses(
        (
            status = StatusCode::OK,
            description = "OpenAPI definition",
        ),
    ),
)]
pub async fn openapi() -> impl IntoResponse {
    let value = crate::api_docs::openapi();
    Json(serde_json::json!(&value))
}

/// OpenAPI documentation.
#[utoipa::path(
    get,
    path = "/docs",
    responses(
        (
            status = StatusCode::OK,
            description = "Render OpenAPI documentation",
        ),
    ),
)]
pub async fn apidocs() -> impl IntoResponse {
    use utoipa_rapidoc::RapiDoc;
    let rapidoc = RapiDoc::new("/docs/openapi.json");
    let html = rapidoc.to_html();
    ([(CONTENT_TYPE, "text/html")], html)
}

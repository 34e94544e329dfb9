use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors generated by a node.
#[derive(Debug, Error)]
pub enum Error {
    /// Error generated when a path is not a file.
    #[error("path {0} is not a file")]
    NotFile(PathBuf),

    /// Error generated when attempting to overwrite an existing file.
    #[error("file {0} already exists")]
    FileExists(PathBuf),

    /// Error generated when configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error generated when this node has no share to serve.
    #[error("no share")]
    NoShare,

    /// Error generated when too few shares were gathered.
    #[error("not enough shares to reconstruct, have {have}")]
    InsufficientShares {
        /// Number of shares that were gathered.
        have: usize,
    },

    /// Error generated when the secure partition file does not exist.
    #[error("secure partition {0} not found")]
    PartitionMissing(PathBuf),

    /// Error generated when the secure partition fails to decrypt.
    #[error("decrypt failed: {0}")]
    DecryptionFailed(String),

    /// Error generated when a neighbor URL cannot be extended
    /// with a route.
    #[error("neighbor {0} cannot be used as a base URL")]
    BaseUrl(Url),

    /// Error generated when a neighbor does not answer in time.
    #[error("neighbor {0} timed out")]
    PeerTimeout(Url),

    /// Error generated when a neighbor answers with an
    /// unexpected status code.
    #[error("unexpected response status code {0}")]
    ResponseCode(http::StatusCode),

    /// Error generated by the core library.
    #[error(transparent)]
    Core(#[from] edgefed_core::Error),

    /// Error generated by the audit library.
    #[error(transparent)]
    Audit(#[from] edgefed_audit::Error),

    /// Error generated by the logs library.
    #[error(transparent)]
    Logs(#[from] edgefed_logs::Error),

    /// Error generated by the HTTP client.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Error generated parsing a URL.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// Error generated converting a header value.
    #[error(transparent)]
    HeaderValue(#[from] http::header::InvalidHeaderValue),

    /// Error generated by the io module.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Error generated deserializing TOML.
    #[error(transparent)]
    TomlDeser(#[from] toml::de::Error),

    /// Error generated serializing TOML.
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    /// Error generated by the JSON library.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Error generated parsing a socket address.
    #[error(transparent)]
    AddrParse(#[from] std::net::AddrParseError),
}

impl Error {
    /// Status code for the HTTP response.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NoShare => StatusCode::NOT_FOUND,
            Error::InsufficientShares { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Error::NoShare => json!({ "error": "no share" }),
            Error::InsufficientShares { have } => {
                json!({ "error": "not enough shares", "have": have })
            }
            Error::PartitionMissing(_) => {
                json!({ "error": "secure_partition not found" })
            }
            Error::DecryptionFailed(cause) => {
                json!({ "error": "decrypt failed", "exc": cause })
            }
            _ => {
                tracing::error!(error = %self, "request failed");
                json!({ "error": "internal error" })
            }
        };
        (status, Json(body)).into_response()
    }
}

use thiserror::Error;

/// Errors generated by the logs library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error generated when the rolling file appender
    /// cannot be created.
    #[error(transparent)]
    Appender(#[from] tracing_appender::rolling::InitError),

    /// Error generated when a global subscriber is already set.
    #[error(transparent)]
    TryInit(#[from] tracing_subscriber::util::TryInitError),

    /// Error generated by the io module.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

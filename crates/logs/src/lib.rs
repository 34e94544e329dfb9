#![deny(missing_docs)]
#![forbid(unsafe_code)]
//! Log tracing output to disc.
mod error;
mod logger;

pub use error::Error;
pub use logger::{Logger, DEFAULT_LOG_LEVEL};

pub(crate) type Result<T> = std::result::Result<T, Error>;

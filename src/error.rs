//! Unified error type.

use thiserror::Error;

/// The error type returned by pantry's fallible startup and serving operations.
///
/// Application-level failures (unknown ids, malformed payloads) are expressed
/// as HTTP [`Response`](crate::Response) values through
/// [`ApiError`](crate::api::ApiError), not as `Error`s. This type surfaces
/// infrastructure failures: reading the environment, binding to a port or
/// accepting a connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid {key} value `{value}`: {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },
}

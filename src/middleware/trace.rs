//! Request logging.
//!
//! Emits one `info!` event per request on the `pantry::access` target,
//! carrying the same facts as an Apache "common" log line:
//!
//! ```text
//! INFO pantry::access: request peer=127.0.0.1:51234 method=GET path=/recipes version=HTTP/1.1 status=200 bytes=312 latency_ms=0
//! ```

use std::net::SocketAddr;
use std::time::Instant;

use tracing::info;

use crate::response::Response;

/// The request facts logged alongside the outcome.
pub struct AccessLog<'a> {
    pub peer: Option<SocketAddr>,
    pub method: &'a str,
    pub path: &'a str,
    pub version: http::Version,
}

/// Runs `next` and logs the request once it has a response.
pub async fn trace<F>(entry: AccessLog<'_>, next: F) -> Response
where
    F: Future<Output = Response>,
{
    let started = Instant::now();
    let response = next.await;
    let peer = entry.peer.map_or_else(|| "-".to_owned(), |p| p.to_string());
    info!(
        target: "pantry::access",
        peer = %peer,
        method = entry.method,
        path = entry.path,
        version = ?entry.version,
        status = response.status_code(),
        bytes = response.body().len(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request",
    );
    response
}

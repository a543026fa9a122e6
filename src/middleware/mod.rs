//! Middleware layer.
//!
//! Cross-cutting concerns that wrap every dispatched request. The server
//! applies them around the router; handlers never see them.
//!
//! - [`trace`] — one access-log event per request (peer, method, path,
//!   version, status, length, latency)

pub mod trace;

//! # pantry
//!
//! A small HTTP service holding a shopping list and a recipe collection in
//! process memory. Nothing is persisted; a restart brings back the seed data.
//!
//! | Resource | Record |
//! |---|---|
//! | `/shopping-list` | `{id, name, checked}` |
//! | `/recipes` | `{id, name, ingredients}` |
//!
//! Each resource answers `GET /`, `POST /`, `PUT /{id}` and `DELETE /{id}`.
//! `/` serves a landing page, other unmatched `GET`s serve files from the
//! public directory, and every request is written to the access log.
//!
//! Underneath is a thin layer over hyper: radix-tree routing via [`matchit`],
//! handlers as plain async functions, and an explicit [`Server`] lifecycle
//! that closes every connection on shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pantry::{AppState, Assets, Config, Server, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pantry::Error> {
//!     let config = Config::from_env()?;
//!     let state = AppState::seeded();
//!     let router = app::router(&state, Assets::new(&config.public_dir, &config.index_page));
//!
//!     Server::bind(config.addr()).await?.serve(router).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod app;
pub mod assets;
pub mod config;
pub mod middleware;
pub mod store;

pub use app::AppState;
pub use assets::Assets;
pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::{Router, not_found};
pub use server::{RunningServer, Server, shutdown_signal};
pub use status::Status;

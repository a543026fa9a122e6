//! Run with:
//!   RUST_LOG=info cargo run
//!
//! Try:
//!   curl http://localhost:3000/shopping-list
//!   curl -X POST http://localhost:3000/recipes \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"bread","ingredients":["flour","yeast","sugar","butter"]}'
//!   curl -X DELETE http://localhost:3000/shopping-list/<id>

use std::process::ExitCode;

use pantry::{AppState, Assets, Config, Server, app};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Handlers never block, so one thread runs every request to completion in turn.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), pantry::Error> {
    let config = Config::from_env()?;
    let state = AppState::seeded();
    info!(
        items = state.shopping_list.len(),
        recipes = state.recipes.len(),
        "stores seeded",
    );

    let router = app::router(&state, Assets::new(&config.public_dir, &config.index_page));
    let server = Server::bind(config.addr()).await?;
    server.serve(router).await?;
    info!("shut down, exiting");
    Ok(())
}

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use anyhow::Result;
use axum::Extension;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::JwtKeys;
use crate::api::not_found;
use crate::api::router;
use crate::clock::Clock;
use crate::config::Config;
use crate::config::StorageConfig;
use crate::storage::Memory;
use crate::storage::Mongo;
use crate::storage::Storage;

mod api;
mod cleanup;
mod clock;
mod config;
mod error;
mod graceful_shutdown;
mod id;
mod lifecycle;
mod notebooks;
mod notes;
mod password;
mod reminders;
mod storage;
mod tags;
#[cfg(test)]
mod tests;
mod users;
mod utils;

const DEFAULT_RUST_LOG: &str = "quire=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let config = Config::from_env()?;

    let app = setup_app(&config).await?;

    let listener = TcpListener::bind(config.address).await?;
    tracing::info!("Listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create and setup the app with its dependencies
///
/// # Errors
///
/// Will return `Err` when the storage cannot be reached
pub async fn setup_app(config: &Config) -> Result<Router> {
    match &config.storage {
        StorageConfig::Memory => Ok(create_router(Memory::new(), config)),
        StorageConfig::Mongo { uri, database } => {
            let storage = Mongo::connect(uri, database).await?;

            Ok(create_router(storage, config))
        }
    }
}

/// Create the router for Quire
fn create_router<S: Storage>(storage: S, config: &Config) -> Router {
    let jwt_keys = JwtKeys::new(config.jwt_secret.as_bytes());
    let clock = Clock::new(config.timezone);

    Router::new()
        .nest("/api/v1", router::<S>())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(storage))
        .layer(Extension(jwt_keys))
        .layer(Extension(clock))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}

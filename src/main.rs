mod config;
mod dtos;
mod error;
mod feed;
mod models;
mod payload;
mod state;
mod store;
mod tweet_controller;
mod user_controller;
mod validation;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use config::Config;
use error::StartupError;
use state::AppState;
use store::Store;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sign-up", post(user_controller::sign_up))
        .route(
            "/tweets",
            get(tweet_controller::all).post(tweet_controller::create),
        )
        .route(
            "/tweets/:id",
            put(tweet_controller::update).delete(tweet_controller::delete),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let env_file = config::load_env_file();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match env_file {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => info!("No .env file found, using process environment"),
        Err(err) => warn!("Failed to read .env file: {err}"),
    }

    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::load()?;

    let store = Store::open(&config.database_url)?;
    info!("Connected to store at {}", config.database_url);
    let state = AppState::from_store(&store)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let server = axum::Server::try_bind(&addr).map_err(|err| StartupError::Server(Box::new(err)))?;
    info!("Listening on {addr}");

    server
        .serve(router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| StartupError::Server(Box::new(err)))?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                error!("Failed to install Ctrl+C handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

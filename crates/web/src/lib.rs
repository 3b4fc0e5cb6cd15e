pub use crate::common::RouteResult;

use std::path::Path;

use axum::{extract::FromRef, Router};
use common::route_not_found;
use database::Backend;
use locator::Client;
use log::info;
use tokio::net::TcpListener;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod api;
pub mod common;
pub mod config;

pub use config::{ConfigError, WebConfig};

#[derive(Clone, FromRef)]
pub struct WebState {
    pub locator_client: Client<Backend>,
}

/// The whole http surface: the json api under `/api` and, when a directory
/// is given, static presenter files for every other path.
pub fn router(state: WebState, static_dir: Option<&Path>) -> Router {
    let routes = Router::new().nest_service("/api", api::routes(state));
    let routes = match static_dir {
        Some(static_dir) => routes.fallback_service(ServeDir::new(static_dir)),
        None => routes.fallback(route_not_found),
    };
    routes.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

pub async fn start_web_server(config: &WebConfig, state: WebState) -> std::io::Result<()> {
    let routes = router(state, config.static_dir.as_deref());

    let listener = TcpListener::bind(config.bind_address).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

//! Main HTTP Gateway Server.

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::health_api;
use crate::lobby::SharedLobby;
use crate::ws_server;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub lobby: SharedLobby,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(lobby: SharedLobby) -> Self {
        Self {
            lobby,
            started_at: Instant::now(),
        }
    }
}

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/ws", get(ws_server::ws_handler))
        .route("/api/health", get(health_api::get_health))
        .with_state(state)
}

/// Binds `addr` and serves until Ctrl-C.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway listening on {}", listener.local_addr()?);
    serve(listener, state).await
}

/// Serves on an already bound listener.
pub async fn serve(listener: TcpListener, state: GatewayState) -> Result<()> {
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the task is dropped.
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

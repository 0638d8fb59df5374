//! HTTP API Server
//!
//! Binds the listener, layers CORS + request tracing over the router and
//! serves until the shutdown token fires.

use std::{net::SocketAddr, path::PathBuf};

use axum::{http::Method, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use fcr_core::{Error, Result};

use crate::{handlers::AppState, routes::create_router};

/// HTTP API server
pub struct HttpServer {
    addr: SocketAddr,
    state: AppState,
    static_dir: PathBuf,
}

impl HttpServer {
    pub fn new(port: u16, state: AppState, static_dir: PathBuf) -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            state,
            static_dir,
        }
    }

    /// Router with the production middleware stack applied.
    pub fn app(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers(Any)
            .allow_origin(Any);

        create_router(self.state.clone(), &self.static_dir)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the HTTP server
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("HTTP server listening on http://{}", self.addr);

        axum::serve(listener, self.app())
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("HTTP server shutting down");
            })
            .await
            .map_err(|e| Error::External(format!("HTTP server error: {e}")))?;

        Ok(())
    }
}

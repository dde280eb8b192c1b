//! HTTP Server

use std::{
    net::{SocketAddr, TcpListener},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{
    extract::Request,
    routing::{get, post},
    Json, Router,
};
use axum_server::Handle;
use clap::Parser;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{debug, info, info_span};
use utoipa::OpenApi;

use crate::domain::communication::mailer::Mailer;

pub mod auth;
pub mod errors;
pub mod handlers;
pub mod open_api;
pub mod state;

use handlers::{health, send_mail};
use open_api::ApiDocs;
use state::AppState;

/// Configuration for the HTTP server
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// The port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the address specified in `config`.
    pub async fn new(state: AppState<impl Mailer>, config: &HttpServerConfig) -> Result<Self> {
        let router = router(state);

        let ip = config
            .host
            .parse()
            .with_context(|| format!("invalid listen address {}", config.host))?;
        let address = SocketAddr::new(ip, config.port);
        let listener = TcpListener::bind(address)
            .with_context(|| format!("failed to listen on {address}"))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server.
    #[mutants::skip]
    pub async fn run(self) -> Result<()> {
        debug!("listening on {}", self.listener.local_addr()?);

        let handle = Handle::new();

        let server = axum_server::from_tcp(self.listener)
            .handle(handle.clone())
            .serve(self.router.into_make_service());

        tokio::select! {
            result = server => result.context("server error")?,
            _ = shutdown_signal(Some(handle)) => {
                info!("shutting down HTTP server");
            }
        }

        Ok(())
    }
}

/// Create the application's router
pub fn router<M: Mailer>(state: AppState<M>) -> Router {
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .route("/send_email", post(send_mail::handler))
        .route("/health", get(health::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .layer(trace_layer)
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

#[mutants::skip]
async fn shutdown_signal(handle: Option<Handle>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    if let Some(handle) = handle {
        debug!("shutting down gracefully");
        handle.graceful_shutdown(Some(Duration::from_secs(10)));
    }
}

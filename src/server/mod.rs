//! HTTP endpoint layer.
//!
//! Routes are declared once in [`build_router`]; handlers only read the
//! immutable [`AppState`].

pub mod extract;
pub mod handlers;

use crate::adapters::{self, RqrrDecoder};
use crate::config::ServiceConfig;
use crate::core::commands::CommandParser;
use crate::core::detector::CodeDetector;
use crate::core::engine::ScanEngine;
use crate::core::loader::ImageLoader;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::Instrument;

#[derive(Clone)]
pub struct AppState {
    pub engine: ScanEngine,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(engine: ScanEngine, max_upload_bytes: usize) -> Self {
        Self {
            engine,
            max_upload_bytes,
        }
    }

    /// 依設定組裝偵測器、下載器與指令解析器
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let loader = ImageLoader::new(config)?;
        let detector = CodeDetector::new(
            Arc::new(RqrrDecoder::new()),
            adapters::barcode_decoder(config.barcodes_enabled()),
        );
        let parser = CommandParser::new(config.command_policy());

        tracing::info!(
            "Command policy: {:?}, fetch timeout: {:?}, barcodes: {}",
            parser.policy(),
            config.fetch_timeout(),
            detector.barcodes_available()
        );

        Ok(Self::new(
            ScanEngine::new(loader, detector, parser),
            config.max_upload_bytes(),
        ))
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/detect-codes", post(handlers::detect_codes))
        .route("/detect-codes-stream", post(handlers::detect_codes_stream))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(log_requests))
        .with_state(state)
}

async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let span = tracing::info_span!("request", %method, %path);
    let response = next.run(req).instrument(span).await;

    tracing::info!(
        "{} {} -> {} ({} ms)",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

pub async fn serve(config: ServiceConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("🚀 codescan listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received");
}

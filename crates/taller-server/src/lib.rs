#![forbid(unsafe_code)]
//! HTTP service over the record store: listing, creation and streamed PDF
//! reports, plus the landing page and a liveness probe.

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use std::path::Path;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use taller_query::RecordStore;
use taller_report::Watermark;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod config;
mod http;
mod middleware;
mod streaming;
mod telemetry;

pub use config::{ApiConfig, ServerConfig};
pub use http::request_tracing::RequestId;
pub use telemetry::init_tracing;

pub const CRATE_NAME: &str = "taller-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub watermark: Option<Arc<Watermark>>,
    pub api: ApiConfig,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self::with_config(store, None, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(
        store: Arc<RecordStore>,
        watermark: Option<Arc<Watermark>>,
        api: ApiConfig,
    ) -> Self {
        Self {
            store,
            watermark,
            api,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::pages::index_handler))
        .route("/healthz", get(http::pages::healthz_handler))
        .route(
            "/api/registros",
            get(http::records::list_records_handler).post(http::records::create_record_handler),
        )
        .route(
            "/api/registros/:folio/pdf",
            get(http::report::record_pdf_handler),
        )
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .with_state(state)
}

/// Loads the report watermark. A missing asset is normal; an unusable one is
/// logged and skipped.
#[must_use]
pub fn load_watermark(path: &Path) -> Option<Arc<Watermark>> {
    match Watermark::load(path) {
        Ok(Some(mark)) => {
            info!(path = %path.display(), width = mark.width(), height = mark.height(), "watermark loaded");
            Some(Arc::new(mark))
        }
        Ok(None) => {
            info!(path = %path.display(), "watermark asset absent");
            None
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "watermark asset unusable, reports render without it");
            None
        }
    }
}

/// Opens the store, binds the listener and serves until SIGINT or SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), String> {
    let store = RecordStore::open(&config.db_path)
        .map_err(|e| format!("record store unavailable: {e}"))?;
    let watermark = load_watermark(&config.logo_path);
    let state = AppState::with_config(Arc::new(store), watermark, config.api.clone());
    let app = build_router(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| format!("bind {} failed: {e}", config.bind_addr))?;
    info!(
        bind = %config.bind_addr,
        db = %config.db_path.display(),
        static_root = %config.api.static_root.display(),
        "taller server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown signal received");
}

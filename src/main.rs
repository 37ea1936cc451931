//! Diabetes Risk Server
//!
//! Single-endpoint inference service for vital-sign based diabetes risk.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    DIABETES RISK SERVER                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /predict                                               │
//! │     │                                                        │
//! │     ▼                                                        │
//! │  ┌───────────┐   ┌──────────────┐   ┌──────────────────────┐ │
//! │  │ Payload   │──▶│ Feature      │──▶│ Risk Scorer          │ │
//! │  │ Validator │   │ Vector (8)   │   │ classifier / 0.5     │ │
//! │  └───────────┘   └──────────────┘   └──────────┬───────────┘ │
//! │                                                ▼             │
//! │                                   { risk, probability, ts }  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod logic;
mod models;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::logic::model::{load_classifier, Classifier};
use crate::logic::scoring::RiskScorer;

pub use error::{AppError, AppResult};

/// Request bodies above this size are rejected with 413
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before the filter reads RUST_LOG
    dotenvy::dotenv().ok();
    init_tracing();

    let config = config::Config::from_env();

    tracing::info!("Diabetes Risk Server starting...");
    tracing::info!("Field policy: {:?}", config.field_policy);

    let classifier: Option<Arc<dyn Classifier>> = match load_classifier(&config.model_path) {
        Ok(model) => {
            let meta = model.metadata();
            tracing::info!(
                "Model loaded: {} (calibrated: {}, sha256: {})",
                meta.name,
                meta.calibrated,
                meta.sha256
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::error!("Failed to load model, serving neutral probabilities: {}", e);
            None
        }
    };

    let scorer = RiskScorer::new(classifier);
    if scorer.is_degraded() && config.is_production() {
        tracing::warn!("Running in degraded mode in production");
    }

    // Build application state
    let state = AppState {
        config: config.clone(),
        scorer,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "diabetes_risk=debug,tower_http=debug".into());
    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub scorer: RiskScorer,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/ping", get(handlers::health::ping))
        .route("/predict", post(handlers::predict::predict));

    with_middleware(routes).with_state(state)
}

fn with_middleware(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any)
            )
            .layer(CompressionLayer::new())
            .layer(CatchPanicLayer::custom(error::handle_panic))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
    )
}

pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::{Method, header};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::config::Config;
use crate::inference::{InferenceClient, QuestionAnswerer, Summarizer};
use crate::pipeline::PipelineSettings;
use crate::tokenizer::{self, TokenCounter};

/// Request body cap. Leaves room for a base64-encoded upload at the
/// validation limit plus the JSON envelope.
const MAX_BODY_BYTES: usize = 24 * 1024 * 1024;

/// Both model roles behind one shared handle.
pub trait Models: Summarizer + QuestionAnswerer + Send + Sync + 'static {}

impl<T> Models for T where T: Summarizer + QuestionAnswerer + Send + Sync + 'static {}

/// Shared application state, built once at startup.
pub struct AppState<M> {
    pub models: Arc<M>,
    pub counter: Arc<dyn TokenCounter + Send + Sync>,
    pub settings: PipelineSettings,
}

// Manual impl: `M` itself need not be Clone.
impl<M> Clone for AppState<M> {
    fn clone(&self) -> Self {
        Self {
            models: Arc::clone(&self.models),
            counter: Arc::clone(&self.counter),
            settings: self.settings,
        }
    }
}

impl<M> AppState<M> {
    pub fn new(
        models: M,
        counter: impl TokenCounter + Send + Sync + 'static,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            models: Arc::new(models),
            counter: Arc::new(counter),
            settings,
        }
    }
}

pub async fn serve(cfg: Config, port: u16) -> Result<()> {
    let origins: Vec<axum::http::HeaderValue> = [
        "http://localhost:5173",
        "http://127.0.0.1:5173",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
    ]
    .iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(86400));

    let counter = tokenizer::counter_for(&cfg)?;
    tracing::info!("Token counting with {}", counter.describe());

    let client = InferenceClient::from_config(&cfg).context("Failed to build inference client")?;
    tracing::info!("Inference endpoint: {}", client.endpoint());

    let state = AppState::new(client, counter, PipelineSettings::from(&cfg));

    let app = routes::router(state)
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{port}"))
        .await
        .with_context(|| format!("Failed to bind 127.0.0.1:{port}"))?;
    tracing::info!("HTTP API listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}

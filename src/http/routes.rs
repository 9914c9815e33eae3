use axum::{
    Router,
    extract::{Json, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{AppState, Models};
use crate::chunking;
use crate::extract;
use crate::pipeline::{self, PipelineError};
use crate::validation::{
    MAX_UPLOAD_SIZE, sanitize_error, validate_filename, validate_question, validate_text,
};

type Reply = (StatusCode, Json<Value>);

pub fn router<M: Models>(state: AppState<M>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/v1/extract", post(extract_document))
        .route("/v1/chunks", post(chunks::<M>))
        .route("/v1/summarize", post(summarize::<M>))
        .route("/v1/query", post(query::<M>))
        .route("/v1/summary/download", post(download_summary))
        .with_state(state)
}

fn ok(body: Value) -> Reply {
    (StatusCode::OK, Json(body))
}

fn fail(status: StatusCode, error: impl Into<String>) -> Reply {
    (status, Json(json!({ "ok": false, "error": error.into() })))
}

fn pipeline_failure(e: PipelineError) -> Reply {
    match e {
        PipelineError::EmptyQuestion | PipelineError::EmptyDocument => {
            fail(StatusCode::BAD_REQUEST, e.to_string())
        }
        PipelineError::Inference(inner) => {
            tracing::warn!("Inference failed: {inner}");
            fail(StatusCode::BAD_GATEWAY, sanitize_error(&inner))
        }
        PipelineError::Tokenizer(inner) => {
            tracing::error!("Tokenizer failed: {inner}");
            fail(StatusCode::INTERNAL_SERVER_ERROR, sanitize_error(&inner))
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({
        "service": "doclens",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Deserialize)]
struct ExtractRequest {
    filename: String,
    content_base64: String,
}

async fn extract_document(Json(body): Json<ExtractRequest>) -> Reply {
    if let Err(e) = validate_filename(&body.filename) {
        return fail(StatusCode::BAD_REQUEST, e);
    }
    let bytes = match STANDARD.decode(body.content_base64.trim()) {
        Ok(b) => b,
        Err(e) => return fail(StatusCode::BAD_REQUEST, format!("Invalid base64 content: {e}")),
    };
    if bytes.len() > MAX_UPLOAD_SIZE {
        return fail(
            StatusCode::BAD_REQUEST,
            format!(
                "File too large ({} bytes). Maximum is {} bytes.",
                bytes.len(),
                MAX_UPLOAD_SIZE
            ),
        );
    }

    let filename = body.filename;
    let result =
        tokio::task::spawn_blocking(move || extract::extract_named(&filename, &bytes)).await;

    match result {
        Ok(Ok(text)) => ok(json!({ "ok": true, "text": text })),
        Ok(Err(e)) => fail(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            tracing::error!("Extraction task failed: {e}");
            fail(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

#[derive(Deserialize)]
struct TextRequest {
    text: String,
}

async fn chunks<M: Models>(State(state): State<AppState<M>>, Json(body): Json<TextRequest>) -> Reply {
    if let Err(e) = validate_text(&body.text) {
        return fail(StatusCode::BAD_REQUEST, e);
    }

    match chunking::plan_chunks(&body.text, &*state.counter) {
        Ok(plan) => {
            let chunks: Vec<Value> = plan
                .chunks
                .iter()
                .map(|c| json!({ "text": c.text, "tokens": c.tokens }))
                .collect();
            ok(json!({ "ok": true, "budget": plan.budget, "chunks": chunks }))
        }
        Err(e) => pipeline_failure(e.into()),
    }
}

async fn summarize<M: Models>(
    State(state): State<AppState<M>>,
    Json(body): Json<TextRequest>,
) -> Reply {
    if let Err(e) = validate_text(&body.text) {
        return fail(StatusCode::BAD_REQUEST, e);
    }

    let result = pipeline::summarize_document(
        &body.text,
        &*state.counter,
        &*state.models,
        state.settings.summary_ratio,
    )
    .await;

    match result {
        Ok(summary) => ok(json!({ "ok": true, "summary": summary })),
        Err(e) => pipeline_failure(e),
    }
}

#[derive(Deserialize)]
struct QueryRequest {
    text: String,
    question: String,
}

async fn query<M: Models>(State(state): State<AppState<M>>, Json(body): Json<QueryRequest>) -> Reply {
    if let Err(e) = validate_text(&body.text) {
        return fail(StatusCode::BAD_REQUEST, e);
    }
    let question = match validate_question(&body.question) {
        Ok(q) => q,
        Err(e) => return fail(StatusCode::BAD_REQUEST, e),
    };

    let result = pipeline::query_document(
        &body.text,
        question,
        &*state.models,
        state.settings.qa_window_chars,
    )
    .await;

    match result {
        Ok(answer) => ok(json!({ "ok": true, "answer": answer })),
        Err(e) => pipeline_failure(e),
    }
}

#[derive(Deserialize)]
struct DownloadRequest {
    summary: String,
}

async fn download_summary(Json(body): Json<DownloadRequest>) -> Response {
    if let Err(e) = validate_text(&body.summary) {
        return fail(StatusCode::BAD_REQUEST, e).into_response();
    }

    let disposition = format!("attachment; filename=\"{}\"", pipeline::SUMMARY_FILENAME);
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pipeline::summary_artifact(&body.summary),
    )
        .into_response()
}

//! Model backends.
//!
//! Both models are treated as opaque functions. [`InferenceClient`] reaches
//! them over HTTP; tests substitute in-process fakes.

mod client;
pub mod types;

use std::future::Future;

use thiserror::Error;

pub use client::InferenceClient;
pub use types::Answer;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("inference server returned error status {status}: {body}")]
    Server { status: u16, body: String },

    #[error("unexpected response from model: {0}")]
    Malformed(String),
}

/// Abstractive summarization: text in, shorter text out.
pub trait Summarizer {
    /// `max_length` is the generation length limit handed to the model.
    fn summarize(
        &self,
        text: &str,
        max_length: usize,
    ) -> impl Future<Output = Result<String, InferenceError>> + Send;
}

/// Extractive question answering over a context passage.
pub trait QuestionAnswerer {
    fn answer(
        &self,
        question: &str,
        context: &str,
    ) -> impl Future<Output = Result<Answer, InferenceError>> + Send;
}

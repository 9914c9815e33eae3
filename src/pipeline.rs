//! The two user actions: summarize a document, ask it a question.

use thiserror::Error;

use crate::chunking::{self, DEFAULT_WINDOW_CHARS};
use crate::config::Config;
use crate::inference::{InferenceError, QuestionAnswerer, Summarizer};
use crate::tokenizer::{TokenCounter, TokenizerError};

pub const SUMMARY_FILENAME: &str = "summary.txt";
pub const DEFAULT_SUMMARY_RATIO: f64 = 0.40;

/// Separator between lines of the downloadable summary.
const SUMMARY_LINE_DELIMITER: &str = ". ";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("document is empty")]
    EmptyDocument,

    #[error("please enter a question")]
    EmptyQuestion,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    pub summary_ratio: f64,
    pub qa_window_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            summary_ratio: DEFAULT_SUMMARY_RATIO,
            qa_window_chars: DEFAULT_WINDOW_CHARS,
        }
    }
}

impl From<&Config> for PipelineSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            summary_ratio: cfg.summary_ratio,
            qa_window_chars: cfg.qa_window_chars,
        }
    }
}

/// Generation length limit for every chunk of a document: a fraction of the
/// whole (trimmed) document's character length, never below 1.
pub fn summary_length_limit(document: &str, ratio: f64) -> usize {
    let chars = document.trim().chars().count();
    ((ratio * chars as f64) as usize).max(1)
}

/// Chunk `text`, summarize each chunk in order, join the outputs with spaces.
///
/// Each model output is trimmed before joining, so the result has single
/// separating spaces and no trailing space. A blank document yields an empty
/// summary without calling the model.
pub async fn summarize_document<C, S>(
    text: &str,
    counter: &C,
    summarizer: &S,
    ratio: f64,
) -> Result<String, PipelineError>
where
    C: TokenCounter + ?Sized,
    S: Summarizer + ?Sized,
{
    let chunks = chunking::compute_chunks(text, counter)?;
    if chunks.is_empty() {
        return Ok(String::new());
    }

    let max_length = summary_length_limit(text, ratio);
    tracing::info!(chunks = chunks.len(), max_length, "Summarizing document");

    let mut parts = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let summary = summarizer.summarize(chunk, max_length).await?;
        tracing::debug!(chunk = i, chars = summary.len(), "chunk summarized");
        parts.push(summary.trim().to_string());
    }

    Ok(parts.join(" "))
}

/// Ask `question` against every fixed-width window of `text` and combine
/// the per-window answers into one sentence.
pub async fn query_document<Q>(
    text: &str,
    question: &str,
    answerer: &Q,
    window_chars: usize,
) -> Result<String, PipelineError>
where
    Q: QuestionAnswerer + ?Sized,
{
    let question = question.trim();
    if question.is_empty() {
        return Err(PipelineError::EmptyQuestion);
    }
    if text.trim().is_empty() {
        return Err(PipelineError::EmptyDocument);
    }

    let windows = chunking::split_windows(text, window_chars);
    tracing::info!(windows = windows.len(), "Querying document");

    let mut answers = Vec::with_capacity(windows.len());
    for window in &windows {
        let answer = answerer.answer(question, window).await?;
        answers.push(answer.answer);
    }

    Ok(format_answer(&answers))
}

/// Join answers with spaces, trim, capitalize the first letter (the rest is
/// lowercased) and end with a period.
pub fn format_answer(answers: &[String]) -> String {
    let mut joined = String::new();
    for answer in answers {
        joined.push_str(answer);
        joined.push(' ');
    }

    let mut out = capitalize(joined.trim());
    out.push('.');
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Bytes of the downloadable summary file: the summary split into lines on
/// `". "`, each encoded as UTF-8 and rejoined with `". "`.
pub fn summary_artifact(summary: &str) -> Vec<u8> {
    summary
        .split(SUMMARY_LINE_DELIMITER)
        .map(str::as_bytes)
        .collect::<Vec<_>>()
        .join(SUMMARY_LINE_DELIMITER.as_bytes())
}

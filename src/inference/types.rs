//! Wire shapes of the HuggingFace Inference API pipelines.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct SummarizeRequest<'a> {
    pub inputs: &'a str,
    pub parameters: SummarizeParameters,
}

#[derive(Debug, Serialize)]
pub struct SummarizeParameters {
    pub max_length: usize,
}

#[derive(Debug, Deserialize)]
pub struct SummaryText {
    pub summary_text: String,
}

/// Hosted pipelines answer with a one-element list; some self-hosted
/// servers return the bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SummarizeResponse {
    Many(Vec<SummaryText>),
    One(SummaryText),
}

impl SummarizeResponse {
    pub fn into_text(self) -> Option<String> {
        match self {
            SummarizeResponse::Many(items) => items.into_iter().next().map(|s| s.summary_text),
            SummarizeResponse::One(item) => Some(item.summary_text),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerRequest<'a> {
    pub inputs: AnswerInputs<'a>,
}

#[derive(Debug, Serialize)]
pub struct AnswerInputs<'a> {
    pub question: &'a str,
    pub context: &'a str,
}

/// One extracted answer span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
}

impl Answer {
    pub fn text(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            score: 0.0,
            start: 0,
            end: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnswerResponse {
    One(Answer),
    Many(Vec<Answer>),
}

impl AnswerResponse {
    /// Best-scoring answer.
    pub fn into_best(self) -> Option<Answer> {
        match self {
            AnswerResponse::One(a) => Some(a),
            AnswerResponse::Many(all) => all
                .into_iter()
                .max_by(|a, b| a.score.total_cmp(&b.score)),
        }
    }
}

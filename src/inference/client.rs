use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    AnswerInputs, AnswerRequest, AnswerResponse, SummarizeParameters, SummarizeRequest,
    SummarizeResponse,
};
use super::{Answer, InferenceError, QuestionAnswerer, Summarizer};
use crate::config::Config;

/// HTTP client for a HuggingFace-Inference-compatible server.
///
/// Requests go to `POST {endpoint}/models/{model_id}`.
#[derive(Clone)]
pub struct InferenceClient {
    http: Client,
    endpoint: String,
    api_token: Option<String>,
    summarization_model: String,
    qa_model: String,
}

impl InferenceClient {
    pub fn new(
        endpoint: impl Into<String>,
        summarization_model: impl Into<String>,
        qa_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, InferenceError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("doclens/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_token: None,
            summarization_model: summarization_model.into(),
            qa_model: qa_model.into(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, InferenceError> {
        let client = Self::new(
            cfg.inference_url(),
            cfg.summarization_model.clone(),
            cfg.qa_model.clone(),
            Duration::from_secs(cfg.request_timeout_secs),
        )?;
        Ok(client.with_api_token(cfg.api_token.clone()))
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.endpoint, model_id)
    }

    async fn post_json<B, R>(&self, model_id: &str, body: &B) -> Result<R, InferenceError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.http.post(self.model_url(model_id)).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(InferenceError::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

impl Summarizer for InferenceClient {
    async fn summarize(&self, text: &str, max_length: usize) -> Result<String, InferenceError> {
        let req = SummarizeRequest {
            inputs: text,
            parameters: SummarizeParameters { max_length },
        };

        tracing::debug!(
            model = %self.summarization_model,
            chars = text.len(),
            max_length,
            "summarize request"
        );

        let res: SummarizeResponse = self.post_json(&self.summarization_model, &req).await?;
        res.into_text()
            .ok_or_else(|| InferenceError::Malformed("empty summarization result".to_string()))
    }
}

impl QuestionAnswerer for InferenceClient {
    async fn answer(&self, question: &str, context: &str) -> Result<Answer, InferenceError> {
        let req = AnswerRequest {
            inputs: AnswerInputs { question, context },
        };

        tracing::debug!(model = %self.qa_model, chars = context.len(), "answer request");

        let res: AnswerResponse = self.post_json(&self.qa_model, &req).await?;
        res.into_best()
            .ok_or_else(|| InferenceError::Malformed("empty question-answering result".to_string()))
    }
}

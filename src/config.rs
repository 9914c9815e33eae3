use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::tokenizer::TOKENIZER_FILENAME;
use crate::tokenizer::models::{self, Task};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of a HuggingFace-Inference-compatible server.
    #[serde(default = "default_inference_url")]
    pub inference_url: String,

    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_summarization_model")]
    pub summarization_model: String,

    #[serde(default = "default_qa_model")]
    pub qa_model: String,

    /// Generation length limit as a fraction of the document's character length.
    #[serde(default = "default_summary_ratio")]
    pub summary_ratio: f64,

    /// Character width of the context windows handed to the QA model.
    #[serde(default = "default_qa_window_chars")]
    pub qa_window_chars: usize,

    /// Count whitespace words when the tokenizer file has not been fetched.
    #[serde(default = "default_allow_word_fallback")]
    pub allow_word_fallback: bool,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_port() -> u16 {
    7480
}

fn default_inference_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_summarization_model() -> String {
    models::default_model(Task::Summarization).id.to_string()
}

fn default_qa_model() -> String {
    models::default_model(Task::QuestionAnswering).id.to_string()
}

fn default_summary_ratio() -> f64 {
    0.40
}

fn default_qa_window_chars() -> usize {
    600
}

fn default_allow_word_fallback() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    180
}

impl Config {
    pub fn data_dir() -> Result<PathBuf> {
        let dir = match std::env::var_os("DOCLENS_HOME") {
            Some(home) => PathBuf::from(home),
            None => dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".doclens"),
        };
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("config.toml"))
    }

    pub fn model_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?.join("models");
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// `models/<org>--<name>/tokenizer.json`, mirroring the HF cache layout.
    pub fn tokenizer_path(model_id: &str) -> Result<PathBuf> {
        Ok(Self::model_dir()?
            .join(model_id.replace('/', "--"))
            .join(TOKENIZER_FILENAME))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            Self::from_toml(&contents)?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse config.toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, &contents)?;

        // Owner-only: the file may hold an API token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DOCLENS_INFERENCE_URL") {
            self.inference_url = url;
        }
        let token = std::env::var("DOCLENS_API_TOKEN").or_else(|_| std::env::var("HF_TOKEN"));
        if let Ok(token) = token {
            if !token.trim().is_empty() {
                self.api_token = Some(token);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.summary_ratio > 0.0 && self.summary_ratio.is_finite()) {
            anyhow::bail!("summary_ratio must be a positive number, got {}", self.summary_ratio);
        }
        if self.qa_window_chars == 0 {
            anyhow::bail!("qa_window_chars must be at least 1");
        }
        Ok(())
    }

    pub fn inference_url(&self) -> &str {
        self.inference_url.trim_end_matches('/')
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            inference_url: default_inference_url(),
            api_token: None,
            summarization_model: default_summarization_model(),
            qa_model: default_qa_model(),
            summary_ratio: default_summary_ratio(),
            qa_window_chars: default_qa_window_chars(),
            allow_word_fallback: default_allow_word_fallback(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

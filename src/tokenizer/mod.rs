pub mod models;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;

use crate::config::Config;

pub const TOKENIZER_FILENAME: &str = "tokenizer.json";

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("tokenizer not found at {0}. Run `doclens model fetch` first.")]
    NotFound(PathBuf),

    #[error("failed to load tokenizer: {0}")]
    Load(String),

    #[error("tokenization failed: {0}")]
    Encode(String),
}

/// Anything that can measure a piece of text in model tokens.
pub trait TokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError>;
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        (**self).count_tokens(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Arc<T> {
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        (**self).count_tokens(text)
    }
}

/// HuggingFace `tokenizer.json` loaded through the `tokenizers` crate.
pub struct HfTokenizer {
    tokenizer: tokenizers::Tokenizer,
}

impl HfTokenizer {
    pub fn from_file(path: &Path) -> Result<Self, TokenizerError> {
        if !path.exists() {
            return Err(TokenizerError::NotFound(path.to_path_buf()));
        }

        let tokenizer = tokenizers::Tokenizer::from_file(path)
            .map_err(|e| TokenizerError::Load(e.to_string()))?;

        Ok(Self { tokenizer })
    }

    /// Token ids for `text`, without the model's special tokens.
    pub fn tokenize(&self, text: &str) -> Result<Vec<u32>, TokenizerError> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| TokenizerError::Encode(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }
}

impl TokenCounter for HfTokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(self.tokenize(text)?.len())
    }
}

/// Whitespace word count. Stand-in when no tokenizer file is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        Ok(text.split_whitespace().count())
    }
}

/// The counter actually used by the CLI and HTTP API.
#[derive(Clone)]
pub enum Counter {
    Hf(Arc<HfTokenizer>),
    Words(WordCounter),
}

impl Counter {
    pub fn describe(&self) -> &'static str {
        match self {
            Counter::Hf(_) => "tokenizer.json",
            Counter::Words(_) => "whitespace words",
        }
    }
}

impl TokenCounter for Counter {
    fn count_tokens(&self, text: &str) -> Result<usize, TokenizerError> {
        match self {
            Counter::Hf(t) => t.count_tokens(text),
            Counter::Words(w) => w.count_tokens(text),
        }
    }
}

static TOKENIZERS: OnceLock<Mutex<HashMap<PathBuf, Arc<HfTokenizer>>>> = OnceLock::new();

/// Load a tokenizer once per process and hand out shared references.
pub fn get_or_init(path: &Path) -> Result<Arc<HfTokenizer>, TokenizerError> {
    let cache = TOKENIZERS.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache
        .lock()
        .map_err(|_| TokenizerError::Load("tokenizer cache poisoned".to_string()))?;

    if let Some(existing) = cache.get(path) {
        return Ok(Arc::clone(existing));
    }

    let tokenizer = Arc::new(HfTokenizer::from_file(path)?);
    tracing::info!("Loaded tokenizer from {}", path.display());
    cache.insert(path.to_path_buf(), Arc::clone(&tokenizer));
    Ok(tokenizer)
}

/// Resolve the counter for the configured summarization model.
///
/// Falls back to [`WordCounter`] when the tokenizer file is missing and the
/// config allows it. Any other load failure is returned.
pub fn counter_for(cfg: &Config) -> anyhow::Result<Counter> {
    let path = Config::tokenizer_path(&cfg.summarization_model)?;
    match get_or_init(&path) {
        Ok(t) => Ok(Counter::Hf(t)),
        Err(TokenizerError::NotFound(missing)) if cfg.allow_word_fallback => {
            tracing::warn!(
                "No tokenizer at {}; counting whitespace words instead. Run `doclens model fetch` for exact budgets.",
                missing.display()
            );
            Ok(Counter::Words(WordCounter))
        }
        Err(e) => Err(e.into()),
    }
}

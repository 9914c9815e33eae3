use std::path::Path;

use anyhow::{Context, Result};
use doclens::config::Config;
use doclens::inference::InferenceClient;
use doclens::pipeline;
use doclens::tokenizer;

use super::{InputArgs, load_input, nothing_to_process};

pub async fn run(cfg: &Config, input: &InputArgs, output: Option<&Path>) -> Result<()> {
    let text = load_input(input)?;
    if nothing_to_process(&text) {
        return Ok(());
    }

    let counter = tokenizer::counter_for(cfg)?;
    let client = InferenceClient::from_config(cfg)?;

    let summary = pipeline::summarize_document(&text, &counter, &client, cfg.summary_ratio)
        .await
        .context("Summarization failed")?;

    println!("{summary}");

    if let Some(path) = output {
        write_artifact(path, &summary)?;
        eprintln!("Summary saved to {}", path.display());
    }
    Ok(())
}

pub fn write_artifact(path: &Path, summary: &str) -> Result<()> {
    std::fs::write(path, pipeline::summary_artifact(summary))
        .with_context(|| format!("Failed to write {}", path.display()))
}

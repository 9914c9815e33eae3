use anyhow::{Context, Result};
use doclens::config::Config;
use doclens::inference::InferenceClient;
use doclens::pipeline;

use super::{InputArgs, load_input, nothing_to_process};

pub async fn run(cfg: &Config, input: &InputArgs, question: &str) -> Result<()> {
    let text = load_input(input)?;
    if nothing_to_process(&text) {
        return Ok(());
    }

    let client = InferenceClient::from_config(cfg)?;
    let answer = pipeline::query_document(&text, question, &client, cfg.qa_window_chars)
        .await
        .context("Question answering failed")?;

    println!("{answer}");
    Ok(())
}

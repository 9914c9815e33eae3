use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use doclens::config::Config;
use doclens::tokenizer::models::{self, ModelSpec, Task};

/// List catalog models, grouped by task.
pub fn list(cfg: &Config) -> Result<()> {
    for (task, current) in [
        (Task::Summarization, &cfg.summarization_model),
        (Task::QuestionAnswering, &cfg.qa_model),
    ] {
        println!("{} models:\n", style(task).bold());

        for model in models::models_for(task) {
            let marker = if model.id == current.as_str() { " ✓" } else { "" };
            let installed = Config::tokenizer_path(model.id)?.exists();

            println!("  {} {}{}", model.id, model.name, marker);
            println!("    Max input:   {} tokens", model.max_input_tokens);
            println!("    Tokenizer:   {}", if installed { "installed" } else { "missing" });
            println!("    Description: {}", model.description);
            println!();
        }

        if models::get_model(current).is_none() {
            println!("  Current model: {current} (not in catalog)\n");
        }
    }

    Ok(())
}

/// Download `tokenizer.json` for a catalog model.
pub async fn fetch(cfg: &Config, id: Option<&str>, force: bool) -> Result<()> {
    let id = id.unwrap_or(&cfg.summarization_model);
    let model = models::get_model(id).with_context(|| {
        format!("Model '{id}' not found in catalog. Run `doclens model list` to see available models.")
    })?;

    let dest = Config::tokenizer_path(model.id)?;
    if dest.exists() && !force {
        println!("  {} Tokenizer already installed at {}", style("✓").green(), dest.display());
        return Ok(());
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    println!("  {} Downloading tokenizer for {}...", style("⬇").cyan(), model.name);
    let client = reqwest::Client::new();
    download_file(&client, model, &dest).await?;
    println!("  {} Tokenizer ready at {}", style("✓").green(), dest.display());
    Ok(())
}

async fn download_file(client: &reqwest::Client, model: &ModelSpec, dest: &Path) -> Result<()> {
    let url = model.tokenizer_url;
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {} when downloading {}", response.status(), url);
    }

    let bytes = response
        .bytes()
        .await
        .context("Failed to download response body")?;

    // Refuse to install something the tokenizer loader would choke on later.
    serde_json::from_slice::<serde_json::Value>(&bytes)
        .with_context(|| format!("{url} did not return a JSON tokenizer"))?;

    let tmp = dest.with_extension("json.part");
    fs::write(&tmp, &bytes).with_context(|| format!("Failed to write file {}", tmp.display()))?;
    fs::rename(&tmp, dest).with_context(|| format!("Failed to move file into {}", dest.display()))?;

    println!("    Downloaded {} KB", bytes.len() / 1024);
    Ok(())
}

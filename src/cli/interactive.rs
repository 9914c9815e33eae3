use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Editor, Input, Select};
use doclens::config::Config;
use doclens::extract;
use doclens::inference::InferenceClient;
use doclens::pipeline::{self, PipelineError};
use doclens::tokenizer::{self, Counter};

use super::summarize::write_artifact;

const ACTIONS: &[&str] = &["Summarize Text", "Query Text", "Edit Text", "Exit App"];

struct Session<'a> {
    cfg: &'a Config,
    counter: Counter,
    client: InferenceClient,
    text: String,
}

pub async fn run(cfg: &Config, file: Option<&Path>) -> Result<()> {
    if !atty::is(atty::Stream::Stdin) || !atty::is(atty::Stream::Stdout) {
        anyhow::bail!("Interactive mode needs a terminal. Use `doclens summarize` or `doclens query` instead.");
    }

    let theme = ColorfulTheme::default();

    println!();
    println!("  {}", style("doclens").bold().cyan());
    println!("  {}", style("Document summarization & querying").dim());
    println!();

    let text = match file {
        Some(path) => extract::extract_file(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            println!("  {} Opening your editor. Paste or type the text, then save and close.", style("→").dim());
            Editor::new().edit("")?.unwrap_or_default()
        }
    };

    if text.trim().is_empty() {
        println!("  {} Nothing to process: the document is empty.", style("ℹ").blue());
        return Ok(());
    }

    let mut session = Session {
        cfg,
        counter: tokenizer::counter_for(cfg)?,
        client: InferenceClient::from_config(cfg)?,
        text,
    };

    println!(
        "  {} Loaded {} characters",
        style("✓").green(),
        session.text.chars().count()
    );

    loop {
        println!();
        let choice = Select::with_theme(&theme)
            .with_prompt("Select an action")
            .items(ACTIONS)
            .default(0)
            .interact()?;

        match ACTIONS[choice] {
            "Summarize Text" => session.summarize(&theme).await?,
            "Query Text" => session.query(&theme).await?,
            "Edit Text" => session.edit()?,
            _ => {
                let exit = Confirm::with_theme(&theme)
                    .with_prompt("Are you sure you want to exit?")
                    .default(false)
                    .interact()?;
                if exit {
                    return Ok(());
                }
            }
        }
    }
}

impl Session<'_> {
    async fn summarize(&self, theme: &ColorfulTheme) -> Result<()> {
        println!("  {} Summarizing...", style("⋯").dim());
        let result = pipeline::summarize_document(
            &self.text,
            &self.counter,
            &self.client,
            self.cfg.summary_ratio,
        )
        .await;

        let summary = match result {
            Ok(s) => s,
            Err(e) => {
                report(&e);
                return Ok(());
            }
        };

        println!();
        println!("{}", style("Summarized Text").bold());
        println!("{summary}");
        println!();

        let save = Confirm::with_theme(theme)
            .with_prompt(format!("Save summary to {}?", pipeline::SUMMARY_FILENAME))
            .default(false)
            .interact()?;
        if save {
            let path = Path::new(pipeline::SUMMARY_FILENAME);
            write_artifact(path, &summary)?;
            println!("  {} Saved {}", style("✓").green(), path.display());
        }
        Ok(())
    }

    async fn query(&self, theme: &ColorfulTheme) -> Result<()> {
        let question: String = Input::with_theme(theme)
            .with_prompt("Enter your question")
            .allow_empty(true)
            .interact_text()?;

        let result = pipeline::query_document(
            &self.text,
            &question,
            &self.client,
            self.cfg.qa_window_chars,
        )
        .await;

        match result {
            Ok(answer) => println!("{} {answer}", style("Answer:").bold()),
            Err(e) => report(&e),
        }
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        match Editor::new().edit(&self.text)? {
            Some(edited) if !edited.trim().is_empty() => {
                self.text = edited;
                println!("  {} Text updated", style("✓").green());
            }
            Some(_) => println!("  {} Edited text is empty; keeping the previous text", style("⚠").yellow()),
            None => println!("  {} Edit cancelled", style("→").dim()),
        }
        Ok(())
    }
}

fn report(e: &PipelineError) {
    match e {
        PipelineError::EmptyQuestion => println!("  {} Please enter a question.", style("⚠").yellow()),
        other => eprintln!("  {} {other}", style("✗").red().bold()),
    }
}

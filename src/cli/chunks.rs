use anyhow::Result;
use console::style;
use doclens::chunking;
use doclens::config::Config;
use doclens::tokenizer;

use super::{InputArgs, load_input, nothing_to_process};

pub fn run(cfg: &Config, input: &InputArgs) -> Result<()> {
    let text = load_input(input)?;
    if nothing_to_process(&text) {
        return Ok(());
    }

    let counter = tokenizer::counter_for(cfg)?;
    let plan = chunking::plan_chunks(&text, &counter)?;

    println!(
        "{} sentences, budget {} tokens ({}), {} chunks",
        plan.sentence_count,
        plan.budget,
        counter.describe(),
        plan.chunks.len()
    );

    for (i, chunk) in plan.chunks.iter().enumerate() {
        println!();
        println!(
            "{} {}",
            style(format!("[{}]", i + 1)).bold(),
            style(format!("{} tokens, {} sentences", chunk.tokens, chunk.sentences)).dim()
        );
        println!("{}", chunk.text);
    }

    Ok(())
}

pub mod chunks;
pub mod extract;
pub mod interactive;
pub mod model;
pub mod query;
pub mod summarize;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "doclens", about = "Summarize documents and ask them questions.")]
#[command(version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where the document text comes from.
#[derive(Args)]
pub struct InputArgs {
    /// Document to read (.txt, .docx, .pptx, .pdf)
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Use this text instead of a file ("-" reads stdin)
    #[arg(short, long)]
    pub text: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the text extracted from a document
    Extract {
        file: PathBuf,
    },

    /// Show the token budget and the chunks a document is split into
    Chunks {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Summarize a document chunk by chunk
    Summarize {
        #[command(flatten)]
        input: InputArgs,

        /// Also write the summary to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask a question about a document
    Query {
        #[command(flatten)]
        input: InputArgs,

        /// The question to ask
        #[arg(short, long)]
        question: String,
    },

    /// Menu-driven session: summarize or query a document repeatedly
    Interactive {
        /// Document to start with (prompts for text otherwise)
        file: Option<PathBuf>,
    },

    /// Run the local HTTP API
    Serve {
        /// Port to listen on (default from config: 7480)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage tokenizer files for the model catalog
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List catalog models and whether their tokenizer is installed
    List,
    /// Download the tokenizer for a model (default: configured summarization model)
    Fetch {
        id: Option<String>,

        /// Download again even if the file exists
        #[arg(short, long)]
        force: bool,
    },
}

/// Read the document text selected by `args`.
pub fn load_input(args: &InputArgs) -> Result<String> {
    if let Some(path) = &args.file {
        return doclens::extract::extract_file(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    match args.text.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
        Some(text) => Ok(text.to_string()),
        None => anyhow::bail!("Provide a FILE or --text"),
    }
}

/// True (after telling the user) when there is nothing to work on.
pub fn nothing_to_process(text: &str) -> bool {
    if text.trim().is_empty() {
        eprintln!("Nothing to process: the document is empty.");
        return true;
    }
    false
}

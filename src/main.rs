mod cli;

use clap::Parser;
use cli::{Cli, Command, ModelAction};
use doclens::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so that stdout stays clean for piping results.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doclens=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cfg = Config::load()?;

    match cli.command {
        Command::Extract { file } => cli::extract::run(&file),
        Command::Chunks { input } => cli::chunks::run(&cfg, &input),
        Command::Summarize { input, output } => {
            cli::summarize::run(&cfg, &input, output.as_deref()).await
        }
        Command::Query { input, question } => cli::query::run(&cfg, &input, &question).await,
        Command::Interactive { file } => cli::interactive::run(&cfg, file.as_deref()).await,
        Command::Serve { port } => doclens::http::serve(cfg.clone(), port.unwrap_or(cfg.port)).await,
        Command::Model { action } => match action {
            ModelAction::List => cli::model::list(&cfg),
            ModelAction::Fetch { id, force } => cli::model::fetch(&cfg, id.as_deref(), force).await,
        },
    }
}

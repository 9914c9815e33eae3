use std::path::Path;

use anyhow::{Context, Result};
use doclens::extract::{self, DocumentKind};

pub fn run(file: &Path) -> Result<()> {
    let kind = DocumentKind::from_path(file)?;
    let text = extract::extract_file(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    tracing::info!(
        "Extracted {} chars from {} ({})",
        text.chars().count(),
        file.display(),
        kind.name()
    );
    println!("{text}");
    Ok(())
}

use super::ExtractError;

/// All pages' text on a single line: page text is concatenated and every
/// newline becomes a space.
pub fn read_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed fonts and streams
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    let text = match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => return Err(ExtractError::Pdf(e.to_string())),
        Err(_) => return Err(ExtractError::Pdf("PDF parser panicked on this file".to_string())),
    };
    Ok(join_lines(&text))
}

fn join_lines(text: &str) -> String {
    text.split('\n').collect::<Vec<_>>().join(" ")
}
